use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serenity::all::Http;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::bans::run_ban_check;
use super::guard::JobRegistry;
use super::roster::refresh_roster;
use super::store::{PgFeedStore, PgMemberStore};
use super::warfare::run_warfare_check;
use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::services::notify::{DiscordNotifier, Notifier};
use crate::services::voice::tracker::checkpoint_open_sessions;

pub const BAN_JOB: &str = "bans";
pub const WARFARE_JOB: &str = "warfare";
pub const ROSTER_JOB: &str = "roster";
pub const VOICE_CHECKPOINT_JOB: &str = "voice_checkpoint";

/// Run `job` every `period`. Each run happens in its own task holding the
/// job's permit; a tick that finds the previous run still going is skipped.
pub fn spawn_job<F, Fut>(
    name: &'static str,
    period: Duration,
    registry: Arc<JobRegistry>,
    job: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    let job = Arc::new(job);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(permit) = registry.try_start(name) else {
                let running = registry.running_for(name).unwrap_or_default();
                warn!(
                    "Skipping {} tick, previous run still going after {:?}",
                    name, running
                );
                continue;
            };

            let job = Arc::clone(&job);
            tokio::spawn(async move {
                let _permit = permit;
                debug!("Running job {}", name);
                if let Err(e) = job().await {
                    error!("Job {} failed: {}", name, e);
                }
            });
        }
    })
}

/// Start every recurring job. Feeds without a configured channel stay off.
pub fn start_background_jobs(http: Arc<Http>, data: Arc<Data>) {
    let settings = &data.settings;
    let notifier: Arc<dyn Notifier> =
        Arc::new(DiscordNotifier::new(http, settings.notify_max_retries));
    let feed_store = Arc::new(PgFeedStore::new(data.pool.clone()));

    match settings.ban_channel_id {
        Some(channel_id) => {
            let (source, store, notifier) =
                (data.stats.clone(), feed_store.clone(), notifier.clone());
            let limit = settings.ban_display_limit;
            spawn_job(BAN_JOB, settings.ban_poll_interval, data.jobs.clone(), move || {
                let (source, store, notifier) = (source.clone(), store.clone(), notifier.clone());
                async move {
                    run_ban_check(source.as_ref(), store.as_ref(), notifier.as_ref(), channel_id, limit)
                        .await
                        .map(|_| ())
                }
            });
            info!("Started ban feed for channel {}", channel_id);
        }
        None => info!("BAN_CHANNEL_ID not set, ban feed disabled"),
    }

    match settings.warfare_channel_id {
        Some(channel_id) => {
            let (source, store, notifier) =
                (data.stats.clone(), feed_store.clone(), notifier.clone());
            spawn_job(WARFARE_JOB, settings.warfare_poll_interval, data.jobs.clone(), move || {
                let (source, store, notifier) = (source.clone(), store.clone(), notifier.clone());
                async move {
                    run_warfare_check(source.as_ref(), store.as_ref(), notifier.as_ref(), channel_id)
                        .await
                        .map(|_| ())
                }
            });
            info!("Started warfare feed for channel {}", channel_id);
        }
        None => info!("WARFARE_CHANNEL_ID not set, warfare feed disabled"),
    }

    let source = data.stats.clone();
    let member_store = Arc::new(PgMemberStore::new(data.pool.clone()));
    spawn_job(ROSTER_JOB, settings.roster_poll_interval, data.jobs.clone(), move || {
        let (source, store) = (source.clone(), member_store.clone());
        async move {
            refresh_roster(source.as_ref(), store.as_ref()).await.map(|_| ())
        }
    });
    info!("Started clan roster refresh");

    let pool = data.pool.clone();
    spawn_job(
        VOICE_CHECKPOINT_JOB,
        settings.voice_checkpoint_interval,
        data.jobs.clone(),
        move || {
            let pool = pool.clone();
            async move {
                let credited = checkpoint_open_sessions(&pool).await?;
                if credited > 0 {
                    debug!("Checkpointed {} open voice sessions", credited);
                }
                Ok(())
            }
        },
    );
    info!("Started voice checkpoint job");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_slow_run_is_not_overlapped() {
        let registry = Arc::new(JobRegistry::new());
        let started = Arc::new(AtomicUsize::new(0));

        let counter = started.clone();
        let handle = spawn_job("slow", Duration::from_secs(1), registry.clone(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(3_500)).await;
                Ok(())
            }
        });

        // ticks at 0s..3s all fall inside the first run
        tokio::time::sleep(Duration::from_millis(3_200)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert!(registry.running_for("slow").is_some());

        // first run ends at 3.5s, the 4s tick starts the second
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(started.load(Ordering::SeqCst), 2);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_releases_job() {
        let registry = Arc::new(JobRegistry::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        let handle = spawn_job("flaky", Duration::from_secs(1), registry.clone(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::Transient("upstream down".to_string()))
            }
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert!(registry.running_for("flaky").is_none());

        handle.abort();
    }
}
