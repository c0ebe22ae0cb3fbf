use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Tracks which jobs are currently running so a slow run is never overlapped
/// by the next tick of the same job
#[derive(Debug, Default)]
pub struct JobRegistry {
    running: DashMap<&'static str, Instant>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the job, or `None` if a previous run still holds it
    pub fn try_start(self: &Arc<Self>, name: &'static str) -> Option<JobPermit> {
        match self.running.entry(name) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                Some(JobPermit {
                    registry: Arc::clone(self),
                    name,
                })
            }
        }
    }

    /// How long the job has been running, if it is
    pub fn running_for(&self, name: &'static str) -> Option<Duration> {
        self.running.get(name).map(|started| started.elapsed())
    }
}

/// Releases the job when dropped
#[derive(Debug)]
pub struct JobPermit {
    registry: Arc<JobRegistry>,
    name: &'static str,
}

impl Drop for JobPermit {
    fn drop(&mut self) {
        self.registry.running.remove(self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_start_is_refused_while_running() {
        let registry = Arc::new(JobRegistry::new());

        let permit = registry.try_start("bans").expect("first start");
        assert!(registry.try_start("bans").is_none());
        assert!(registry.running_for("bans").is_some());

        drop(permit);
        assert!(registry.running_for("bans").is_none());
        assert!(registry.try_start("bans").is_some());
    }

    #[test]
    fn test_jobs_are_independent() {
        let registry = Arc::new(JobRegistry::new());
        let _bans = registry.try_start("bans").expect("bans");
        assert!(registry.try_start("warfare").is_some());
    }
}
