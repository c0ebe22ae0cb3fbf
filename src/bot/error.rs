use thiserror::Error;

use crate::services::roat::StatsError;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Upstream unavailable: {0}")]
    Transient(String),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Error::Custom(msg.into())
    }

    /// Map a unique-constraint violation to `AlreadyExists`, pass everything else through
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if is_unique_violation(&err) {
            Error::AlreadyExists(what.to_string())
        } else {
            Error::Database(err)
        }
    }
}

impl From<StatsError> for Error {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::NotFound(name) => Error::NotFound(name),
            StatsError::Transient(msg) => Error::Transient(msg),
        }
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_mapping() {
        let err: Error = StatsError::NotFound("zezima".to_string()).into();
        assert!(matches!(err, Error::NotFound(name) if name == "zezima"));

        let err: Error = StatsError::Transient("timed out".to_string()).into();
        assert!(matches!(err, Error::Transient(_)));
    }

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(matches!(
            Error::from_insert(sqlx::Error::RowNotFound, "zezima"),
            Error::Database(_)
        ));
    }
}
