//! Service-level errors raised while starting and running the server
//!
//! Request-level failures are reported through
//! [`ApiError`](crate::handlers::ApiError); this type covers everything
//! around them: configuration, seeding, binding and serving.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Startup and runtime errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not a valid seed document
    #[error("Invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),

    /// The store rejected seed rows
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Tracing subscriber could not be installed
    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;

    #[test]
    fn test_seed_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid");
        let error = Error::from(json_err);
        assert!(error.to_string().starts_with("Invalid seed data:"));
    }

    #[test]
    fn test_repository_error_is_transparent() {
        let repo_err =
            RepositoryError::constraint_violation(RepositoryOperation::Create, "missing series");
        let error = Error::from(repo_err.clone());
        assert_eq!(error.to_string(), repo_err.to_string());
    }

    #[test]
    fn test_config_error_is_boxed() {
        let error = Error::from(figment::Error::from("bad value".to_string()));
        assert!(matches!(error, Error::Config(_)));
        assert!(error.to_string().contains("bad value"));
    }
}
