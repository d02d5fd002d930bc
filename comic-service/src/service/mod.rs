//! Services between the HTTP handlers and the repositories
//!
//! - [`QueryService`]: criteria-driven reads (compile, then execute)
//! - [`EntityService`]: plain CRUD by id

mod entity;
mod query;

use thiserror::Error;

use crate::criteria::CriteriaError;
use crate::repository::RepositoryError;

pub use entity::EntityService;
pub use query::QueryService;

/// Failure of a service call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The criteria could not be compiled against the entity schema
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    /// The repository rejected the operation
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
