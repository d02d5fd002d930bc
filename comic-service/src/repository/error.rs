//! Errors raised by the comic store
//!
//! Every store call that can fail reports which call it was, why it was
//! refused, and, when one row is to blame, which comic, series or
//! characters row.
//!
//! # Example
//!
//! ```rust
//! use comic_service::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Comic", "42");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert_eq!(
//!     error.to_string(),
//!     "Repository not_found error during find_by_id: Entity not found [Comic: 42]"
//! );
//! ```

use std::fmt;

/// Store call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// `find_by_id`
    FindById,
    /// `find_all`, filtered or not
    FindAll,
    /// `find_page`
    FindPage,
    /// `count`
    Count,
    /// `exists`
    Exists,
    /// `create`, also used while seeding
    Create,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::FindPage => write!(f, "find_page"),
            Self::Count => write!(f, "count"),
            Self::Exists => write!(f, "exists"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Why the store refused a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// No row has the requested id
    NotFound,
    /// A row to create already carries an id
    AlreadyExists,
    /// A `series` or `characters` reference names a missing row, or the
    /// id sequence is used up
    ConstraintViolation,
    /// The query cannot be run, e.g. a sort on an unknown field
    ValidationFailed,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ValidationFailed => write!(f, "validation_failed"),
        }
    }
}

/// A refused store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// Call that failed
    pub operation: RepositoryOperation,
    /// Why it failed
    pub kind: RepositoryErrorKind,
    pub message: String,
    /// Entity name of the offending row, e.g. `Series`
    pub entity_type: Option<String>,
    /// Id of the offending row
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Error without row context
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// No `entity_type` row with `entity_id`; reported as a `find_by_id` failure
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::FindById,
            kind: RepositoryErrorKind::NotFound,
            message: "Entity not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// A row passed to `create` already has an id
    pub fn already_exists(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::Create,
            kind: RepositoryErrorKind::AlreadyExists,
            message: "Entity already exists".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(identifier.into()),
        }
    }

    /// Query rejected before any row is read
    ///
    /// # Example
    ///
    /// ```rust
    /// use comic_service::repository::{RepositoryError, RepositoryOperation};
    ///
    /// let error = RepositoryError::validation_failed("Cannot sort on 'thumbnail'")
    ///     .with_operation(RepositoryOperation::FindAll);
    /// assert_eq!(error.operation, RepositoryOperation::FindAll);
    /// ```
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::Create,
            kind: RepositoryErrorKind::ValidationFailed,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// A write the tables cannot accept, such as a dangling reference
    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind: RepositoryErrorKind::ConstraintViolation,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Name the offending row
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Report the error against another call
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
