//! Errors raised while building or compiling criteria

use std::fmt;

/// Categories of criteria errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriteriaErrorKind {
    /// A field or operator the entity schema does not declare
    SchemaMismatch,
    /// A filter value that cannot be read as the field's type
    MalformedFilterValue,
}

impl fmt::Display for CriteriaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMismatch => write!(f, "schema_mismatch"),
            Self::MalformedFilterValue => write!(f, "malformed_filter_value"),
        }
    }
}

/// Error produced by criteria parsing and specification compilation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    /// The criteria names something the schema does not have
    #[error("Field '{field}' cannot be filtered on {entity}: {reason}")]
    SchemaMismatch {
        /// Entity being queried
        entity: String,
        /// Offending field or parameter name
        field: String,
        /// What did not match
        reason: String,
    },

    /// A filter value could not be parsed for its field
    #[error("Invalid value '{value}' for {field}.{operator}: {reason}")]
    MalformedFilterValue {
        /// Field the value was meant for
        field: String,
        /// Operator the value was meant for
        operator: String,
        /// The raw value as received
        value: String,
        /// Parse failure
        reason: String,
    },
}

impl CriteriaError {
    /// Create a schema mismatch error
    pub fn schema_mismatch(
        entity: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            entity: entity.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed value error
    pub fn malformed_value(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::MalformedFilterValue {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Error category
    #[must_use]
    pub const fn kind(&self) -> CriteriaErrorKind {
        match self {
            Self::SchemaMismatch { .. } => CriteriaErrorKind::SchemaMismatch,
            Self::MalformedFilterValue { .. } => CriteriaErrorKind::MalformedFilterValue,
        }
    }

    /// The field the error refers to
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::SchemaMismatch { field, .. } | Self::MalformedFilterValue { field, .. } => field,
        }
    }
}
