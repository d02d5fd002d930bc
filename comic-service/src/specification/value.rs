//! Scalar values read from entity columns and carried by predicates
//!
//! A [`Value`] is what a column accessor yields for one row and what a
//! compiled predicate compares against. Ordering is only defined between
//! values of the same kind; `Null` is unordered and unequal to every
//! non-null value.
//!
//! # Example
//!
//! ```rust
//! use comic_service::specification::Value;
//! use std::cmp::Ordering;
//!
//! let five: Value = 5_i32.into();
//! assert_eq!(five.compare(&Value::Integer(4)), Some(Ordering::Greater));
//! assert_eq!(five.compare(&Value::Long(4)), None);
//! assert!(Value::from(None::<String>).is_null());
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A single column value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Absent value (SQL NULL)
    Null,
    /// 64-bit integer
    Long(i64),
    /// 32-bit integer
    Integer(i32),
    /// Text
    Text(String),
    /// Boolean
    Boolean(bool),
}

impl Value {
    /// Returns true for [`Value::Null`]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text payload, if this is a text value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Compare two values of the same kind
    ///
    /// Returns `None` when either side is null or the kinds differ.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Long(a), Self::Long(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
