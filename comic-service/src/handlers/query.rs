//! Query types for list operations
//!
//! List endpoints read paging and sorting from the same query string that
//! carries filter criteria. [`ListQuery`] picks out `page`, `size` and
//! `sort`; everything else is left for criteria parsing.
//!
//! # Example
//!
//! ```rust
//! use comic_service::config::PaginationConfig;
//! use comic_service::handlers::ListQuery;
//!
//! let params = vec![
//!     ("page".to_string(), "2".to_string()),
//!     ("size".to_string(), "50".to_string()),
//!     ("sort".to_string(), "issuenumber,desc".to_string()),
//!     ("title.contains".to_string(), "Bat".to_string()),
//! ];
//! let query = ListQuery::from_params(&params).unwrap();
//!
//! let pagination = query.pagination(&PaginationConfig::default()).unwrap();
//! assert_eq!(pagination.offset, 100);
//! assert_eq!(pagination.limit, 50);
//! assert_eq!(query.sort().unwrap().to_string(), "issuenumber: desc");
//! ```

use super::error::ApiError;
use crate::config::PaginationConfig;
use crate::repository::{OrderDirection, Pagination, Sort};

/// Paging and sorting parameters for list operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Zero-based page index
    pub page: Option<u64>,

    /// Number of items per page. None defaults to the configured page size.
    pub size: Option<u64>,

    /// Sort expressions: `field`, `field,asc`, `field,desc` or `a,b,desc`
    pub sort: Vec<String>,
}

fn parse_number(name: &str, value: &str) -> Result<u64, ApiError> {
    value.trim().parse().map_err(|_| {
        ApiError::bad_request(format!("Invalid query parameter '{name}': '{value}'"))
    })
}

impl ListQuery {
    /// Create a new empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick paging and sorting parameters out of a raw query string
    ///
    /// # Errors
    ///
    /// Returns a bad request error if `page` or `size` is not a non-negative
    /// integer.
    pub fn from_params<K, V>(params: &[(K, V)]) -> Result<Self, ApiError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (name, value) in params {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                "page" => query.page = Some(parse_number(name, value)?),
                "size" => query.size = Some(parse_number(name, value)?),
                "sort" => query.sort.push(value.to_string()),
                _ => {}
            }
        }
        Ok(query)
    }

    #[must_use]
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    /// Whether the caller asked for a page rather than the full list
    #[must_use]
    pub fn is_paged(&self) -> bool {
        self.page.is_some() || self.size.is_some()
    }

    /// Pagination with the configured default and maximum page size applied
    ///
    /// # Errors
    ///
    /// Returns a bad request error for a page size of zero.
    pub fn pagination(&self, config: &PaginationConfig) -> Result<Pagination, ApiError> {
        let size = self.size.unwrap_or(config.default_page_size);
        if size == 0 {
            return Err(ApiError::bad_request("Page size must not be less than one"));
        }
        Ok(Pagination::page(
            self.page.unwrap_or(0),
            size.min(config.max_page_size),
        ))
    }

    /// Sort keys in the order given
    ///
    /// # Errors
    ///
    /// Returns a bad request error for an empty property name.
    pub fn sort(&self) -> Result<Sort, ApiError> {
        let mut sort = Sort::unsorted();
        for expression in &self.sort {
            let mut parts: Vec<&str> = expression.split(',').map(str::trim).collect();
            let direction = match parts.last().and_then(|last| OrderDirection::parse(last)) {
                Some(direction) => {
                    parts.pop();
                    direction
                }
                None => OrderDirection::Ascending,
            };
            if parts.is_empty() || parts.iter().any(|property| property.is_empty()) {
                return Err(ApiError::bad_request(format!(
                    "Invalid sort expression '{expression}'"
                )));
            }
            for property in parts {
                sort = sort.and(property, direction);
            }
        }
        Ok(sort)
    }
}
