//! Pagination and ordering types for repository queries
//!
//! # Example
//!
//! ```rust
//! use comic_service::repository::{OrderDirection, Page, Pagination, Sort};
//!
//! let pagination = Pagination::new(20, 10);
//! let sort = Sort::by("issuenumber", OrderDirection::Descending).and("id", OrderDirection::Ascending);
//! assert_eq!(sort.to_string(), "issuenumber: desc, id: asc");
//!
//! let page = Page::new(vec!["a", "b"], 22, pagination);
//! assert_eq!(page.total_pages(), 3);
//! assert!(!page.has_next());
//! ```

use std::fmt;

/// Direction for ordering results
///
/// # Example
///
/// ```rust
/// use comic_service::repository::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(OrderDirection::parse("DESC"), Some(OrderDirection::Descending));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// Parse `asc` / `desc`, ignoring case
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Offset and limit for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Pagination for a zero-based page index
    ///
    /// # Example
    ///
    /// ```rust
    /// use comic_service::repository::Pagination;
    ///
    /// let third = Pagination::page(2, 20);
    /// assert_eq!(third.offset, 40);
    /// assert_eq!(third.limit, 20);
    /// ```
    #[must_use]
    pub const fn page(index: u64, size: u64) -> Self {
        Self {
            offset: index.saturating_mul(size),
            limit: size,
        }
    }

    /// Create pagination for the first page with the given limit
    #[must_use]
    pub const fn first_page(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Schema field to sort on
    pub property: String,
    /// Direction
    pub direction: OrderDirection,
}

/// Ordered list of sort keys; earlier keys take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// No explicit ordering
    #[must_use]
    pub const fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    /// Sort on a single property
    #[must_use]
    pub fn by(property: impl Into<String>, direction: OrderDirection) -> Self {
        Self::unsorted().and(property, direction)
    }

    /// Append a lower-precedence key
    #[must_use]
    pub fn and(mut self, property: impl Into<String>, direction: OrderDirection) -> Self {
        self.orders.push(Order {
            property: property.into(),
            direction,
        });
        self
    }

    /// Keys in precedence order
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// True when no key is set
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.orders.is_empty() {
            return write!(f, "UNSORTED");
        }
        let keys: Vec<String> = self
            .orders
            .iter()
            .map(|order| format!("{}: {}", order.property, order.direction))
            .collect();
        write!(f, "{}", keys.join(", "))
    }
}

/// One page of results and the total across all pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Number of results across all pages
    pub total: u64,
    /// The window this page covers
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Create a page
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            pagination,
        }
    }

    /// Number of pages of `pagination.limit` needed for `total` results
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.pagination.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.pagination.limit)
    }

    /// Whether results exist past this page
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.pagination.offset.saturating_add(self.pagination.limit) < self.total
    }
}
