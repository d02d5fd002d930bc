//! Response types for REST handlers
//!
//! Entities are returned as bare JSON. Lists are bare JSON arrays; when the
//! list is one page of a larger result, the total number of results is sent
//! in the `X-Total-Count` header.
//!
//! # Example
//!
//! ```rust
//! use axum::response::IntoResponse;
//! use comic_service::handlers::{ListResponse, TOTAL_COUNT_HEADER};
//! use comic_service::repository::{Page, Pagination};
//!
//! let page = Page::new(vec!["Watchmen"], 12, Pagination::first_page(1));
//! let response = ListResponse::from_page(page).into_response();
//! assert_eq!(response.headers()[TOTAL_COUNT_HEADER], "12");
//! ```

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::repository::Page;

/// Header carrying the total result count of a paged list
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// A list of entities, optionally one page of a larger result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse<T> {
    /// Entities in this response
    pub items: Vec<T>,
    /// Total across all pages, when paged
    pub total: Option<u64>,
}

impl<T> ListResponse<T> {
    /// An unpaged list
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items, total: None }
    }

    /// One page, reporting the page's total
    #[must_use]
    pub fn from_page(page: Page<T>) -> Self {
        Self {
            items: page.items,
            total: Some(page.total),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.items)).into_response();
        if let Some(total) = self.total {
            response
                .headers_mut()
                .insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
        }
        response
    }
}

/// HTTP 201 Created response
///
/// Used when a new resource has been successfully created.
/// Optionally includes a `Location` header pointing to the new resource.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

/// HTTP 204 No Content response
#[derive(Debug, Clone, Copy)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
