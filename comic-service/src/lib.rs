//! # comic-service
//!
//! Backend for tracking a comic-book collection: characters, the series
//! that follow them, and the individual issues of each series.
//!
//! ## Features
//!
//! - **Criteria filtering**: per-field filters (`equals`, ranges, `contains`,
//!   `in`, `specified`) parsed from query strings into typed [`criteria::Criteria`]
//! - **Specification compiler**: criteria compile against a static
//!   [`specification::Schema`] into one conjunctive predicate, including
//!   joins across relations and optional `distinct`
//! - **In-memory relational store**: LEFT-join semantics, sorting and paging
//! - **REST resources**: `/api/characters`, `/api/series`, `/api/comics`
//! - **Middleware stack**: request tracking, panic recovery, body size
//!   limits, timeouts, compression and CORS
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use comic_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .seed(SeedData::from_path("seed.json").await?)
//!         .build()
//!         .await?;
//!
//!     Server::new(config).serve(router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod criteria;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod server;
pub mod service;
pub mod specification;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, MiddlewareConfig, PaginationConfig, ServiceConfig};
    pub use crate::criteria::{parse_criteria, Criteria, CriteriaError};
    pub use crate::domain::{Characters, Comic, ComicCriteria, Entity, EntityRef, Series, SeriesCriteria};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{router, ApiError, ListQuery, ListResponse};
    pub use crate::health::{health, readiness};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::repository::{
        InMemoryStore, Page, Pagination, Repository, SeedData, Sort, SpecificationExecutor,
    };
    pub use crate::server::Server;
    pub use crate::service::{EntityService, QueryService};
    pub use crate::specification::{compile, Specification};
    pub use crate::state::{AppState, AppStateBuilder};

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, patch, post, put},
        Json, Router,
    };
}
