//! Storage abstractions and the in-memory relational store
//!
//! # Features
//!
//! - **Generic CRUD**: [`Repository`] trait for create, read, update, delete operations
//! - **Specification queries**: [`SpecificationExecutor`] for find, page and count
//!   over a compiled [`Specification`](crate::specification::Specification)
//! - **Pagination**: [`Pagination`], [`Sort`] and [`Page`]
//! - **Storage**: [`InMemoryStore`] with one table per entity and LEFT join semantics
//!
//! # Example
//!
//! ```rust
//! use comic_service::domain::{Comic, ComicCriteria, Entity};
//! use comic_service::repository::{InMemoryStore, SeedData, SpecificationExecutor};
//! use comic_service::specification::compile;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemoryStore::new();
//! store.seed(SeedData::default()).await.unwrap();
//!
//! let mut criteria = ComicCriteria::new();
//! criteria.title().contains = Some("Knight".into());
//! let spec = compile(Comic::schema(), Some(&*criteria)).unwrap();
//!
//! assert_eq!(store.comics().count(&spec).await.unwrap(), 0);
//! # }
//! ```

mod error;
mod memory;
mod pagination;
mod traits;

// Re-export all public types
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::{
    EntityRepository, InMemoryStore, JoinIndex, SeedData, Stored, TableCounts, Tables,
};
pub use pagination::{Order, OrderDirection, Page, Pagination, Sort};
pub use traits::{Repository, RepositoryResult, SpecificationExecutor};
