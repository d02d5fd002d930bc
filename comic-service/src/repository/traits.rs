//! Repository trait definitions
//!
//! Generic traits for CRUD and specification queries using RPITIT
//! (Return Position Impl Trait In Traits), available since Rust 1.75.
//!
//! - [`Repository`]: create, read, update, delete by id
//! - [`SpecificationExecutor`]: find, page and count by [`Specification`]

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{Page, Pagination, Sort};
use crate::specification::Specification;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// # Type Parameters
///
/// - `Id`: The identifier type for the entity
/// - `Entity`: The entity type stored and returned
pub trait Repository<Id, Entity>: Send + Sync {
    /// Find an entity by its unique identifier
    ///
    /// Returns `Ok(None)` if no entity with the given ID exists.
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Every entity, ordered by `sort`
    fn find_all_unfiltered(
        &self,
        sort: &Sort,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Check if an entity with the given ID exists
    fn exists(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Store a new entity and assign its id
    ///
    /// # Errors
    ///
    /// Fails with `AlreadyExists` if the entity already carries an id.
    fn create(&self, entity: Entity) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Replace the stored entity with the given id
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` if no entity has that id.
    fn update(
        &self,
        id: &Id,
        entity: Entity,
    ) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Delete an entity by ID
    ///
    /// Returns `Ok(true)` if a row was removed.
    fn delete(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// Query execution over compiled specifications
///
/// Implementations apply relation joins as LEFT joins, so an entity may be
/// returned once per matching joined row unless the specification is
/// distinct. `count` always equals the length of `find_all` for the same
/// specification.
pub trait SpecificationExecutor<Entity>: Send + Sync {
    /// Every match, ordered by `sort`
    fn find_all(
        &self,
        spec: &Specification<Entity>,
        sort: &Sort,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// One window of the ordered matches plus the total match count
    fn find_page(
        &self,
        spec: &Specification<Entity>,
        pagination: Pagination,
        sort: &Sort,
    ) -> impl Future<Output = RepositoryResult<Page<Entity>>> + Send;

    /// Number of matches
    fn count(&self, spec: &Specification<Entity>)
        -> impl Future<Output = RepositoryResult<u64>> + Send;
}
