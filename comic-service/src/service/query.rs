//! Criteria-driven reads
//!
//! Compiles criteria against the entity schema and hands the resulting
//! specification to a [`SpecificationExecutor`].
//!
//! # Example
//!
//! ```rust
//! use comic_service::domain::{Comic, ComicCriteria};
//! use comic_service::repository::{InMemoryStore, Sort};
//! use comic_service::service::QueryService;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemoryStore::new();
//! let service = QueryService::<Comic, _>::new(store.comics());
//!
//! let mut criteria = ComicCriteria::new();
//! criteria.issuenumber().greater_than = Some(10);
//! let comics = service.find_by_criteria(Some(&*criteria), &Sort::unsorted()).await.unwrap();
//! assert!(comics.is_empty());
//! # }
//! ```

use std::marker::PhantomData;

use super::ServiceResult;
use crate::criteria::Criteria;
use crate::domain::Entity;
use crate::repository::{Page, Pagination, Sort, SpecificationExecutor};
use crate::specification::compile;

/// Read-only queries by criteria over one entity
pub struct QueryService<E, R> {
    repository: R,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: Clone> Clone for QueryService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            _entity: PhantomData,
        }
    }
}

fn describe(criteria: Option<&Criteria>) -> String {
    criteria.map_or_else(|| "none".to_string(), ToString::to_string)
}

impl<E, R> QueryService<E, R>
where
    E: Entity,
    R: SpecificationExecutor<E>,
{
    /// Wrap a repository
    pub const fn new(repository: R) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    /// Every entity matching `criteria`, ordered by `sort`
    ///
    /// # Errors
    ///
    /// Returns a criteria error if the criteria do not fit the schema, or a
    /// repository error if the sort cannot be applied.
    pub async fn find_by_criteria(
        &self,
        criteria: Option<&Criteria>,
        sort: &Sort,
    ) -> ServiceResult<Vec<E>> {
        tracing::debug!(entity = E::NAME, "find by criteria : {}", describe(criteria));
        let spec = compile(E::schema(), criteria)?;
        Ok(self.repository.find_all(&spec, sort).await?)
    }

    /// One page of the entities matching `criteria`
    ///
    /// # Errors
    ///
    /// Same as [`QueryService::find_by_criteria`].
    pub async fn find_page_by_criteria(
        &self,
        criteria: Option<&Criteria>,
        pagination: Pagination,
        sort: &Sort,
    ) -> ServiceResult<Page<E>> {
        tracing::debug!(
            entity = E::NAME,
            offset = pagination.offset,
            limit = pagination.limit,
            "find by criteria : {}, page",
            describe(criteria)
        );
        let spec = compile(E::schema(), criteria)?;
        Ok(self.repository.find_page(&spec, pagination, sort).await?)
    }

    /// Number of entities matching `criteria`
    ///
    /// Equal to the length of [`QueryService::find_by_criteria`] for the same
    /// criteria.
    ///
    /// # Errors
    ///
    /// Returns a criteria error if the criteria do not fit the schema.
    pub async fn count_by_criteria(&self, criteria: Option<&Criteria>) -> ServiceResult<u64> {
        tracing::debug!(entity = E::NAME, "count by criteria : {}", describe(criteria));
        let spec = compile(E::schema(), criteria)?;
        Ok(self.repository.count(&spec).await?)
    }
}
