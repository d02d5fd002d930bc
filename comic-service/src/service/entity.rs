//! CRUD by id

use std::marker::PhantomData;

use super::ServiceResult;
use crate::domain::Entity;
use crate::repository::{Repository, Sort};

/// Create, read, update and delete for one entity
pub struct EntityService<E, R> {
    repository: R,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: Clone> Clone for EntityService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: Repository<i64, E>,
{
    pub const fn new(repository: R) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    /// Store a new entity
    ///
    /// # Errors
    ///
    /// Fails if the entity already has an id or references a missing row.
    pub async fn save(&self, entity: E) -> ServiceResult<E> {
        tracing::debug!(entity = E::NAME, "Request to save : {:?}", entity);
        Ok(self.repository.create(entity).await?)
    }

    /// Replace the stored entity with id `id`
    ///
    /// # Errors
    ///
    /// Fails if no entity has that id or the entity references a missing row.
    pub async fn update(&self, id: i64, entity: E) -> ServiceResult<E> {
        tracing::debug!(entity = E::NAME, id, "Request to update : {:?}", entity);
        Ok(self.repository.update(&id, entity).await?)
    }

    /// Copy the fields present in `patch` onto the stored entity
    ///
    /// Returns `Ok(None)` when no entity has id `id`.
    ///
    /// # Errors
    ///
    /// Fails if the merged entity references a missing row.
    pub async fn partial_update(&self, id: i64, patch: E) -> ServiceResult<Option<E>> {
        tracing::debug!(entity = E::NAME, id, "Request to partially update : {:?}", patch);
        let Some(mut existing) = self.repository.find_by_id(&id).await? else {
            return Ok(None);
        };
        existing.merge(patch);
        Ok(Some(self.repository.update(&id, existing).await?))
    }

    /// Every entity, ordered by `sort`
    ///
    /// # Errors
    ///
    /// Fails if `sort` names a field that cannot be sorted on.
    pub async fn find_all(&self, sort: &Sort) -> ServiceResult<Vec<E>> {
        tracing::debug!(entity = E::NAME, sort = %sort, "Request to get all");
        Ok(self.repository.find_all_unfiltered(sort).await?)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<Option<E>> {
        tracing::debug!(entity = E::NAME, id, "Request to get");
        Ok(self.repository.find_by_id(&id).await?)
    }

    pub async fn exists(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.repository.exists(&id).await?)
    }

    /// Delete by id, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        tracing::debug!(entity = E::NAME, id, "Request to delete");
        Ok(self.repository.delete(&id).await?)
    }
}
