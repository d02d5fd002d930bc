//! Generic REST resource handlers
//!
//! One set of handlers serves every entity. Routes pick the entity with a
//! turbofish, e.g. `get(list::<Comic>)`.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{
    error::{ApiError, ApiOperation},
    query::ListQuery,
    response::{Created, ListResponse, NoContent},
};
use crate::{
    criteria::{parse_criteria, Criteria},
    domain::Entity,
    repository::{EntityRepository, Stored},
    service::{EntityService, QueryService, ServiceError},
    state::AppState,
};

type Queries<E> = QueryService<E, EntityRepository<E>>;
type Entities<E> = EntityService<E, EntityRepository<E>>;

fn queries<E: Stored>(state: &AppState) -> Queries<E> {
    QueryService::new(state.store().repository::<E>())
}

fn entities<E: Stored>(state: &AppState) -> Entities<E> {
    EntityService::new(state.store().repository::<E>())
}

/// Attach the operation and entity name to a service failure
fn service_error<E: Entity>(operation: ApiOperation) -> impl FnOnce(ServiceError) -> ApiError {
    move |err| {
        let err = ApiError::from(err).with_operation(operation);
        if err.entity_type.is_some() {
            err
        } else {
            err.with_entity_type(E::NAME)
        }
    }
}

fn id_error<E: Entity>(operation: ApiOperation, key: &'static str, message: &str) -> ApiError {
    ApiError::bad_request(message)
        .with_operation(operation)
        .with_entity_type(E::NAME)
        .with_error_key(key)
}

/// Criteria from the query string, or none for entities without a schema
/// worth filtering on
fn criteria<E: Entity>(
    params: &[(String, String)],
    operation: ApiOperation,
) -> Result<Option<Criteria>, ApiError> {
    if !E::FILTERABLE {
        return Ok(None);
    }
    parse_criteria(E::schema(), params.iter().map(|(k, v)| (k, v)))
        .map(Some)
        .map_err(|err| {
            ApiError::from(err)
                .with_operation(operation)
                .with_entity_type(E::NAME)
        })
}

/// Check the body id of a PUT or PATCH against the path id
async fn check_id<E: Stored>(
    state: &AppState,
    id: i64,
    entity: &E,
    operation: ApiOperation,
) -> Result<(), ApiError> {
    match entity.id() {
        None => Err(id_error::<E>(operation, "idnull", "Invalid id")),
        Some(body_id) if body_id != id => Err(id_error::<E>(operation, "idinvalid", "Invalid ID")),
        Some(_) => {
            let exists = entities::<E>(state)
                .exists(id)
                .await
                .map_err(service_error::<E>(operation))?;
            if exists {
                Ok(())
            } else {
                Err(id_error::<E>(operation, "idnotfound", "Entity not found"))
            }
        }
    }
}

/// `GET /api/{collection}`
///
/// Filters by the criteria in the query string. With `page` or `size` the
/// response is one page and carries the total in `X-Total-Count`.
pub async fn list<E: Stored>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<ListResponse<E>, ApiError> {
    let query = ListQuery::from_params(&params).map_err(|e| e.with_entity_type(E::NAME))?;
    let sort = query.sort().map_err(|e| e.with_entity_type(E::NAME))?;
    let criteria = criteria::<E>(&params, ApiOperation::List)?;

    if query.is_paged() {
        let pagination = query.pagination(&state.config().pagination)?;
        let page = queries::<E>(&state)
            .find_page_by_criteria(criteria.as_ref(), pagination, &sort)
            .await
            .map_err(service_error::<E>(ApiOperation::List))?;
        return Ok(ListResponse::from_page(page));
    }

    let items = match criteria {
        Some(criteria) => queries::<E>(&state)
            .find_by_criteria(Some(&criteria), &sort)
            .await,
        None => entities::<E>(&state).find_all(&sort).await,
    }
    .map_err(service_error::<E>(ApiOperation::List))?;

    Ok(ListResponse::new(items))
}

/// `GET /api/{collection}/count`
pub async fn count<E: Stored>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<u64>, ApiError> {
    let criteria = criteria::<E>(&params, ApiOperation::Count)?;
    let total = queries::<E>(&state)
        .count_by_criteria(criteria.as_ref())
        .await
        .map_err(service_error::<E>(ApiOperation::Count))?;
    Ok(Json(total))
}

/// `GET /api/{collection}/{id}`
pub async fn get<E: Stored>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<E>, ApiError> {
    entities::<E>(&state)
        .find_one(id)
        .await
        .map_err(service_error::<E>(ApiOperation::Get))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(E::NAME, id.to_string()))
}

/// `POST /api/{collection}`
pub async fn create<E: Stored>(
    State(state): State<AppState>,
    Json(entity): Json<E>,
) -> Result<Created<E>, ApiError> {
    if entity.id().is_some() {
        return Err(id_error::<E>(
            ApiOperation::Create,
            "idexists",
            &format!("A new {} cannot already have an ID", E::NAME),
        ));
    }

    let saved = entities::<E>(&state)
        .save(entity)
        .await
        .map_err(service_error::<E>(ApiOperation::Create))?;

    let location = saved
        .id()
        .map(|id| format!("/api/{}/{id}", E::COLLECTION));
    let created = Created::new(saved);
    Ok(match location {
        Some(location) => created.with_location(location),
        None => created,
    })
}

/// `PUT /api/{collection}/{id}`
pub async fn update<E: Stored>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(entity): Json<E>,
) -> Result<Json<E>, ApiError> {
    check_id(&state, id, &entity, ApiOperation::Update).await?;
    entities::<E>(&state)
        .update(id, entity)
        .await
        .map(Json)
        .map_err(service_error::<E>(ApiOperation::Update))
}

/// `PATCH /api/{collection}/{id}`
///
/// Only fields present in the body are copied onto the stored entity.
pub async fn partial_update<E: Stored>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<E>,
) -> Result<Json<E>, ApiError> {
    check_id(&state, id, &patch, ApiOperation::PartialUpdate).await?;
    entities::<E>(&state)
        .partial_update(id, patch)
        .await
        .map_err(service_error::<E>(ApiOperation::PartialUpdate))?
        .map(Json)
        .ok_or_else(|| {
            id_error::<E>(ApiOperation::PartialUpdate, "idnotfound", "Entity not found")
        })
}

/// `DELETE /api/{collection}/{id}`
pub async fn delete<E: Stored>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<NoContent, ApiError> {
    entities::<E>(&state)
        .delete(id)
        .await
        .map_err(service_error::<E>(ApiOperation::Delete))?;
    Ok(NoContent)
}
