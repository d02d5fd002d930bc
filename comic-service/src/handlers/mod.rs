//! REST handlers for the comic collection
//!
//! Every entity is served by the same generic handlers in [`resource`]:
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/{collection}` | list, filtered by criteria for comics and series |
//! | GET | `/api/{collection}/count` | count matching criteria (comics, series) |
//! | GET | `/api/{collection}/{id}` | one entity or 404 |
//! | POST | `/api/{collection}` | create, 201 with `Location` |
//! | PUT | `/api/{collection}/{id}` | replace |
//! | PATCH | `/api/{collection}/{id}` | merge present fields |
//! | DELETE | `/api/{collection}/{id}` | 204 |
//!
//! # Example
//!
//! ```rust
//! use comic_service::config::Config;
//! use comic_service::handlers;
//! use comic_service::state::AppState;
//!
//! let app = handlers::router(AppState::new(Config::default()));
//! ```

pub mod error;
pub mod query;
pub mod resource;
pub mod response;

use axum::{routing::get, Router};

use crate::{
    domain::{Characters, Comic, Series},
    health::{health, readiness},
    repository::Stored,
    state::AppState,
};

pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use query::ListQuery;
pub use response::{Created, ListResponse, NoContent, TOTAL_COUNT_HEADER};

/// Routes for one entity under `/api/{collection}`
fn entity_routes<E: Stored>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/api/{}", E::COLLECTION);

    let mut router = router
        .route(
            &base,
            get(resource::list::<E>).post(resource::create::<E>),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(resource::get::<E>)
                .put(resource::update::<E>)
                .patch(resource::partial_update::<E>)
                .delete(resource::delete::<E>),
        );

    if E::FILTERABLE {
        router = router.route(&format!("{base}/count"), get(resource::count::<E>));
    }

    router
}

/// Full application router: entity resources plus health checks
pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness));

    let router = entity_routes::<Characters>(router);
    let router = entity_routes::<Series>(router);
    let router = entity_routes::<Comic>(router);

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityRef;
    use crate::repository::SeedData;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn comic(id: i64, issuenumber: Option<i32>, series: Option<i64>) -> Comic {
        Comic {
            id: Some(id),
            issuenumber,
            title: Some(format!("Issue {id}")),
            series: series.map(EntityRef::new),
            ..Comic::default()
        }
    }

    async fn app() -> (AppState, Router) {
        let state = AppState::builder()
            .seed(SeedData {
                characters: vec![Characters {
                    id: Some(1),
                    full_name: Some("Bruce Wayne".into()),
                    ..Characters::default()
                }],
                series: vec![
                    Series {
                        id: Some(7),
                        name: Some("Batman".into()),
                        characters: Some(EntityRef::new(1)),
                    },
                    Series {
                        id: Some(8),
                        name: Some("Detective Comics".into()),
                        characters: None,
                    },
                ],
                comics: vec![
                    comic(10, Some(1), Some(7)),
                    comic(11, Some(2), Some(7)),
                    comic(12, None, Some(8)),
                    comic(13, Some(5), None),
                ],
            })
            .build()
            .await
            .expect("state");
        (state.clone(), router(state))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("response")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    fn ids(body: &Value) -> Vec<i64> {
        body.as_array()
            .expect("array")
            .iter()
            .map(|item| item["id"].as_i64().expect("id"))
            .collect()
    }

    #[tokio::test]
    async fn test_list_comics_by_series() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/comics?seriesId.equals=7", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(&TOTAL_COUNT_HEADER).is_none());
        assert_eq!(ids(&json_body(response).await), vec![10, 11]);
    }

    #[tokio::test]
    async fn test_list_with_sort_and_range() {
        let (_, app) = app().await;
        let response = send(
            &app,
            Method::GET,
            "/api/comics?issuenumber.greaterThanOrEqual=2&sort=issuenumber,desc",
            None,
        )
        .await;
        assert_eq!(ids(&json_body(response).await), vec![13, 11]);
    }

    #[tokio::test]
    async fn test_list_series_distinct() {
        let (_, app) = app().await;

        let response = send(&app, Method::GET, "/api/series?comicId.specified=true", None).await;
        assert_eq!(ids(&json_body(response).await), vec![7, 7, 8]);

        let response = send(
            &app,
            Method::GET,
            "/api/series?comicId.specified=true&distinct=true",
            None,
        )
        .await;
        assert_eq!(ids(&json_body(response).await), vec![7, 8]);
    }

    #[tokio::test]
    async fn test_count_matches_list() {
        let (_, app) = app().await;

        let response = send(&app, Method::GET, "/api/series/count?comicId.specified=true", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!(3));

        let response = send(&app, Method::GET, "/api/comics/count", None).await;
        assert_eq!(json_body(response).await, json!(4));
    }

    #[tokio::test]
    async fn test_paged_list_reports_total() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/comics?page=1&size=3", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&TOTAL_COUNT_HEADER], "4");
        assert_eq!(ids(&json_body(response).await), vec![13]);
    }

    #[tokio::test]
    async fn test_unknown_filter_field_is_bad_request() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/comics?publisher.equals=DC", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["operation"], "list");
        assert_eq!(body["entity_type"], "Comic");
    }

    #[tokio::test]
    async fn test_malformed_filter_value_is_bad_request() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/comics/count?issuenumber.equals=five", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["operation"], "count");
    }

    #[tokio::test]
    async fn test_unknown_sort_field_is_unprocessable() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/comics?sort=publisher", None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_characters_ignore_criteria() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/characters?fullName.equals=Nobody", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ids(&json_body(response).await), vec![1]);

        let response = send(&app, Method::GET, "/api/characters?size=5", None).await;
        assert_eq!(response.headers()[&TOTAL_COUNT_HEADER], "1");
    }

    #[tokio::test]
    async fn test_get_and_not_found() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/series/7", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], "Batman");
        assert_eq!(body["characters"], json!({"id": 1}));

        let response = send(&app, Method::GET, "/api/series/99", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_location() {
        let (_, app) = app().await;
        let response = send(
            &app,
            Method::POST,
            "/api/comics",
            Some(json!({"title": "Year One", "series": {"id": 7}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/api/comics/14");
        assert_eq!(json_body(response).await["id"], 14);

        let response = send(&app, Method::GET, "/api/comics?seriesId.equals=7", None).await;
        assert_eq!(ids(&json_body(response).await), vec![10, 11, 14]);
    }

    #[tokio::test]
    async fn test_create_with_id_is_rejected() {
        let (_, app) = app().await;
        let response = send(&app, Method::POST, "/api/series", Some(json!({"id": 3}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "idexists");
    }

    #[tokio::test]
    async fn test_create_with_dangling_reference_conflicts() {
        let (_, app) = app().await;
        let response = send(
            &app,
            Method::POST,
            "/api/comics",
            Some(json!({"series": {"id": 404}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_id_checks() {
        let (_, app) = app().await;

        let response = send(&app, Method::PUT, "/api/series/7", Some(json!({"name": "x"}))).await;
        assert_eq!(json_body(response).await["code"], "idnull");

        let response = send(&app, Method::PUT, "/api/series/7", Some(json!({"id": 8}))).await;
        assert_eq!(json_body(response).await["code"], "idinvalid");

        let response = send(&app, Method::PUT, "/api/series/99", Some(json!({"id": 99}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "idnotfound");
    }

    #[tokio::test]
    async fn test_put_replaces_and_patch_merges() {
        let (_, app) = app().await;

        let response = send(
            &app,
            Method::PATCH,
            "/api/series/7",
            Some(json!({"id": 7, "name": "The Batman"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], "The Batman");
        assert_eq!(body["characters"], json!({"id": 1}));

        let response = send(
            &app,
            Method::PUT,
            "/api/series/7",
            Some(json!({"id": 7, "name": "Batman Vol. 2"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], "Batman Vol. 2");
        assert_eq!(body["characters"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_then_not_found() {
        let (state, app) = app().await;
        let response = send(&app, Method::DELETE, "/api/comics/13", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.store().counts().await.comics, 3);

        let response = send(&app, Method::GET, "/api/comics/13", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_characters_have_no_count_route() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/api/characters/count", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_routes() {
        let (_, app) = app().await;
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/ready", None).await;
        let body = json_body(response).await;
        assert_eq!(
            body["dependencies"]["store"]["message"],
            "1 characters, 2 series, 4 comics"
        );
    }
}
