use crate::core::store::SnapshotStore;
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderName, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const NOT_FOUND_MESSAGE: &str = "Property not found";

const X_API_KEY: &str = "x-api-key";

/// Read-only routes over the snapshot.
pub fn router(store: Arc<SnapshotStore>) -> Router {
    Router::new()
        .route("/properties", get(list_properties))
        .route("/properties/:slug", get(get_property_by_slug))
        .with_state(store)
}

/// Any origin may call in. Only GET is routed, but the advertised method list
/// is wider.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec![CONTENT_TYPE, HeaderName::from_static(X_API_KEY)])
}

/// The full application: routes plus CORS and request tracing.
pub fn app(store: Arc<SnapshotStore>) -> Router {
    router(store)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

#[tracing::instrument(skip(store))]
async fn list_properties(State(store): State<Arc<SnapshotStore>>) -> Response {
    Json(store.all()).into_response()
}

#[tracing::instrument(skip(store))]
async fn get_property_by_slug(
    State(store): State<Arc<SnapshotStore>>,
    Path(slug): Path<String>,
) -> Response {
    match store.find_by_slug(&slug) {
        Some(property) => Json(property).into_response(),
        None => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
    }
}

/// Serves the application on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: Arc<SnapshotStore>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("error serving property cache")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Property, Slug};
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn store_with(slugs: &[&str]) -> Arc<SnapshotStore> {
        let store = Arc::new(SnapshotStore::new());
        store.replace(
            slugs
                .iter()
                .enumerate()
                .map(|(i, slug)| Property {
                    id: format!("id-{}", i),
                    title: slug.replace('-', " "),
                    slug: Slug {
                        current: slug.to_string(),
                        kind: "slug".to_string(),
                    },
                    ..Default::default()
                })
                .collect(),
        );
        store
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn test_list_on_empty_snapshot() {
        let (status, body, content_type) =
            send_get(router(Arc::new(SnapshotStore::new())), "/properties").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
        assert_eq!(content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_list_returns_snapshot_in_order() {
        let (status, body, _) =
            send_get(router(store_with(&["b-house", "a-house"])), "/properties").await;

        assert_eq!(status, StatusCode::OK);
        let list: Vec<Property> = serde_json::from_str(&body).unwrap();
        let slugs: Vec<&str> = list.iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["b-house", "a-house"]);
    }

    #[tokio::test]
    async fn test_get_by_slug_hit() {
        let (status, body, content_type) = send_get(
            router(store_with(&["garden-heights", "lake-view"])),
            "/properties/garden-heights",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let property: Property = serde_json::from_str(&body).unwrap();
        assert_eq!(property.id, "id-0");
        assert_eq!(property.title, "garden heights");
    }

    #[tokio::test]
    async fn test_get_by_slug_miss() {
        let (status, body, content_type) = send_get(
            router(store_with(&["garden-heights"])),
            "/properties/does-not-exist",
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, NOT_FOUND_MESSAGE);
        assert!(content_type.unwrap().starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_write_methods_are_not_routed() {
        let response = router(store_with(&["garden-heights"]))
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/properties/garden-heights")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight_is_permissive() {
        let response = app(Arc::new(SnapshotStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/properties")
                    .header("Origin", "https://example.com")
                    .header("Access-Control-Request-Method", "GET")
                    .header("Access-Control-Request-Headers", "x-api-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        let methods = headers
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "missing {} in {}", method, methods);
        }
        let allowed = headers
            .get("access-control-allow-headers")
            .unwrap()
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("content-type"));
        assert!(allowed.contains("x-api-key"));
    }
}
