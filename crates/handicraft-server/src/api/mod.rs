mod products;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use handicraft_core::{IdOrder, ProductSource, SearchOptions, SourceError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::source::CatalogStore;

const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub search: Arc<SearchOptions>,
    pub id_order: IdOrder,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_source_error(request_id: String, error: &SourceError) -> ApiError {
    tracing::error!(error = %error, "product source unavailable");
    ApiError::new(request_id, "internal_error", "failed to load products")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn image_service(images_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(images_dir))
        .layer(axum::middleware::map_response(cache_found_images))
}

/// Only files that were found get the long cache lifetime.
async fn cache_found_images(mut response: Response) -> Response {
    if response.status().is_success() {
        response
            .headers_mut()
            .entry(header::CACHE_CONTROL)
            .or_insert(HeaderValue::from_static(IMAGE_CACHE_CONTROL));
    }
    response
}

pub fn build_app(state: AppState, images_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/product-ids", get(products::list_product_ids))
        .nest_service("/images", image_service(images_dir))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = if state.store.is_loaded().await {
        "loaded"
    } else {
        tracing::debug!(source = %state.store.source().describe(), "health check: catalog cold");
        "cold"
    };

    Json(HealthData {
        status: "ok",
        catalog,
    })
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "not_found", "route not found")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::source::CatalogSource;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use handicraft_core::{JsonFileSource, ProductStore};
    use tower::ServiceExt;

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/catalog.json")
    }

    fn state_for(path: PathBuf, search: SearchOptions, id_order: IdOrder) -> AppState {
        AppState {
            store: Arc::new(ProductStore::new(CatalogSource::File(JsonFileSource::new(
                path,
            )))),
            search: Arc::new(search),
            id_order,
        }
    }

    fn fixture_state() -> AppState {
        state_for(fixture_path(), SearchOptions::default(), IdOrder::LoadOrder)
    }

    fn app(state: AppState) -> Router {
        let images = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/images");
        build_app(state, &images)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    fn item_ids(json: &serde_json::Value) -> Vec<i64> {
        json["items"]
            .as_array()
            .expect("items array")
            .iter()
            .map(|item| item["id"].as_i64().expect("numeric id"))
            .collect()
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn list_products_returns_all_sorted_by_id() {
        let (status, json) = get_json(app(fixture_state()), "/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&json), vec![1, 3, 5, 7]);
    }

    #[tokio::test]
    async fn list_products_serializes_canonical_fields() {
        let (_, json) = get_json(app(fixture_state()), "/products?ids=3").await;
        let item = &json["items"][0];
        assert_eq!(item["name"], "Wooden Box");
        assert_eq!(item["model"], "box");
        assert_eq!(item["stock"], 2);
        assert_eq!(item["image_url"], "/images/box.jpg");
        assert_eq!(item["size"], "");
        assert!(item.get("design").is_none());
    }

    #[tokio::test]
    async fn list_products_intersects_query_and_ids() {
        let (status, json) = get_json(app(fixture_state()), "/products?q=WOOD&ids=3,1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&json), vec![3]);
    }

    #[tokio::test]
    async fn list_products_ignores_malformed_ids() {
        let (_, json) = get_json(app(fixture_state()), "/products?ids=abc,7").await;
        assert_eq!(item_ids(&json), vec![7]);
    }

    #[tokio::test]
    async fn list_products_empty_ids_param_is_no_filter() {
        let (_, json) = get_json(app(fixture_state()), "/products?ids=&q=").await;
        assert_eq!(item_ids(&json), vec![1, 3, 5, 7]);
    }

    #[tokio::test]
    async fn list_products_searches_design_only_when_configured() {
        let (_, json) = get_json(app(fixture_state()), "/products?q=toranj").await;
        assert!(item_ids(&json).is_empty());

        let state = state_for(
            fixture_path(),
            SearchOptions::with_design(true),
            IdOrder::LoadOrder,
        );
        let (_, json) = get_json(app(state), "/products?q=toranj").await;
        assert_eq!(item_ids(&json), vec![5]);
    }

    #[tokio::test]
    async fn get_product_returns_single_product() {
        let (status, json) = get_json(app(fixture_state()), "/products/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], 5);
        assert_eq!(json["name"], "Copper Tray");
        assert_eq!(json["design"], "Toranj");
    }

    #[tokio::test]
    async fn get_product_unknown_id_is_not_found() {
        let (status, json) = get_json(app(fixture_state()), "/products/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn get_product_non_integer_id_is_bad_request() {
        let (status, json) = get_json(app(fixture_state()), "/products/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn get_product_decimal_id_is_bad_request() {
        for uri in ["/products/5.0", "/products/%205"] {
            let (status, json) = get_json(app(fixture_state()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"]["code"], "validation_error");
        }
    }

    #[tokio::test]
    async fn product_ids_keep_load_order_by_default() {
        let (status, json) = get_json(app(fixture_state()), "/product-ids").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ids"], serde_json::json!([7, 3, 1, 5]));
    }

    #[tokio::test]
    async fn product_ids_sorted_when_configured() {
        let state = state_for(fixture_path(), SearchOptions::default(), IdOrder::Ascending);
        let (_, json) = get_json(app(state), "/product-ids").await;
        assert_eq!(json["ids"], serde_json::json!([1, 3, 5, 7]));
    }

    #[tokio::test]
    async fn health_reports_cache_state() {
        let state = fixture_state();
        let (status, json) = get_json(app(state.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["catalog"], "cold");

        get_json(app(state.clone()), "/product-ids").await;
        let (_, json) = get_json(app(state), "/health").await;
        assert_eq!(json["catalog"], "loaded");
    }

    #[tokio::test]
    async fn missing_source_file_is_internal_error() {
        let state = state_for(
            PathBuf::from("/nonexistent/handicraft/catalog.json"),
            SearchOptions::default(),
            IdOrder::LoadOrder,
        );
        let (status, json) = get_json(app(state.clone()), "/products").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "internal_error");
        assert!(!state.store.is_loaded().await);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, json) = get_json(app(fixture_state()), "/admin").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let response = app(fixture_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(REQUEST_ID_HEADER, "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn images_are_served_with_long_cache_lifetime() {
        let response = app(fixture_state())
            .oneshot(
                Request::builder()
                    .uri("/images/pixel.png")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some(IMAGE_CACHE_CONTROL)
        );
    }

    #[tokio::test]
    async fn missing_image_is_not_found() {
        let response = app(fixture_state())
            .oneshot(
                Request::builder()
                    .uri("/images/missing.png")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }
}
