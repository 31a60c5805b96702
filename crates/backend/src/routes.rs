use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::handlers;
use crate::shared::app_state::AppState;
use crate::shared::config::LimitsConfig;
use crate::system::middleware::request_logger::request_logger;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState, limits: &LimitsConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // PRICE LIST IMPORT / EXPORT
        // ========================================
        .route(
            "/api/v0/prices",
            get(handlers::a001_price_item::export_prices)
                .post(handlers::a001_price_item::import_prices),
        )
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        // Размер архива и число строк задаёт клиент, поэтому время запроса ограничено
        .layer(TimeoutLayer::new(Duration::from_secs(
            limits.request_timeout_secs,
        )))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::a001_price_item::testing::MemoryRowStore;

    #[tokio::test]
    async fn test_health() {
        let app = configure_routes(
            AppState::new(Arc::new(MemoryRowStore::new())),
            &LimitsConfig::default(),
        );
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let limits = LimitsConfig {
            max_upload_bytes: 16,
            ..LimitsConfig::default()
        };
        let app = configure_routes(AppState::new(Arc::new(MemoryRowStore::new())), &limits);
        let body = format!(
            "--B\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.zip\"\r\n\r\n{}\r\n--B--\r\n",
            "x".repeat(1024)
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v0/prices?type=zip")
                    .header("content-type", "multipart/form-data; boundary=B")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
