use actix_web::{http::header::ContentType, web, HttpResponse, Responder};
use log::warn;

use crate::{
    errors::AppError,
    handlers,
    metrics::Metrics,
    types::{AppState, HealthStatus, Result},
};

mod link;

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let (cache, analytics) = tokio::join!(data.cache.ping(), data.analytics.ping());

    if let Err(e) = &cache {
        warn!("Health check: cache store unreachable: {}", e);
    }
    if let Err(e) = &analytics {
        warn!("Health check: analytics store unreachable: {}", e);
    }
    let healthy = cache.is_ok() && analytics.is_ok();

    let status = HealthStatus {
        status: String::from(if healthy { "healthy" } else { "unhealthy" }),
        version: data.version.clone(),
        uptime_seconds: data.start_time.elapsed().as_secs(),
    };

    if healthy {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

// Prometheus scrape endpoint
async fn metrics(metrics: web::Data<Metrics>) -> Result<impl Responder> {
    let body = metrics
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render metrics: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body))
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config());
    cfg.route("/healthz", web::get().to(health_check));
    cfg.route("/metrics", web::get().to(metrics));
    link::configure_routes(cfg);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use actix_web::{
        http::{header::LOCATION, StatusCode},
        test, App,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::errors::RepositoryError;
    use crate::repositories::{
        MemoryUrlAnalyticRepository, MemoryUrlCacheRepository, MockUrlCacheRepositoryTrait,
        UrlAnalyticRepositoryTrait, UrlCacheRepositoryTrait,
    };
    use crate::services;

    /// Full application over the given stores
    macro_rules! test_app {
        ($cache:expr, $analytics:expr) => {{
            let cache: Arc<dyn UrlCacheRepositoryTrait> = Arc::new($cache);
            let analytics: Arc<dyn UrlAnalyticRepositoryTrait> = Arc::new($analytics);
            let metrics = Arc::new(Metrics::new().unwrap());
            let state = AppState {
                start_time: Instant::now(),
                version: "test".to_string(),
                cache: Arc::clone(&cache),
                analytics: Arc::clone(&analytics),
            };

            test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .app_data(web::Data::from(Arc::clone(&metrics)))
                    .configure(move |cfg| services::register(cache, analytics, metrics, cfg))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    macro_rules! memory_app {
        () => {
            test_app!(
                MemoryUrlCacheRepository::new(),
                MemoryUrlAnalyticRepository::new()
            )
        };
    }

    #[actix_web::test]
    async fn test_create_then_redirect_then_stats() {
        let app = memory_app!();

        let req = test::TestRequest::post()
            .uri("/s")
            .set_json(json!({ "long_url": "https://example.com/page" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let code = body["short_code"].as_str().unwrap().to_string();
        assert_eq!(code, "h");

        let req = test::TestRequest::get()
            .uri(&format!("/s/{}", code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "https://example.com/page"
        );

        // The click lands in the background
        let mut stats = Value::Null;
        for _ in 0..200 {
            let req = test::TestRequest::get()
                .uri(&format!("/stats/{}", code))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            stats = test::read_body_json(resp).await;
            if stats["click_count"] == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(stats["long_url"], "https://example.com/page");
        assert_eq!(stats["click_count"], 1);
        assert!(stats["created_at"].as_str().unwrap().contains('T'));
        assert!(stats["last_accessed_at"].is_string());
    }

    #[actix_web::test]
    async fn test_fresh_stats_omit_last_access() {
        let app = memory_app!();

        let req = test::TestRequest::post()
            .uri("/s")
            .set_json(json!({ "long_url": "https://example.com", "ttl_seconds": 3600 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/stats/{}", body["short_code"].as_str().unwrap()))
            .to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["click_count"], 0);
        assert!(stats.get("last_accessed_at").is_none());
    }

    #[actix_web::test]
    async fn test_create_rejects_bad_input() {
        let app = memory_app!();

        let cases = [
            (
                json!({ "long_url": "example.com" }),
                "invalid URL: must be a valid HTTP or HTTPS URL",
            ),
            (
                json!({ "long_url": "https://example.com", "ttl_seconds": 60 }),
                "invalid TTL: must be between 1 hour and 1 week",
            ),
            (
                json!({ "long_url": format!("https://example.com/{}", "a".repeat(2048)) }),
                "URL too long: maximum length is 2048 characters",
            ),
            (
                json!({ "long_url": "https://example.com/a\nb" }),
                "invalid URL: must be a valid HTTP or HTTPS URL",
            ),
            (json!({ "long_url": "" }), "long_url: long_url is required"),
            (json!({ "ttl_seconds": 3600 }), "invalid request body"),
        ];

        for (payload, message) in cases {
            let req = test::TestRequest::post()
                .uri("/s")
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], message);
        }

        let req = test::TestRequest::post()
            .uri("/s")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_codes_are_empty_404() {
        let app = memory_app!();

        for uri in ["/s/fffff", "/s/xyz", "/stats/fffff", "/stats/xyz"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            let body = test::read_body(resp).await;
            assert!(body.is_empty());
        }
    }

    #[actix_web::test]
    async fn test_store_failure_is_opaque_500() {
        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache
            .expect_get()
            .returning(|_| Err(RepositoryError::Unavailable("connection refused".into())));
        let app = test_app!(cache, MemoryUrlAnalyticRepository::new());

        let req = test::TestRequest::get().uri("/s/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "internal server error" }));
    }

    #[actix_web::test]
    async fn test_healthz() {
        let app = memory_app!();
        let req = test::TestRequest::get().uri("/healthz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");

        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache
            .expect_ping()
            .returning(|| Err(RepositoryError::Unavailable("no route to host".into())));
        let app = test_app!(cache, MemoryUrlAnalyticRepository::new());
        let req = test::TestRequest::get().uri("/healthz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "unhealthy");
    }

    #[actix_web::test]
    async fn test_metrics_endpoint_renders_text() {
        let app = memory_app!();
        let req = test::TestRequest::get().uri("/metrics").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("analytics_update_failures_total"));
    }
}
