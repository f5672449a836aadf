use anyhow::Context;
use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use catalog_env::Environment;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Local development accepts any origin, every other environment only the configured ones
pub fn cors_layer(environment: Environment, origins: &[String]) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_headers(vec![AUTHORIZATION, CONTENT_TYPE])
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    if environment == Environment::Local {
        return Ok(cors.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid cors origin {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn preflight_origin(environment: Environment, origin: &str) -> Option<HeaderValue> {
        let layer = cors_layer(environment, &["https://shop.example.com".to_string()]).unwrap();
        let app = Router::new().route("/", get(|| async {})).layer(layer);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header("origin", origin)
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get("access-control-allow-origin")
            .cloned()
    }

    #[tokio::test]
    async fn it_allows_listed_origins() {
        let allowed = preflight_origin(Environment::Production, "https://shop.example.com").await;
        assert_eq!(allowed.unwrap(), "https://shop.example.com");

        let denied = preflight_origin(Environment::Production, "https://evil.example.com").await;
        assert!(denied.is_none());
    }

    #[tokio::test]
    async fn it_allows_any_origin_locally() {
        let allowed = preflight_origin(Environment::Local, "http://localhost:5173").await;
        assert_eq!(allowed.unwrap(), "*");
    }

    #[test]
    fn it_rejects_malformed_origins() {
        assert!(cors_layer(Environment::Develop, &["bad\norigin".to_string()]).is_err());
    }
}
