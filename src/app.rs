use axum::middleware;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::auth;
use crate::routes::{financial_assets, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/financial-assets", financial_assets::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // A lazy pool never connects; these tests only exercise paths that fail
    // before reaching the database.
    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/fintrack_test")
            .expect("lazy pool");
        create_app(AppState {
            pool,
            jwt_secret: "test-secret".to_string(),
        })
    }

    fn bearer(user_id: i64) -> String {
        let token = auth::issue_token("test-secret", user_id, 3600).unwrap();
        format!("Bearer {}", token)
    }

    async fn error_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_with_non_numeric_id_is_bad_request() {
        let response = test_app()
            .oneshot(
                Request::get("/api/financial-assets/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"], "Invalid ID in URL");
    }

    #[tokio::test]
    async fn create_without_token_is_unauthorized() {
        let response = test_app()
            .oneshot(
                Request::post("/api/financial-assets")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"AAPL","type":"stock","value":100}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_body(response).await["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn update_without_token_is_unauthorized() {
        let response = test_app()
            .oneshot(
                Request::put("/api/financial-assets/1")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"value":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn delete_without_token_is_unauthorized() {
        let response = test_app()
            .oneshot(
                Request::delete("/api/financial-assets/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn user_only_listing_without_token_is_unauthorized() {
        let response = test_app()
            .oneshot(
                Request::get("/api/financial-assets?userOnly=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_even_on_public_routes() {
        let response = test_app()
            .oneshot(
                Request::get("/api/financial-assets/1")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_with_bad_id_fails_before_touching_the_database() {
        let response = test_app()
            .oneshot(
                Request::put("/api/financial-assets/abc")
                    .header(header::AUTHORIZATION, bearer(1))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"], "Invalid ID in URL");
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/financial-assets")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(
                        header::ACCESS_CONTROL_REQUEST_METHOD,
                        Method::POST.as_str(),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
