use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{http::StatusCode, Json, Router};
use axum::extract::State;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::pool;
use crate::handlers;
use crate::middleware::{guard, session};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let back_office = Router::new()
        .route("/cashflow", get(handlers::admin::cashflow::get))
        .route("/revenue", get(handlers::admin::revenue::get))
        .route("/content/describe", post(handlers::admin::content::describe))
        .route("/shipments/:tracking", get(handlers::admin::shipments::get))
        // Sending customer email is a write-side action; technicians only get
        // the appointment reads below.
        .route("/appointments/:id/notify", post(handlers::admin::appointments::notify))
        .route_layer(from_fn_with_state(state.clone(), guard::require_back_office));

    let repair_desk = Router::new()
        .route("/appointments", get(handlers::admin::appointments::list))
        .route("/appointments/:id", get(handlers::admin::appointments::get))
        .route_layer(from_fn_with_state(state.clone(), guard::require_repair_desk));

    let session_scoped = Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami))
        .nest("/api/admin", back_office.merge(repair_desk))
        .route_layer(from_fn_with_state(state.clone(), session::require_session));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(handlers::auth::login))
        .route("/api/products", get(handlers::catalog::list))
        .route("/api/products/:id", get(handlers::catalog::get))
        .route("/api/appointments", post(handlers::appointments::create))
        .route("/api/checkout", post(handlers::payments::checkout))
        .route("/api/payments/confirm", post(handlers::payments::confirm))
        .route("/api/support/chat", post(handlers::support::chat))
        // Session-scoped (admin routes additionally role-guarded)
        .merge(session_scoped)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "storefront-api",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/auth/login (public), /api/auth/whoami (session)",
                "catalog": "/api/products[/:id] (public)",
                "appointments": "/api/appointments (public booking)",
                "payments": "/api/checkout, /api/payments/confirm (public)",
                "support": "/api/support/chat (public)",
                "admin": "/api/admin/* (admin or super_admin; repair desk adds technician)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match pool::health_check(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            // Connection errors can name hosts and users; log them, return a
            // generic body.
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, HttpConfig, SecurityConfig};
    use axum::body::Body;
    use axum::http::Request;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    // Lazy pool: never connects unless a handler actually queries, so these
    // tests run without a database.
    fn test_state() -> AppState {
        let config = AppConfig {
            http: HttpConfig { port: 0 },
            database: DatabaseConfig {
                url: "postgres://unused@127.0.0.1:1/unused".to_string(),
                max_connections: 1,
            },
            security: SecurityConfig {
                session_secret: "router-test-secret".to_string(),
                session_ttl_hours: 1,
            },
            stripe: None,
            openai: None,
            mailer: None,
            dhl: None,
        };

        let db = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://unused@127.0.0.1:1/unused")
            .expect("lazy pool");

        AppState {
            config: Arc::new(config),
            db,
            http: reqwest::Client::new(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_banner_is_public() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["name"], "storefront-api");
    }

    #[tokio::test]
    async fn admin_routes_answer_401_without_a_session() {
        for uri in ["/api/admin/revenue", "/api/admin/cashflow", "/api/admin/appointments"] {
            let response = router(test_state())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert!(body.get("data").is_none(), "401 body must not leak data");
        }
    }

    #[tokio::test]
    async fn notify_sits_behind_the_back_office_guard() {
        // A valid session is not enough: the guard must verify the stored
        // role, and with no reachable profiles table it fails closed to 401
        // before the handler runs.
        let state = test_state();
        let token = crate::auth::issue_token(
            &state.config.security,
            uuid::Uuid::new_v4(),
            "tech@store.example",
        )
        .unwrap();

        let uri = format!("/api/admin/appointments/{}/notify", uuid::Uuid::new_v4());
        let response = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn degraded_health_body_stays_generic() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], "database unavailable");
        assert_eq!(body["data"]["status"], "degraded");
        assert!(
            body["data"].get("database_error").is_none(),
            "degraded body must not carry connection details"
        );
    }

    #[tokio::test]
    async fn malformed_bearer_token_is_rejected() {
        let response = router(test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/auth/whoami")
                    .header("authorization", "Bearer not-a-real-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn checkout_degrades_to_503_when_payments_unconfigured() {
        let payload = json!({
            "items": [{ "product_id": uuid::Uuid::new_v4(), "quantity": 1 }]
        });

        let response = router(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/checkout")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn support_chat_validates_before_reaching_the_ai_client() {
        let response = router(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/support/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "messages": [] }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
