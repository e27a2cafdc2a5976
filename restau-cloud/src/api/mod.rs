//! API routes for restau-cloud

pub mod admin;
pub mod health;
pub mod live_ws;
pub mod me;
pub mod owner;
pub mod storefront;

use std::any::Any;

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::error::{AppError, ErrorCode};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{admin_bootstrap_rate_limit, checkout_rate_limit};
use crate::auth::require_auth;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Write an audit entry; a failed write is logged and otherwise ignored
pub async fn record_audit(
    state: &AppState,
    actor_id: &str,
    action: &str,
    detail: serde_json::Value,
    ip: &str,
) {
    let now = shared::util::now_millis();
    if let Err(e) =
        crate::db::audit::log(&state.pool, actor_id, action, Some(&detail), Some(ip), now).await
    {
        tracing::warn!(action, "Audit log write failed: {e}");
    }
}

/// Create the full router with middleware and state
pub fn create_router(state: AppState) -> Router {
    // Diner-facing storefront (no auth)
    let storefront = Router::new()
        .route("/api/r/{slug}", get(storefront::get_storefront))
        .route(
            "/api/r/{slug}/orders",
            post(storefront::checkout).route_layer(middleware::from_fn_with_state(
                state.clone(),
                checkout_rate_limit,
            )),
        );

    // Browsers cannot set headers on WebSocket upgrades: token in the query
    let live = Router::new().route("/api/owner/orders/live", get(live_ws::handle_live_orders_ws));

    let account = Router::new()
        .route("/api/me", get(me::get_me).post(me::bootstrap_profile))
        .route(
            "/api/become-admin",
            post(me::become_admin).route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_bootstrap_rate_limit,
            )),
        );

    let owner = Router::new()
        .route("/api/owner/overview", get(owner::overview::get_overview))
        .route("/api/owner/menu", get(owner::menu::get_menu))
        .route("/api/owner/menu/items", post(owner::menu::create_item))
        .route(
            "/api/owner/menu/items/{id}",
            put(owner::menu::update_item).delete(owner::menu::delete_item),
        )
        .route(
            "/api/owner/menu/categories",
            post(owner::menu::create_category),
        )
        .route(
            "/api/owner/settings",
            get(owner::settings::get_settings).put(owner::settings::update_settings),
        )
        .route("/api/owner/settings/qr", get(owner::settings::get_qr))
        .route(
            "/api/owner/tables",
            get(owner::tables::list_tables).post(owner::tables::create_table),
        )
        .route(
            "/api/owner/tables/{id}/status",
            put(owner::tables::update_table_status),
        )
        .route("/api/owner/orders", get(owner::orders::get_board))
        .route(
            "/api/owner/orders/{id}/advance",
            post(owner::orders::advance_order),
        )
        .route("/api/owner/orders/{id}/pay", post(owner::orders::pay_order))
        .route(
            "/api/owner/orders/{id}/cancel",
            post(owner::orders::cancel_order),
        );

    let admin = Router::new()
        .route(
            "/api/admin/restaurants",
            get(admin::restaurants::list_restaurants).post(admin::restaurants::create_restaurant),
        )
        .route(
            "/api/admin/restaurants/{id}",
            delete(admin::restaurants::delete_restaurant),
        )
        .route(
            "/api/admin/restaurants/{id}/status",
            put(admin::restaurants::update_restaurant_status),
        )
        .route("/api/admin/users", get(admin::users::list_users))
        .route("/api/admin/users/{id}", put(admin::users::update_user))
        .route(
            "/api/admin/users/{id}/status",
            put(admin::users::update_user_status),
        )
        .route("/api/admin/billing", get(admin::billing::get_billing))
        .route("/api/admin/health", get(admin::health::get_platform_health))
        .route("/api/admin/audit", get(admin::audit::list_audit));

    let authenticated = Router::new()
        .merge(account)
        .merge(owner)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront)
        .merge(live)
        .merge(authenticated)
        .fallback(not_found);

    with_middleware(routes, &state).with_state(state)
}

/// Tower middleware shared by every route
fn with_middleware(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&state.cors_allowed_origins))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

async fn not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
}

/// Turn a handler panic into the generic error screen payload
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    AppError::with_message(ErrorCode::InternalError, "Something went wrong")
        .with_detail("actions", serde_json::json!(["retry", "home"]))
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{Claims, tests::sign};
    use crate::state::test_support::{TEST_SECRET, lazy_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = create_router(lazy_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "restau-cloud");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = create_router(lazy_state());
        let response = app
            .oneshot(Request::get("/api/owner/overview").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], u16::from(ErrorCode::NotAuthenticated));
    }

    #[tokio::test]
    async fn bad_tokens_are_rejected() {
        let app = create_router(lazy_state());
        let response = app
            .clone()
            .oneshot(
                Request::get("/api/me")
                    .header("authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["code"],
            u16::from(ErrorCode::TokenInvalid)
        );

        let expired = sign(
            &Claims {
                sub: "user-1".to_string(),
                email: None,
                exp: (chrono::Utc::now().timestamp() - 3600) as usize,
                aud: None,
            },
            TEST_SECRET,
        );
        let response = app
            .oneshot(
                Request::get("/api/admin/restaurants")
                    .header("authorization", format!("Bearer {expired}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["code"],
            u16::from(ErrorCode::TokenExpired)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = create_router(lazy_state());
        let response = app
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["code"],
            u16::from(ErrorCode::NotFound)
        );
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let state = lazy_state();
        async fn boom() -> &'static str {
            panic!("kitchen on fire")
        }
        let router = Router::new().route("/boom", get(boom));
        let app = with_middleware(router, &state).with_state(state);
        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], u16::from(ErrorCode::InternalError));
        assert_eq!(body["details"]["actions"][0], "retry");
        assert_eq!(body["details"]["actions"][1], "home");
    }
}
