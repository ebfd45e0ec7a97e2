// src/routes/mod.rs
pub mod chat;

use crate::{error::AppError, state::SharedState};
use axum::{
    Router,
    extract::{Request, State},
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use chat::{chat_handler, preflight_handler};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: SharedState) -> Router {
    let chat_routes = Router::new()
        .route("/chat", post(chat_handler).options(preflight_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(chat_routes)
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Permissive CORS, applied outermost so error responses carry it too.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-supabase-client-platform"),
            HeaderName::from_static("x-supabase-client-platform-version"),
            HeaderName::from_static("x-supabase-client-runtime"),
            HeaderName::from_static("x-supabase-client-runtime-version"),
        ])
}

async fn auth_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Bearer check, only when a token is configured. Preflight is exempt.
    let Some(expected) = state.bearer_token.as_deref() else {
        return Ok(next.run(req).await);
    };
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if token == expected => Ok(next.run(req).await),
        _ => Err(AppError::Unauthorized),
    }
}
