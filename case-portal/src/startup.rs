use axum::{
    body::Body,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use portal_core::middleware::{request_id_middleware, request_span};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SessionSettings;
use crate::handlers::app::{health_check, index, login_page, role_shell};
use crate::middleware::auth::role_route_middleware;
use crate::models::Role;

pub fn build_router(settings: Arc<SessionSettings>) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route(&settings.login_route, get(login_page));

    for role in Role::ALL {
        let home = role.home_path();
        router = router
            .route(&home, get(role_shell))
            .route(&format!("{}/*rest", home), get(role_shell));
    }

    router
        .layer(from_fn_with_state(settings, role_route_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
        // Outermost so the trace span sees the request id
        .layer(from_fn(request_id_middleware))
}
