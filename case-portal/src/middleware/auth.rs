use crate::config::SessionSettings;
use crate::models::{RedirectIdentity, Role};
use crate::utils::cookie::{decode_identity, USER_DATA_COOKIE};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    Redirect(String),
}

/// Role-tree protection from the `user_data` cookie alone.
///
/// Anonymous requests into a role tree go to the login route, a role visiting
/// another role's tree goes to its own dashboard, and a signed-in user on the
/// login route is sent to their dashboard.
pub fn route_decision(
    path: &str,
    identity: Option<&RedirectIdentity>,
    login_route: &str,
) -> RouteDecision {
    if path == login_route {
        return match identity {
            Some(identity) => RouteDecision::Redirect(identity.role.dashboard_path()),
            None => RouteDecision::Continue,
        };
    }

    let Some(required) = Role::from_path(path) else {
        return RouteDecision::Continue;
    };

    match identity {
        None => RouteDecision::Redirect(login_route.to_string()),
        Some(identity) if identity.role == required => RouteDecision::Continue,
        Some(identity) => RouteDecision::Redirect(identity.role.dashboard_path()),
    }
}

pub async fn role_route_middleware(
    State(settings): State<Arc<SessionSettings>>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let identity = jar
        .get(USER_DATA_COOKIE)
        .and_then(|cookie| match decode_identity(cookie.value()) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable user_data cookie");
                None
            }
        });

    let path = request.uri().path().to_string();
    match route_decision(&path, identity.as_ref(), &settings.login_route) {
        RouteDecision::Continue => next.run(request).await,
        RouteDecision::Redirect(to) => {
            tracing::debug!(from = %path, to = %to, "Route middleware redirect");
            Redirect::to(&to).into_response()
        }
    }
}
