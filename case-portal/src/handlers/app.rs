use axum::response::{Html, IntoResponse};

pub async fn index() -> impl IntoResponse {
    Html("<h1>Case Portal</h1><a href=\"/login\">Sign in</a>")
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn login_page() -> impl IntoResponse {
    Html("<h1>Sign in</h1>")
}

/// Role pages are rendered client-side from the browser location; the server
/// only serves the static shell once the route middleware has let the
/// request through.
pub async fn role_shell() -> impl IntoResponse {
    Html("<div id=\"app\"></div>")
}
