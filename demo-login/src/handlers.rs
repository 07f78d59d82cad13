use axum::response::Html;
use oauth2_gate_axum::{LOGOUT_PATH, OAuthUser};

pub(crate) async fn index(user: OAuthUser) -> Html<String> {
    Html(format!(
        "<p>Hey {}!</p><p><a href=\"/restricted\">Restricted</a> | <a href=\"{}\">Logout</a></p>",
        user.email, LOGOUT_PATH
    ))
}

pub(crate) async fn restricted(user: OAuthUser) -> String {
    tracing::trace!("Token present: {}", user.token.is_some());
    "SECRET EATING.".to_string()
}
