use http::StatusCode;
use oauth2_gate::OAuth2Error;

/// Helper trait for converting errors to a standard response error format
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Rejected logins all surface as a bare 403; the cause only goes to the log.
impl<T> IntoResponseError<T> for Result<T, OAuth2Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = e.status_code();
            if e.is_auth_failure() {
                tracing::warn!("Login rejected: {}", e);
            } else if status.is_server_error() {
                tracing::error!("Login gate failure: {}", e);
            } else {
                tracing::debug!("Bad request: {}", e);
            }
            let body = status.canonical_reason().unwrap_or("Error").to_string();
            (status, body)
        })
    }
}
