use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};
use serde_json::json;

use crate::auth::session::{SessionUser, SESSION_COOKIE};
use crate::state::AppState;

/// A live session resolved from the `sid` cookie.
///
/// Extracting `AuthSession` directly rejects with a 401 JSON body, which is
/// what the data API wants. Routes that answer with a notice or plain text
/// instead extract `Option<AuthSession>` and shape their own response.
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|cookies| cookie_value(cookies, SESSION_COOKIE))
            .ok_or_else(not_logged_in)?;

        let user = state.sessions.get(&token).await.ok_or_else(not_logged_in)?;

        Ok(AuthSession { token, user })
    }
}

fn not_logged_in() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Not logged in" })),
    )
}

/// Pull one cookie's value out of a `Cookie:` header.
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_named_cookie_among_several() {
        let header = "theme=dark; sid=abc123; lang=en";
        assert_eq!(cookie_value(header, "sid").as_deref(), Some("abc123"));
    }

    #[test]
    fn ignores_prefix_matches() {
        let header = "sid2=nope";
        assert_eq!(cookie_value(header, "sid"), None);
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(cookie_value("theme=dark", "sid"), None);
        assert_eq!(cookie_value("", "sid"), None);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let header = "sid=a=b=c";
        assert_eq!(cookie_value(header, "sid").as_deref(), Some("a=b=c"));
    }
}
