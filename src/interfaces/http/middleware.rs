//! Token authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::UserService;
use crate::domain::User;
use crate::interfaces::http::common::ApiError;

/// Accepted `Authorization` schemes, matched case-insensitively.
const AUTH_SCHEMES: [&str; 2] = ["Bearer", "Token"];

const CREDENTIALS_MISSING: &str = "Authentication credentials were not provided.";
const HEADER_MALFORMED: &str = "Invalid token header.";

/// Authentication state shared by every protected route
#[derive(Clone)]
pub struct AuthState {
    pub user_service: Arc<UserService>,
}

/// The resolved caller, inserted into request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// `Bearer <key>` / `Token <key>` → `<key>`.
fn extract_token(auth_header: &str) -> Option<&str> {
    let (scheme, key) = auth_header.trim().split_once(' ')?;
    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    AUTH_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
        .then_some(key)
}

/// Reject the request unless it carries a live token of an active user.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return ApiError::Unauthorized(CREDENTIALS_MISSING.into()).into_response();
    };

    let Some(token_key) = extract_token(auth_header) else {
        return ApiError::Unauthorized(HEADER_MALFORMED.into()).into_response();
    };

    match auth_state.user_service.authenticate(token_key).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthenticatedUser { user });
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_schemes_are_accepted() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Token abc"), Some("abc"));
        assert_eq!(extract_token("token  abc "), Some("abc"));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(extract_token("Bearer"), None);
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer a b"), None);
    }
}
