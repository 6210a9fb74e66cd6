//! Authentication and authorization middleware for Axum
//!
//! `auth_middleware` resolves the bearer token to a [`CurrentUser`] stored in
//! the request extensions; `require_role` then restricts a route group to a
//! set of roles. Layer `require_role` first so it runs after authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::UserService;
use crate::domain::{DomainError, RepositoryProvider, User, UserRole};

pub const MSG_NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
pub const MSG_NO_PERMISSION: &str = "You do not have permission to perform this action";

/// Roles allowed to manage stations
pub const STATION_MANAGERS: &[UserRole] = &[UserRole::Operator, UserRole::Admin];

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService<dyn RepositoryProvider>>,
}

/// The authenticated user, inserted into request extensions
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Bearer token authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .map(String::from);

    let Some(token) = token else {
        return DomainError::Unauthorized(MSG_NOT_LOGGED_IN.into()).into_response();
    };

    match auth_state.users.authenticate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Role restriction middleware; the state is the list of allowed roles
pub async fn require_role(
    State(allowed): State<&'static [UserRole]>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(CurrentUser(user)) = request.extensions().get::<CurrentUser>() else {
        return DomainError::Unauthorized(MSG_NOT_LOGGED_IN.into()).into_response();
    };

    if !allowed.contains(&user.role) {
        return DomainError::Forbidden(MSG_NO_PERMISSION.into()).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("abc.def"), None);
    }
}
