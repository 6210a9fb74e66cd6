//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{AuthData, SigninRequest, SignupRequest};
use crate::application::UserService;
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// State shared by the account handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService<dyn RepositoryProvider>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/user/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthData>),
        (status = 400, description = "Validation error or email already registered"),
        (status = 403, description = "Admin accounts cannot self-register")
    )
)]
pub async fn signup(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), DomainError> {
    let auth = state.users.signup(request.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(auth.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/signin",
    tag = "Authentication",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<AuthData>),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn signin(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> Result<Json<ApiResponse<AuthData>>, DomainError> {
    let (email, password) = request.into_credentials()?;
    let auth = state.users.signin(&email, &password).await?;
    Ok(Json(ApiResponse::success(auth.into())))
}
