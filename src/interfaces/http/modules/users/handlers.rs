//! Current-user API handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{ChangePasswordRequest, TokenData, UpdateMeRequest, UserData};
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::modules::auth::AuthHandlerState;

#[utoipa::path(
    get,
    path = "/api/v1/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserData>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(
    State(state): State<AuthHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserData>>, DomainError> {
    let user = state.users.get_me(&user.id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/user/me",
    tag = "Users",
    request_body = UpdateMeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserData>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_me(
    State(state): State<AuthHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<UpdateMeRequest>,
) -> Result<Json<ApiResponse<UserData>>, DomainError> {
    let updated = state.users.update_me(&user, request.into_update()?).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/user/password",
    tag = "Users",
    request_body = ChangePasswordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Password changed, new token issued", body = ApiResponse<TokenData>),
        (status = 400, description = "Missing fields, too short or not confirmed"),
        (status = 401, description = "Current password is incorrect")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<TokenData>>, DomainError> {
    let (current, new) = request.into_parts()?;
    let auth = state.users.change_password(&user.id, &current, &new).await?;

    Ok(Json(
        ApiResponse::success(TokenData { token: auth.token })
            .with_message("Password changed successfully"),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/me/favorites/{station_id}",
    tag = "Users",
    params(("station_id" = String, Path, description = "Station ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Station added to favourites", body = ApiResponse<UserData>),
        (status = 400, description = "Invalid id or favourites full"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn add_favorite(
    State(state): State<AuthHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(station_id): Path<String>,
) -> Result<Json<ApiResponse<UserData>>, DomainError> {
    let updated = state.users.add_favorite(&user, &station_id).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/me/favorites/{station_id}",
    tag = "Users",
    params(("station_id" = String, Path, description = "Station ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Station removed from favourites", body = ApiResponse<UserData>),
        (status = 400, description = "Invalid id")
    )
)]
pub async fn remove_favorite(
    State(state): State<AuthHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(station_id): Path<String>,
) -> Result<Json<ApiResponse<UserData>>, DomainError> {
    let updated = state.users.remove_favorite(&user, &station_id).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}
