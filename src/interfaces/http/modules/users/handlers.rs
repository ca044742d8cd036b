//! User management API handlers
//!
//! Every route here sits behind the token middleware. Visibility and
//! ownership are decided by `UserService`; handlers only translate.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ListUsersParams, ProfileDto, UpdateProfileRequest, UpdateUserRequest, UserDto};
use crate::application::UserService;
use crate::domain::UserSortField;
use crate::interfaces::http::common::{ApiError, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::RegisterRequest;
use crate::shared::PageRequest;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = UserDto),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<UserDto>, ApiError> {
    let account = state.user_service.current_account(&caller.user).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users visible to the caller", body = PaginatedResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse<UserDto>>, ApiError> {
    let sort_by = params
        .sort_by
        .as_deref()
        .map(UserSortField::parse)
        .unwrap_or_default();

    let result = state
        .user_service
        .list_users(
            &caller.user,
            params.search,
            PageRequest::new(params.page, params.page_size),
            sort_by,
        )
        .await?;

    Ok(Json(PaginatedResponse::from_result(result)))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Field-keyed validation errors")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let account = state
        .user_service
        .create_user(&caller.user, request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "Missing or not visible to the caller")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let account = state.user_service.get_user(&caller.user, &id).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    description = "Accepts the same body as PATCH. Fields left out of the body keep their stored values; PUT does not reset them.",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Field-keyed validation errors"),
        (status = 403, description = "Caller does not own this user"),
        (status = 404, description = "Missing or not visible to the caller")
    )
)]
pub async fn replace_user(
    state: State<UserHandlerState>,
    caller: Extension<AuthenticatedUser>,
    id: Path<String>,
    request: ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    update_user(state, caller, id, request).await
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Field-keyed validation errors"),
        (status = 403, description = "Caller does not own this user"),
        (status = 404, description = "Missing or not visible to the caller")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let account = state
        .user_service
        .update_user(&caller.user, &id, request.into())
        .await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deactivated and token revoked"),
        (status = 403, description = "Caller does not own this user"),
        (status = 404, description = "Missing or not visible to the caller")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.user_service.deactivate_user(&caller.user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/users/{id}/update_profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Field-keyed validation errors"),
        (status = 403, description = "Caller neither owns this profile nor is staff"),
        (status = 404, description = "Missing or not visible to the caller")
    )
)]
pub async fn update_profile(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileDto>, ApiError> {
    let profile = state
        .user_service
        .update_profile(&caller.user, &id, request.into())
        .await?;
    Ok(Json(profile.into()))
}
