use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::credential::{
    CredentialEnvelope, CredentialListResponse, CredentialResponse, DeleteCredentialResponse,
    ReorderCredentialsRequest, ReviewCredentialRequest, ReviewQueueQuery, ReviewQueueResponse,
    SubmitCredentialRequest,
};
use crate::services::CredentialService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/credentials",
    tag = "Credentials",
    operation_id = "submitCredential",
    summary = "Submit a credential for a competition",
    description = "Claims participation in a competition. The competition must be ACCEPTED or ONGOING and each user may hold one credential per competition. The new credential starts PENDING and is appended to the end of the user's display order. Requires `credential:submit`.",
    params(("id" = i32, Path, description = "Competition ID")),
    request_body = SubmitCredentialRequest,
    responses(
        (status = 201, description = "Credential created", body = CredentialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR) or competition closed (INVALID_STATE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already submitted (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, competition_id))]
pub async fn submit_credential(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(competition_id): Path<i32>,
    AppJson(payload): AppJson<SubmitCredentialRequest>,
) -> Result<impl IntoResponse, AppError> {
    let credential = CredentialService::new(&state)
        .submit(&auth_user.actor(), competition_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(credential)))
}

#[utoipa::path(
    get,
    path = "/{user_id}/credentials",
    tag = "Credentials",
    operation_id = "listUserCredentials",
    summary = "List a user's credentials",
    description = "Returns the user's credentials ordered by display order, newest first among equal orders. The owner and reviewers see every status; other users only see APPROVED credentials.",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Credentials", body = CredentialListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id))]
pub async fn list_user_credentials(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<CredentialListResponse>, AppError> {
    let list = CredentialService::new(&state)
        .list(&auth_user.actor(), user_id)
        .await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/{user_id}/credentials/{competition_id}",
    tag = "Credentials",
    operation_id = "getUserCredential",
    summary = "Get a user's credential for one competition",
    description = "Returns 404 when the user holds no credential for the competition, or when the caller may not see it.",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("competition_id" = i32, Path, description = "Competition ID"),
    ),
    responses(
        (status = 200, description = "Credential", body = CredentialEnvelope),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Credential not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id, competition_id))]
pub async fn get_user_credential(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((user_id, competition_id)): Path<(i32, i32)>,
) -> Result<Json<CredentialEnvelope>, AppError> {
    let credential = CredentialService::new(&state)
        .get(&auth_user.actor(), user_id, competition_id)
        .await?;
    Ok(Json(credential))
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Credentials",
    operation_id = "reorderCredentials",
    summary = "Reorder the caller's credentials",
    description = "Entries are sorted by the supplied `order` (ties keep payload order) and each credential's stored order becomes its index. Every listed credential must exist and belong to the caller; all updates are applied atomically.",
    request_body = ReorderCredentialsRequest,
    responses(
        (status = 200, description = "Credentials in their new order", body = CredentialListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Credential owned by another user (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Credential not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, count = payload.credentials.len()))]
pub async fn reorder_credentials(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderCredentialsRequest>,
) -> Result<Json<CredentialListResponse>, AppError> {
    let list = CredentialService::new(&state)
        .reorder(&auth_user.actor(), payload)
        .await?;
    Ok(Json(list))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Credentials",
    operation_id = "deleteCredential",
    summary = "Delete one of the caller's credentials",
    description = "Allowed in any review status. The credential photo is removed from storage afterwards on a best-effort basis.",
    params(("id" = i32, Path, description = "Credential ID")),
    responses(
        (status = 200, description = "Credential deleted", body = DeleteCredentialResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Credential owned by another user (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Credential not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_credential(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteCredentialResponse>, AppError> {
    let result = CredentialService::new(&state)
        .delete(&auth_user.actor(), id)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/{id}/review",
    tag = "Credential Review",
    operation_id = "reviewCredential",
    summary = "Approve or reject a pending credential",
    description = "Requires `credential:review`. Only PENDING credentials can be reviewed; a decided credential returns INVALID_STATE. The owner is notified of the outcome.",
    params(("id" = i32, Path, description = "Credential ID")),
    request_body = ReviewCredentialRequest,
    responses(
        (status = 200, description = "Credential reviewed", body = CredentialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR) or already reviewed (INVALID_STATE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Credential not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, action = %payload.action))]
pub async fn review_credential(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ReviewCredentialRequest>,
) -> Result<Json<CredentialResponse>, AppError> {
    let credential = CredentialService::new(&state)
        .review(&auth_user.actor(), id, payload)
        .await?;
    Ok(Json(credential))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Credential Review",
    operation_id = "listCredentialsForReview",
    summary = "Review queue",
    description = "Pages through credentials with the given status (PENDING by default), oldest submission first. Requires `credential:review`.",
    params(ReviewQueueQuery),
    responses(
        (status = 200, description = "Credentials", body = ReviewQueueResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_credentials_for_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReviewQueueQuery>,
) -> Result<Json<ReviewQueueResponse>, AppError> {
    let queue = CredentialService::new(&state)
        .list_for_review(&auth_user.actor(), query)
        .await?;
    Ok(Json(queue))
}
