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
use crate::models::competition::{
    CompetitionListQuery, CompetitionListResponse, CompetitionResponse, CreateCompetitionRequest,
    ReviewCompetitionRequest, UpdateCompetitionStatusRequest,
};
use crate::services::CompetitionService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Competitions",
    operation_id = "createCompetition",
    summary = "Register a competition",
    description = "Creates a DRAFT competition, or a SUBMITTED one when `submit` is true. Requires `competition:submit`.",
    request_body = CreateCompetitionRequest,
    responses(
        (status = 201, description = "Competition created", body = CompetitionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCompetitionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let competition = CompetitionService::new(&state)
        .create(&auth_user.actor(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(competition)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Competitions",
    operation_id = "listCompetitions",
    summary = "List competitions",
    description = "Reviewers see every competition. Other users see ACCEPTED, ONGOING and COMPLETED competitions plus the ones they submitted.",
    params(CompetitionListQuery),
    responses(
        (status = 200, description = "Competitions", body = CompetitionListResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_competitions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompetitionListQuery>,
) -> Result<Json<CompetitionListResponse>, AppError> {
    let list = CompetitionService::new(&state)
        .list(&auth_user.actor(), query)
        .await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Competitions",
    operation_id = "getCompetition",
    summary = "Get a competition by ID",
    params(("id" = i32, Path, description = "Competition ID")),
    responses(
        (status = 200, description = "Competition", body = CompetitionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = CompetitionService::new(&state)
        .get(&auth_user.actor(), id)
        .await?;
    Ok(Json(competition))
}

#[utoipa::path(
    post,
    path = "/{id}/submit",
    tag = "Competitions",
    operation_id = "submitCompetition",
    summary = "Submit a draft competition for review",
    params(("id" = i32, Path, description = "Competition ID")),
    responses(
        (status = 200, description = "Competition submitted", body = CompetitionResponse),
        (status = 400, description = "Not a draft (INVALID_STATE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the organizer (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn submit_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = CompetitionService::new(&state)
        .submit(&auth_user.actor(), id)
        .await?;
    Ok(Json(competition))
}

#[utoipa::path(
    post,
    path = "/{id}/review",
    tag = "Competitions",
    operation_id = "reviewCompetition",
    summary = "Accept or reject a submitted competition",
    description = "Requires `competition:review`. A rejection reason is required when rejecting. The submitter is notified.",
    params(("id" = i32, Path, description = "Competition ID")),
    request_body = ReviewCompetitionRequest,
    responses(
        (status = 200, description = "Competition reviewed", body = CompetitionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR) or not submitted (INVALID_STATE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, action = %payload.action))]
pub async fn review_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ReviewCompetitionRequest>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = CompetitionService::new(&state)
        .review(&auth_user.actor(), id, payload)
        .await?;
    Ok(Json(competition))
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Competitions",
    operation_id = "updateCompetitionStatus",
    summary = "Advance a competition's lifecycle",
    description = "Requires `competition:manage`. Allowed: DRAFT to SUBMITTED or CANCELLED, SUBMITTED to ACCEPTED or REJECTED, ACCEPTED to ONGOING or CANCELLED, ONGOING to COMPLETED or CANCELLED.",
    params(("id" = i32, Path, description = "Competition ID")),
    request_body = UpdateCompetitionStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = CompetitionResponse),
        (status = 400, description = "Transition not allowed (INVALID_STATE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, status = %payload.status))]
pub async fn update_competition_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCompetitionStatusRequest>,
) -> Result<Json<CompetitionResponse>, AppError> {
    let competition = CompetitionService::new(&state)
        .update_status(&auth_user.actor(), id, payload.status)
        .await?;
    Ok(Json(competition))
}
