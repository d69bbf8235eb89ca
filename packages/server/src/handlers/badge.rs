use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{user, user_badge};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::badge::{BadgeListResponse, BadgeResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{user_id}/badges",
    tag = "Badges",
    operation_id = "listUserBadges",
    summary = "List a user's badges",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Badges in award order", body = BadgeListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(user_id))]
pub async fn list_user_badges(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<BadgeListResponse>, AppError> {
    user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let badges = user_badge::Entity::find()
        .filter(user_badge::Column::UserId.eq(user_id))
        .order_by_asc(user_badge::Column::AwardedAt)
        .order_by_asc(user_badge::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(BadgeListResponse {
        badges: badges.into_iter().map(BadgeResponse::from).collect(),
    }))
}
