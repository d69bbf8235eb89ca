use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppQuery;
use crate::models::notification::{
    MarkAllReadResponse, NotificationListQuery, NotificationListResponse, NotificationResponse,
};
use crate::services::NotificationService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Notifications",
    operation_id = "listNotifications",
    summary = "List the caller's notifications",
    description = "Newest first, at most 100.",
    params(NotificationListQuery),
    responses(
        (status = 200, description = "Notifications", body = NotificationListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_notifications(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NotificationListQuery>,
) -> Result<Json<NotificationListResponse>, AppError> {
    let list = NotificationService::new(&state.db)
        .list(&auth_user.actor(), query.unread_only.unwrap_or(false))
        .await?;
    Ok(Json(list))
}

#[utoipa::path(
    patch,
    path = "/{id}/read",
    tag = "Notifications",
    operation_id = "markNotificationRead",
    summary = "Mark a notification read",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification", body = NotificationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Notification not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn mark_notification_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<NotificationResponse>, AppError> {
    let notification = NotificationService::new(&state.db)
        .mark_read(&auth_user.actor(), id)
        .await?;
    Ok(Json(notification))
}

#[utoipa::path(
    post,
    path = "/read-all",
    tag = "Notifications",
    operation_id = "markAllNotificationsRead",
    summary = "Mark every notification read",
    responses(
        (status = 200, description = "Number of notifications updated", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn mark_all_notifications_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = NotificationService::new(&state.db)
        .mark_all_read(&auth_user.actor())
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
