use chrono::{DateTime, Utc};
use common::NotificationKind;
use serde::{Deserialize, Serialize};

use crate::entity::notification;

/// Upper bound on notifications returned by one listing.
pub const NOTIFICATION_LIST_LIMIT: u64 = 100;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct NotificationListQuery {
    /// Only return unread notifications.
    pub unread_only: Option<bool>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Competition the notification refers to.
    pub related_id: Option<i32>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(m: notification::Model) -> Self {
        Self {
            id: m.id,
            kind: m.kind,
            title: m.title,
            message: m.message,
            related_id: m.related_id,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    /// Unread notifications for the caller, across all pages.
    pub unread_count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MarkAllReadResponse {
    #[schema(example = 3)]
    pub updated: u64,
}
