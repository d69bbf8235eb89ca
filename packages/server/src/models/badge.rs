use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::user_badge;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BadgeResponse {
    #[schema(example = "first_credential")]
    pub badge: String,
    pub awarded_at: DateTime<Utc>,
}

impl From<user_badge::Model> for BadgeResponse {
    fn from(m: user_badge::Model) -> Self {
        Self {
            badge: m.badge,
            awarded_at: m.awarded_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BadgeListResponse {
    pub badges: Vec<BadgeResponse>,
}
