use chrono::{DateTime, Utc};
use common::{CompetitionStatus, ReviewAction};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shared::{Pagination, clean_optional, not_blank, validate_reason};
use crate::entity::competition;
use crate::error::AppError;

pub const MAX_COMPETITION_REJECTION_REASON: usize = 1000;

/// Request body for registering a competition.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateCompetitionRequest {
    #[schema(example = "Winter Cosplay Festival 2026")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    pub name: String,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub location: Option<String>,
    #[schema(example = "COSPLAY_PERFORMANCE")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub competition_type: Option<String>,
    #[schema(example = "SOLO")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub rivalry_type: Option<String>,
    #[schema(example = "NATIONAL")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub level: Option<String>,
    #[validate(
        url(message = "must be a valid URL"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    pub logo_url: Option<String>,
    #[validate(
        url(message = "must be a valid URL"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    pub reference_url: Option<String>,
    /// Submit for review immediately instead of creating a draft.
    #[serde(default)]
    pub submit: bool,
}

impl CreateCompetitionRequest {
    /// Trim text fields. Blank optional fields become absent.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = clean_optional(self.description);
        self.location = clean_optional(self.location);
        self.competition_type = clean_optional(self.competition_type);
        self.rivalry_type = clean_optional(self.rivalry_type);
        self.level = clean_optional(self.level);
        self.logo_url = clean_optional(self.logo_url);
        self.reference_url = clean_optional(self.reference_url);
        self
    }

    pub fn initial_status(&self) -> CompetitionStatus {
        if self.submit {
            CompetitionStatus::Submitted
        } else {
            CompetitionStatus::Draft
        }
    }
}

/// Request body for an administrator decision on a submitted competition.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReviewCompetitionRequest {
    pub action: ReviewAction,
    /// Required when rejecting.
    pub rejection_reason: Option<String>,
}

pub fn validate_review_competition(req: &ReviewCompetitionRequest) -> Result<(), AppError> {
    validate_reason(
        req.rejection_reason.as_deref(),
        MAX_COMPETITION_REJECTION_REASON,
    )?;
    let has_reason = req
        .rejection_reason
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if req.action == ReviewAction::Reject && !has_reason {
        return Err(AppError::Validation(
            "A rejection reason is required when rejecting a competition".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateCompetitionStatusRequest {
    pub status: CompetitionStatus,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CompetitionListQuery {
    pub status: Option<CompetitionStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompetitionResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub status: CompetitionStatus,
    pub competition_type: Option<String>,
    pub rivalry_type: Option<String>,
    pub level: Option<String>,
    pub logo_url: Option<String>,
    pub reference_url: Option<String>,
    pub submitted_by: Option<i32>,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<competition::Model> for CompetitionResponse {
    fn from(m: competition::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            event_date: m.event_date,
            location: m.location,
            status: m.status,
            competition_type: m.competition_type,
            rivalry_type: m.rivalry_type,
            level: m.level,
            logo_url: m.logo_url,
            reference_url: m.reference_url,
            submitted_by: m.submitted_by,
            rejection_reason: m.rejection_reason,
            reviewed_at: m.reviewed_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompetitionListResponse {
    pub data: Vec<CompetitionResponse>,
    pub pagination: Pagination,
}
