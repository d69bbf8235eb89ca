use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::{CompetitionStatus, CredentialStatus, ReviewAction};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shared::{Pagination, clean_optional, not_blank, validate_reason, validate_reorder_ids};
use crate::entity::{competition, credential, user};
use crate::error::AppError;

pub const MAX_REJECTION_REASON: usize = 1000;

/// Request body for claiming participation in a competition.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct SubmitCredentialRequest {
    /// Title of the cosplay entry (1-200 characters).
    #[schema(example = "Spider-Gwen")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    pub cosplay_title: String,
    #[schema(example = "Gwen Stacy")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub character_name: Option<String>,
    #[schema(example = "Spider-Verse")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub series_name: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    /// Public URL of the entry photo.
    #[validate(
        url(message = "must be a valid URL"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    pub image_url: Option<String>,
    #[validate(
        url(message = "must be a valid URL"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    pub video_url: Option<String>,
    /// Placement, e.g. CHAMPION, FIRST_PLACE, PARTICIPANT.
    #[schema(example = "CHAMPION")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub position: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub category: Option<String>,
    pub is_team: Option<bool>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub team_members: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub contact_phone: Option<String>,
}

impl SubmitCredentialRequest {
    /// Trim text fields. Blank optional fields become absent.
    pub fn normalize(mut self) -> Self {
        self.cosplay_title = self.cosplay_title.trim().to_string();
        self.character_name = clean_optional(self.character_name);
        self.series_name = clean_optional(self.series_name);
        self.description = clean_optional(self.description);
        self.image_url = clean_optional(self.image_url);
        self.video_url = clean_optional(self.video_url);
        self.position = clean_optional(self.position);
        self.category = clean_optional(self.category);
        self.team_members = clean_optional(self.team_members);
        self.contact_email = clean_optional(self.contact_email);
        self.contact_phone = clean_optional(self.contact_phone);
        self
    }
}

/// One entry of a reorder request.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::ToSchema)]
pub struct ReorderEntry {
    pub id: i32,
    /// Desired position; only the relative order of values matters.
    pub order: i32,
}

/// Request body for reordering the caller's credentials.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReorderCredentialsRequest {
    #[schema(example = json!([{"id": 3, "order": 0}, {"id": 1, "order": 1}, {"id": 2, "order": 2}]))]
    pub credentials: Vec<ReorderEntry>,
}

impl ReorderCredentialsRequest {
    /// Credential ids in their final display sequence.
    ///
    /// Entries are stably sorted by the requested `order`; each id's stored
    /// order becomes its index in the returned list.
    pub fn sequence(&self) -> Vec<i32> {
        let mut entries = self.credentials.clone();
        entries.sort_by_key(|e| e.order);
        entries.into_iter().map(|e| e.id).collect()
    }
}

pub fn validate_reorder_credentials(req: &ReorderCredentialsRequest) -> Result<(), AppError> {
    let ids: Vec<i32> = req.credentials.iter().map(|e| e.id).collect();
    validate_reorder_ids(&ids, "credential id")?;
    if req.credentials.iter().any(|e| e.order < 0) {
        return Err(AppError::Validation("Order must be >= 0".into()));
    }
    Ok(())
}

/// Request body for an administrator review decision.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReviewCredentialRequest {
    pub action: ReviewAction,
    /// Optional explanation recorded when rejecting.
    pub rejection_reason: Option<String>,
}

pub fn validate_review_credential(req: &ReviewCredentialRequest) -> Result<(), AppError> {
    validate_reason(req.rejection_reason.as_deref(), MAX_REJECTION_REASON)
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReviewQueueQuery {
    /// Status to list. Defaults to PENDING.
    pub status: Option<CredentialStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompetitionSummary {
    pub id: i32,
    pub name: String,
    pub event_date: DateTime<Utc>,
    pub status: CompetitionStatus,
    pub logo_url: Option<String>,
}

impl From<&competition::Model> for CompetitionSummary {
    fn from(m: &competition::Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            event_date: m.event_date,
            status: m.status,
            logo_url: m.logo_url.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CredentialResponse {
    pub id: i32,
    pub user_id: i32,
    pub competition_id: i32,
    pub cosplay_title: String,
    pub character_name: Option<String>,
    pub series_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Image to show for this credential: its own photo, else the
    /// competition logo, else a placeholder.
    pub display_image: String,
    pub video_url: Option<String>,
    pub position: Option<String>,
    pub category: Option<String>,
    pub is_team: bool,
    pub team_members: Option<String>,
    /// Only included for the owner and reviewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Only included for the owner and reviewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    pub status: CredentialStatus,
    pub order: i32,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub user: Option<UserSummary>,
    pub competition: Option<CompetitionSummary>,
}

/// Choose the image to display for a credential.
pub fn resolve_display_image(
    credential_image: Option<&str>,
    competition_logo: Option<&str>,
    placeholder: &str,
) -> String {
    credential_image
        .filter(|url| !url.is_empty())
        .or(competition_logo.filter(|url| !url.is_empty()))
        .unwrap_or(placeholder)
        .to_string()
}

impl CredentialResponse {
    /// Shape a credential row for callers.
    pub fn build(
        m: credential::Model,
        owner: Option<user::Model>,
        competition: Option<&competition::Model>,
        placeholder: &str,
        include_contact: bool,
    ) -> Self {
        let display_image = resolve_display_image(
            m.image_url.as_deref(),
            competition.and_then(|c| c.logo_url.as_deref()),
            placeholder,
        );
        let (contact_email, contact_phone) = if include_contact {
            (m.contact_email, m.contact_phone)
        } else {
            (None, None)
        };

        Self {
            id: m.id,
            user_id: m.user_id,
            competition_id: m.competition_id,
            cosplay_title: m.cosplay_title,
            character_name: m.character_name,
            series_name: m.series_name,
            description: m.description,
            image_url: m.image_url,
            display_image,
            video_url: m.video_url,
            position: m.position,
            category: m.category,
            is_team: m.is_team,
            team_members: m.team_members,
            contact_email,
            contact_phone,
            status: m.status,
            order: m.display_order,
            submitted_at: m.submitted_at,
            reviewed_at: m.reviewed_at,
            rejection_reason: m.rejection_reason,
            user: owner.map(UserSummary::from),
            competition: competition.map(CompetitionSummary::from),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CredentialListResponse {
    pub credentials: Vec<CredentialResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CredentialEnvelope {
    pub credential: CredentialResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReviewQueueResponse {
    pub data: Vec<CredentialResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteCredentialResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Credential deleted")]
    pub message: String,
}

/// Collect the distinct ids from an iterator, preserving first-seen order.
pub fn distinct_ids(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
