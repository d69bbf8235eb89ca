use common::CredentialStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's claimed participation in one competition.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credential")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "credential_user_competition")]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(unique_key = "credential_user_competition")]
    pub competition_id: i32,
    #[sea_orm(belongs_to, from = "competition_id", to = "id")]
    pub competition: HasOne<super::competition::Entity>,

    pub cosplay_title: String,
    pub character_name: Option<String>,
    pub series_name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Free-form placement, e.g. CHAMPION, FIRST_PLACE, PARTICIPANT.
    pub position: Option<String>,
    pub category: Option<String>,
    pub is_team: bool,
    #[sea_orm(column_type = "Text")]
    pub team_members: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,

    pub status: CredentialStatus,
    pub reviewed_at: Option<DateTimeUtc>,
    pub reviewed_by: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub rejection_reason: Option<String>,

    /// Display position on the owner's profile. Not unique.
    pub display_order: i32,

    pub submitted_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
