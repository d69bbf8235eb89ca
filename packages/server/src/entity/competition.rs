use common::CompetitionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "competition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,
    pub event_date: DateTimeUtc,
    pub location: Option<String>,

    #[sea_orm(indexed)]
    pub status: CompetitionStatus,

    /// e.g. COSPLAY_PERFORMANCE, CRAFTSMANSHIP
    pub competition_type: Option<String>,
    /// e.g. SOLO, GROUP
    pub rivalry_type: Option<String>,
    /// e.g. LOCAL, NATIONAL, INTERNATIONAL
    pub level: Option<String>,
    pub logo_url: Option<String>,
    pub reference_url: Option<String>,

    /// Organizer who submitted the competition. NULL for imported rows.
    pub submitted_by: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTimeUtc>,

    #[sea_orm(has_many)]
    pub credentials: HasMany<super::credential::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
