use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An achievement badge awarded to a user. Each badge is awarded at most once.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_badge")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "user_badge_key")]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(unique_key = "user_badge_key")]
    pub badge: String,

    pub awarded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
