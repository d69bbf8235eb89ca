use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::entity::{credential, user_badge};

/// Awards achievement badges after a user's credentials change.
#[async_trait]
pub trait BadgeEvaluator: Send + Sync {
    /// Award whatever badges `user_id` now qualifies for.
    /// Returns the badges newly awarded by this call.
    async fn evaluate(&self, db: &DatabaseConnection, user_id: i32) -> Result<Vec<String>, DbErr>;
}

/// Badges earned by number of submitted credentials.
pub const CREDENTIAL_COUNT_BADGES: &[(u64, &str)] = &[
    (1, "first_credential"),
    (5, "seasoned_cosplayer"),
    (10, "legendary_cosplayer"),
];

/// Badge names a user with `count` credentials qualifies for.
pub fn badges_for_count(count: u64) -> Vec<&'static str> {
    CREDENTIAL_COUNT_BADGES
        .iter()
        .filter(|(threshold, _)| count >= *threshold)
        .map(|(_, badge)| *badge)
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialCountBadges;

#[async_trait]
impl BadgeEvaluator for CredentialCountBadges {
    async fn evaluate(&self, db: &DatabaseConnection, user_id: i32) -> Result<Vec<String>, DbErr> {
        let count = credential::Entity::find()
            .filter(credential::Column::UserId.eq(user_id))
            .count(db)
            .await?;

        let mut awarded = Vec::new();
        for badge in badges_for_count(count) {
            let model = user_badge::ActiveModel {
                user_id: Set(user_id),
                badge: Set(badge.to_string()),
                awarded_at: Set(Utc::now()),
                ..Default::default()
            };

            let result = user_badge::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([user_badge::Column::UserId, user_badge::Column::Badge])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await;

            match result {
                Ok(0) | Err(DbErr::RecordNotInserted) => {}
                Ok(_) => awarded.push(badge.to_string()),
                Err(e) => return Err(e),
            }
        }

        Ok(awarded)
    }
}
