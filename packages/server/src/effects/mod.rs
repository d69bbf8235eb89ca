pub mod badges;

use std::sync::Arc;

use common::NotificationKind;
use common::event::Event;
use common::storage::AssetStore;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use badges::{BadgeEvaluator, CredentialCountBadges};

use crate::services::notification::{NewNotification, NotificationService};

/// Follow-up work emitted by a service after its transaction commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Insert one notification row for `user_id`.
    Notify {
        user_id: i32,
        kind: NotificationKind,
        title: String,
        message: String,
        related_id: Option<i32>,
    },
    /// Re-evaluate achievement badges for `user_id`.
    EvaluateBadges { user_id: i32 },
    /// Remove a stored photo by its public URL.
    DeleteAsset { url: String },
}

impl Event for Effect {
    fn topic(&self) -> &str {
        match self {
            Effect::Notify { .. } => "notify",
            Effect::EvaluateBadges { .. } => "evaluate_badges",
            Effect::DeleteAsset { .. } => "delete_asset",
        }
    }
}

/// Executes [`Effect`]s inline. Failures are logged and never surfaced to
/// the caller, whose primary change has already been committed.
#[derive(Clone)]
pub struct EffectDispatcher {
    db: DatabaseConnection,
    badges: Arc<dyn BadgeEvaluator>,
    assets: Arc<dyn AssetStore>,
}

impl EffectDispatcher {
    pub fn new(
        db: DatabaseConnection,
        badges: Arc<dyn BadgeEvaluator>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self { db, badges, assets }
    }

    /// Run each effect in order. One failing effect does not stop the rest.
    pub async fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(e) = self.run(&effect).await {
                warn!(topic = effect.topic(), error = %e, "Side effect failed");
            }
        }
    }

    async fn run(&self, effect: &Effect) -> anyhow::Result<()> {
        match effect {
            Effect::Notify {
                user_id,
                kind,
                title,
                message,
                related_id,
            } => {
                NotificationService::new(&self.db)
                    .create(NewNotification {
                        user_id: *user_id,
                        kind: *kind,
                        title: title.clone(),
                        message: message.clone(),
                        related_id: *related_id,
                    })
                    .await?;
            }
            Effect::EvaluateBadges { user_id } => {
                let awarded = self.badges.evaluate(&self.db, *user_id).await?;
                if !awarded.is_empty() {
                    debug!(user_id, ?awarded, "Awarded badges");
                }
            }
            Effect::DeleteAsset { url } => {
                let removed = self.assets.delete_url(url).await?;
                debug!(url = %url, removed, "Asset cleanup");
            }
        }
        Ok(())
    }
}
