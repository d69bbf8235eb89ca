use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::effects::EffectDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub effects: EffectDispatcher,
}
