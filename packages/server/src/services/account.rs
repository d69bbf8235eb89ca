use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{debug, info};
use validator::Validate;

use crate::config::AuthConfig;
use crate::entity::{role, role_permission, user};
use crate::error::AppError;
use crate::models::auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, validate_login_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Registration and token issuance.
pub struct AccountService<'a> {
    db: &'a DatabaseConnection,
    auth: &'a AuthConfig,
}

impl<'a> AccountService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            db: &state.db,
            auth: &state.config.auth,
        }
    }

    /// New accounts start as cosplayers.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        let req = req.normalize();
        req.validate()?;

        let password = hash::hash_password(&req.password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

        let created = user::ActiveModel {
            username: Set(req.username),
            password: Set(password),
            role: Set(role::DEFAULT_ROLE.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                debug!("Username claimed concurrently");
                AppError::UsernameTaken
            }
            _ => AppError::from(e),
        })?;

        info!(user_id = created.id, "Account registered");
        Ok(created.into())
    }

    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        validate_login_request(&req)?;

        let account = user::Entity::find()
            .filter(user::Column::Username.eq(req.username.trim()))
            .one(self.db)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let matches = hash::verify_password(&req.password, &account.password)
            .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        let permissions = self.permissions_for(&account.role).await?;
        let token = jwt::sign(
            account.id,
            &account.username,
            &account.role,
            permissions.clone(),
            &self.auth.jwt_secret,
            self.auth.token_ttl_days,
        )
        .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

        info!(user_id = account.id, role = %account.role, "Token issued");
        Ok(LoginResponse {
            id: account.id,
            token,
            username: account.username,
            role: account.role,
            permissions,
        })
    }

    async fn permissions_for(&self, role: &str) -> Result<Vec<String>, AppError> {
        Ok(role_permission::Entity::find()
            .filter(role_permission::Column::Role.eq(role))
            .all(self.db)
            .await?
            .into_iter()
            .map(|rp| rp.permission)
            .collect())
    }
}
