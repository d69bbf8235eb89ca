use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entity::user;
use crate::error::AppError;

/// Usernames double as public profile handles.
fn profile_handle(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 || len > 32 {
        return Err(ValidationError::new("length")
            .with_message(Cow::from("must be 1-32 characters")));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("charset")
            .with_message(Cow::from("may contain only letters, digits and underscores")));
    }
    Ok(())
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "yuki_cos")]
    #[validate(custom(function = "profile_handle"))]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: String,
}

impl RegisterRequest {
    pub fn normalize(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "yuki_cos")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }
    Ok(())
}

/// The account a registration created.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "yuki_cos")]
    pub username: String,
    #[schema(example = "cosplayer")]
    pub role: String,
}

impl From<user::Model> for RegisterResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Bearer token plus the identity it encodes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    #[schema(example = 42)]
    pub id: i32,
    /// Valid for `auth.token_ttl_days`.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "yuki_cos")]
    pub username: String,
    #[schema(example = "cosplayer")]
    pub role: String,
    #[schema(example = json!(["credential:submit"]))]
    pub permissions: Vec<String>,
}

/// Identity carried by the caller's token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}
