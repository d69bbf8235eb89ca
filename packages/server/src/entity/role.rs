use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::permissions::*;

/// The role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "cosplayer";

pub const ADMIN: &str = "admin";
pub const ORGANIZER: &str = "organizer";

/// Roles present in every deployment.
pub const SEEDED_ROLES: &[&str] = &[ADMIN, ORGANIZER, DEFAULT_ROLE];

/// Baseline `(role, permission)` grants. Operators may add more rows.
pub const SEEDED_GRANTS: &[(&str, &str)] = &[
    (ADMIN, CREDENTIAL_SUBMIT),
    (ADMIN, CREDENTIAL_REVIEW),
    (ADMIN, COMPETITION_SUBMIT),
    (ADMIN, COMPETITION_REVIEW),
    (ADMIN, COMPETITION_MANAGE),
    (ORGANIZER, CREDENTIAL_SUBMIT),
    (ORGANIZER, COMPETITION_SUBMIT),
    (DEFAULT_ROLE, CREDENTIAL_SUBMIT),
];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    #[sea_orm(has_many)]
    pub users: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub permissions: HasMany<super::role_permission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
