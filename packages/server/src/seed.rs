use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{credential, notification, role, role_permission};

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in role::SEEDED_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) => roles_inserted += n as u32,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in role::SEEDED_GRANTS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) => perms_inserted += n as u32,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// Schema sync doesn't create composite non-unique indexes, so they are
/// created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Profile listing:
    // SELECT ... FROM credential WHERE user_id = ? ORDER BY display_order
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_credential_user_order")
        .table(credential::Entity)
        .col(credential::Column::UserId)
        .col(credential::Column::DisplayOrder)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_credential_user_order", &stmt).await;

    // Review queue: WHERE status = ? ORDER BY submitted_at
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_credential_status_submitted")
        .table(credential::Entity)
        .col(credential::Column::Status)
        .col(credential::Column::SubmittedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_credential_status_submitted", &stmt).await;

    // Inbox: WHERE user_id = ? AND is_read = false
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_notification_user_read")
        .table(notification::Entity)
        .col(notification::Column::UserId)
        .col(notification::Column::IsRead)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_notification_user_read", &stmt).await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: &str) {
    match db.execute_unprepared(stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}
