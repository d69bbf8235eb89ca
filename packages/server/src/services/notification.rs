use chrono::Utc;
use common::NotificationKind;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::Actor;
use crate::entity::notification;
use crate::error::AppError;
use crate::models::notification::{
    NOTIFICATION_LIST_LIMIT, NotificationListResponse, NotificationResponse,
};

/// Fields of a notification about to be inserted.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_id: Option<i32>,
}

pub struct NotificationService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert one unread notification.
    pub async fn create(&self, new: NewNotification) -> Result<notification::Model, DbErr> {
        let model = notification::ActiveModel {
            user_id: Set(new.user_id),
            kind: Set(new.kind),
            title: Set(new.title),
            message: Set(new.message),
            related_id: Set(new.related_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model.insert(self.conn).await
    }

    /// The actor's notifications, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        unread_only: bool,
    ) -> Result<NotificationListResponse, AppError> {
        let mut select =
            notification::Entity::find().filter(notification::Column::UserId.eq(actor.id));
        if unread_only {
            select = select.filter(notification::Column::IsRead.eq(false));
        }

        let rows = select
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .limit(NOTIFICATION_LIST_LIMIT)
            .all(self.conn)
            .await?;

        let unread_count = notification::Entity::find()
            .filter(notification::Column::UserId.eq(actor.id))
            .filter(notification::Column::IsRead.eq(false))
            .count(self.conn)
            .await?;

        Ok(NotificationListResponse {
            notifications: rows.into_iter().map(NotificationResponse::from).collect(),
            unread_count,
        })
    }

    /// Mark one of the actor's notifications read. Other users'
    /// notifications are reported as missing.
    pub async fn mark_read(
        &self,
        actor: &Actor,
        id: i32,
    ) -> Result<NotificationResponse, AppError> {
        let row = notification::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .filter(|n| n.user_id == actor.id)
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))?;

        if row.is_read {
            return Ok(row.into());
        }

        let mut active: notification::ActiveModel = row.into();
        active.is_read = Set(true);
        let updated = active.update(self.conn).await?;
        Ok(updated.into())
    }

    /// Mark every unread notification of the actor read. Returns how many changed.
    pub async fn mark_all_read(&self, actor: &Actor) -> Result<u64, AppError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(actor.id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
