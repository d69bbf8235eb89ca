use std::collections::HashMap;

use chrono::Utc;
use common::{CredentialStatus, NotificationKind, ReviewAction};
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{info, warn};
use validator::Validate;

use super::{Actor, permissions};
use crate::config::AppConfig;
use crate::effects::{Effect, EffectDispatcher};
use crate::entity::{competition, credential, user};
use crate::error::AppError;
use crate::models::credential::{
    CredentialEnvelope, CredentialListResponse, CredentialResponse, DeleteCredentialResponse,
    ReorderCredentialsRequest, ReviewCredentialRequest, ReviewQueueQuery, ReviewQueueResponse,
    SubmitCredentialRequest, distinct_ids, validate_reorder_credentials,
    validate_review_credential,
};
use crate::models::shared::{PageQuery, Pagination, clean_optional, page_offset};
use crate::state::AppState;

/// Credential lifecycle: submission, listing, review, ordering and deletion.
///
/// Side effects are dispatched only after the primary write has committed.
pub struct CredentialService<'a> {
    db: &'a DatabaseConnection,
    config: &'a AppConfig,
    effects: &'a EffectDispatcher,
}

impl<'a> CredentialService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            db: &state.db,
            config: &state.config,
            effects: &state.effects,
        }
    }

    /// Claim participation in a competition.
    pub async fn submit(
        &self,
        actor: &Actor,
        competition_id: i32,
        req: SubmitCredentialRequest,
    ) -> Result<CredentialResponse, AppError> {
        actor.require_permission(permissions::CREDENTIAL_SUBMIT)?;
        let req = req.normalize();
        req.validate()?;

        let competition = find_competition(self.db, competition_id).await?;
        if !competition.status.accepts_participants() {
            return Err(AppError::InvalidState(
                "Competition is not accepting participants".into(),
            ));
        }

        let existing = credential::Entity::find()
            .filter(credential::Column::UserId.eq(actor.id))
            .filter(credential::Column::CompetitionId.eq(competition_id))
            .one(self.db)
            .await?;
        if existing.is_some() {
            return Err(already_submitted());
        }

        let owner = find_user(self.db, actor.id).await?;

        let txn = self.db.begin().await?;
        let display_order = next_display_order(&txn, actor.id).await?;

        let model = credential::ActiveModel {
            user_id: Set(actor.id),
            competition_id: Set(competition_id),
            cosplay_title: Set(req.cosplay_title),
            character_name: Set(req.character_name),
            series_name: Set(req.series_name),
            description: Set(req.description),
            image_url: Set(req.image_url),
            video_url: Set(req.video_url),
            position: Set(req.position),
            category: Set(req.category),
            is_team: Set(req.is_team.unwrap_or(false)),
            team_members: Set(req.team_members),
            contact_email: Set(req.contact_email),
            contact_phone: Set(req.contact_phone),
            status: Set(CredentialStatus::Pending),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            rejection_reason: Set(None),
            display_order: Set(display_order),
            submitted_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Credential race: unique constraint caught on insert");
                already_submitted()
            }
            _ => AppError::from(e),
        })?;
        txn.commit().await?;

        info!(
            credential_id = created.id,
            user_id = actor.id,
            competition_id,
            "Credential submitted"
        );

        let mut effects = vec![Effect::EvaluateBadges { user_id: actor.id }];
        if let Some(organizer_id) = competition.submitted_by {
            effects.push(Effect::Notify {
                user_id: organizer_id,
                kind: NotificationKind::CredentialSubmitted,
                title: "New credential submitted".into(),
                message: format!(
                    "{} submitted a credential for {}",
                    owner.username, competition.name
                ),
                related_id: Some(competition.id),
            });
        }
        self.effects.dispatch(effects).await;

        Ok(self.respond(created, Some(owner), Some(&competition), true))
    }

    /// A user's credentials in display order.
    pub async fn list(
        &self,
        actor: &Actor,
        user_id: i32,
    ) -> Result<CredentialListResponse, AppError> {
        let owner = find_user(self.db, user_id).await?;
        let sees_all = actor.sees_all_credentials_of(user_id);

        let mut select = credential::Entity::find().filter(credential::Column::UserId.eq(user_id));
        if !sees_all {
            select = select.filter(credential::Column::Status.eq(CredentialStatus::Approved));
        }

        let rows = select
            .order_by_asc(credential::Column::DisplayOrder)
            .order_by_desc(credential::Column::SubmittedAt)
            .order_by_asc(credential::Column::Id)
            .all(self.db)
            .await?;

        let competitions =
            load_competitions(self.db, rows.iter().map(|c| c.competition_id)).await?;

        let credentials = rows
            .into_iter()
            .map(|c| {
                let comp = competitions.get(&c.competition_id);
                self.respond(c, Some(owner.clone()), comp, sees_all)
            })
            .collect();

        Ok(CredentialListResponse { credentials })
    }

    /// The credential a user holds for one competition.
    pub async fn get(
        &self,
        actor: &Actor,
        user_id: i32,
        competition_id: i32,
    ) -> Result<CredentialEnvelope, AppError> {
        let sees_all = actor.sees_all_credentials_of(user_id);

        let row = credential::Entity::find()
            .filter(credential::Column::UserId.eq(user_id))
            .filter(credential::Column::CompetitionId.eq(competition_id))
            .one(self.db)
            .await?
            .filter(|c| sees_all || c.status == CredentialStatus::Approved)
            .ok_or_else(credential_not_found)?;

        let owner = user::Entity::find_by_id(user_id).one(self.db).await?;
        let competition = competition::Entity::find_by_id(competition_id)
            .one(self.db)
            .await?;

        Ok(CredentialEnvelope {
            credential: self.respond(row, owner, competition.as_ref(), sees_all),
        })
    }

    /// Credentials awaiting (or past) review, oldest first.
    pub async fn list_for_review(
        &self,
        actor: &Actor,
        query: ReviewQueueQuery,
    ) -> Result<ReviewQueueResponse, AppError> {
        actor.require_permission(permissions::CREDENTIAL_REVIEW)?;

        let status = query.status.unwrap_or(CredentialStatus::Pending);
        let (page, per_page) = PageQuery {
            page: query.page,
            per_page: query.per_page,
        }
        .resolve();

        let select = credential::Entity::find().filter(credential::Column::Status.eq(status));
        let total = select.clone().paginate(self.db, per_page).num_items().await?;
        let total_pages = total.div_ceil(per_page);

        let rows = select
            .order_by_asc(credential::Column::SubmittedAt)
            .order_by_asc(credential::Column::Id)
            .offset(Some(page_offset(page, per_page)))
            .limit(Some(per_page))
            .all(self.db)
            .await?;

        let competitions =
            load_competitions(self.db, rows.iter().map(|c| c.competition_id)).await?;
        let users = load_users(self.db, rows.iter().map(|c| c.user_id)).await?;

        let data = rows
            .into_iter()
            .map(|c| {
                let owner = users.get(&c.user_id).cloned();
                let comp = competitions.get(&c.competition_id);
                self.respond(c, owner, comp, true)
            })
            .collect();

        Ok(ReviewQueueResponse {
            data,
            pagination: Pagination {
                page,
                per_page,
                total,
                total_pages,
            },
        })
    }

    /// Approve or reject a pending credential.
    pub async fn review(
        &self,
        actor: &Actor,
        credential_id: i32,
        req: ReviewCredentialRequest,
    ) -> Result<CredentialResponse, AppError> {
        actor.require_permission(permissions::CREDENTIAL_REVIEW)?;
        validate_review_credential(&req)?;

        let txn = self.db.begin().await?;
        let row = credential::Entity::find_by_id(credential_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(credential_not_found)?;

        let next = row.status.apply(req.action).ok_or_else(|| {
            AppError::InvalidState(format!(
                "Credential has already been reviewed ({})",
                row.status
            ))
        })?;

        let reason = match req.action {
            ReviewAction::Reject => clean_optional(req.rejection_reason),
            ReviewAction::Approve => None,
        };

        let mut active: credential::ActiveModel = row.into();
        active.status = Set(next);
        active.reviewed_at = Set(Some(Utc::now()));
        active.reviewed_by = Set(Some(actor.id));
        active.rejection_reason = Set(reason.clone());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(
            credential_id,
            reviewer_id = actor.id,
            status = %next,
            "Credential reviewed"
        );

        let competition = competition::Entity::find_by_id(updated.competition_id)
            .one(self.db)
            .await?;
        let owner = user::Entity::find_by_id(updated.user_id).one(self.db).await?;

        let competition_name = competition
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("a competition");
        self.effects
            .dispatch(vec![Effect::Notify {
                user_id: updated.user_id,
                kind: NotificationKind::for_credential_review(req.action),
                title: review_title(req.action).into(),
                message: review_message(req.action, competition_name, reason.as_deref()),
                related_id: Some(updated.competition_id),
            }])
            .await;

        Ok(self.respond(updated, owner, competition.as_ref(), true))
    }

    /// Rewrite the display order of the actor's credentials in one transaction.
    pub async fn reorder(
        &self,
        actor: &Actor,
        req: ReorderCredentialsRequest,
    ) -> Result<CredentialListResponse, AppError> {
        validate_reorder_credentials(&req)?;
        let sequence = req.sequence();

        let txn = self.db.begin().await?;
        let rows = credential::Entity::find()
            .filter(credential::Column::Id.is_in(sequence.clone()))
            .lock(LockType::Update)
            .all(&txn)
            .await?;
        let owners: HashMap<i32, i32> = rows.iter().map(|c| (c.id, c.user_id)).collect();

        if let Some(missing) = sequence.iter().find(|id| !owners.contains_key(id)) {
            return Err(AppError::NotFound(format!("Credential {missing} not found")));
        }
        if owners.values().any(|&owner| owner != actor.id) {
            return Err(AppError::PermissionDenied);
        }

        for (i, &id) in sequence.iter().enumerate() {
            credential::Entity::update_many()
                .filter(credential::Column::Id.eq(id))
                .col_expr(
                    credential::Column::DisplayOrder,
                    Expr::value(i32::try_from(i).map_err(|_| {
                        AppError::Validation("Too many credentials to reorder".into())
                    })?),
                )
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        info!(user_id = actor.id, count = sequence.len(), "Credentials reordered");

        self.list(actor, actor.id).await
    }

    /// Delete one of the actor's credentials, in any review state.
    pub async fn delete(
        &self,
        actor: &Actor,
        credential_id: i32,
    ) -> Result<DeleteCredentialResponse, AppError> {
        let row = credential::Entity::find_by_id(credential_id)
            .one(self.db)
            .await?
            .ok_or_else(credential_not_found)?;
        if row.user_id != actor.id {
            return Err(AppError::PermissionDenied);
        }

        let result = credential::Entity::delete_by_id(row.id)
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(credential_not_found());
        }

        info!(credential_id, user_id = actor.id, "Credential deleted");

        let mut effects = Vec::new();
        if let Some(url) = row.image_url.clone() {
            effects.push(Effect::DeleteAsset { url });
        }
        if self.config.notifications.notify_on_delete {
            let lookup = competition::Entity::find_by_id(row.competition_id)
                .one(self.db)
                .await;
            let competition_name = receipt_competition_name(lookup, row.competition_id);
            effects.push(Effect::Notify {
                user_id: actor.id,
                kind: NotificationKind::CredentialDeleted,
                title: "Credential deleted".into(),
                message: format!(
                    "Your credential \"{}\" for {} was deleted",
                    row.cosplay_title, competition_name
                ),
                related_id: Some(row.competition_id),
            });
        }
        self.effects.dispatch(effects).await;

        Ok(DeleteCredentialResponse {
            success: true,
            message: "Credential deleted".into(),
        })
    }

    fn respond(
        &self,
        row: credential::Model,
        owner: Option<user::Model>,
        competition: Option<&competition::Model>,
        include_contact: bool,
    ) -> CredentialResponse {
        CredentialResponse::build(
            row,
            owner,
            competition,
            &self.config.storage.placeholder_image_url,
            include_contact,
        )
    }
}

fn already_submitted() -> AppError {
    AppError::Conflict("Credential already submitted for this competition".into())
}

fn credential_not_found() -> AppError {
    AppError::NotFound("Credential not found".into())
}

fn review_title(action: ReviewAction) -> &'static str {
    match action {
        ReviewAction::Approve => "Credential approved",
        ReviewAction::Reject => "Credential rejected",
    }
}

/// Competition name for a deletion receipt. Lookup failures only degrade the wording.
fn receipt_competition_name(
    lookup: Result<Option<competition::Model>, DbErr>,
    competition_id: i32,
) -> String {
    match lookup {
        Ok(Some(c)) => c.name,
        Ok(None) => "a competition".into(),
        Err(e) => {
            warn!(competition_id, error = %e, "Competition lookup for deletion receipt failed");
            "a competition".into()
        }
    }
}

fn review_message(action: ReviewAction, competition_name: &str, reason: Option<&str>) -> String {
    match (action, reason) {
        (ReviewAction::Approve, _) => {
            format!("Your credential for {competition_name} has been approved")
        }
        (ReviewAction::Reject, Some(reason)) => {
            format!("Your credential for {competition_name} was rejected: {reason}")
        }
        (ReviewAction::Reject, None) => {
            format!("Your credential for {competition_name} was rejected")
        }
    }
}

async fn find_competition<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<competition::Model, AppError> {
    competition::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Competition not found".into()))
}

async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

async fn load_competitions<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, competition::Model>, AppError> {
    let ids = distinct_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = competition::Entity::find()
        .filter(competition::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|c| (c.id, c)).collect())
}

async fn load_users<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, user::Model>, AppError> {
    let ids = distinct_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

/// One past the user's highest display order, or 0 for a first credential.
async fn next_display_order<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<i32, AppError> {
    let max_order: Option<i32> = credential::Entity::find()
        .filter(credential::Column::UserId.eq(user_id))
        .select_only()
        .column_as(credential::Column::DisplayOrder.max(), "max_order")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_order
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Display order overflow".into()))
}
