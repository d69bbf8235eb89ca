use chrono::Utc;
use common::{CompetitionStatus, NotificationKind, ReviewAction};
use sea_orm::sea_query::{Condition, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;

use super::{Actor, permissions};
use crate::effects::{Effect, EffectDispatcher};
use crate::entity::competition;
use crate::error::AppError;
use crate::models::competition::{
    CompetitionListQuery, CompetitionListResponse, CompetitionResponse, CreateCompetitionRequest,
    ReviewCompetitionRequest, validate_review_competition,
};
use crate::models::shared::{PageQuery, Pagination, clean_optional, page_offset};
use crate::state::AppState;

/// Statuses any authenticated user may browse.
const PUBLIC_STATUSES: [CompetitionStatus; 3] = [
    CompetitionStatus::Accepted,
    CompetitionStatus::Ongoing,
    CompetitionStatus::Completed,
];

/// The competition registry that credentials are claimed against.
pub struct CompetitionService<'a> {
    db: &'a DatabaseConnection,
    effects: &'a EffectDispatcher,
}

impl<'a> CompetitionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            db: &state.db,
            effects: &state.effects,
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        req: CreateCompetitionRequest,
    ) -> Result<CompetitionResponse, AppError> {
        actor.require_permission(permissions::COMPETITION_SUBMIT)?;
        let req = req.normalize();
        req.validate()?;

        let now = Utc::now();
        let model = competition::ActiveModel {
            status: Set(req.initial_status()),
            name: Set(req.name),
            description: Set(req.description),
            event_date: Set(req.event_date),
            location: Set(req.location),
            competition_type: Set(req.competition_type),
            rivalry_type: Set(req.rivalry_type),
            level: Set(req.level),
            logo_url: Set(req.logo_url),
            reference_url: Set(req.reference_url),
            submitted_by: Set(Some(actor.id)),
            rejection_reason: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(self.db).await?;

        info!(
            competition_id = created.id,
            submitted_by = actor.id,
            status = %created.status,
            "Competition created"
        );
        Ok(created.into())
    }

    /// Move the actor's draft into the review queue.
    pub async fn submit(&self, actor: &Actor, id: i32) -> Result<CompetitionResponse, AppError> {
        let txn = self.db.begin().await?;
        let row = find_for_update(&txn, id).await?;

        let is_owner = row.submitted_by == Some(actor.id);
        if !is_owner && !actor.has_permission(permissions::COMPETITION_MANAGE) {
            return Err(AppError::PermissionDenied);
        }
        if row.status != CompetitionStatus::Draft {
            return Err(AppError::InvalidState(format!(
                "Only draft competitions can be submitted (current status: {})",
                row.status
            )));
        }

        let mut active: competition::ActiveModel = row.into();
        active.status = Set(CompetitionStatus::Submitted);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(competition_id = id, "Competition submitted for review");
        Ok(updated.into())
    }

    /// Browse competitions. Reviewers see every status; other users see
    /// public competitions plus their own.
    pub async fn list(
        &self,
        actor: &Actor,
        query: CompetitionListQuery,
    ) -> Result<CompetitionListResponse, AppError> {
        let (page, per_page) = PageQuery {
            page: query.page,
            per_page: query.per_page,
        }
        .resolve();

        let mut select = competition::Entity::find();
        if !actor.has_permission(permissions::COMPETITION_REVIEW) {
            select = select.filter(
                Condition::any()
                    .add(competition::Column::Status.is_in(PUBLIC_STATUSES))
                    .add(competition::Column::SubmittedBy.eq(actor.id)),
            );
        }
        if let Some(status) = query.status {
            select = select.filter(competition::Column::Status.eq(status));
        }

        let total = select.clone().paginate(self.db, per_page).num_items().await?;
        let total_pages = total.div_ceil(per_page);

        let data = select
            .order_by_desc(competition::Column::EventDate)
            .order_by_desc(competition::Column::Id)
            .offset(Some(page_offset(page, per_page)))
            .limit(Some(per_page))
            .all(self.db)
            .await?
            .into_iter()
            .map(CompetitionResponse::from)
            .collect();

        Ok(CompetitionListResponse {
            data,
            pagination: Pagination {
                page,
                per_page,
                total,
                total_pages,
            },
        })
    }

    /// Returns 404 rather than 403 for competitions the actor may not see.
    pub async fn get(&self, actor: &Actor, id: i32) -> Result<CompetitionResponse, AppError> {
        let row = competition::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .filter(|c| {
                PUBLIC_STATUSES.contains(&c.status)
                    || c.submitted_by == Some(actor.id)
                    || actor.has_permission(permissions::COMPETITION_REVIEW)
            })
            .ok_or_else(competition_not_found)?;
        Ok(row.into())
    }

    /// Accept or reject a submitted competition.
    pub async fn review(
        &self,
        actor: &Actor,
        id: i32,
        req: ReviewCompetitionRequest,
    ) -> Result<CompetitionResponse, AppError> {
        actor.require_permission(permissions::COMPETITION_REVIEW)?;
        validate_review_competition(&req)?;

        let txn = self.db.begin().await?;
        let row = find_for_update(&txn, id).await?;
        if row.status != CompetitionStatus::Submitted {
            return Err(AppError::InvalidState(format!(
                "Only submitted competitions can be reviewed (current status: {})",
                row.status
            )));
        }

        let (next, reason) = match req.action {
            ReviewAction::Approve => (CompetitionStatus::Accepted, None),
            ReviewAction::Reject => (
                CompetitionStatus::Rejected,
                clean_optional(req.rejection_reason),
            ),
        };

        let now = Utc::now();
        let mut active: competition::ActiveModel = row.into();
        active.status = Set(next);
        active.rejection_reason = Set(reason.clone());
        active.reviewed_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(competition_id = id, reviewer_id = actor.id, status = %next, "Competition reviewed");

        if let Some(submitter) = updated.submitted_by {
            let (title, message) = match req.action {
                ReviewAction::Approve => (
                    "Competition approved",
                    format!("{} has been approved", updated.name),
                ),
                ReviewAction::Reject => (
                    "Competition rejected",
                    format!(
                        "{} was rejected: {}",
                        updated.name,
                        reason.as_deref().unwrap_or_default()
                    ),
                ),
            };
            self.effects
                .dispatch(vec![Effect::Notify {
                    user_id: submitter,
                    kind: NotificationKind::for_competition_review(req.action),
                    title: title.into(),
                    message,
                    related_id: Some(updated.id),
                }])
                .await;
        }

        Ok(updated.into())
    }

    /// Advance a competition along its lifecycle.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: i32,
        next: CompetitionStatus,
    ) -> Result<CompetitionResponse, AppError> {
        actor.require_permission(permissions::COMPETITION_MANAGE)?;

        let txn = self.db.begin().await?;
        let row = find_for_update(&txn, id).await?;
        if !row.status.can_transition_to(next) {
            return Err(AppError::InvalidState(format!(
                "Cannot move competition from {} to {}",
                row.status, next
            )));
        }

        let previous = row.status;
        let mut active: competition::ActiveModel = row.into();
        active.status = Set(next);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(competition_id = id, from = %previous, to = %next, "Competition status changed");
        Ok(updated.into())
    }
}

fn competition_not_found() -> AppError {
    AppError::NotFound("Competition not found".into())
}

async fn find_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<competition::Model, AppError> {
    competition::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(competition_not_found)
}
