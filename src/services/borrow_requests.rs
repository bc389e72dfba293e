//! Borrow request service: submission, reads and workflow transitions

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow_request::{
            BorrowRequest, BorrowRequestDetails, BorrowRequestQuery, CreateBorrowRequest,
        },
        enums::InventoryStatus,
        inventory::InventoryItem,
        profile::{Profile, ProfileClaims, Role},
    },
    repository::Repository,
    services::redis::{Invalidation, RedisService},
    workflow::{self, may_act, stage_for_role, Actor, ApprovalSet, ApprovalSlot, Transition, WorkflowError},
};

#[derive(Clone)]
pub struct BorrowRequestsService {
    repository: Repository,
    redis: RedisService,
}

impl BorrowRequestsService {
    pub fn new(repository: Repository, redis: RedisService) -> Self {
        Self { repository, redis }
    }

    /// Submit a new request; the request row and its item links are written together
    pub async fn submit(&self, claims: &ProfileClaims, data: CreateBorrowRequest) -> AppResult<BorrowRequestDetails> {
        let actor = self.actor(claims).await?;
        let Submission { purpose, item_ids } = prepare_submission(actor, &data)?;

        let lab = self.repository.labs.get_by_id(data.lab_id).await?;

        let mut tx = self.repository.begin().await?;

        let items = self.repository.inventory.lock_many(&mut *tx, &item_ids).await?;
        check_items(lab.id, &item_ids, &items)?;

        let request = BorrowRequest::new_submission(
            actor.id,
            lab.id,
            purpose,
            data.start_time,
            data.end_time,
            Utc::now(),
        );
        self.repository.borrow_requests.insert(&mut *tx, &request).await?;
        self.repository
            .borrow_requests
            .insert_items(&mut *tx, request.id, &item_ids)
            .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = %request.id,
            requester_id = %request.requester_id,
            lab_id = %request.lab_id,
            items = item_ids.len(),
            "Borrow request submitted"
        );
        self.redis
            .invalidate(Invalidation::new("borrow_request", request.id, Some(request.status.to_string())))
            .await;

        self.details(request, actor.role).await
    }

    /// Caller as stored in `profiles`; the token's role may be stale
    async fn actor(&self, claims: &ProfileClaims) -> AppResult<Actor> {
        let profile = match self.repository.profiles.get_by_id(claims.profile_id).await {
            Ok(profile) => profile,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Authentication("Profile no longer exists".to_string()))
            }
            Err(e) => return Err(e),
        };
        let actor = acting_profile(&profile)?;
        if actor.role != claims.role {
            tracing::debug!(profile_id = %actor.id, token_role = %claims.role, role = %actor.role, "Using stored role");
        }
        Ok(actor)
    }

    /// Get one request with its items; students only see their own
    pub async fn get(&self, id: Uuid, claims: &ProfileClaims) -> AppResult<BorrowRequestDetails> {
        let request = self.repository.borrow_requests.get_by_id(id).await?;
        if claims.role == Role::Student && request.requester_id != claims.profile_id {
            return Err(AppError::Authorization("Cannot access another student's request".to_string()));
        }
        self.details(request, claims.role).await
    }

    async fn details(&self, request: BorrowRequest, role: Role) -> AppResult<BorrowRequestDetails> {
        let items = self.repository.borrow_requests.items(request.id).await?;
        let can_act = may_act(role, request.current_stage) && request.status.in_approval_chain();
        Ok(BorrowRequestDetails {
            request,
            items,
            can_act,
        })
    }

    /// List requests; students are restricted to their own
    pub async fn list(&self, claims: &ProfileClaims, mut query: BorrowRequestQuery) -> AppResult<Vec<BorrowRequest>> {
        if claims.role == Role::Student {
            query.requester_id = Some(claims.profile_id);
        }
        self.repository.borrow_requests.list(&query).await
    }

    /// Requests waiting on the caller's signature
    pub async fn actionable(&self, claims: &ProfileClaims) -> AppResult<Vec<BorrowRequest>> {
        let Some(stage) = stage_for_role(claims.role) else {
            return Ok(Vec::new());
        };
        let Some(slot) = ApprovalSlot::for_role(claims.role, stage) else {
            return Ok(Vec::new());
        };

        let requests = self.repository.borrow_requests.list_at_stage(stage.number()).await?;
        Ok(requests
            .into_iter()
            .filter(|request| !ApprovalSet::of(request, stage).has(slot))
            .collect())
    }

    pub async fn approve(&self, id: Uuid, claims: &ProfileClaims, notes: Option<String>) -> AppResult<BorrowRequest> {
        self.apply(id, claims, "approve", move |request, actor, now| {
            workflow::approve(request, actor, notes, now)
        })
        .await
    }

    pub async fn reject(&self, id: Uuid, claims: &ProfileClaims, reason: String) -> AppResult<BorrowRequest> {
        self.apply(id, claims, "reject", move |request, actor, now| {
            workflow::reject(request, actor, &reason, now)
        })
        .await
    }

    pub async fn hand_over(&self, id: Uuid, claims: &ProfileClaims) -> AppResult<BorrowRequest> {
        self.apply(id, claims, "handover", workflow::hand_over).await
    }

    pub async fn mark_returned(&self, id: Uuid, claims: &ProfileClaims) -> AppResult<BorrowRequest> {
        self.apply(id, claims, "return", workflow::mark_returned).await
    }

    /// Lock the request, run one state machine transition and persist it with
    /// its inventory side effect in the same transaction
    async fn apply<F>(&self, id: Uuid, claims: &ProfileClaims, action: &'static str, transition: F) -> AppResult<BorrowRequest>
    where
        F: FnOnce(&mut BorrowRequest, Actor, DateTime<Utc>) -> Result<Transition, WorkflowError>,
    {
        let actor = self.actor(claims).await?;
        let mut tx = self.repository.begin().await?;

        let mut request = self.repository.borrow_requests.lock(&mut *tx, id).await?;
        let applied = transition(&mut request, actor, Utc::now()).map_err(|e| {
            tracing::debug!(request_id = %id, role = %actor.role, action, "Transition refused: {}", e);
            AppError::from(e)
        })?;

        if applied.inventory == Some(InventoryStatus::Borrowed) {
            let items = self.repository.inventory.lock_for_request(&mut *tx, request.id).await?;
            if let Some(busy) = items.iter().find(|item| item.status != InventoryStatus::Available) {
                return Err(AppError::InvalidState(format!(
                    "Item {} is {}, it cannot be handed over",
                    busy.id, busy.status
                )));
            }
        }

        self.repository.borrow_requests.save_workflow(&mut *tx, &request).await?;
        if let Some(status) = applied.inventory {
            self.repository
                .borrow_requests
                .set_item_statuses(&mut *tx, request.id, status)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            request_id = %request.id,
            actor_id = %actor.id,
            role = %actor.role,
            action,
            from = %applied.from_status,
            to = %applied.to_status,
            stage = applied.to_stage,
            "Borrow request transition"
        );
        self.redis
            .invalidate(Invalidation::new("borrow_request", request.id, Some(request.status.to_string())))
            .await;

        Ok(request)
    }
}

/// Active profile as a workflow actor, carrying its stored role
fn acting_profile(profile: &Profile) -> AppResult<Actor> {
    if !profile.is_active {
        return Err(AppError::Authentication("Profile is deactivated".to_string()));
    }
    Ok(Actor::new(profile.id, profile.role))
}

/// Submission with a trimmed purpose and unique item ids
#[derive(Debug)]
struct Submission {
    purpose: String,
    item_ids: Vec<Uuid>,
}

fn prepare_submission(actor: Actor, data: &CreateBorrowRequest) -> AppResult<Submission> {
    if actor.role != Role::Student {
        return Err(AppError::Authorization("Only students can submit borrow requests".to_string()));
    }

    data.validate()?;
    let purpose = data.purpose.trim();
    if purpose.is_empty() {
        return Err(AppError::Validation("Purpose is required".to_string()));
    }
    if data.start_time >= data.end_time {
        return Err(AppError::Validation("start_time must be before end_time".to_string()));
    }

    let mut item_ids = data.item_ids.clone();
    item_ids.sort();
    item_ids.dedup();

    Ok(Submission {
        purpose: purpose.to_string(),
        item_ids,
    })
}

/// Every requested item must exist, belong to the lab and be available
fn check_items(lab_id: Uuid, item_ids: &[Uuid], items: &[InventoryItem]) -> AppResult<()> {
    if let Some(missing) = item_ids.iter().find(|id| !items.iter().any(|item| item.id == **id)) {
        return Err(AppError::NotFound(format!("Inventory item {} not found", missing)));
    }
    if let Some(foreign) = items.iter().find(|item| item.lab_id != lab_id) {
        return Err(AppError::Validation(format!(
            "Item {} does not belong to lab {}",
            foreign.id, lab_id
        )));
    }
    if let Some(busy) = items.iter().find(|item| item.status != InventoryStatus::Available) {
        return Err(AppError::InvalidState(format!(
            "Item {} is {}, not available",
            busy.id, busy.status
        )));
    }
    Ok(())
}
