//! Procurement requests service

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::procurement::{
        CreateProcurementRequest, ProcurementQuery, ProcurementRequest, UpdateProcurementStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ProcurementService {
    repository: Repository,
}

impl ProcurementService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &ProcurementQuery) -> AppResult<Vec<ProcurementRequest>> {
        self.repository.procurement.list(query).await
    }

    pub async fn create(&self, requested_by: Uuid, data: CreateProcurementRequest) -> AppResult<ProcurementRequest> {
        data.validate()?;
        if data.estimated_cost.is_sign_negative() {
            return Err(AppError::Validation("Estimated cost cannot be negative".to_string()));
        }
        self.repository.labs.get_by_id(data.lab_id).await?;

        let request = self.repository.procurement.create(&data, requested_by).await?;
        tracing::info!(procurement_id = %request.id, lab_id = %request.lab_id, "Procurement request filed");
        Ok(request)
    }

    /// Move a request along pending -> approved|rejected, approved -> ordered -> received
    pub async fn update_status(
        &self,
        id: Uuid,
        decided_by: Uuid,
        data: UpdateProcurementStatus,
    ) -> AppResult<ProcurementRequest> {
        let mut tx = self.repository.begin().await?;
        let mut request = self.repository.procurement.lock(&mut *tx, id).await?;

        let from = request.status;
        if !from.can_transition_to(data.status) {
            return Err(AppError::InvalidState(format!(
                "Procurement request cannot move from {} to {}",
                from, data.status
            )));
        }

        let now = Utc::now();
        request.status = data.status;
        request.updated_at = now;
        if data.status.is_decision() {
            request.decided_by = Some(decided_by);
            request.decided_at = Some(now);
            request.decision_notes = data.notes.filter(|n| !n.trim().is_empty());
        }

        self.repository.procurement.save_status(&mut *tx, &request).await?;
        tx.commit().await?;

        tracing::info!(procurement_id = %id, from = %from, to = %request.status, "Procurement status changed");
        Ok(request)
    }
}
