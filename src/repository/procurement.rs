//! Procurement requests repository

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ProcurementStatus,
        procurement::{CreateProcurementRequest, ProcurementQuery, ProcurementRequest},
    },
};

#[derive(Clone)]
pub struct ProcurementRepository {
    pool: Pool<Postgres>,
}

impl ProcurementRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &ProcurementQuery) -> AppResult<Vec<ProcurementRequest>> {
        let requests = sqlx::query_as::<_, ProcurementRequest>(
            r#"
            SELECT * FROM procurement_requests
            WHERE ($1::uuid IS NULL OR lab_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.lab_id)
        .bind(query.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn create(
        &self,
        data: &CreateProcurementRequest,
        requested_by: Uuid,
    ) -> AppResult<ProcurementRequest> {
        let request = sqlx::query_as::<_, ProcurementRequest>(
            r#"
            INSERT INTO procurement_requests
                (id, lab_id, requested_by, item_name, quantity, estimated_cost, justification, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.lab_id)
        .bind(requested_by)
        .bind(&data.item_name)
        .bind(data.quantity)
        .bind(data.estimated_cost)
        .bind(&data.justification)
        .bind(ProcurementStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<ProcurementRequest> {
        sqlx::query_as::<_, ProcurementRequest>("SELECT * FROM procurement_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Procurement request {} not found", id)))
    }

    pub async fn save_status(&self, conn: &mut PgConnection, request: &ProcurementRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE procurement_requests
            SET status = $2, decided_by = $3, decided_at = $4, decision_notes = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(request.id)
        .bind(request.status)
        .bind(request.decided_by)
        .bind(request.decided_at)
        .bind(&request.decision_notes)
        .bind(request.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }
}
