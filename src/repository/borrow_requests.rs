//! Borrow requests repository for database operations

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow_request::{BorrowRequest, BorrowRequestItem, BorrowRequestQuery},
        enums::InventoryStatus,
    },
};

/// Statuses that are still waiting on an approval stage, as SQL literals
const IN_APPROVAL_CHAIN: &str =
    "('submitted', 'stage1_pending', 'stage1_approved', 'stage2_pending', 'stage2_approved', 'stage3_pending')";

#[derive(Clone)]
pub struct BorrowRequestsRepository {
    pool: Pool<Postgres>,
}

impl BorrowRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BorrowRequest> {
        sqlx::query_as::<_, BorrowRequest>("SELECT * FROM borrow_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request {} not found", id)))
    }

    /// Load a request and hold its row lock until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<BorrowRequest> {
        sqlx::query_as::<_, BorrowRequest>("SELECT * FROM borrow_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request {} not found", id)))
    }

    pub async fn list(&self, query: &BorrowRequestQuery) -> AppResult<Vec<BorrowRequest>> {
        let requests = sqlx::query_as::<_, BorrowRequest>(
            r#"
            SELECT * FROM borrow_requests
            WHERE ($1::varchar IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR lab_id = $2)
              AND ($3::uuid IS NULL OR requester_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.lab_id)
        .bind(query.requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Requests sitting at `stage` that are still in the approval chain
    pub async fn list_at_stage(&self, stage: i16) -> AppResult<Vec<BorrowRequest>> {
        let sql = format!(
            "SELECT * FROM borrow_requests WHERE current_stage = $1 AND status IN {} ORDER BY created_at",
            IN_APPROVAL_CHAIN
        );
        let requests = sqlx::query_as::<_, BorrowRequest>(&sql)
            .bind(stage)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    /// Items of a request joined with their inventory rows
    pub async fn items(&self, request_id: Uuid) -> AppResult<Vec<BorrowRequestItem>> {
        let items = sqlx::query_as::<_, BorrowRequestItem>(
            r#"
            SELECT bri.request_id, bri.item_id, ii.name, ii.serial_number, ii.status
            FROM borrow_request_items bri
            JOIN inventory_items ii ON ii.id = bri.item_id
            WHERE bri.request_id = $1
            ORDER BY ii.name
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn insert(&self, conn: &mut PgConnection, request: &BorrowRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO borrow_requests (
                id, requester_id, lab_id, purpose, start_time, end_time,
                status, current_stage, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(request.requester_id)
        .bind(request.lab_id)
        .bind(&request.purpose)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.status)
        .bind(request.current_stage)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn insert_items(
        &self,
        conn: &mut PgConnection,
        request_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "INSERT INTO borrow_request_items (request_id, item_id) SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(request_id)
        .bind(item_ids)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Write every workflow-owned column of the request in one statement
    pub async fn save_workflow(&self, conn: &mut PgConnection, request: &BorrowRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE borrow_requests SET
                status = $2,
                current_stage = $3,
                stage1_approver_id = $4,
                stage1_approved_at = $5,
                stage1_notes = $6,
                stage2_oic_approver_id = $7,
                stage2_oic_approved_at = $8,
                stage2_oic_notes = $9,
                stage2_asst_approver_id = $10,
                stage2_asst_approved_at = $11,
                stage2_asst_notes = $12,
                stage3_approver_id = $13,
                stage3_approved_at = $14,
                stage3_notes = $15,
                rejected_by = $16,
                rejected_at = $17,
                rejection_stage = $18,
                rejection_reason = $19,
                handed_over_by = $20,
                handed_over_at = $21,
                returned_by = $22,
                returned_at = $23,
                updated_at = $24
            WHERE id = $1
            "#,
        )
        .bind(request.id)
        .bind(request.status)
        .bind(request.current_stage)
        .bind(request.stage1_approver_id)
        .bind(request.stage1_approved_at)
        .bind(&request.stage1_notes)
        .bind(request.stage2_oic_approver_id)
        .bind(request.stage2_oic_approved_at)
        .bind(&request.stage2_oic_notes)
        .bind(request.stage2_asst_approver_id)
        .bind(request.stage2_asst_approved_at)
        .bind(&request.stage2_asst_notes)
        .bind(request.stage3_approver_id)
        .bind(request.stage3_approved_at)
        .bind(&request.stage3_notes)
        .bind(request.rejected_by)
        .bind(request.rejected_at)
        .bind(request.rejection_stage)
        .bind(&request.rejection_reason)
        .bind(request.handed_over_by)
        .bind(request.handed_over_at)
        .bind(request.returned_by)
        .bind(request.returned_at)
        .bind(request.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Set every item linked to the request to `status`
    pub async fn set_item_statuses(
        &self,
        conn: &mut PgConnection,
        request_id: Uuid,
        status: InventoryStatus,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET status = $2, updated_at = NOW()
            WHERE id IN (SELECT item_id FROM borrow_request_items WHERE request_id = $1)
            "#,
        )
        .bind(request_id)
        .bind(status)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
