//! Fines, eligibility aggregates and clearance certificates

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow_request::RequestStatus,
        clearance::{ClearanceCertificate, CreateFine, Fine, OutstandingRequest},
    },
};

#[derive(Clone)]
pub struct ClearanceRepository {
    pool: Pool<Postgres>,
}

impl ClearanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Handed-over requests of a student, with their lab and item count
    pub async fn outstanding_requests(&self, student_id: Uuid) -> AppResult<Vec<OutstandingRequest>> {
        let rows = sqlx::query_as::<_, OutstandingRequest>(
            r#"
            SELECT br.id AS request_id, br.lab_id, l.name AS lab_name,
                   br.handed_over_at, br.end_time,
                   COUNT(bri.item_id) AS item_count
            FROM borrow_requests br
            JOIN labs l ON l.id = br.lab_id
            LEFT JOIN borrow_request_items bri ON bri.request_id = br.id
            WHERE br.requester_id = $1 AND br.status = $2
            GROUP BY br.id, l.name
            ORDER BY l.name, br.handed_over_at
            "#,
        )
        .bind(student_id)
        .bind(RequestStatus::HandedOver)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count and total of unpaid fines
    pub async fn unpaid_fines(&self, student_id: Uuid) -> AppResult<(i64, Decimal)> {
        let totals = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM fines WHERE student_id = $1 AND NOT paid",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    pub async fn list_fines(&self, student_id: Uuid) -> AppResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            "SELECT * FROM fines WHERE student_id = $1 ORDER BY issued_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fines)
    }

    pub async fn get_fine(&self, id: Uuid) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine {} not found", id)))
    }

    pub async fn create_fine(&self, data: &CreateFine, issued_by: Uuid) -> AppResult<Fine> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (id, student_id, request_id, amount, reason, issued_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.request_id)
        .bind(data.amount)
        .bind(&data.reason)
        .bind(issued_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(fine)
    }

    /// Mark an unpaid fine paid; `None` when it was already paid or is missing
    pub async fn mark_fine_paid(&self, id: Uuid) -> AppResult<Option<Fine>> {
        let fine = sqlx::query_as::<_, Fine>(
            "UPDATE fines SET paid = TRUE, paid_at = NOW() WHERE id = $1 AND NOT paid RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fine)
    }

    pub async fn insert_certificate(&self, certificate: &ClearanceCertificate) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clearance_certificates (id, student_id, issued_by, issued_at, verification_code)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(certificate.id)
        .bind(certificate.student_id)
        .bind(certificate.issued_by)
        .bind(certificate.issued_at)
        .bind(&certificate.verification_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn certificate_by_code(&self, code: &str) -> AppResult<ClearanceCertificate> {
        sqlx::query_as::<_, ClearanceCertificate>(
            "SELECT * FROM clearance_certificates WHERE verification_code = UPPER($1)",
        )
        .bind(code.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate not found".to_string()))
    }
}
