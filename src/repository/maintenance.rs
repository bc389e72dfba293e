//! Maintenance records repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::MaintenanceStatus,
        maintenance::{MaintenanceQuery, MaintenanceRecord},
    },
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenance_records
            WHERE ($1::uuid IS NULL OR item_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY opened_at DESC
            "#,
        )
        .bind(query.item_id)
        .bind(query.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<MaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        item_id: Uuid,
        reported_by: Uuid,
        description: &str,
        opened_at: DateTime<Utc>,
    ) -> AppResult<MaintenanceRecord> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (id, item_id, reported_by, description, status, opened_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item_id)
        .bind(reported_by)
        .bind(description)
        .bind(MaintenanceStatus::Open)
        .bind(opened_at)
        .fetch_one(conn)
        .await?;
        Ok(record)
    }

    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        resolved_by: Uuid,
        resolution: Option<&str>,
        resolved_at: DateTime<Utc>,
    ) -> AppResult<MaintenanceRecord> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records
            SET status = $2, resolved_by = $3, resolution = $4, resolved_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(MaintenanceStatus::Resolved)
        .bind(resolved_by)
        .bind(resolution)
        .bind(resolved_at)
        .fetch_one(conn)
        .await?;
        Ok(record)
    }
}
