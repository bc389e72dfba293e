//! Labs repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::lab::{CreateLab, Lab, UpdateLab},
};

#[derive(Clone)]
pub struct LabsRepository {
    pool: Pool<Postgres>,
}

impl LabsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Lab>> {
        let labs = sqlx::query_as::<_, Lab>("SELECT * FROM labs ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(labs)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Lab> {
        sqlx::query_as::<_, Lab>("SELECT * FROM labs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lab {} not found", id)))
    }

    /// Check if a lab code is taken
    pub async fn code_exists(&self, code: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM labs WHERE LOWER(code) = LOWER($1) AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateLab) -> AppResult<Lab> {
        let lab = sqlx::query_as::<_, Lab>(
            r#"
            INSERT INTO labs (id, code, name, location)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.code.trim())
        .bind(&data.name)
        .bind(&data.location)
        .fetch_one(&self.pool)
        .await?;
        Ok(lab)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateLab) -> AppResult<Lab> {
        sqlx::query_as::<_, Lab>(
            r#"
            UPDATE labs
            SET code = COALESCE($2, code),
                name = COALESCE($3, name),
                location = COALESCE($4, location),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.code.as_deref().map(str::trim))
        .bind(&data.name)
        .bind(&data.location)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lab {} not found", id)))
    }

    /// Whether anything still points at the lab
    pub async fn is_referenced(&self, id: Uuid) -> AppResult<bool> {
        let referenced: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM profiles WHERE lab_id = $1)
                OR EXISTS(SELECT 1 FROM inventory_items WHERE lab_id = $1)
                OR EXISTS(SELECT 1 FROM borrow_requests WHERE lab_id = $1)
                OR EXISTS(SELECT 1 FROM procurement_requests WHERE lab_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(referenced)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM labs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Lab {} not found", id)));
        }
        Ok(())
    }
}
