//! Inventory repository for database operations

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::InventoryStatus,
        inventory::{CreateInventoryItem, InventoryItem, InventoryQuery, UpdateInventoryItem},
    },
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: Pool<Postgres>,
}

impl InventoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &InventoryQuery) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT * FROM inventory_items
            WHERE ($1::uuid IS NULL OR lab_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
              AND ($3::text IS NULL OR LOWER(category) = LOWER($3))
            ORDER BY name, serial_number
            "#,
        )
        .bind(query.lab_id)
        .bind(query.status.map(|s| s.as_str()))
        .bind(&query.category)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Lock one item for a status change
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Lock a set of items; missing ids are simply absent from the result
    pub async fn lock_many(&self, conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(ids)
        .fetch_all(conn)
        .await?;
        Ok(items)
    }

    /// Lock every item linked to a borrow request
    pub async fn lock_for_request(&self, conn: &mut PgConnection, request_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT ii.* FROM inventory_items ii
            JOIN borrow_request_items bri ON bri.item_id = ii.id
            WHERE bri.request_id = $1
            ORDER BY ii.id
            FOR UPDATE OF ii
            "#,
        )
        .bind(request_id)
        .fetch_all(conn)
        .await?;
        Ok(items)
    }

    pub async fn set_status(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: InventoryStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE inventory_items SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn create(&self, data: &CreateInventoryItem) -> AppResult<InventoryItem> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (id, lab_id, name, category, serial_number, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.lab_id)
        .bind(&data.name)
        .bind(&data.category)
        .bind(&data.serial_number)
        .bind(InventoryStatus::Available)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateInventoryItem) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET lab_id = COALESCE($2, lab_id),
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                serial_number = COALESCE($5, serial_number),
                status = COALESCE($6, status),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.lab_id)
        .bind(&data.name)
        .bind(&data.category)
        .bind(&data.serial_number)
        .bind(data.status.map(|s| s.as_str()))
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Whether a borrow request links this item
    pub async fn is_linked(&self, id: Uuid) -> AppResult<bool> {
        let linked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_request_items WHERE item_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(linked)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Inventory item {} not found", id)));
        }
        Ok(())
    }
}
