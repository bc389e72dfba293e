//! Profiles repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::profile::{CreateProfile, Profile, ProfileQuery, Role, UpdateProfile},
};

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    /// Get profile by email (login)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(email.trim())
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn any_with_roles(&self, roles: &[Role]) -> AppResult<bool> {
        let slugs: Vec<&str> = roles.iter().map(Role::as_str).collect();
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE role = ANY($1))")
            .bind(&slugs)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn list(&self, query: &ProfileQuery) -> AppResult<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT * FROM profiles
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR lab_id = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
            ORDER BY full_name
            "#,
        )
        .bind(query.role.map(|r| r.as_str()))
        .bind(query.lab_id)
        .bind(query.active)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    pub async fn create(&self, data: &CreateProfile, password_hash: &str) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name, role, lab_id, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.email.trim())
        .bind(&data.full_name)
        .bind(data.role)
        .bind(data.lab_id)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateProfile,
        password_hash: Option<&str>,
    ) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                lab_id = CASE WHEN $5 THEN NULL ELSE COALESCE($4, lab_id) END,
                is_active = COALESCE($6, is_active),
                reliability_score = COALESCE($7, reliability_score),
                password_hash = COALESCE($8, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.full_name)
        .bind(data.role.map(|r| r.as_str()))
        .bind(data.lab_id)
        .bind(data.clear_lab)
        .bind(data.is_active)
        .bind(data.reliability_score)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }
}
