//! Lab management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::lab::{CreateLab, Lab, UpdateLab},
    repository::Repository,
};

#[derive(Clone)]
pub struct LabsService {
    repository: Repository,
}

impl LabsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Lab>> {
        self.repository.labs.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Lab> {
        self.repository.labs.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateLab) -> AppResult<Lab> {
        data.validate()?;
        if self.repository.labs.code_exists(&data.code, None).await? {
            return Err(AppError::Conflict(format!("Lab code {} already exists", data.code)));
        }
        let lab = self.repository.labs.create(&data).await?;
        tracing::info!(lab_id = %lab.id, code = %lab.code, "Lab created");
        Ok(lab)
    }

    pub async fn update(&self, id: Uuid, data: UpdateLab) -> AppResult<Lab> {
        data.validate()?;
        if let Some(ref code) = data.code {
            if self.repository.labs.code_exists(code, Some(id)).await? {
                return Err(AppError::Conflict(format!("Lab code {} already exists", code)));
            }
        }
        self.repository.labs.update(id, &data).await
    }

    /// Delete a lab nothing refers to any more
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.labs.get_by_id(id).await?;
        if self.repository.labs.is_referenced(id).await? {
            return Err(AppError::Conflict(
                "Lab still has profiles, inventory or requests attached".to_string(),
            ));
        }
        self.repository.labs.delete(id).await?;
        tracing::info!(lab_id = %id, "Lab deleted");
        Ok(())
    }
}
