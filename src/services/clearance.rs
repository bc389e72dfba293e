//! Clearance eligibility, certificates and fines

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        clearance::{verification_code, ClearanceCertificate, CreateFine, EligibilityReport, Fine},
        profile::{ProfileClaims, Role},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ClearanceService {
    repository: Repository,
}

impl ClearanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Outstanding equipment per lab and unpaid fines of a student
    pub async fn eligibility(&self, student_id: Uuid) -> AppResult<EligibilityReport> {
        let student = self.repository.profiles.get_by_id(student_id).await?;
        if student.role != Role::Student {
            return Err(AppError::BadRequest(format!("Profile {} is not a student", student_id)));
        }

        let outstanding = self.repository.clearance.outstanding_requests(student_id).await?;
        let (unpaid_count, unpaid_total) = self.repository.clearance.unpaid_fines(student_id).await?;

        Ok(EligibilityReport::build(
            student_id,
            outstanding,
            unpaid_count,
            unpaid_total,
            Utc::now(),
        ))
    }

    /// Issue a certificate for an eligible student
    pub async fn issue_certificate(&self, student_id: Uuid, claims: &ProfileClaims) -> AppResult<ClearanceCertificate> {
        if !(claims.role.is_admin() || matches!(claims.role, Role::Hod | Role::ProHod)) {
            return Err(AppError::Authorization(
                "Only administrators and department heads issue certificates".to_string(),
            ));
        }

        let report = self.eligibility(student_id).await?;
        if !report.eligible {
            return Err(AppError::InvalidState(format!(
                "Student has {} lab(s) with outstanding equipment and {} unpaid fine(s)",
                report.labs.len(),
                report.unpaid_fine_count
            )));
        }

        let id = Uuid::new_v4();
        let issued_at = Utc::now();
        let certificate = ClearanceCertificate {
            id,
            student_id,
            issued_by: claims.profile_id,
            issued_at,
            verification_code: verification_code(id, student_id, issued_at),
        };
        self.repository.clearance.insert_certificate(&certificate).await?;

        tracing::info!(
            certificate_id = %certificate.id,
            student_id = %student_id,
            issued_by = %claims.profile_id,
            "Clearance certificate issued"
        );
        Ok(certificate)
    }

    pub async fn verify_certificate(&self, code: &str) -> AppResult<ClearanceCertificate> {
        self.repository.clearance.certificate_by_code(code).await
    }

    pub async fn fines_of(&self, student_id: Uuid) -> AppResult<Vec<Fine>> {
        self.repository.profiles.get_by_id(student_id).await?;
        self.repository.clearance.list_fines(student_id).await
    }

    pub async fn issue_fine(&self, issued_by: Uuid, data: CreateFine) -> AppResult<Fine> {
        data.validate()?;
        if data.amount <= rust_decimal::Decimal::ZERO {
            return Err(AppError::Validation("Fine amount must be positive".to_string()));
        }

        let student = self.repository.profiles.get_by_id(data.student_id).await?;
        if student.role != Role::Student {
            return Err(AppError::BadRequest("Fines can only be issued to students".to_string()));
        }
        if let Some(request_id) = data.request_id {
            let request = self.repository.borrow_requests.get_by_id(request_id).await?;
            if request.requester_id != data.student_id {
                return Err(AppError::BadRequest(
                    "Borrow request belongs to another student".to_string(),
                ));
            }
        }

        let fine = self.repository.clearance.create_fine(&data, issued_by).await?;
        tracing::info!(fine_id = %fine.id, student_id = %fine.student_id, amount = %fine.amount, "Fine issued");
        Ok(fine)
    }

    pub async fn pay_fine(&self, id: Uuid) -> AppResult<Fine> {
        match self.repository.clearance.mark_fine_paid(id).await? {
            Some(fine) => {
                tracing::info!(fine_id = %fine.id, "Fine paid");
                Ok(fine)
            }
            None => {
                // Distinguish a missing fine from one already settled
                self.repository.clearance.get_fine(id).await?;
                Err(AppError::InvalidState(format!("Fine {} is already paid", id)))
            }
        }
    }
}
