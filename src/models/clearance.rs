//! Fines, clearance eligibility and certificates

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Length of the printed verification code, in hex characters
pub const VERIFICATION_CODE_LEN: usize = 20;

/// Fine issued to a student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: Uuid,
    pub student_id: Uuid,
    pub request_id: Option<Uuid>,
    #[schema(value_type = String, example = "15.00")]
    pub amount: Decimal,
    pub reason: String,
    pub paid: bool,
    pub issued_by: Uuid,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFine {
    pub student_id: Uuid,
    pub request_id: Option<Uuid>,
    #[schema(value_type = String, example = "15.00")]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
}

/// Borrow request whose equipment has not come back yet
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OutstandingRequest {
    pub request_id: Uuid,
    pub lab_id: Uuid,
    pub lab_name: String,
    pub handed_over_at: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    pub item_count: i64,
}

/// Outstanding requests of one lab
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LabOutstanding {
    pub lab_id: Uuid,
    pub lab_name: String,
    pub requests: Vec<OutstandingRequest>,
}

/// Clearance eligibility of a student across all labs
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EligibilityReport {
    pub student_id: Uuid,
    pub eligible: bool,
    pub labs: Vec<LabOutstanding>,
    pub unpaid_fine_count: i64,
    #[schema(value_type = String, example = "0")]
    pub unpaid_fine_total: Decimal,
    pub generated_at: DateTime<Utc>,
}

impl EligibilityReport {
    /// Group outstanding requests by lab; eligible when nothing is owed
    pub fn build(
        student_id: Uuid,
        outstanding: Vec<OutstandingRequest>,
        unpaid_fine_count: i64,
        unpaid_fine_total: Decimal,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut labs: Vec<LabOutstanding> = Vec::new();
        for request in outstanding {
            match labs.iter_mut().find(|lab| lab.lab_id == request.lab_id) {
                Some(lab) => lab.requests.push(request),
                None => labs.push(LabOutstanding {
                    lab_id: request.lab_id,
                    lab_name: request.lab_name.clone(),
                    requests: vec![request],
                }),
            }
        }

        let eligible = labs.is_empty() && unpaid_fine_count == 0 && unpaid_fine_total.is_zero();

        Self {
            student_id,
            eligible,
            labs,
            unpaid_fine_count,
            unpaid_fine_total,
            generated_at,
        }
    }
}

/// Issued clearance certificate
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClearanceCertificate {
    pub id: Uuid,
    pub student_id: Uuid,
    pub issued_by: Uuid,
    pub issued_at: DateTime<Utc>,
    pub verification_code: String,
}

/// Deterministic, printable code binding a certificate to its student
pub fn verification_code(certificate_id: Uuid, student_id: Uuid, issued_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(certificate_id.as_bytes());
    hasher.update(student_id.as_bytes());
    hasher.update(issued_at.timestamp_micros().to_be_bytes());
    let digest = hex::encode_upper(hasher.finalize());
    digest[..VERIFICATION_CODE_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outstanding(lab_id: Uuid, lab_name: &str) -> OutstandingRequest {
        OutstandingRequest {
            request_id: Uuid::new_v4(),
            lab_id,
            lab_name: lab_name.to_string(),
            handed_over_at: Some(Utc::now()),
            end_time: Utc::now(),
            item_count: 2,
        }
    }

    #[test]
    fn clean_student_is_eligible() {
        let report = EligibilityReport::build(Uuid::new_v4(), vec![], 0, Decimal::ZERO, Utc::now());
        assert!(report.eligible);
        assert!(report.labs.is_empty());
    }

    #[test]
    fn outstanding_items_are_grouped_per_lab() {
        let electronics = Uuid::new_v4();
        let physics = Uuid::new_v4();
        let report = EligibilityReport::build(
            Uuid::new_v4(),
            vec![
                outstanding(electronics, "Electronics"),
                outstanding(physics, "Physics"),
                outstanding(electronics, "Electronics"),
            ],
            0,
            Decimal::ZERO,
            Utc::now(),
        );
        assert!(!report.eligible);
        assert_eq!(report.labs.len(), 2);
        assert_eq!(report.labs[0].lab_id, electronics);
        assert_eq!(report.labs[0].requests.len(), 2);
    }

    #[test]
    fn unpaid_fines_block_clearance() {
        let report = EligibilityReport::build(Uuid::new_v4(), vec![], 1, Decimal::new(1500, 2), Utc::now());
        assert!(!report.eligible);
    }

    #[test]
    fn verification_code_is_stable_and_distinct() {
        let cert = Uuid::new_v4();
        let student = Uuid::new_v4();
        let at = Utc::now();
        let code = verification_code(cert, student, at);
        assert_eq!(code.len(), VERIFICATION_CODE_LEN);
        assert_eq!(code, verification_code(cert, student, at));
        assert_ne!(code, verification_code(Uuid::new_v4(), student, at));
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
