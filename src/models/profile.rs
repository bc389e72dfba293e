//! Profile (user) model, roles and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Role hierarchy of the laboratory network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    LabEngineer,
    LabAssistant,
    OicCenLabs,
    AsstOicCenLabs,
    Hod,
    ProHod,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Student,
        Role::LabEngineer,
        Role::LabAssistant,
        Role::OicCenLabs,
        Role::AsstOicCenLabs,
        Role::Hod,
        Role::ProHod,
        Role::Admin,
        Role::SuperAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::LabEngineer => "lab_engineer",
            Role::LabAssistant => "lab_assistant",
            Role::OicCenLabs => "oic_cen_labs",
            Role::AsstOicCenLabs => "asst_oic_cen_labs",
            Role::Hod => "hod",
            Role::ProHod => "pro_hod",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Lab engineers and assistants run the counter: stage 1, handover, return
    pub fn is_lab_staff(&self) -> bool {
        matches!(self, Role::LabEngineer | Role::LabAssistant)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Any role that sits somewhere in the approval chain or administers it
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == lowered)
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}

// Stored as plain text so new roles only need a code change
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Profile row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub lab_id: Option<Uuid>,
    pub is_active: bool,
    /// 0-100, starts at 100
    pub reliability_score: i32,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    pub role: Option<Role>,
    pub lab_id: Option<Uuid>,
    pub active: Option<bool>,
}

/// Create profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfile {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    pub lab_id: Option<Uuid>,
}

/// Update profile request (admin)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    /// `Some(None)` is not expressible in JSON; use `clear_lab` to unassign
    pub lab_id: Option<Uuid>,
    #[serde(default)]
    pub clear_lab: bool,
    pub is_active: Option<bool>,
    #[validate(range(min = 0, max = 100, message = "Reliability score must be between 0 and 100"))]
    pub reliability_score: Option<i32>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// JWT Claims for authenticated profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileClaims {
    pub sub: String,
    pub profile_id: Uuid,
    pub role: Role,
    pub lab_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

impl ProfileClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }

    /// Lab staff or administrators (maintenance, procurement filing)
    pub fn require_lab_staff_or_admin(&self) -> Result<(), AppError> {
        if self.role.is_lab_staff() || self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Lab staff privileges required".to_string()))
        }
    }

    /// Students may only see their own records, everyone else may see any
    pub fn require_self_or_staff(&self, profile_id: Uuid) -> Result<(), AppError> {
        if self.profile_id == profile_id || self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization("Cannot access another student's records".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> ProfileClaims {
        ProfileClaims {
            sub: "someone@uni.edu".to_string(),
            profile_id: Uuid::new_v4(),
            role,
            lab_id: None,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn role_round_trips_through_its_slug() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(" HOD ".parse::<Role>(), Ok(Role::Hod));
        assert!("librarian".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_as_snake_case() {
        let json = serde_json::to_string(&Role::AsstOicCenLabs).unwrap();
        assert_eq!(json, "\"asst_oic_cen_labs\"");
    }

    #[test]
    fn token_round_trip() {
        let original = claims(Role::LabEngineer);
        let token = original.create_token("secret").unwrap();
        let parsed = ProfileClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.profile_id, original.profile_id);
        assert_eq!(parsed.role, Role::LabEngineer);
        assert!(ProfileClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn students_only_see_themselves() {
        let student = claims(Role::Student);
        assert!(student.require_self_or_staff(student.profile_id).is_ok());
        assert!(student.require_self_or_staff(Uuid::new_v4()).is_err());
        assert!(claims(Role::Hod).require_self_or_staff(Uuid::new_v4()).is_ok());
        assert!(student.require_staff().is_err());
        assert!(claims(Role::LabAssistant).require_admin().is_err());
        assert!(claims(Role::SuperAdmin).require_admin().is_ok());
    }
}
