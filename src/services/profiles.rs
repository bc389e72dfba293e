//! Authentication and profile management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::profile::{CreateProfile, Profile, ProfileClaims, ProfileQuery, Role, UpdateProfile},
    repository::Repository,
};

#[derive(Clone)]
pub struct ProfilesService {
    repository: Repository,
    config: AuthConfig,
}

impl ProfilesService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, Profile)> {
        let profile = self
            .repository
            .profiles
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&profile, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        if !profile.is_active {
            return Err(AppError::Authentication("Account is deactivated".to_string()));
        }

        let token = self.create_token_for(&profile)?;
        tracing::info!(profile_id = %profile.id, role = %profile.role, "Profile logged in");

        Ok((token, profile))
    }

    /// Create JWT token for a profile
    fn create_token_for(&self, profile: &Profile) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = ProfileClaims {
            sub: profile.email.clone(),
            profile_id: profile.id,
            role: profile.role,
            lab_id: profile.lab_id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify profile password
    fn verify_password(&self, profile: &Profile, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&profile.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Profile> {
        self.repository.profiles.get_by_id(id).await
    }

    pub async fn list(&self, query: &ProfileQuery) -> AppResult<Vec<Profile>> {
        self.repository.profiles.list(query).await
    }

    pub async fn create(&self, data: CreateProfile) -> AppResult<Profile> {
        data.validate()?;

        if self.repository.profiles.email_exists(&data.email, None).await? {
            return Err(AppError::Conflict(format!("Email {} is already registered", data.email)));
        }
        if let Some(lab_id) = data.lab_id {
            self.repository.labs.get_by_id(lab_id).await?;
        }

        let hash = self.hash_password(&data.password)?;
        let profile = self.repository.profiles.create(&data, &hash).await?;
        tracing::info!(profile_id = %profile.id, role = %profile.role, "Profile created");
        Ok(profile)
    }

    pub async fn update(&self, id: Uuid, data: UpdateProfile) -> AppResult<Profile> {
        data.validate()?;

        if let Some(lab_id) = data.lab_id {
            self.repository.labs.get_by_id(lab_id).await?;
        }

        let hash = match data.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository.profiles.update(id, &data, hash.as_deref()).await
    }

    /// Create the first administrator when none exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_admin_email.clone(),
            self.config.bootstrap_admin_password.clone(),
        ) else {
            return Ok(());
        };

        if self
            .repository
            .profiles
            .any_with_roles(&[Role::Admin, Role::SuperAdmin])
            .await?
        {
            return Ok(());
        }

        let profile = self
            .create(CreateProfile {
                email,
                full_name: "Administrator".to_string(),
                password,
                role: Role::SuperAdmin,
                lab_id: None,
            })
            .await?;
        tracing::warn!(profile_id = %profile.id, "Bootstrap administrator created; change its password");
        Ok(())
    }
}
