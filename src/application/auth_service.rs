use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{LoginRequest, SignupRequest, User};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    /// Registers a new user and returns a fresh session token.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn signup(&self, req: SignupRequest) -> Result<String> {
        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!("Signup rejected, email already registered");
            return Err(DomainError::DuplicateEmail.into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal("Failed to hash password".to_string())
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: req.email,
            password_hash,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        let token = self.issue_token(&user.id)?;

        info!(user_id = %user.id, "User registered successfully");
        Ok(token)
    }

    /// Verifies credentials and returns a fresh session token. Unknown email
    /// and wrong password fail identically so registered emails are not
    /// discoverable through this endpoint.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed, user not found");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal("Failed to verify password".to_string())
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Login failed, password mismatch");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = self.issue_token(&user.id)?;

        info!(user_id = %user.id, "Login successful");
        Ok(token)
    }

    fn issue_token(&self, user_id: &str) -> Result<String> {
        generate_token(user_id, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal("Failed to generate token".to_string()).into()
        })
    }
}
