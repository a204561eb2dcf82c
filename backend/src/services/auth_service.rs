use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;
use crate::services::Mailer;
use crate::utils::crypto::{generate_verification_token, hash_password, hash_token, verify_password};
use crate::utils::jwt::JwtService;
use crate::utils::validation::{validate_email, validate_password, validate_username};
use tripcompass_shared::{
    AuthResponse, CreateUserRequest, LoginRequest, UpdateProfileRequest, UserResponse, UserType,
    ERROR_EMAIL_ALREADY_EXISTS, ERROR_EMAIL_NOT_VERIFIED, ERROR_INVALID_CREDENTIALS,
    ERROR_INVALID_VERIFICATION_TOKEN, ERROR_USERNAME_ALREADY_EXISTS,
    RESEND_VERIFICATION_COOLDOWN_SECS, SUCCESS_EMAIL_VERIFIED, SUCCESS_REGISTRATION,
    SUCCESS_VERIFICATION_RESENT, VERIFICATION_TOKEN_TTL_HOURS,
};

#[derive(Debug)]
pub struct RegistrationOutcome {
    pub email: String,
    pub message: String,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_service: Arc<JwtService>,
    mailer: Mailer,
    // Per-email resend cooldown; entries expire on their next lookup.
    resend_cooldowns: Arc<RwLock<HashMap<String, Instant>>>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_service: Arc<JwtService>, mailer: Mailer) -> Self {
        Self {
            pool,
            jwt_service,
            mailer,
            resend_cooldowns: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new, unverified user and send the verification link.
    pub async fn register(
        &self,
        request: CreateUserRequest,
    ) -> Result<RegistrationOutcome, AppError> {
        validate_email(&request.email)?;
        validate_username(&request.username)?;
        validate_password(&request.password)?;

        if User::email_exists(&self.pool, &request.email).await? {
            return Err(AppError::Conflict(ERROR_EMAIL_ALREADY_EXISTS.to_string()));
        }
        if User::username_exists(&self.pool, &request.username).await? {
            return Err(AppError::Conflict(ERROR_USERNAME_ALREADY_EXISTS.to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::create(
            &self.pool,
            &request.username,
            &request.email,
            &password_hash,
            request.user_type.unwrap_or(UserType::Traveller),
            request.first_name.as_deref(),
            request.last_name.as_deref(),
            request.phone_number.as_deref(),
            request.location.as_deref(),
        )
        .await?;

        self.issue_verification_token(&user).await?;

        info!(user_id = %user.id, email = %user.email, "registered new user");

        Ok(RegistrationOutcome {
            email: user.email,
            message: SUCCESS_REGISTRATION.to_string(),
        })
    }

    /// Authenticate and issue a token. Unverified accounts are refused with
    /// a 403 so the client can offer a resend.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        validate_email(&request.email)?;

        let user = User::find_by_email(&self.pool, &request.email)
            .await?
            .ok_or_else(|| AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_verified {
            return Err(AppError::Authorization(ERROR_EMAIL_NOT_VERIFIED.to_string()));
        }

        let token = self.jwt_service.generate_token(
            user.id,
            user.username.clone(),
            user.email.clone(),
            user.user_type,
        )?;

        info!(user_id = %user.id, "user logged in");

        Ok(AuthResponse {
            token,
            user: user.to_response(),
            expires_in: self.jwt_service.token_expiry_secs(),
        })
    }

    /// Consume a verification token. A token verifies exactly one account
    /// exactly once; replays and expired links fail identically.
    pub async fn verify_email(&self, token: &str) -> Result<String, AppError> {
        if token.is_empty() {
            return Err(AppError::Validation(
                "Verification token is required.".to_string(),
            ));
        }

        let user = User::consume_verification_token(&self.pool, &hash_token(token))
            .await?
            .ok_or_else(|| {
                AppError::Validation(ERROR_INVALID_VERIFICATION_TOKEN.to_string())
            })?;

        self.mailer.send_welcome_email(&user.email, &user.username);
        info!(user_id = %user.id, "email verified");

        Ok(SUCCESS_EMAIL_VERIFIED.to_string())
    }

    /// Resend the verification email, rate limited per address. Whether the
    /// address exists is never revealed in the response.
    pub async fn resend_verification(&self, email: &str) -> Result<String, AppError> {
        validate_email(email)?;
        self.check_resend_cooldown(email).await?;

        let user = match User::find_by_email(&self.pool, email).await? {
            Some(user) => user,
            None => {
                return Ok(
                    "If an account with this email exists, a verification email has been sent."
                        .to_string(),
                )
            }
        };

        if user.is_verified {
            return Ok("This email address is already verified.".to_string());
        }

        self.issue_verification_token(&user).await?;
        self.start_resend_cooldown(email).await;

        Ok(SUCCESS_VERIFICATION_RESENT.to_string())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.to_response())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        let user = User::update_profile(&self.pool, user_id, request).await?;
        Ok(user.to_response())
    }

    /// Generate, store (hashed) and send a fresh verification token.
    async fn issue_verification_token(&self, user: &User) -> Result<(), AppError> {
        let token = generate_verification_token();
        let expires_at = Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS);

        User::set_verification_token(&self.pool, user.id, &hash_token(&token), expires_at).await?;
        self.mailer.send_verification_email(&user.email, &token);
        Ok(())
    }

    async fn check_resend_cooldown(&self, email: &str) -> Result<(), AppError> {
        let cooldown = std::time::Duration::from_secs(RESEND_VERIFICATION_COOLDOWN_SECS);
        let mut cooldowns = self.resend_cooldowns.write().await;

        // Drop entries that have already served their cooldown.
        cooldowns.retain(|_, started| started.elapsed() < cooldown);

        if let Some(started) = cooldowns.get(email) {
            let remaining = cooldown.saturating_sub(started.elapsed());
            return Err(AppError::RateLimited {
                retry_after_secs: remaining.as_secs().max(1),
            });
        }
        Ok(())
    }

    async fn start_resend_cooldown(&self, email: &str) {
        self.resend_cooldowns
            .write()
            .await
            .insert(email.to_string(), Instant::now());
    }
}
