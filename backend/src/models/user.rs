use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tripcompass_shared::{UpdateProfileRequest, UserResponse, UserType};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub preferences: Option<String>,
    pub is_verified: bool,
    pub verification_token_hash: Option<String>,
    pub verification_token_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, user_type, first_name, last_name, \
     phone_number, location, preferences, is_verified, verification_token_hash, \
     verification_token_expires, created_at, updated_at";

impl User {
    /// Create a new, unverified user.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        user_type: UserType,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
        location: Option<&str>,
    ) -> Result<Self, AppError> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, user_type, first_name, last_name, phone_number, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(user_type)
            .bind(first_name)
            .bind(last_name)
            .bind(phone_number)
            .bind(location)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(
                    e,
                    "An account with this email or username already exists",
                )
            })
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    /// Store a fresh (hashed) verification token with its expiry.
    pub async fn set_verification_token(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users
             SET verification_token_hash = $1, verification_token_expires = $2, updated_at = NOW()
             WHERE id = $3",
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Consume a verification token: flips the user to verified and clears
    /// the token in one statement, so a token can only ever be used once.
    /// Returns `None` when the token is unknown, expired, or already spent.
    pub async fn consume_verification_token(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, AppError> {
        let query = format!(
            "UPDATE users
             SET is_verified = TRUE,
                 verification_token_hash = NULL,
                 verification_token_expires = NULL,
                 updated_at = NOW()
             WHERE verification_token_hash = $1
               AND is_verified = FALSE
               AND verification_token_expires > NOW()
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<Self, AppError> {
        let query = format!(
            "UPDATE users
             SET first_name = COALESCE($1, first_name),
                 last_name = COALESCE($2, last_name),
                 phone_number = COALESCE($3, phone_number),
                 location = COALESCE($4, location),
                 preferences = COALESCE($5, preferences),
                 updated_at = NOW()
             WHERE id = $6
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.phone_number)
            .bind(&request.location)
            .bind(&request.preferences)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub fn is_service_provider(&self) -> bool {
        self.user_type == UserType::ServiceProvider
    }

    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            user_type: self.user_type,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: self.phone_number.clone(),
            location: self.location.clone(),
            is_verified: self.is_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
