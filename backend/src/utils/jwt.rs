use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tripcompass_shared::{UserType, JWT_ACCESS_TOKEN_EXPIRY};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,         // Subject (user ID)
    pub username: String,
    pub email: String,
    pub user_type: UserType,
    pub exp: i64,            // Expiration time
    pub iat: i64,            // Issued at
    pub jti: String,         // JWT ID
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.len() < 32 {
            return Err(AppError::Internal(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);
        validation.leeway = 30; // seconds of clock-skew tolerance

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue an access token for a verified user.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        username: String,
        email: String,
        user_type: UserType,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            + Duration::from_std(JWT_ACCESS_TOKEN_EXPIRY)
                .map_err(|_| AppError::Internal("Invalid token expiry duration".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            username,
            email,
            user_type,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))?;
        Ok(data.claims)
    }

    pub fn token_expiry_secs(&self) -> i64 {
        JWT_ACCESS_TOKEN_EXPIRY.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("a-test-secret-of-at-least-32-characters!").unwrap()
    }

    #[test]
    fn rejects_short_secrets() {
        assert!(JwtService::new("short").is_err());
    }

    #[test]
    fn token_round_trip() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let token = svc
            .generate_token(
                user_id,
                "rider1".to_string(),
                "rider1@example.com".to_string(),
                UserType::Traveller,
            )
            .unwrap();

        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "rider1");
        assert_eq!(claims.user_type, UserType::Traveller);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let svc = service();
        let token = svc
            .generate_token(
                Uuid::new_v4(),
                "rider1".to_string(),
                "rider1@example.com".to_string(),
                UserType::Traveller,
            )
            .unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(svc.validate_token(&tampered).is_err());
    }
}
