use actix_web::{get, post, put, web, HttpResponse};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::AuthService;
use tripcompass_shared::{
    CreateUserRequest, LoginRequest, MessageResponse, ResendVerificationRequest,
    UpdateProfileRequest, VerifyEmailRequest,
};

#[post("/register")]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = auth_service.register(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": outcome.message,
        "email": outcome.email,
    })))
}

#[post("/login")]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/verify-email")]
pub async fn verify_email(
    auth_service: web::Data<AuthService>,
    request: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, AppError> {
    let message = auth_service.verify_email(&request.token).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": message,
        "can_login": true,
    })))
}

#[post("/resend-verification")]
pub async fn resend_verification(
    auth_service: web::Data<AuthService>,
    request: web::Json<ResendVerificationRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let message = auth_service.resend_verification(&request.email).await?;
    Ok(HttpResponse::Ok().json(MessageResponse { message }))
}

#[get("/profile")]
pub async fn get_profile(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = auth_service.get_profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn update_profile(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = auth_service
        .update_profile(user.user_id, &request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
