use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::BookingService;
use tripcompass_shared::{BookingStatus, CancelBookingRequest, CreateBookingRequest};

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

pub async fn create_booking(
    booking_service: web::Data<BookingService>,
    user: AuthenticatedUser,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = booking_service
        .create(user.user_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(booking))
}

pub async fn list_my_bookings(
    booking_service: web::Data<BookingService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let bookings = booking_service.list_for_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn get_booking(
    booking_service: web::Data<BookingService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_service
        .get(path.into_inner(), user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn cancel_booking(
    booking_service: web::Data<BookingService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: Option<web::Json<CancelBookingRequest>>,
) -> Result<HttpResponse, AppError> {
    let cancel_request = request
        .map(|r| r.into_inner())
        .unwrap_or_default();

    let booking = booking_service
        .cancel(path.into_inner(), user.user_id, &cancel_request)
        .await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn update_booking_status(
    booking_service: web::Data<BookingService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_service
        .update_status(path.into_inner(), user.user_id, request.status)
        .await?;
    Ok(HttpResponse::Ok().json(booking))
}
