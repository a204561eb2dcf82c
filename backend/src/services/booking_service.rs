use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{booking::NewBooking, Booking, Listing};
use crate::utils::validation::{booking_duration_days, validate_booking_dates};
use tripcompass_shared::{BookingResponse, BookingStatus, CancelBookingRequest, CreateBookingRequest};

#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a booking against any rentable vertical. The polymorphic
    /// (service_type, service_id) pair resolves through the listings table;
    /// a dangling reference is a NotFound, not a silent insert.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        validate_booking_dates(request.start_date, request.end_date)?;

        let listing = Listing::find_by_id(&self.pool, request.service_type, request.service_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No {} found for the requested booking",
                    request.service_type
                ))
            })?;

        let additional_charges = request.additional_charges.unwrap_or(Decimal::ZERO);
        let discount = request.discount.unwrap_or(Decimal::ZERO);
        let total_cost = request.base_cost + additional_charges - discount;

        let booking = Booking::create(
            &self.pool,
            NewBooking {
                user_id,
                service_type: request.service_type,
                service_id: listing.id,
                service_provider_id: listing.service_provider_id,
                start_date: request.start_date,
                end_date: request.end_date,
                duration_days: booking_duration_days(request.start_date, request.end_date),
                base_cost: request.base_cost,
                additional_charges,
                discount,
                total_cost,
                security_deposit: request.security_deposit.unwrap_or(listing.safety_deposit),
                special_requests: request.special_requests,
                pickup_location: request.pickup_location,
                drop_location: request.drop_location,
                contact_name: request.contact_name,
                contact_phone: request.contact_phone,
                contact_email: request.contact_email,
                emergency_contact: request.emergency_contact,
            },
        )
        .await?;

        info!(
            booking_id = %booking.id,
            reference = %booking.booking_reference,
            "booking created"
        );

        Ok(booking.to_response(Some(listing.title)))
    }

    pub async fn get(&self, id: Uuid, requester: Uuid) -> Result<BookingResponse, AppError> {
        let booking = self.find_authorized(id, requester).await?;
        let title = self.service_title(&booking).await?;
        Ok(booking.to_response(title))
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = Booking::list_for_user(&self.pool, user_id).await?;

        let mut responses = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let title = self.service_title(&booking).await?;
            responses.push(booking.to_response(title));
        }
        Ok(responses)
    }

    /// Cancel a booking. Terminal bookings (completed, cancelled, refunded)
    /// are refused with a conflict.
    pub async fn cancel(
        &self,
        id: Uuid,
        requester: Uuid,
        request: &CancelBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let booking = self.find_authorized(id, requester).await?;

        if !booking.can_be_cancelled() {
            return Err(AppError::Conflict(
                tripcompass_shared::ERROR_BOOKING_NOT_CANCELLABLE.to_string(),
            ));
        }

        let cancelled =
            Booking::cancel(&self.pool, booking.id, requester, request.reason.as_deref()).await?;

        info!(booking_id = %cancelled.id, "booking cancelled");

        let title = self.service_title(&cancelled).await?;
        Ok(cancelled.to_response(title))
    }

    /// Provider-side status transition; completing a booking counts a trip
    /// on the listing.
    pub async fn update_status(
        &self,
        id: Uuid,
        provider_id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingResponse, AppError> {
        let booking = Booking::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.service_provider_id != provider_id {
            return Err(AppError::Authorization(
                "Only the service provider may update booking status".to_string(),
            ));
        }

        if booking.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        let updated = Booking::update_status(&self.pool, id, status).await?;

        if status == BookingStatus::Completed {
            Listing::increment_trips(&self.pool, updated.service_id).await?;
        }

        let title = self.service_title(&updated).await?;
        Ok(updated.to_response(title))
    }

    async fn find_authorized(&self, id: Uuid, requester: Uuid) -> Result<Booking, AppError> {
        let booking = Booking::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.user_id != requester && booking.service_provider_id != requester {
            return Err(AppError::Authorization(
                "You do not have access to this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    async fn service_title(&self, booking: &Booking) -> Result<Option<String>, AppError> {
        let listing =
            Listing::find_by_id(&self.pool, booking.service_type, booking.service_id).await?;
        Ok(listing.map(|l| l.title))
    }
}
