use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tripcompass_shared::{
    BookingResponse, BookingStatus, PaymentStatus, ServiceType, BOOKING_REFERENCE_DIGITS,
    BOOKING_REFERENCE_PREFIX, MAX_BOOKING_REFERENCE_ATTEMPTS,
};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub booking_reference: String,
    pub user_id: Uuid,
    pub service_type: ServiceType,
    pub service_id: Uuid,
    pub service_provider_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_days: i32,
    pub base_cost: Decimal,
    pub additional_charges: Decimal,
    pub discount: Decimal,
    pub total_cost: Decimal,
    pub security_deposit: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub special_requests: Option<String>,
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,
    pub notes: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub emergency_contact: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<Uuid>,
    pub refund_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const BOOKING_COLUMNS: &str = "id, booking_reference, user_id, service_type, service_id, \
     service_provider_id, start_date, end_date, duration_days, base_cost, additional_charges, \
     discount, total_cost, security_deposit, status, payment_status, special_requests, \
     pickup_location, drop_location, notes, contact_name, contact_phone, contact_email, \
     emergency_contact, cancelled_at, cancellation_reason, cancelled_by, refund_amount, \
     created_at, updated_at";

/// One candidate public reference: "TC" followed by eight random digits.
pub fn new_reference_candidate() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..BOOKING_REFERENCE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect();
    format!("{}{}", BOOKING_REFERENCE_PREFIX, digits)
}

/// Everything needed to persist a booking, with costs already computed.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub service_type: ServiceType,
    pub service_id: Uuid,
    pub service_provider_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_days: i32,
    pub base_cost: Decimal,
    pub additional_charges: Decimal,
    pub discount: Decimal,
    pub total_cost: Decimal,
    pub security_deposit: Decimal,
    pub special_requests: Option<String>,
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub emergency_contact: Option<String>,
}

impl Booking {
    /// Persist a booking, allocating its reference on the way in. The
    /// reference is generated once per attempt and retried only when the
    /// unique constraint on the column reports a collision; the attempt
    /// bound exists so a pathological collision rate cannot loop forever.
    pub async fn create(pool: &PgPool, new_booking: NewBooking) -> Result<Self, AppError> {
        let insert_query = format!(
            "INSERT INTO bookings (booking_reference, user_id, service_type, service_id,
                 service_provider_id, start_date, end_date, duration_days, base_cost,
                 additional_charges, discount, total_cost, security_deposit,
                 special_requests, pickup_location, drop_location, contact_name,
                 contact_phone, contact_email, emergency_contact)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING {BOOKING_COLUMNS}"
        );

        for _ in 0..MAX_BOOKING_REFERENCE_ATTEMPTS {
            let reference = new_reference_candidate();

            let inserted = sqlx::query_as::<_, Booking>(&insert_query)
                .bind(&reference)
                .bind(new_booking.user_id)
                .bind(new_booking.service_type)
                .bind(new_booking.service_id)
                .bind(new_booking.service_provider_id)
                .bind(new_booking.start_date)
                .bind(new_booking.end_date)
                .bind(new_booking.duration_days)
                .bind(new_booking.base_cost)
                .bind(new_booking.additional_charges)
                .bind(new_booking.discount)
                .bind(new_booking.total_cost)
                .bind(new_booking.security_deposit)
                .bind(&new_booking.special_requests)
                .bind(&new_booking.pickup_location)
                .bind(&new_booking.drop_location)
                .bind(&new_booking.contact_name)
                .bind(&new_booking.contact_phone)
                .bind(&new_booking.contact_email)
                .bind(&new_booking.emergency_contact)
                .fetch_one(pool)
                .await;

            match inserted {
                Ok(booking) => return Ok(booking),
                Err(sqlx::Error::Database(db_err))
                    if db_err.is_unique_violation()
                        && db_err
                            .constraint()
                            .is_some_and(|c| c.contains("booking_reference")) =>
                {
                    tracing::warn!(%reference, "booking reference collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique booking reference".to_string(),
        ))
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, AppError> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(AppError::from)
    }

    /// Cancellation is allowed from any non-terminal status.
    pub fn can_be_cancelled(&self) -> bool {
        !self.status.is_terminal()
    }

    pub async fn cancel(
        pool: &PgPool,
        id: Uuid,
        cancelled_by: Uuid,
        reason: Option<&str>,
    ) -> Result<Self, AppError> {
        let query = format!(
            "UPDATE bookings
             SET status = 'cancelled',
                 cancelled_at = NOW(),
                 cancellation_reason = $1,
                 cancelled_by = $2,
                 updated_at = NOW()
             WHERE id = $3
               AND status NOT IN ('completed', 'cancelled', 'refunded')
             RETURNING {BOOKING_COLUMNS}"
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(reason)
            .bind(cancelled_by)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(tripcompass_shared::ERROR_BOOKING_NOT_CANCELLABLE.to_string())
            })
    }

    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Self, AppError> {
        let query = format!(
            "UPDATE bookings SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(status)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    pub fn to_response(&self, service_title: Option<String>) -> BookingResponse {
        BookingResponse {
            id: self.id,
            booking_reference: self.booking_reference.clone(),
            user_id: self.user_id,
            service_type: self.service_type,
            service_id: self.service_id,
            service_title,
            start_date: self.start_date,
            end_date: self.end_date,
            duration_days: self.duration_days,
            base_cost: self.base_cost,
            additional_charges: self.additional_charges,
            discount: self.discount,
            total_cost: self.total_cost,
            security_deposit: self.security_deposit,
            status: self.status,
            payment_status: self.payment_status,
            special_requests: self.special_requests.clone(),
            pickup_location: self.pickup_location.clone(),
            drop_location: self.drop_location.clone(),
            contact_name: self.contact_name.clone(),
            contact_phone: self.contact_phone.clone(),
            contact_email: self.contact_email.clone(),
            can_be_cancelled: self.can_be_cancelled(),
            cancelled_at: self.cancelled_at,
            cancellation_reason: self.cancellation_reason.clone(),
            refund_amount: self.refund_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn candidates_match_the_reference_format() {
        let reference = new_reference_candidate();
        assert_eq!(reference.len(), 10);
        assert!(reference.starts_with("TC"));
        assert!(reference[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn a_thousand_checked_references_are_distinct() {
        // Mirrors the allocation loop: regenerate on collision against the
        // set of already-issued references.
        let mut issued: HashSet<String> = HashSet::new();
        let reference_format = regex::Regex::new(r"^TC\d{8}$").unwrap();

        for _ in 0..1000 {
            let reference = loop {
                let candidate = new_reference_candidate();
                if !issued.contains(&candidate) {
                    break candidate;
                }
            };
            assert!(reference_format.is_match(&reference));
            assert!(issued.insert(reference));
        }

        assert_eq!(issued.len(), 1000);
    }
}
