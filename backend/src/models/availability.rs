use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tripcompass_shared::AvailabilityResponse;
use uuid::Uuid;

use crate::error::AppError;

/// Per-date override of a listing's bookable state. The ledger stores
/// exceptions only: a date with no row is available by convention, and every
/// query in this module preserves that default.
#[derive(Debug, Clone, FromRow)]
pub struct AvailabilityRecord {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub date: NaiveDate,
    pub is_available: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const AVAILABILITY_COLUMNS: &str =
    "id, listing_id, date, is_available, notes, created_at, updated_at";

impl AvailabilityRecord {
    /// Is the listing bookable on this date? Defaults to `true` when no
    /// override row exists.
    pub async fn is_available(
        pool: &PgPool,
        listing_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, AppError> {
        let stored: Option<(bool,)> = sqlx::query_as(
            "SELECT is_available FROM listing_availability
             WHERE listing_id = $1 AND date = $2",
        )
        .bind(listing_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

        Ok(stored.map(|(flag,)| flag).unwrap_or(true))
    }

    /// Calendar rows for a listing, optionally clamped to a date window.
    /// An inverted window matches nothing and returns an empty calendar.
    pub async fn for_listing(
        pool: &PgPool,
        listing_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Self>, AppError> {
        let mut query = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM listing_availability WHERE listing_id = $1"
        );
        let mut param = 2;
        if start_date.is_some() {
            query.push_str(&format!(" AND date >= ${param}"));
            param += 1;
        }
        if end_date.is_some() {
            query.push_str(&format!(" AND date <= ${param}"));
        }
        query.push_str(" ORDER BY date");

        let mut q = sqlx::query_as::<_, AvailabilityRecord>(&query).bind(listing_id);
        if let Some(start) = start_date {
            q = q.bind(start);
        }
        if let Some(end) = end_date {
            q = q.bind(end);
        }

        q.fetch_all(pool).await.map_err(AppError::from)
    }

    /// Insert or overwrite the single row for (listing, date). The unique
    /// constraint guarantees at most one row per pair; a second write for
    /// the same date replaces the first.
    pub async fn upsert(
        pool: &PgPool,
        listing_id: Uuid,
        date: NaiveDate,
        is_available: bool,
        notes: &str,
    ) -> Result<Self, AppError> {
        let query = format!(
            "INSERT INTO listing_availability (listing_id, date, is_available, notes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (listing_id, date)
             DO UPDATE SET is_available = EXCLUDED.is_available,
                           notes = EXCLUDED.notes,
                           updated_at = NOW()
             RETURNING {AVAILABILITY_COLUMNS}"
        );

        sqlx::query_as::<_, AvailabilityRecord>(&query)
            .bind(listing_id)
            .bind(date)
            .bind(is_available)
            .bind(notes)
            .fetch_one(pool)
            .await
            .map_err(AppError::from)
    }

    /// True when the listing has at least one explicit not-available day in
    /// `[start, end]`. Listings with no rows in the window pass as available.
    pub async fn has_blocked_date(
        pool: &PgPool,
        listing_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let blocked: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM listing_availability
                 WHERE listing_id = $1
                   AND date BETWEEN $2 AND $3
                   AND is_available = FALSE
             )",
        )
        .bind(listing_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(pool)
        .await?;

        Ok(blocked.0)
    }

    pub fn to_response(&self) -> AvailabilityResponse {
        AvailabilityResponse {
            listing_id: self.listing_id,
            date: self.date,
            is_available: self.is_available,
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
