use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tripcompass_shared::ReviewResponse;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub verified_booking: bool,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const REVIEW_COLUMNS: &str = "id, listing_id, user_id, rating, review_text, verified_booking, \
     helpful_count, created_at, updated_at";

/// Mean rating and count over a review set. Zero reviews collapse to
/// (0.0, 0) rather than an error or NULL.
pub fn aggregate_ratings(ratings: &[i32]) -> (Decimal, i32) {
    if ratings.is_empty() {
        return (Decimal::ZERO, 0);
    }

    let sum: i64 = ratings.iter().map(|&r| r as i64).sum();
    let mean = Decimal::from(sum) / Decimal::from(ratings.len() as i64);
    (mean.round_dp(2), ratings.len() as i32)
}

impl Review {
    /// Insert a review inside an open transaction. The (listing, user)
    /// unique constraint turns duplicates into a Conflict.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        listing_id: Uuid,
        user_id: Uuid,
        rating: i32,
        review_text: &str,
        verified_booking: bool,
    ) -> Result<Self, AppError> {
        let query = format!(
            "INSERT INTO reviews (listing_id, user_id, rating, review_text, verified_booking)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {REVIEW_COLUMNS}"
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(listing_id)
            .bind(user_id)
            .bind(rating)
            .bind(review_text)
            .bind(verified_booking)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(e, tripcompass_shared::ERROR_DUPLICATE_REVIEW)
            })
    }

    /// All ratings for a listing, read inside the same transaction as the
    /// write that changed them.
    pub async fn ratings_for_listing(
        tx: &mut Transaction<'_, Postgres>,
        listing_id: Uuid,
    ) -> Result<Vec<i32>, AppError> {
        let rows: Vec<(i32,)> =
            sqlx::query_as("SELECT rating FROM reviews WHERE listing_id = $1")
                .bind(listing_id)
                .fetch_all(&mut **tx)
                .await?;

        Ok(rows.into_iter().map(|(rating,)| rating).collect())
    }

    pub async fn list_for_listing(
        pool: &PgPool,
        listing_id: Uuid,
    ) -> Result<Vec<(Self, String)>, AppError> {
        #[derive(FromRow)]
        struct ReviewWithAuthor {
            #[sqlx(flatten)]
            review: Review,
            username: String,
        }

        let query = "SELECT r.id, r.listing_id, r.user_id, r.rating, r.review_text, \
             r.verified_booking, r.helpful_count, r.created_at, r.updated_at, u.username
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.listing_id = $1
             ORDER BY r.created_at DESC";

        let rows = sqlx::query_as::<_, ReviewWithAuthor>(query)
            .bind(listing_id)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.review, row.username))
            .collect())
    }

    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        listing_id: Uuid,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM reviews WHERE id = $1 AND listing_id = $2 AND user_id = $3",
        )
        .bind(review_id)
        .bind(listing_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Review not found".to_string()));
        }
        Ok(())
    }

    pub fn to_response(&self, username: Option<String>) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            listing_id: self.listing_id,
            user_id: self.user_id,
            username,
            rating: self.rating,
            review_text: self.review_text.clone(),
            verified_booking: self.verified_booking,
            helpful_count: self.helpful_count,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mean_of_typical_ratings() {
        let (rating, count) = aggregate_ratings(&[4, 5, 3]);
        assert_eq!(rating, Decimal::from(4));
        assert_eq!(count, 3);
    }

    #[test]
    fn zero_reviews_collapse_to_zero() {
        let (rating, count) = aggregate_ratings(&[]);
        assert_eq!(rating, Decimal::ZERO);
        assert_eq!(count, 0);
    }

    #[test]
    fn mean_is_rounded_to_two_decimals() {
        let (rating, count) = aggregate_ratings(&[5, 4, 4]);
        assert_eq!(rating, Decimal::from_str("4.33").unwrap());
        assert_eq!(count, 3);
    }

    #[test]
    fn single_review_is_its_own_mean() {
        let (rating, count) = aggregate_ratings(&[2]);
        assert_eq!(rating, Decimal::from(2));
        assert_eq!(count, 1);
    }
}
