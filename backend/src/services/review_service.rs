use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::review::aggregate_ratings;
use crate::models::{Listing, Review};
use crate::utils::validation::validate_review_rating;
use tripcompass_shared::{CreateReviewRequest, ReviewResponse, ServiceType};

#[derive(Clone)]
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a review and recompute the listing's cached rating fields as
    /// one atomic unit. Running both inside a single transaction is what
    /// keeps the cache from ever observing a half-applied review.
    pub async fn add_review(
        &self,
        service_type: ServiceType,
        listing_id: Uuid,
        user_id: Uuid,
        request: &CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        validate_review_rating(request.rating)?;

        let listing = Listing::find_by_id(&self.pool, service_type, listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        let verified_booking = self.has_booked(user_id, service_type, listing.id).await?;

        let mut tx = self.pool.begin().await?;

        let review = Review::create(
            &mut tx,
            listing.id,
            user_id,
            request.rating,
            &request.review_text,
            verified_booking,
        )
        .await?;

        let ratings = Review::ratings_for_listing(&mut tx, listing.id).await?;
        let (rating, total_reviews) = aggregate_ratings(&ratings);
        Listing::update_rating_cache(&mut tx, listing.id, rating, total_reviews).await?;

        tx.commit().await?;

        info!(listing_id = %listing.id, %rating, total_reviews, "review added, rating recomputed");

        Ok(review.to_response(None))
    }

    /// Remove a caller's review, recomputing the cache in the same
    /// transaction. Zero remaining reviews reset the cache to 0.0 / 0.
    pub async fn delete_review(
        &self,
        service_type: ServiceType,
        listing_id: Uuid,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let listing = Listing::find_by_id(&self.pool, service_type, listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        let mut tx = self.pool.begin().await?;

        Review::delete(&mut tx, listing.id, review_id, user_id).await?;

        let ratings = Review::ratings_for_listing(&mut tx, listing.id).await?;
        let (rating, total_reviews) = aggregate_ratings(&ratings);
        Listing::update_rating_cache(&mut tx, listing.id, rating, total_reviews).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_reviews(
        &self,
        service_type: ServiceType,
        listing_id: Uuid,
    ) -> Result<Vec<ReviewResponse>, AppError> {
        let listing = Listing::find_by_id(&self.pool, service_type, listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        let reviews = Review::list_for_listing(&self.pool, listing.id).await?;
        Ok(reviews
            .into_iter()
            .map(|(review, username)| review.to_response(Some(username)))
            .collect())
    }

    async fn has_booked(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
        service_id: Uuid,
    ) -> Result<bool, AppError> {
        let booked: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE user_id = $1 AND service_type = $2 AND service_id = $3
             )",
        )
        .bind(user_id)
        .bind(service_type)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(booked.0)
    }
}
