use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tripcompass_shared::{
    CreateListingRequest, ListingQuery, ServiceType, UpdateListingRequest, DEFAULT_PAGE_SIZE,
    FEATURED_LIMIT, FEATURED_MIN_RATING, FEATURED_MIN_TRIPS, MAX_PAGE_SIZE,
};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub service_type: ServiceType,
    pub title: String,
    pub model: String,
    pub description: Option<String>,
    pub city_id: Uuid,
    pub price_per_hour: Option<Decimal>,
    pub price_per_day: Decimal,
    pub price_per_week: Option<Decimal>,
    pub safety_deposit: Decimal,
    pub operating_hours: Option<String>,
    pub documents_required: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub available: bool,
    pub rating: Decimal,
    pub total_reviews: i32,
    pub total_trips: i32,
    pub service_provider_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

const LISTING_COLUMNS: &str = "id, service_type, title, model, description, city_id, \
     price_per_hour, price_per_day, price_per_week, safety_deposit, operating_hours, \
     documents_required, terms_and_conditions, available, rating, total_reviews, total_trips, \
     service_provider_id, created_at, updated_at";

/// Map the `ordering` query parameter onto a whitelisted ORDER BY clause.
/// Anything outside the whitelist falls back to newest-first.
fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("price_per_day") => "price_per_day ASC",
        Some("-price_per_day") => "price_per_day DESC",
        Some("rating") => "rating ASC",
        Some("-rating") => "rating DESC",
        Some("created_at") => "created_at ASC",
        _ => "created_at DESC",
    }
}

impl Listing {
    pub async fn create(
        pool: &PgPool,
        service_type: ServiceType,
        service_provider_id: Uuid,
        request: &CreateListingRequest,
    ) -> Result<Self, AppError> {
        let query = format!(
            "INSERT INTO listings (service_type, title, model, description, city_id,
                 price_per_hour, price_per_day, price_per_week, safety_deposit,
                 operating_hours, documents_required, terms_and_conditions, available,
                 service_provider_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {LISTING_COLUMNS}"
        );

        sqlx::query_as::<_, Listing>(&query)
            .bind(service_type)
            .bind(&request.title)
            .bind(&request.model)
            .bind(&request.description)
            .bind(request.city_id)
            .bind(request.price_per_hour)
            .bind(request.price_per_day)
            .bind(request.price_per_week)
            .bind(request.safety_deposit)
            .bind(&request.operating_hours)
            .bind(&request.documents_required)
            .bind(&request.terms_and_conditions)
            .bind(request.available.unwrap_or(true))
            .bind(service_provider_id)
            .fetch_one(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        service_type: ServiceType,
        id: Uuid,
    ) -> Result<Option<Self>, AppError> {
        let query =
            format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1 AND service_type = $2");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(service_type)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    /// Filtered, ordered, paginated search inside one vertical.
    ///
    /// A `start_date`/`end_date` pair drops every listing with at least one
    /// explicit not-available day inside the window; listings without any
    /// override rows pass through (default-available). An inverted window
    /// matches no rows and therefore excludes nothing.
    pub async fn search(
        pool: &PgPool,
        service_type: ServiceType,
        params: &ListingQuery,
    ) -> Result<ListingPage, AppError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let mut clauses = vec!["service_type = $1".to_string()];
        let mut param = 2;

        if params.available.is_some() {
            clauses.push(format!("available = ${param}"));
            param += 1;
        }
        if params.city.is_some() {
            clauses.push(format!("city_id = ${param}"));
            param += 1;
        }
        if params.min_price.is_some() {
            clauses.push(format!("price_per_day >= ${param}"));
            param += 1;
        }
        if params.max_price.is_some() {
            clauses.push(format!("price_per_day <= ${param}"));
            param += 1;
        }
        if params.search.is_some() {
            clauses.push(format!(
                "(title ILIKE ${param} OR model ILIKE ${param} OR description ILIKE ${param})"
            ));
            param += 1;
        }
        let date_window = params.start_date.zip(params.end_date);
        if date_window.is_some() {
            clauses.push(format!(
                "id NOT IN (SELECT listing_id FROM listing_availability
                            WHERE date BETWEEN ${param} AND ${} AND is_available = FALSE)",
                param + 1
            ));
        }

        let where_clause = clauses.join(" AND ");

        let count_query = format!("SELECT COUNT(*) FROM listings WHERE {where_clause}");
        let fetch_query = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE {where_clause}
             ORDER BY {} LIMIT {} OFFSET {}",
            order_clause(params.ordering.as_deref()),
            limit,
            offset
        );

        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(service_type);
        let mut fetch = sqlx::query_as::<_, Listing>(&fetch_query).bind(service_type);

        if let Some(available) = params.available {
            count = count.bind(available);
            fetch = fetch.bind(available);
        }
        if let Some(city) = params.city {
            count = count.bind(city);
            fetch = fetch.bind(city);
        }
        if let Some(min_price) = params.min_price {
            count = count.bind(min_price);
            fetch = fetch.bind(min_price);
        }
        if let Some(max_price) = params.max_price {
            count = count.bind(max_price);
            fetch = fetch.bind(max_price);
        }
        if let Some(search) = &params.search {
            let pattern = format!("%{}%", search);
            count = count.bind(pattern.clone());
            fetch = fetch.bind(pattern);
        }
        if let Some((start, end)) = date_window {
            count = count.bind(start).bind(end);
            fetch = fetch.bind(start).bind(end);
        }

        let total = count.fetch_one(pool).await?;
        let listings = fetch.fetch_all(pool).await?;

        Ok(ListingPage {
            listings,
            total,
            page,
            limit,
        })
    }

    /// Available listings for geo search, with no other filters applied.
    pub async fn find_available(
        pool: &PgPool,
        service_type: ServiceType,
    ) -> Result<Vec<Self>, AppError> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM listings
             WHERE service_type = $1 AND available = TRUE
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(service_type)
            .fetch_all(pool)
            .await
            .map_err(AppError::from)
    }

    /// Featured listings: highly rated, proven by trips, currently available.
    pub async fn featured(pool: &PgPool, service_type: ServiceType) -> Result<Vec<Self>, AppError> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM listings
             WHERE service_type = $1 AND rating >= $2 AND total_trips >= $3 AND available = TRUE
             ORDER BY rating DESC
             LIMIT $4"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(service_type)
            .bind(FEATURED_MIN_RATING)
            .bind(FEATURED_MIN_TRIPS)
            .bind(FEATURED_LIMIT)
            .fetch_all(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn update(
        pool: &PgPool,
        service_type: ServiceType,
        id: Uuid,
        request: &UpdateListingRequest,
    ) -> Result<Self, AppError> {
        let query = format!(
            "UPDATE listings
             SET title = COALESCE($1, title),
                 model = COALESCE($2, model),
                 description = COALESCE($3, description),
                 city_id = COALESCE($4, city_id),
                 price_per_hour = COALESCE($5, price_per_hour),
                 price_per_day = COALESCE($6, price_per_day),
                 price_per_week = COALESCE($7, price_per_week),
                 safety_deposit = COALESCE($8, safety_deposit),
                 operating_hours = COALESCE($9, operating_hours),
                 documents_required = COALESCE($10, documents_required),
                 terms_and_conditions = COALESCE($11, terms_and_conditions),
                 available = COALESCE($12, available),
                 updated_at = NOW()
             WHERE id = $13 AND service_type = $14
             RETURNING {LISTING_COLUMNS}"
        );

        sqlx::query_as::<_, Listing>(&query)
            .bind(&request.title)
            .bind(&request.model)
            .bind(&request.description)
            .bind(request.city_id)
            .bind(request.price_per_hour)
            .bind(request.price_per_day)
            .bind(request.price_per_week)
            .bind(request.safety_deposit)
            .bind(&request.operating_hours)
            .bind(&request.documents_required)
            .bind(&request.terms_and_conditions)
            .bind(request.available)
            .bind(id)
            .bind(service_type)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))
    }

    /// Listings are never hard-deleted while bookings may reference them;
    /// delisting just clears the available flag.
    pub async fn soft_delete(
        pool: &PgPool,
        service_type: ServiceType,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE listings SET available = FALSE, updated_at = NOW()
             WHERE id = $1 AND service_type = $2",
        )
        .bind(id)
        .bind(service_type)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Listing not found".to_string()));
        }
        Ok(())
    }

    /// Refresh the cached rating fields. Runs inside the same transaction
    /// as the review write that triggered it.
    pub async fn update_rating_cache(
        tx: &mut Transaction<'_, Postgres>,
        listing_id: Uuid,
        rating: Decimal,
        total_reviews: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE listings SET rating = $1, total_reviews = $2, updated_at = NOW()
             WHERE id = $3",
        )
        .bind(rating)
        .bind(total_reviews)
        .bind(listing_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Bump the completed-trip counter when a booking finishes.
    pub async fn increment_trips(pool: &PgPool, listing_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE listings SET total_trips = total_trips + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(listing_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_whitelist() {
        assert_eq!(order_clause(Some("price_per_day")), "price_per_day ASC");
        assert_eq!(order_clause(Some("-price_per_day")), "price_per_day DESC");
        assert_eq!(order_clause(Some("-rating")), "rating DESC");
        assert_eq!(order_clause(Some("created_at")), "created_at ASC");
    }

    #[test]
    fn unknown_ordering_falls_back_to_newest_first() {
        assert_eq!(order_clause(None), "created_at DESC");
        assert_eq!(order_clause(Some("-created_at")), "created_at DESC");
        assert_eq!(order_clause(Some("password_hash")), "created_at DESC");
        assert_eq!(order_clause(Some("; DROP TABLE listings")), "created_at DESC");
    }
}
