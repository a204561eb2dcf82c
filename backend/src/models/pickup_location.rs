use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tripcompass_shared::PickupLocationResponse;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct PickupLocation {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city_id: Uuid,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl PickupLocation {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        address: &str,
        city_id: Uuid,
        latitude: Option<Decimal>,
        longitude: Option<Decimal>,
    ) -> Result<Self, AppError> {
        sqlx::query_as::<_, PickupLocation>(
            "INSERT INTO pickup_locations (name, address, city_id, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, address, city_id, latitude, longitude",
        )
        .bind(name)
        .bind(address)
        .bind(city_id)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, PickupLocation>(
            "SELECT id, name, address, city_id, latitude, longitude
             FROM pickup_locations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn list(pool: &PgPool, city_id: Option<Uuid>) -> Result<Vec<Self>, AppError> {
        match city_id {
            Some(city_id) => sqlx::query_as::<_, PickupLocation>(
                "SELECT id, name, address, city_id, latitude, longitude
                 FROM pickup_locations WHERE city_id = $1 ORDER BY name",
            )
            .bind(city_id)
            .fetch_all(pool)
            .await
            .map_err(AppError::from),
            None => sqlx::query_as::<_, PickupLocation>(
                "SELECT id, name, address, city_id, latitude, longitude
                 FROM pickup_locations ORDER BY name",
            )
            .fetch_all(pool)
            .await
            .map_err(AppError::from),
        }
    }

    pub async fn for_listing(pool: &PgPool, listing_id: Uuid) -> Result<Vec<Self>, AppError> {
        sqlx::query_as::<_, PickupLocation>(
            "SELECT p.id, p.name, p.address, p.city_id, p.latitude, p.longitude
             FROM pickup_locations p
             JOIN listing_pickup_locations lp ON lp.pickup_location_id = p.id
             WHERE lp.listing_id = $1
             ORDER BY p.name",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
    }

    /// Replace the pickup-location set attached to a listing.
    pub async fn set_for_listing(
        tx: &mut Transaction<'_, Postgres>,
        listing_id: Uuid,
        pickup_location_ids: &[Uuid],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM listing_pickup_locations WHERE listing_id = $1")
            .bind(listing_id)
            .execute(&mut **tx)
            .await?;

        for pickup_location_id in pickup_location_ids {
            sqlx::query(
                "INSERT INTO listing_pickup_locations (listing_id, pickup_location_id)
                 VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(listing_id)
            .bind(pickup_location_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    pub fn to_response(&self) -> PickupLocationResponse {
        PickupLocationResponse {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            city_id: self.city_id,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
