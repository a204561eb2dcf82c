use sqlx::{FromRow, PgPool};
use tripcompass_shared::CityResponse;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub country: String,
}

impl City {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        state: &str,
        country: &str,
    ) -> Result<Self, AppError> {
        sqlx::query_as::<_, City>(
            "INSERT INTO cities (name, state, country)
             VALUES ($1, $2, $3)
             RETURNING id, name, state, country",
        )
        .bind(name)
        .bind(state)
        .bind(country)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, City>("SELECT id, name, state, country FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, AppError> {
        sqlx::query_as::<_, City>("SELECT id, name, state, country FROM cities ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(AppError::from)
    }

    /// Name-prefix autocomplete, capped at ten suggestions.
    pub async fn autocomplete(pool: &PgPool, query: &str) -> Result<Vec<Self>, AppError> {
        sqlx::query_as::<_, City>(
            "SELECT id, name, state, country FROM cities
             WHERE name ILIKE $1
             ORDER BY name
             LIMIT 10",
        )
        .bind(format!("%{}%", query))
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
    }

    pub fn to_response(&self) -> CityResponse {
        CityResponse {
            id: self.id,
            name: self.name.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
        }
    }
}
