use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::database::Database;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{City, PickupLocation};
use tripcompass_shared::{CreateCityRequest, CreatePickupLocationRequest};

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PickupLocationFilter {
    pub city: Option<Uuid>,
}

pub async fn list_cities(db: web::Data<Database>) -> Result<HttpResponse, AppError> {
    let cities = City::list(db.pool()).await?;
    let responses: Vec<_> = cities.iter().map(City::to_response).collect();
    Ok(HttpResponse::Ok().json(responses))
}

pub async fn autocomplete_cities(
    db: web::Data<Database>,
    query: web::Query<AutocompleteQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) else {
        return Ok(HttpResponse::Ok().json(Vec::<serde_json::Value>::new()));
    };

    let cities = City::autocomplete(db.pool(), q).await?;
    let responses: Vec<_> = cities.iter().map(City::to_response).collect();
    Ok(HttpResponse::Ok().json(responses))
}

pub async fn create_city(
    db: web::Data<Database>,
    _user: AuthenticatedUser,
    request: web::Json<CreateCityRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let city = City::create(
        db.pool(),
        &request.name,
        &request.state,
        request.country.as_deref().unwrap_or("India"),
    )
    .await?;
    Ok(HttpResponse::Created().json(city.to_response()))
}

pub async fn list_pickup_locations(
    db: web::Data<Database>,
    query: web::Query<PickupLocationFilter>,
) -> Result<HttpResponse, AppError> {
    let locations = PickupLocation::list(db.pool(), query.city).await?;
    let responses: Vec<_> = locations.iter().map(PickupLocation::to_response).collect();
    Ok(HttpResponse::Ok().json(responses))
}

pub async fn create_pickup_location(
    db: web::Data<Database>,
    _user: AuthenticatedUser,
    request: web::Json<CreatePickupLocationRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if City::find_by_id(db.pool(), request.city_id).await?.is_none() {
        return Err(AppError::NotFound("City not found".to_string()));
    }

    let location = PickupLocation::create(
        db.pool(),
        &request.name,
        &request.address,
        request.city_id,
        request.latitude,
        request.longitude,
    )
    .await?;
    Ok(HttpResponse::Created().json(location.to_response()))
}
