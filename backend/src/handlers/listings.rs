use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::listing_service::NearbyResults;
use crate::services::{ListingService, ReviewService};
use tripcompass_shared::{
    AvailabilityQuery, CreateListingRequest, CreateReviewRequest, ListingQuery, NearbyQuery,
    ServiceType, UpdateListingRequest, UpsertAvailabilityRequest,
};

/// Every rentable vertical shares these handlers; the scope they are
/// mounted under injects its `ServiceType`.
pub async fn list_listings(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse, AppError> {
    let page = listing_service.search(**service_type, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn create_listing(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    user: AuthenticatedUser,
    request: web::Json<CreateListingRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let listing = listing_service
        .create(**service_type, user.user_id, &request)
        .await?;
    Ok(HttpResponse::Created().json(listing))
}

pub async fn get_listing(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let listing = listing_service
        .get(**service_type, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn update_listing(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<UpdateListingRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let listing = listing_service
        .update(**service_type, path.into_inner(), user.user_id, &request)
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn delete_listing(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    listing_service
        .delete(**service_type, path.into_inner(), user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Listing delisted successfully"
    })))
}

/// Nearby search. Without usable coordinates this intentionally degrades to
/// the plain available list instead of erroring.
pub async fn nearby_listings(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    query: web::Query<NearbyQuery>,
) -> Result<HttpResponse, AppError> {
    match listing_service.nearby(**service_type, &query).await? {
        NearbyResults::Ranked(results) => Ok(HttpResponse::Ok().json(results)),
        NearbyResults::Unfiltered(results) => Ok(HttpResponse::Ok().json(results)),
    }
}

pub async fn featured_listings(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
) -> Result<HttpResponse, AppError> {
    let listings = listing_service.featured(**service_type).await?;
    Ok(HttpResponse::Ok().json(listings))
}

pub async fn listing_availability(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    path: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, AppError> {
    let calendar = listing_service
        .availability(**service_type, path.into_inner(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(calendar))
}

pub async fn upsert_listing_availability(
    listing_service: web::Data<ListingService>,
    service_type: web::Data<ServiceType>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<UpsertAvailabilityRequest>,
) -> Result<HttpResponse, AppError> {
    let record = listing_service
        .upsert_availability(**service_type, path.into_inner(), user.user_id, &request)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn list_reviews(
    review_service: web::Data<ReviewService>,
    service_type: web::Data<ServiceType>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let reviews = review_service
        .list_reviews(**service_type, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub async fn add_review(
    review_service: web::Data<ReviewService>,
    service_type: web::Data<ServiceType>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let review = review_service
        .add_review(**service_type, path.into_inner(), user.user_id, &request)
        .await?;
    Ok(HttpResponse::Created().json(review))
}

pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    service_type: web::Data<ServiceType>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (listing_id, review_id) = path.into_inner();
    review_service
        .delete_review(**service_type, listing_id, review_id, user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Review deleted"
    })))
}
