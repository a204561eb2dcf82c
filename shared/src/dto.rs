use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// User DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    pub user_type: Option<UserType>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub user_type: UserType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub preferences: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email)]
    pub email: String,
}

// Listing DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub city_id: Uuid,

    pub price_per_hour: Option<Decimal>,
    pub price_per_day: Decimal,
    pub price_per_week: Option<Decimal>,
    pub safety_deposit: Decimal,

    pub operating_hours: Option<String>,
    pub documents_required: Option<String>,
    pub terms_and_conditions: Option<String>,

    #[serde(default)]
    pub pickup_location_ids: Vec<Uuid>,

    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub city_id: Option<Uuid>,
    pub price_per_hour: Option<Decimal>,
    pub price_per_day: Option<Decimal>,
    pub price_per_week: Option<Decimal>,
    pub safety_deposit: Option<Decimal>,
    pub operating_hours: Option<String>,
    pub documents_required: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub pickup_location_ids: Option<Vec<Uuid>>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub service_type: ServiceType,
    pub title: String,
    pub model: String,
    pub description: Option<String>,
    pub city: Option<CityResponse>,
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
    pub pickup_locations: Vec<PickupLocationResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing search filters. Dates bound the availability window: a listing
/// is dropped when it has an explicit not-available day inside the range.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub city: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Raw geo-search parameters. Kept as strings on purpose: a missing or
/// non-numeric value degrades to the unfiltered listing set instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyListingResponse {
    #[serde(flatten)]
    pub listing: ListingResponse,
    pub distance_km: f64,
    pub closest_pickup_location: PickupLocationResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingListResponse {
    pub results: Vec<ListingResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// Availability DTOs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertAvailabilityRequest {
    pub date: NaiveDate,
    pub is_available: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub listing_id: Uuid,
    pub date: NaiveDate,
    pub is_available: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Review DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(min = 1, max = 5000))]
    pub review_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub rating: i32,
    pub review_text: String,
    pub verified_booking: bool,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
}

// Booking DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub service_type: ServiceType,
    pub service_id: Uuid,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub base_cost: Decimal,
    pub additional_charges: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub security_deposit: Option<Decimal>,

    pub special_requests: Option<String>,
    pub pickup_location: Option<String>,
    pub drop_location: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub contact_name: String,

    #[validate(length(min = 5, max = 15))]
    pub contact_phone: String,

    #[validate(email)]
    pub contact_email: String,

    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub booking_reference: String,
    pub user_id: Uuid,
    pub service_type: ServiceType,
    pub service_id: Uuid,
    pub service_title: Option<String>,
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
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub can_be_cancelled: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub refund_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

// Story DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(length(min = 1, max = 500))]
    pub summary: String,

    pub city_id: Uuid,
    pub specific_place: Option<String>,
    pub place_type: Option<String>,
    pub journey_type: Option<String>,
    pub duration_days: Option<i32>,
    pub travel_date: Option<NaiveDate>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author: Option<String>,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub city: Option<CityResponse>,
    pub specific_place: Option<String>,
    pub place_type: Option<String>,
    pub journey_type: Option<String>,
    pub duration_days: Option<i32>,
    pub travel_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub likes: i32,
    pub views: i32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryQuery {
    pub city: Option<Uuid>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Insight DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInsightRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(length(min = 1, max = 500))]
    pub summary: String,

    pub insight_type: InsightType,
    pub category: String,

    #[serde(default)]
    pub relevant_states: Vec<String>,
    #[serde(default)]
    pub relevant_cities: Vec<String>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub insight_type: InsightType,
    pub category: String,
    pub relevant_states: Vec<String>,
    pub relevant_cities: Vec<String>,
    pub is_global: bool,
    pub tags: Vec<String>,
    pub views: i32,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightQuery {
    pub insight_type: Option<InsightType>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Reference data DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCityRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityResponse {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePickupLocationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1))]
    pub address: String,

    pub city_id: Uuid,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupLocationResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city_id: Uuid,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

// Generic message payload
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
