use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AvailabilityRecord, City, Listing, PickupLocation};
use crate::utils::geo::{self, RankedItem};
use tripcompass_shared::{
    AvailabilityQuery, AvailabilityResponse, CityResponse, CreateListingRequest, ListingListResponse,
    ListingQuery, ListingResponse, NearbyListingResponse, NearbyQuery, PickupLocationResponse,
    ServiceType, UpdateListingRequest, UpsertAvailabilityRequest,
};

/// Geo-search outcome: either ranked matches, or the deliberate fallback to
/// the full set when the caller's coordinates were missing or malformed.
pub enum NearbyResults {
    Ranked(Vec<NearbyListingResponse>),
    Unfiltered(Vec<ListingResponse>),
}

#[derive(Clone)]
pub struct ListingService {
    pool: PgPool,
}

impl ListingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        service_type: ServiceType,
        provider_id: Uuid,
        request: &CreateListingRequest,
    ) -> Result<ListingResponse, AppError> {
        if City::find_by_id(&self.pool, request.city_id).await?.is_none() {
            return Err(AppError::NotFound("City not found".to_string()));
        }

        let listing = Listing::create(&self.pool, service_type, provider_id, request).await?;

        if !request.pickup_location_ids.is_empty() {
            let mut tx = self.pool.begin().await?;
            PickupLocation::set_for_listing(&mut tx, listing.id, &request.pickup_location_ids)
                .await?;
            tx.commit().await?;
        }

        self.to_response(listing).await
    }

    pub async fn get(
        &self,
        service_type: ServiceType,
        id: Uuid,
    ) -> Result<ListingResponse, AppError> {
        let listing = Listing::find_by_id(&self.pool, service_type, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;
        self.to_response(listing).await
    }

    pub async fn search(
        &self,
        service_type: ServiceType,
        params: &ListingQuery,
    ) -> Result<ListingListResponse, AppError> {
        let page = Listing::search(&self.pool, service_type, params).await?;
        let results = self.to_responses(page.listings).await?;

        Ok(ListingListResponse {
            results,
            total: page.total,
            page: page.page,
            limit: page.limit,
        })
    }

    pub async fn featured(
        &self,
        service_type: ServiceType,
    ) -> Result<Vec<ListingResponse>, AppError> {
        let listings = Listing::featured(&self.pool, service_type).await?;
        self.to_responses(listings).await
    }

    pub async fn update(
        &self,
        service_type: ServiceType,
        id: Uuid,
        provider_id: Uuid,
        request: &UpdateListingRequest,
    ) -> Result<ListingResponse, AppError> {
        self.authorize_owner(service_type, id, provider_id).await?;

        let listing = Listing::update(&self.pool, service_type, id, request).await?;

        if let Some(pickup_location_ids) = &request.pickup_location_ids {
            let mut tx = self.pool.begin().await?;
            PickupLocation::set_for_listing(&mut tx, listing.id, pickup_location_ids).await?;
            tx.commit().await?;
        }

        self.to_response(listing).await
    }

    pub async fn delete(
        &self,
        service_type: ServiceType,
        id: Uuid,
        provider_id: Uuid,
    ) -> Result<(), AppError> {
        self.authorize_owner(service_type, id, provider_id).await?;
        Listing::soft_delete(&self.pool, service_type, id).await
    }

    /// Rank available listings by distance to their nearest pickup location.
    /// Missing or malformed coordinates skip the geo filter entirely and
    /// return the plain available set; do not "fix" this into an error.
    pub async fn nearby(
        &self,
        service_type: ServiceType,
        query: &NearbyQuery,
    ) -> Result<NearbyResults, AppError> {
        let listings = Listing::find_available(&self.pool, service_type).await?;

        let origin = match geo::parse_origin(query) {
            Some(origin) => origin,
            None => {
                return Ok(NearbyResults::Unfiltered(
                    self.to_responses(listings).await?,
                ))
            }
        };

        let pickup_map = self.load_pickup_map(&listings).await?;
        let candidates: Vec<(Listing, Vec<PickupLocationResponse>)> = listings
            .into_iter()
            .map(|listing| {
                let pickups = pickup_map.get(&listing.id).cloned().unwrap_or_default();
                (listing, pickups)
            })
            .collect();

        let ranked = geo::rank_by_nearest_pickup(candidates, origin);

        let mut results = Vec::with_capacity(ranked.len());
        for RankedItem {
            item,
            distance_km,
            closest_pickup,
        } in ranked
        {
            results.push(NearbyListingResponse {
                listing: self.to_response(item).await?,
                distance_km,
                closest_pickup_location: closest_pickup,
            });
        }

        Ok(NearbyResults::Ranked(results))
    }

    /// Availability calendar rows for one listing.
    pub async fn availability(
        &self,
        service_type: ServiceType,
        id: Uuid,
        query: &AvailabilityQuery,
    ) -> Result<Vec<AvailabilityResponse>, AppError> {
        // 404 on unknown listing, empty calendar otherwise
        Listing::find_by_id(&self.pool, service_type, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        let records =
            AvailabilityRecord::for_listing(&self.pool, id, query.start_date, query.end_date)
                .await?;
        Ok(records.iter().map(AvailabilityRecord::to_response).collect())
    }

    /// Owner-only upsert of one calendar day.
    pub async fn upsert_availability(
        &self,
        service_type: ServiceType,
        id: Uuid,
        provider_id: Uuid,
        request: &UpsertAvailabilityRequest,
    ) -> Result<AvailabilityResponse, AppError> {
        self.authorize_owner(service_type, id, provider_id).await?;

        let record = AvailabilityRecord::upsert(
            &self.pool,
            id,
            request.date,
            request.is_available,
            request.notes.as_deref().unwrap_or(""),
        )
        .await?;
        Ok(record.to_response())
    }

    async fn authorize_owner(
        &self,
        service_type: ServiceType,
        id: Uuid,
        provider_id: Uuid,
    ) -> Result<Listing, AppError> {
        let listing = Listing::find_by_id(&self.pool, service_type, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        if listing.service_provider_id != provider_id {
            return Err(AppError::Authorization(
                "Only the listing owner may modify it".to_string(),
            ));
        }
        Ok(listing)
    }

    async fn load_pickup_map(
        &self,
        listings: &[Listing],
    ) -> Result<HashMap<Uuid, Vec<PickupLocationResponse>>, AppError> {
        let mut map: HashMap<Uuid, Vec<PickupLocationResponse>> = HashMap::new();
        for listing in listings {
            let pickups = PickupLocation::for_listing(&self.pool, listing.id).await?;
            map.insert(
                listing.id,
                pickups.iter().map(PickupLocation::to_response).collect(),
            );
        }
        Ok(map)
    }

    async fn to_response(&self, listing: Listing) -> Result<ListingResponse, AppError> {
        let city = City::find_by_id(&self.pool, listing.city_id)
            .await?
            .map(|c| c.to_response());
        let pickup_locations = PickupLocation::for_listing(&self.pool, listing.id)
            .await?
            .iter()
            .map(PickupLocation::to_response)
            .collect();

        Ok(build_response(listing, city, pickup_locations))
    }

    async fn to_responses(
        &self,
        listings: Vec<Listing>,
    ) -> Result<Vec<ListingResponse>, AppError> {
        let mut responses = Vec::with_capacity(listings.len());
        for listing in listings {
            responses.push(self.to_response(listing).await?);
        }
        Ok(responses)
    }
}

fn build_response(
    listing: Listing,
    city: Option<CityResponse>,
    pickup_locations: Vec<PickupLocationResponse>,
) -> ListingResponse {
    ListingResponse {
        id: listing.id,
        service_type: listing.service_type,
        title: listing.title,
        model: listing.model,
        description: listing.description,
        city,
        price_per_hour: listing.price_per_hour,
        price_per_day: listing.price_per_day,
        price_per_week: listing.price_per_week,
        safety_deposit: listing.safety_deposit,
        operating_hours: listing.operating_hours,
        documents_required: listing.documents_required,
        terms_and_conditions: listing.terms_and_conditions,
        available: listing.available,
        rating: listing.rating,
        total_reviews: listing.total_reviews,
        total_trips: listing.total_trips,
        service_provider_id: listing.service_provider_id,
        pickup_locations,
        created_at: listing.created_at,
        updated_at: listing.updated_at,
    }
}
