use actix_web::{web, Scope};
use std::sync::Arc;

use crate::database::Database;
use crate::handlers;
use crate::middleware::auth::AuthMiddleware;
use crate::services::{AuthService, BookingService, ListingService, ReviewService};
use crate::utils::jwt::JwtService;
use tripcompass_shared::ServiceType;

/// Everything the HTTP surface needs; built once at startup and cloned into
/// each worker.
#[derive(Clone)]
pub struct AppServices {
    pub database: Database,
    pub jwt_service: Arc<JwtService>,
    pub auth_service: AuthService,
    pub listing_service: ListingService,
    pub booking_service: BookingService,
    pub review_service: ReviewService,
}

/// Shared CRUD + search surface for one rentable vertical. The scope name
/// is the only thing that differs between bikes, cars, hotels and the rest;
/// the injected ServiceType keys every query underneath.
fn vertical_scope(service_type: ServiceType, jwt_service: Arc<JwtService>) -> Scope {
    web::scope(&format!("/{}", service_type.route_segment()))
        .app_data(web::Data::new(service_type))
        // Public endpoints
        .route("", web::get().to(handlers::listings::list_listings))
        .route("/featured", web::get().to(handlers::listings::featured_listings))
        .route("/nearby", web::get().to(handlers::listings::nearby_listings))
        .route("/{listing_id}", web::get().to(handlers::listings::get_listing))
        .route(
            "/{listing_id}/availability",
            web::get().to(handlers::listings::listing_availability),
        )
        .route(
            "/{listing_id}/reviews",
            web::get().to(handlers::listings::list_reviews),
        )
        // Protected endpoints
        .service(
            web::scope("")
                .wrap(AuthMiddleware::new(jwt_service))
                .route("", web::post().to(handlers::listings::create_listing))
                .route("/{listing_id}", web::put().to(handlers::listings::update_listing))
                .route(
                    "/{listing_id}",
                    web::delete().to(handlers::listings::delete_listing),
                )
                .route(
                    "/{listing_id}/availability",
                    web::put().to(handlers::listings::upsert_listing_availability),
                )
                .route(
                    "/{listing_id}/reviews",
                    web::post().to(handlers::listings::add_review),
                )
                .route(
                    "/{listing_id}/reviews/{review_id}",
                    web::delete().to(handlers::listings::delete_review),
                ),
        )
}

/// Register state and the full `/api/v1` tree on an actix App.
pub fn configure(cfg: &mut web::ServiceConfig, services: &AppServices) {
    let jwt_service = services.jwt_service.clone();

    let mut api = web::scope("/api/v1")
        .service(handlers::health::health_check)
        .service(
            web::scope("/auth")
                .service(handlers::auth::register)
                .service(handlers::auth::login)
                .service(handlers::auth::verify_email)
                .service(handlers::auth::resend_verification)
                // Protected auth endpoints
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware::new(jwt_service.clone()))
                        .service(handlers::auth::get_profile)
                        .service(handlers::auth::update_profile),
                ),
        )
        .service(
            web::scope("/bookings")
                .wrap(AuthMiddleware::new(jwt_service.clone()))
                .route("", web::post().to(handlers::bookings::create_booking))
                .route("", web::get().to(handlers::bookings::list_my_bookings))
                .route("/{booking_id}", web::get().to(handlers::bookings::get_booking))
                .route(
                    "/{booking_id}/cancel",
                    web::post().to(handlers::bookings::cancel_booking),
                )
                .route(
                    "/{booking_id}/status",
                    web::put().to(handlers::bookings::update_booking_status),
                ),
        )
        .service(
            web::scope("/stories")
                .route("", web::get().to(handlers::stories::list_stories))
                .route("/{story_id}", web::get().to(handlers::stories::get_story))
                .route("/{story_id}/like", web::post().to(handlers::stories::like_story))
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware::new(jwt_service.clone()))
                        .route("", web::post().to(handlers::stories::create_story)),
                ),
        )
        .service(
            web::scope("/insights")
                .route("", web::get().to(handlers::insights::list_insights))
                .route("/{insight_id}", web::get().to(handlers::insights::get_insight))
                .route(
                    "/{insight_id}/like",
                    web::post().to(handlers::insights::like_insight),
                )
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware::new(jwt_service.clone()))
                        .route("", web::post().to(handlers::insights::create_insight)),
                ),
        )
        .service(
            web::scope("/cities")
                .route("", web::get().to(handlers::locations::list_cities))
                .route(
                    "/autocomplete",
                    web::get().to(handlers::locations::autocomplete_cities),
                )
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware::new(jwt_service.clone()))
                        .route("", web::post().to(handlers::locations::create_city)),
                ),
        )
        .service(
            web::scope("/pickup-locations")
                .route("", web::get().to(handlers::locations::list_pickup_locations))
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware::new(jwt_service.clone()))
                        .route(
                            "",
                            web::post().to(handlers::locations::create_pickup_location),
                        ),
                ),
        );

    for service_type in ServiceType::ALL {
        api = api.service(vertical_scope(service_type, jwt_service.clone()));
    }

    cfg.app_data(web::Data::new(services.database.clone()))
        .app_data(web::Data::new(services.auth_service.clone()))
        .app_data(web::Data::new(services.listing_service.clone()))
        .app_data(web::Data::new(services.booking_service.clone()))
        .app_data(web::Data::new(services.review_service.clone()))
        .service(api);
}
