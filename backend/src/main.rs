use actix_cors::Cors;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tripcompass_backend::config::AppConfig;
use tripcompass_backend::database::Database;
use tripcompass_backend::error::AppError;
use tripcompass_backend::routes::{self, AppServices};
use tripcompass_backend::services::{
    AuthService, BookingService, ListingService, Mailer, ReviewService,
};
use tripcompass_backend::utils::jwt::JwtService;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting TripCompass backend on {}:{}", config.host, config.port);

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret)?);
    let mailer = Mailer::new(config.frontend_base_url.clone());

    let services = AppServices {
        auth_service: AuthService::new(database.pool().clone(), jwt_service.clone(), mailer),
        listing_service: ListingService::new(database.pool().clone()),
        booking_service: BookingService::new(database.pool().clone()),
        review_service: ReviewService::new(database.pool().clone()),
        jwt_service,
        database,
    };

    let bind_addr = (config.host.clone(), config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        let services = services.clone();
        App::new()
            .wrap(cors)
            .configure(move |cfg| routes::configure(cfg, &services))
    })
    .bind(bind_addr)?
    .run()
    .await
    .map_err(AppError::from)
}
