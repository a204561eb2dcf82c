pub mod auth_service;
pub mod booking_service;
pub mod listing_service;
pub mod mailer;
pub mod review_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use listing_service::ListingService;
pub use mailer::Mailer;
pub use review_service::ReviewService;
