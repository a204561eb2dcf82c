pub mod availability;
pub mod booking;
pub mod city;
pub mod insight;
pub mod listing;
pub mod pickup_location;
pub mod review;
pub mod story;
pub mod user;

pub use availability::AvailabilityRecord;
pub use booking::Booking;
pub use city::City;
pub use insight::Insight;
pub use listing::Listing;
pub use pickup_location::PickupLocation;
pub use review::Review;
pub use story::Story;
pub use user::User;
