use rust_decimal::Decimal;
use std::time::Duration;

// JWT configuration
pub const JWT_ACCESS_TOKEN_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60); // 24 hours

// Pagination defaults
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

// Booking references: "TC" + 8 base-10 digits, unique across all bookings
pub const BOOKING_REFERENCE_PREFIX: &str = "TC";
pub const BOOKING_REFERENCE_DIGITS: usize = 8;
pub const MAX_BOOKING_REFERENCE_ATTEMPTS: u32 = 16;

// Geo search
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

// Featured listings: rating >= 4.0, total_trips >= 10, available, cap 12
pub const FEATURED_MIN_RATING: Decimal = Decimal::from_parts(40, 0, 0, false, 1); // 4.0
pub const FEATURED_MIN_TRIPS: i32 = 10;
pub const FEATURED_LIMIT: i64 = 12;

// Email verification
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;
pub const RESEND_VERIFICATION_COOLDOWN_SECS: u64 = 60;

// Review constraints
pub const MIN_REVIEW_RATING: i32 = 1;
pub const MAX_REVIEW_RATING: i32 = 5;

// Database connection pool
pub const DB_MAX_CONNECTIONS: u32 = 20;
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

// Success messages
pub const SUCCESS_REGISTRATION: &str =
    "Registration successful! Please check your email for a verification link.";
pub const SUCCESS_EMAIL_VERIFIED: &str =
    "Email verified successfully! You can now log in to your account.";
pub const SUCCESS_VERIFICATION_RESENT: &str =
    "New verification email sent successfully. Please check your inbox.";
pub const SUCCESS_BOOKING_CANCELLED: &str = "Booking cancelled successfully";

// Error messages
pub const ERROR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERROR_EMAIL_ALREADY_EXISTS: &str = "Email address is already registered";
pub const ERROR_USERNAME_ALREADY_EXISTS: &str = "Username is already taken";
pub const ERROR_EMAIL_NOT_VERIFIED: &str =
    "Please verify your email address before logging in.";
pub const ERROR_INVALID_VERIFICATION_TOKEN: &str =
    "Verification token is invalid or has expired. Please request a new verification email.";
pub const ERROR_RESEND_COOLDOWN: &str =
    "Please wait before requesting another verification email.";
pub const ERROR_DUPLICATE_REVIEW: &str = "You have already reviewed this listing";
pub const ERROR_BOOKING_NOT_CANCELLABLE: &str =
    "Booking can no longer be cancelled in its current status";
