use regex::Regex;

use crate::error::AppError;
use tripcompass_shared::{MAX_REVIEW_RATING, MIN_REVIEW_RATING};

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();

    if email.len() > 254 {
        return Err(AppError::Validation("Email address is too long".to_string()));
    }

    if !email_regex.is_match(email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }

    if username.len() > 50 {
        return Err(AppError::Validation(
            "Username must be at most 50 characters".to_string(),
        ));
    }

    let username_regex = Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap();
    if !username_regex.is_match(username) {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }

    Ok(())
}

/// Passwords only need a minimum length; anything stricter belongs in a
/// frontend policy.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be no more than 128 characters long".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_review_rating(rating: i32) -> Result<(), AppError> {
    if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
        return Err(AppError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_REVIEW_RATING, MAX_REVIEW_RATING
        )));
    }
    Ok(())
}

/// Booking date ranges must run forward. Availability query ranges are NOT
/// validated here: an inverted range is treated as empty by the ledger.
pub fn validate_booking_dates(
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::Validation(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok(())
}

/// Whole days spanned by a booking, minimum one.
pub fn booking_duration_days(
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
) -> i32 {
    let days = (end - start).num_days();
    days.max(1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_common_emails() {
        assert!(validate_email("rider@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has spaces").is_err());
        assert!(validate_username("fine_name-1.0").is_ok());
    }

    #[test]
    fn review_rating_bounds() {
        assert!(validate_review_rating(0).is_err());
        assert!(validate_review_rating(1).is_ok());
        assert!(validate_review_rating(5).is_ok());
        assert!(validate_review_rating(6).is_err());
    }

    #[test]
    fn inverted_booking_range_is_rejected() {
        let start = chrono::Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap();
        let end = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert!(validate_booking_dates(start, end).is_err());
        assert!(validate_booking_dates(end, start).is_ok());
    }

    #[test]
    fn duration_is_at_least_one_day() {
        let start = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let same_day = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
        let three_days = chrono::Utc.with_ymd_and_hms(2024, 1, 4, 10, 0, 0).unwrap();
        assert_eq!(booking_duration_days(start, same_day), 1);
        assert_eq!(booking_duration_days(start, three_days), 3);
    }
}
