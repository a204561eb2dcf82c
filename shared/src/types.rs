use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// User-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Traveller,
    ServiceProvider,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Traveller => write!(f, "traveller"),
            UserType::ServiceProvider => write!(f, "service_provider"),
        }
    }
}

/// Discriminator for every rentable vertical. Bookings reference a service
/// as (service_type, service_id) instead of an untyped foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Bike,
    Car,
    Campervan,
    Hotel,
    GuidedTrip,
    PilgrimTour,
    HolidayPackage,
    FullTour,
}

impl ServiceType {
    pub const ALL: [ServiceType; 8] = [
        ServiceType::Bike,
        ServiceType::Car,
        ServiceType::Campervan,
        ServiceType::Hotel,
        ServiceType::GuidedTrip,
        ServiceType::PilgrimTour,
        ServiceType::HolidayPackage,
        ServiceType::FullTour,
    ];

    /// URL path segment for the vertical, e.g. `guided-trips`.
    pub fn route_segment(&self) -> &'static str {
        match self {
            ServiceType::Bike => "bikes",
            ServiceType::Car => "cars",
            ServiceType::Campervan => "campervans",
            ServiceType::Hotel => "hotels",
            ServiceType::GuidedTrip => "guided-trips",
            ServiceType::PilgrimTour => "pilgrim-tours",
            ServiceType::HolidayPackage => "holiday-packages",
            ServiceType::FullTour => "full-tours",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Bike => write!(f, "bike"),
            ServiceType::Car => write!(f, "car"),
            ServiceType::Campervan => write!(f, "campervan"),
            ServiceType::Hotel => write!(f, "hotel"),
            ServiceType::GuidedTrip => write!(f, "guided_trip"),
            ServiceType::PilgrimTour => write!(f, "pilgrim_tour"),
            ServiceType::HolidayPackage => write!(f, "holiday_package"),
            ServiceType::FullTour => write!(f, "full_tour"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bike" => Ok(ServiceType::Bike),
            "car" => Ok(ServiceType::Car),
            "campervan" => Ok(ServiceType::Campervan),
            "hotel" => Ok(ServiceType::Hotel),
            "guided_trip" => Ok(ServiceType::GuidedTrip),
            "pilgrim_tour" => Ok(ServiceType::PilgrimTour),
            "holiday_package" => Ok(ServiceType::HolidayPackage),
            "full_tour" => Ok(ServiceType::FullTour),
            other => Err(format!("unknown service type: {}", other)),
        }
    }
}

// Booking-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    Refunded,
}

impl BookingStatus {
    /// Terminal states cannot transition anywhere, including cancellation.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Refunded
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Active => write!(f, "active"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    PartiallyPaid,
    Refunded,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::PartiallyPaid => write!(f, "partially_paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

// Insight-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "insight_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Tip,
    Trend,
    Destination,
    Seasonal,
    Budget,
    Safety,
    Culture,
    Food,
    Transport,
    Accommodation,
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightType::Tip => write!(f, "tip"),
            InsightType::Trend => write!(f, "trend"),
            InsightType::Destination => write!(f, "destination"),
            InsightType::Seasonal => write!(f, "seasonal"),
            InsightType::Budget => write!(f, "budget"),
            InsightType::Safety => write!(f, "safety"),
            InsightType::Culture => write!(f, "culture"),
            InsightType::Food => write!(f, "food"),
            InsightType::Transport => write!(f, "transport"),
            InsightType::Accommodation => write!(f, "accommodation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_block_cancellation() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Refunded.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(!BookingStatus::Active.is_terminal());
    }

    #[test]
    fn service_type_round_trips_through_str() {
        for service_type in ServiceType::ALL {
            let parsed: ServiceType = service_type.to_string().parse().unwrap();
            assert_eq!(parsed, service_type);
        }
        assert!("boat".parse::<ServiceType>().is_err());
    }

    #[test]
    fn route_segments_are_distinct() {
        let mut segments: Vec<_> = ServiceType::ALL.iter().map(|s| s.route_segment()).collect();
        segments.sort();
        segments.dedup();
        assert_eq!(segments.len(), ServiceType::ALL.len());
    }
}
