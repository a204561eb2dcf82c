use rust_decimal::prelude::ToPrimitive;
use tripcompass_shared::{NearbyQuery, PickupLocationResponse, DEFAULT_SEARCH_RADIUS_KM, EARTH_RADIUS_KM};

/// Great-circle distance between two points in kilometers.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Parsed geo-search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOrigin {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
}

/// Parse the raw query into a search origin. Returns `None` when
/// coordinates are missing or not numeric, in which case the caller must
/// return the full unfiltered listing set. This fallback is deliberate
/// behavior, not missing validation.
pub fn parse_origin(query: &NearbyQuery) -> Option<SearchOrigin> {
    let lat = query.lat.as_deref()?.trim().parse::<f64>().ok()?;
    let lng = query.lng.as_deref()?.trim().parse::<f64>().ok()?;

    let radius_km = match query.radius.as_deref() {
        Some(raw) => raw.trim().parse::<f64>().ok()?,
        None => DEFAULT_SEARCH_RADIUS_KM,
    };

    Some(SearchOrigin { lat, lng, radius_km })
}

/// An item ranked by the distance to its closest geo-tagged pickup location.
#[derive(Debug, Clone)]
pub struct RankedItem<T> {
    pub item: T,
    pub distance_km: f64,
    pub closest_pickup: PickupLocationResponse,
}

/// Rank items by distance to their nearest pickup location and keep those
/// within the radius (inclusive), nearest first. Pickup locations missing
/// either coordinate are skipped; items with no usable location at all are
/// excluded from the result entirely.
pub fn rank_by_nearest_pickup<T>(
    items: Vec<(T, Vec<PickupLocationResponse>)>,
    origin: SearchOrigin,
) -> Vec<RankedItem<T>> {
    let mut ranked: Vec<RankedItem<T>> = items
        .into_iter()
        .filter_map(|(item, pickups)| {
            let closest = pickups
                .into_iter()
                .filter_map(|pickup| {
                    let lat = pickup.latitude.and_then(|d| d.to_f64())?;
                    let lng = pickup.longitude.and_then(|d| d.to_f64())?;
                    let distance = haversine_distance(origin.lat, origin.lng, lat, lng);
                    Some((distance, pickup))
                })
                .min_by(|(a, _), (b, _)| a.total_cmp(b))?;

            let (distance_km, closest_pickup) = closest;
            if distance_km <= origin.radius_km {
                Some(RankedItem {
                    item,
                    distance_km: round_km(distance_km),
                    closest_pickup,
                })
            } else {
                None
            }
        })
        .collect();

    // total_cmp keeps the sort stable for equal distances
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    fn pickup(lat: Option<&str>, lng: Option<&str>) -> PickupLocationResponse {
        PickupLocationResponse {
            id: Uuid::new_v4(),
            name: "Test stand".to_string(),
            address: "1 Test Street".to_string(),
            city_id: Uuid::new_v4(),
            latitude: lat.map(|v| Decimal::from_str(v).unwrap()),
            longitude: lng.map(|v| Decimal::from_str(v).unwrap()),
        }
    }

    fn query(lat: Option<&str>, lng: Option<&str>, radius: Option<&str>) -> NearbyQuery {
        NearbyQuery {
            lat: lat.map(str::to_string),
            lng: lng.map(str::to_string),
            radius: radius.map(str::to_string),
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_distance(12.9716, 77.5946, 12.9716, 77.5946), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_distance(12.9716, 77.5946, 13.0827, 80.2707);
        let ba = haversine_distance(13.0827, 80.2707, 12.9716, 77.5946);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_distance_bangalore_to_chennai() {
        // ~290 km as the crow flies
        let d = haversine_distance(12.9716, 77.5946, 13.0827, 80.2707);
        assert!(d > 280.0 && d < 300.0, "got {}", d);
    }

    #[test]
    fn origin_defaults_radius_to_ten_km() {
        let origin = parse_origin(&query(Some("12.5"), Some("77.5"), None)).unwrap();
        assert_eq!(origin.radius_km, DEFAULT_SEARCH_RADIUS_KM);
    }

    #[test]
    fn missing_or_malformed_coordinates_fall_back() {
        assert!(parse_origin(&query(None, None, None)).is_none());
        assert!(parse_origin(&query(Some("12.5"), None, None)).is_none());
        assert!(parse_origin(&query(Some("abc"), Some("77.5"), None)).is_none());
        assert!(parse_origin(&query(Some("12.5"), Some("77.5"), Some("wide"))).is_none());
    }

    #[test]
    fn items_without_geo_tagged_pickups_are_excluded() {
        let origin = SearchOrigin { lat: 12.9716, lng: 77.5946, radius_km: 1000.0 };
        let items = vec![
            ("no-coords", vec![pickup(None, None)]),
            ("half-coords", vec![pickup(Some("12.9716"), None)]),
            ("tagged", vec![pickup(Some("12.9716"), Some("77.5946"))]),
        ];

        let ranked = rank_by_nearest_pickup(items, origin);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item, "tagged");
        assert_eq!(ranked[0].distance_km, 0.0);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        // One degree of longitude at the equator is ~111.19 km; scale the
        // radius to sit exactly on the computed distance.
        let d = haversine_distance(0.0, 0.0, 0.0, 0.09);
        let origin = SearchOrigin { lat: 0.0, lng: 0.0, radius_km: d };
        let items = vec![("edge", vec![pickup(Some("0"), Some("0.09"))])];

        let ranked = rank_by_nearest_pickup(items, origin);
        assert_eq!(ranked.len(), 1, "distance exactly at the radius must be kept");
    }

    #[test]
    fn results_are_sorted_nearest_first() {
        let origin = SearchOrigin { lat: 0.0, lng: 0.0, radius_km: 500.0 };
        let items = vec![
            ("far", vec![pickup(Some("0"), Some("2.0"))]),
            ("near", vec![pickup(Some("0"), Some("0.5"))]),
            ("mid", vec![pickup(Some("0"), Some("1.0"))]),
        ];

        let ranked = rank_by_nearest_pickup(items, origin);
        let order: Vec<_> = ranked.iter().map(|r| r.item).collect();
        assert_eq!(order, vec!["near", "mid", "far"]);
    }

    #[test]
    fn closest_of_several_pickups_wins() {
        let origin = SearchOrigin { lat: 0.0, lng: 0.0, radius_km: 500.0 };
        let near = pickup(Some("0"), Some("0.1"));
        let near_id = near.id;
        let items = vec![("multi", vec![pickup(Some("0"), Some("3.0")), near])];

        let ranked = rank_by_nearest_pickup(items, origin);
        assert_eq!(ranked[0].closest_pickup.id, near_id);
    }

    #[test]
    fn negative_radius_yields_empty_results() {
        let origin = SearchOrigin { lat: 0.0, lng: 0.0, radius_km: -1.0 };
        let items = vec![("here", vec![pickup(Some("0"), Some("0"))])];
        assert!(rank_by_nearest_pickup(items, origin).is_empty());
    }
}
