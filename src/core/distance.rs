use crate::models::{Location, UserProfile};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two coordinate pairs, using
/// the haversine formula. This is the sole distance computation used by both
/// filtering and scoring so the two stay consistent.
#[inline]
pub fn haversine_distance(a: Location, b: Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two profiles, or `None` when either location is unset.
#[inline]
pub fn distance_between(a: &UserProfile, b: &UserProfile) -> Option<f64> {
    match (a.location, b.location) {
        (Some(la), Some(lb)) => Some(haversine_distance(la, lb)),
        _ => None,
    }
}
