//! Great-circle distance between two coordinates.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Mean Earth radius in kilometers (for Haversine formula)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[schema(example = -7.005)]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    #[schema(example = 110.0)]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance in kilometers from `self` to `other`
    pub fn distance_km_to(&self, other: &Coordinates) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance in kilometers.
///
/// Inputs are degrees and are not range-checked.
pub fn distance_km(lat_base: f64, lon_base: f64, lat_target: f64, lon_target: f64) -> f64 {
    let lat_base_rad = lat_base.to_radians();
    let lat_target_rad = lat_target.to_radians();
    let delta_lat = (lat_target - lat_base).to_radians();
    let delta_lon = (lon_target - lon_base).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_base_rad.cos() * lat_target_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
