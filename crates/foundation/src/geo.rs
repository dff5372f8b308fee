use serde::{Deserialize, Serialize};

/// WGS84 position in degrees. Longitude first, matching GeoJSON coordinate order.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn from_lat_lon(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}
