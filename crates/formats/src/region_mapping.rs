use foundation::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One municipality with the centroids used to frame the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    #[serde(rename = "SIDO_NM")]
    pub sido: String,
    #[serde(rename = "SGG_NM")]
    pub sgg: String,
    pub lat_sido: f64,
    pub lon_sido: f64,
    pub lat_sgg: f64,
    pub lon_sgg: f64,
}

impl RegionEntry {
    pub fn province_centroid(&self) -> GeoPoint {
        GeoPoint::from_lat_lon(self.lat_sido, self.lon_sido)
    }

    pub fn municipality_centroid(&self) -> GeoPoint {
        GeoPoint::from_lat_lon(self.lat_sgg, self.lon_sgg)
    }
}

#[derive(Debug, Error)]
pub enum RegionMappingError {
    #[error("region mapping parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Province/municipality lookup built from the mapping dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionDirectory {
    entries: Vec<RegionEntry>,
}

impl RegionDirectory {
    pub fn new(entries: Vec<RegionEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, RegionMappingError> {
        let entries: Vec<RegionEntry> = serde_json::from_str(payload)?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct province names in first-appearance order.
    pub fn provinces(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.sido.as_str()) {
                out.push(e.sido.as_str());
            }
        }
        out
    }

    /// Municipalities of `sido` in dataset order.
    pub fn municipalities(&self, sido: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.sido == sido)
            .map(|e| e.sgg.as_str())
            .collect()
    }

    /// First entry of the province; its province centroid frames the province.
    pub fn find_province(&self, sido: &str) -> Option<&RegionEntry> {
        self.entries.iter().find(|e| e.sido == sido)
    }

    pub fn find_municipality(&self, sido: &str, sgg: &str) -> Option<&RegionEntry> {
        self.entries.iter().find(|e| e.sido == sido && e.sgg == sgg)
    }
}
