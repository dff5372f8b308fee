use foundation::bounds::Aabb2;
use foundation::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Property names used to read a change-map feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeMapSchema {
    pub sido_key: String,
    pub sgg_key: String,
    pub before_key: String,
    pub after_key: String,
    pub changed_key: String,
}

impl Default for ChangeMapSchema {
    fn default() -> Self {
        Self {
            sido_key: "SIDO_NM".to_string(),
            sgg_key: "SGG_NM".to_string(),
            before_key: "type_2021".to_string(),
            after_key: "type_2023".to_string(),
            changed_key: "type_changed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellGeometry {
    Point(GeoPoint),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl CellGeometry {
    pub fn bounds(&self) -> Option<Aabb2> {
        match self {
            CellGeometry::Point(p) => Some(Aabb2::from_point(*p)),
            CellGeometry::Polygon(rings) => Aabb2::from_points(rings.iter().flatten()),
            CellGeometry::MultiPolygon(polys) => {
                Aabb2::from_points(polys.iter().flatten().flatten())
            }
        }
    }
}

/// One grid cell of the change map. Immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeFeature {
    pub id: Option<String>,
    /// `None` for a `"geometry": null` feature; the cell still tabulates but is never drawn.
    pub geometry: Option<CellGeometry>,
    pub sido: String,
    pub sgg: String,
    pub type_before: Option<String>,
    pub type_after: Option<String>,
    pub changed: bool,
}

impl ChangeFeature {
    pub fn bounds(&self) -> Option<Aabb2> {
        self.geometry.as_ref().and_then(CellGeometry::bounds)
    }
}

/// `true` iff the category differs between the years and at least one is present.
pub fn derive_changed(before: Option<&str>, after: Option<&str>) -> bool {
    match (before, after) {
        (None, None) => false,
        (b, a) => b != a,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeMap {
    pub features: Vec<ChangeFeature>,
}

#[derive(Debug, Error)]
pub enum ChangeMapError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl ChangeMap {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str, schema: &ChangeMapSchema) -> Result<Self, ChangeMapError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value, schema)
    }

    pub fn from_geojson_value(value: &Value, schema: &ChangeMapSchema) -> Result<Self, ChangeMapError> {
        let obj = value
            .as_object()
            .ok_or(ChangeMapError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(ChangeMapError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(ChangeMapError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(ChangeMapError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feature = parse_feature(feat_val, schema)
                .map_err(|reason| ChangeMapError::InvalidFeature { index, reason })?;
            features.push(feature);
        }

        Ok(Self { features })
    }
}

fn parse_feature(value: &Value, schema: &ChangeMapSchema) -> Result<ChangeFeature, String> {
    let feat_obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let empty = Map::new();
    let props = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .unwrap_or(&empty);

    let geometry = match feat_obj.get("geometry") {
        None | Some(Value::Null) => None,
        Some(geometry_val) => Some(parse_geometry(geometry_val)?),
    };

    let type_before = category_prop(props, &schema.before_key);
    let type_after = category_prop(props, &schema.after_key);
    let changed = match props.get(&schema.changed_key) {
        None | Some(Value::Null) => derive_changed(type_before.as_deref(), type_after.as_deref()),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => match s.trim() {
            "true" | "True" | "TRUE" | "1" => true,
            "false" | "False" | "FALSE" | "0" => false,
            other => return Err(format!("{} is not a boolean: {other}", schema.changed_key)),
        },
        Some(other) => return Err(format!("{} is not a boolean: {other}", schema.changed_key)),
    };

    Ok(ChangeFeature {
        id,
        geometry,
        sido: text_prop(props, &schema.sido_key).unwrap_or_default(),
        sgg: text_prop(props, &schema.sgg_key).unwrap_or_default(),
        type_before,
        type_after,
        changed,
    })
}

fn text_prop(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Empty strings count as an absent category.
fn category_prop(props: &Map<String, Value>, key: &str) -> Option<String> {
    text_prop(props, key).filter(|s| !s.is_empty())
}

fn parse_geometry(value: &Value) -> Result<CellGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(CellGeometry::Point(parse_point(coords)?)),
        "Polygon" => Ok(CellGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(CellGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_polygon(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}
