use crate::geo::GeoPoint;

/// Axis-aligned lon/lat bounding box, in degrees.
///
/// `min[0]`/`max[0]` are longitudes, `min[1]`/`max[1]` latitudes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn from_point(p: GeoPoint) -> Self {
        Aabb2 {
            min: [p.lon_deg, p.lat_deg],
            max: [p.lon_deg, p.lat_deg],
        }
    }

    /// Smallest box containing every point, `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        let mut it = points.into_iter();
        let mut out = Self::from_point(*it.next()?);
        for p in it {
            out.extend(*p);
        }
        Some(out)
    }

    pub fn extend(&mut self, p: GeoPoint) {
        self.min[0] = self.min[0].min(p.lon_deg);
        self.min[1] = self.min[1].min(p.lat_deg);
        self.max[0] = self.max[0].max(p.lon_deg);
        self.max[1] = self.max[1].max(p.lat_deg);
    }

    pub fn union(&self, other: &Self) -> Self {
        Aabb2 {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    pub fn lon_span(&self) -> f64 {
        (self.max[0] - self.min[0]).abs()
    }

    pub fn lat_span(&self) -> f64 {
        (self.max[1] - self.min[1]).abs()
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }
}
