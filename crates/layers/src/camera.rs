use foundation::bounds::Aabb2;
use foundation::geo::GeoPoint;

use crate::layer::MapSurface;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraMove {
    FitBounds(Aabb2),
    PanTo(GeoPoint),
}

impl CameraMove {
    pub fn apply<S: MapSurface + ?Sized>(&self, surface: &mut S) {
        match *self {
            CameraMove::FitBounds(b) => surface.fit_bounds(b),
            CameraMove::PanTo(p) => surface.pan_to(p),
        }
    }
}

/// Fits wide overlays, pans to small ones so the current zoom is kept.
pub fn frame_overlay(bounds: &Aabb2, threshold_deg: f64) -> CameraMove {
    if bounds.lat_span() > threshold_deg || bounds.lon_span() > threshold_deg {
        CameraMove::FitBounds(*bounds)
    } else {
        CameraMove::PanTo(bounds.center())
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraMove, frame_overlay};
    use foundation::bounds::Aabb2;
    use foundation::geo::GeoPoint;

    #[test]
    fn small_overlay_pans_to_center() {
        let b = Aabb2::new([127.0, 37.0], [127.2, 37.3]);
        assert_eq!(frame_overlay(&b, 0.3), CameraMove::PanTo(GeoPoint::new(127.1, 37.15)));
    }

    #[test]
    fn wide_overlay_fits_bounds() {
        let tall = Aabb2::new([127.0, 37.0], [127.1, 37.31]);
        assert_eq!(frame_overlay(&tall, 0.3), CameraMove::FitBounds(tall));

        let wide = Aabb2::new([126.0, 37.0], [127.0, 37.1]);
        assert_eq!(frame_overlay(&wide, 0.3), CameraMove::FitBounds(wide));
    }
}
