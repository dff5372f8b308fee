use foundation::bounds::Aabb2;
use foundation::geo::GeoPoint;
use formats::ChangeFeature;

use crate::symbology::HighlightStyle;

/// Handle of a layer living on a [`MapSurface`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

/// Registry slot an overlay is owned by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlayKey {
    Category(String),
    AllChanges,
}

impl std::fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayKey::Category(c) => write!(f, "category:{c}"),
            OverlayKey::AllChanges => write!(f, "all-changes"),
        }
    }
}

/// A cell drawn by an overlay, with its hover text.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFeature<'a> {
    pub feature: &'a ChangeFeature,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec<'a> {
    /// Heading shown above every feature tooltip.
    pub title: String,
    pub features: Vec<OverlayFeature<'a>>,
    pub style: HighlightStyle,
}

/// Rendering capabilities the highlight logic relies on.
///
/// Implemented by whatever draws the map; the core never renders itself.
pub trait MapSurface {
    fn add_overlay(&mut self, overlay: OverlaySpec<'_>) -> LayerId;
    fn remove_overlay(&mut self, id: LayerId);
    /// Lon/lat extent of a live overlay.
    fn overlay_bounds(&self, id: LayerId) -> Option<Aabb2>;
    fn set_fill_opacity(&mut self, id: LayerId, opacity: f32);
    /// Draws `id` above every other overlay.
    fn bring_to_front(&mut self, id: LayerId);
    fn fit_bounds(&mut self, bounds: Aabb2);
    fn pan_to(&mut self, center: GeoPoint);
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
}
