use std::collections::BTreeMap;

use foundation::bounds::Aabb2;
use foundation::geo::GeoPoint;

use crate::layer::{LayerId, MapSurface, OverlaySpec};
use crate::symbology::HighlightStyle;

/// Viewport change requested from the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewChange {
    SetView { center: GeoPoint, zoom: u8 },
    FitBounds(Aabb2),
    PanTo(GeoPoint),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLayer {
    pub title: String,
    pub feature_count: usize,
    pub bounds: Option<Aabb2>,
    pub style: HighlightStyle,
    pub tooltips: Vec<String>,
}

/// In-memory [`MapSurface`] that records every call.
///
/// Used by the command line front end and as the rendering double in tests.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_id: u64,
    layers: BTreeMap<LayerId, HeadlessLayer>,
    /// Bottom to top.
    z_order: Vec<LayerId>,
    views: Vec<ViewChange>,
    opacity_log: Vec<(LayerId, f32)>,
    removed: Vec<LayerId>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, id: LayerId) -> Option<&HeadlessLayer> {
        self.layers.get(&id)
    }

    pub fn live_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn top_layer(&self) -> Option<LayerId> {
        self.z_order.last().copied()
    }

    pub fn views(&self) -> &[ViewChange] {
        &self.views
    }

    pub fn last_view(&self) -> Option<&ViewChange> {
        self.views.last()
    }

    pub fn removed(&self) -> &[LayerId] {
        &self.removed
    }

    /// Opacity writes for `id`, oldest first.
    pub fn opacity_history(&self, id: LayerId) -> Vec<f32> {
        self.opacity_log
            .iter()
            .filter(|(l, _)| *l == id)
            .map(|(_, o)| *o)
            .collect()
    }
}

impl MapSurface for HeadlessSurface {
    fn add_overlay(&mut self, overlay: OverlaySpec<'_>) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let bounds = overlay
            .features
            .iter()
            .filter_map(|f| f.feature.bounds())
            .reduce(|a, b| a.union(&b));
        self.layers.insert(
            id,
            HeadlessLayer {
                title: overlay.title,
                feature_count: overlay.features.len(),
                bounds,
                style: overlay.style,
                tooltips: overlay.features.into_iter().map(|f| f.tooltip).collect(),
            },
        );
        self.z_order.push(id);
        id
    }

    fn remove_overlay(&mut self, id: LayerId) {
        if self.layers.remove(&id).is_some() {
            self.z_order.retain(|l| *l != id);
            self.removed.push(id);
        }
    }

    fn overlay_bounds(&self, id: LayerId) -> Option<Aabb2> {
        self.layers.get(&id)?.bounds
    }

    fn set_fill_opacity(&mut self, id: LayerId, opacity: f32) {
        let Some(layer) = self.layers.get_mut(&id) else {
            return;
        };
        layer.style.fill_opacity = opacity;
        self.opacity_log.push((id, opacity));
    }

    fn bring_to_front(&mut self, id: LayerId) {
        if let Some(pos) = self.z_order.iter().position(|l| *l == id) {
            let l = self.z_order.remove(pos);
            self.z_order.push(l);
        }
    }

    fn fit_bounds(&mut self, bounds: Aabb2) {
        self.views.push(ViewChange::FitBounds(bounds));
    }

    fn pan_to(&mut self, center: GeoPoint) {
        self.views.push(ViewChange::PanTo(center));
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.views.push(ViewChange::SetView { center, zoom });
    }
}
