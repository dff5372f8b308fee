use std::collections::BTreeMap;

use compute::{ChangeFilter, Selection, select_cells};
use foundation::time::Time;
use formats::ChangeFeature;
use runtime::timer::{TaskId, TimerQueue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blink::BlinkSpec;
use crate::camera::{CameraMove, frame_overlay};
use crate::labels::{ABSENT_CATEGORY, TOOLTIP_TITLE, transition_label};
use crate::layer::{LayerId, MapSurface, OverlayFeature, OverlayKey, OverlaySpec};
use crate::symbology::HighlightStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Lat or lon span, in degrees, above which the camera fits the overlay.
    pub fit_threshold_deg: f64,
    pub blink: BlinkSpec,
    pub style: HighlightStyle,
    pub tooltip_title: String,
    pub absent_label: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            fit_threshold_deg: 0.3,
            blink: BlinkSpec::default(),
            style: HighlightStyle::default(),
            tooltip_title: TOOLTIP_TITLE.to_string(),
            absent_label: ABSENT_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HighlightOutcome {
    Shown {
        layer: LayerId,
        cells: usize,
        camera: Option<CameraMove>,
    },
    /// Nothing matched; any previous overlay for the key was still removed.
    NoMatchingCells,
}

#[derive(Debug, Clone)]
struct ActiveOverlay {
    layer: LayerId,
    cells: usize,
    blink: Option<TaskId>,
}

#[derive(Debug, Clone)]
struct BlinkStep {
    key: OverlayKey,
    layer: LayerId,
    step: u32,
}

/// Owns every highlight overlay on the map.
///
/// Invariant: at most one live overlay per category and at most one
/// all-changes overlay. Each overlay owns at most one pending blink task;
/// tearing the overlay down cancels it, so no timer ever writes to a layer
/// that is gone.
#[derive(Debug, Default)]
pub struct HighlightRegistry {
    config: HighlightConfig,
    categories: BTreeMap<String, ActiveOverlay>,
    all_changes: Option<ActiveOverlay>,
    timers: TimerQueue<BlinkStep>,
}

impl HighlightRegistry {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn live_overlay_count(&self) -> usize {
        self.categories.len() + usize::from(self.all_changes.is_some())
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn has_all_changes(&self) -> bool {
        self.all_changes.is_some()
    }

    pub fn layer_for(&self, key: &OverlayKey) -> Option<LayerId> {
        self.slot(key).map(|a| a.layer)
    }

    /// Categories with a live overlay, ascending.
    pub fn active_categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn pending_animations(&self) -> usize {
        self.timers.len()
    }

    /// When the next blink step is due, if any animation is running.
    pub fn next_animation_due(&self) -> Option<Time> {
        self.timers.next_due()
    }

    /// Highlights changed cells of `category` inside `selection`, replacing
    /// any overlay the category already had.
    pub fn show_category<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        features: &[ChangeFeature],
        category: &str,
        selection: &Selection,
        now: Time,
    ) -> HighlightOutcome {
        let key = OverlayKey::Category(category.to_string());
        self.teardown(surface, &key);

        let cells = select_cells(features, selection, &ChangeFilter::Category(category.to_string()));
        if cells.is_empty() {
            info!(%key, %selection, "no matching change cells");
            return HighlightOutcome::NoMatchingCells;
        }

        let count = cells.len();
        let layer = surface.add_overlay(self.overlay_spec(&cells));
        let blink = self.start_blink(&key, layer, now);

        let camera = surface
            .overlay_bounds(layer)
            .map(|b| frame_overlay(&b, self.config.fit_threshold_deg));
        if let Some(camera) = camera {
            camera.apply(surface);
        }

        info!(%key, %selection, cells = count, layer = layer.0, "overlay shown");
        self.categories.insert(
            category.to_string(),
            ActiveOverlay {
                layer,
                cells: count,
                blink: Some(blink),
            },
        );

        HighlightOutcome::Shown {
            layer,
            cells: count,
            camera,
        }
    }

    /// Returns `false` when the category had no overlay.
    pub fn hide_category<S: MapSurface + ?Sized>(&mut self, surface: &mut S, category: &str) -> bool {
        self.teardown(surface, &OverlayKey::Category(category.to_string()))
    }

    /// Highlights every changed cell inside `selection` on top of all other overlays.
    pub fn show_all_changes<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        features: &[ChangeFeature],
        selection: &Selection,
    ) -> HighlightOutcome {
        let key = OverlayKey::AllChanges;
        self.teardown(surface, &key);

        let cells = select_cells(features, selection, &ChangeFilter::AnyChange);
        if cells.is_empty() {
            info!(%key, %selection, "no changed cells");
            return HighlightOutcome::NoMatchingCells;
        }

        let count = cells.len();
        let layer = surface.add_overlay(self.overlay_spec(&cells));
        surface.bring_to_front(layer);

        info!(%key, %selection, cells = count, layer = layer.0, "overlay shown");
        self.all_changes = Some(ActiveOverlay {
            layer,
            cells: count,
            blink: None,
        });

        HighlightOutcome::Shown {
            layer,
            cells: count,
            camera: None,
        }
    }

    pub fn hide_all_changes<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.teardown(surface, &OverlayKey::AllChanges)
    }

    /// Removes every overlay and cancels every animation.
    pub fn clear<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        let keys: Vec<OverlayKey> = self
            .categories
            .keys()
            .cloned()
            .map(OverlayKey::Category)
            .chain(self.all_changes.as_ref().map(|_| OverlayKey::AllChanges))
            .collect();
        for key in keys {
            self.teardown(surface, &key);
        }
    }

    /// Applies every blink step due at or before `now`. Returns the number of steps run.
    pub fn advance<S: MapSurface + ?Sized>(&mut self, surface: &mut S, now: Time) -> usize {
        let mut ran = 0;
        while let Some((task, due, step)) = self.timers.pop_due(now) {
            let spec = self.config.blink.clone();
            let Some(active) = self.slot_mut(&step.key) else {
                continue;
            };
            if active.layer != step.layer || active.blink != Some(task) {
                continue;
            }

            surface.set_fill_opacity(step.layer, spec.opacity_for_step(step.step));
            ran += 1;

            if spec.is_last_step(step.step) {
                surface.set_fill_opacity(step.layer, spec.settle_opacity);
                if let Some(active) = self.slot_mut(&step.key) {
                    active.blink = None;
                }
                debug!(key = %step.key, "blink settled");
                continue;
            }

            let next = BlinkStep {
                step: step.step + 1,
                ..step
            };
            let key = next.key.clone();
            let id = self.timers.schedule(due + spec.tick(), next);
            if let Some(active) = self.slot_mut(&key) {
                active.blink = Some(id);
            }
        }
        ran
    }

    fn start_blink(&mut self, key: &OverlayKey, layer: LayerId, now: Time) -> TaskId {
        let spec = &self.config.blink;
        let first = now + spec.step_offset(0);
        self.timers.schedule(
            first,
            BlinkStep {
                key: key.clone(),
                layer,
                step: 0,
            },
        )
    }

    fn overlay_spec<'a>(&self, cells: &[&'a ChangeFeature]) -> OverlaySpec<'a> {
        let features = cells
            .iter()
            .map(|f| OverlayFeature {
                feature: *f,
                tooltip: transition_label(
                    f.type_before.as_deref(),
                    f.type_after.as_deref(),
                    &self.config.absent_label,
                ),
            })
            .collect();
        OverlaySpec {
            title: self.config.tooltip_title.clone(),
            features,
            style: self.config.style.clone(),
        }
    }

    fn teardown<S: MapSurface + ?Sized>(&mut self, surface: &mut S, key: &OverlayKey) -> bool {
        let removed = match key {
            OverlayKey::Category(c) => self.categories.remove(c),
            OverlayKey::AllChanges => self.all_changes.take(),
        };
        let Some(active) = removed else {
            return false;
        };
        if let Some(task) = active.blink {
            self.timers.cancel(task);
        }
        surface.remove_overlay(active.layer);
        debug!(%key, layer = active.layer.0, "overlay removed");
        true
    }

    fn slot(&self, key: &OverlayKey) -> Option<&ActiveOverlay> {
        match key {
            OverlayKey::Category(c) => self.categories.get(c),
            OverlayKey::AllChanges => self.all_changes.as_ref(),
        }
    }

    fn slot_mut(&mut self, key: &OverlayKey) -> Option<&mut ActiveOverlay> {
        match key {
            OverlayKey::Category(c) => self.categories.get_mut(c),
            OverlayKey::AllChanges => self.all_changes.as_mut(),
        }
    }
}
