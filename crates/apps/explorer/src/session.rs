use std::path::PathBuf;

use catalog::{DatasetId, DatasetStore, LoadState};
use compute::{
    CountComparison, Selection, SelectionError, TransitionMatrix, build_transition_matrix,
    compare_counts, count_by_category, filter_region,
};
use formats::{
    ChangeMap, RegionDirectory, TabularRecord, load_change_map, load_region_directory,
    load_tabular,
};
use foundation::geo::GeoPoint;
use foundation::time::Time;
use layers::{HighlightOutcome, HighlightRegistry, MapSurface};
use runtime::event_bus::{Diagnostic, DiagnosticKind, EventBus};
use runtime::readiness::Readiness;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ExplorerConfig;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("tabular datasets are not loaded yet")]
    TabularNotReady,
    #[error("change map is not loaded yet")]
    GeometryNotReady,
    #[error("selection {0} is not in the region mapping")]
    UnresolvableSelection(String),
    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

/// Result of one aggregation query.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationReport {
    pub selection: Selection,
    pub view: Viewport,
    pub comparison: Vec<CountComparison>,
    /// `None` while the change map is still loading; the matrix is then
    /// delivered through [`Explorer::take_transition_matrix`].
    pub matrix: Option<TransitionMatrix>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub change_map: PathBuf,
    pub tabular_before: PathBuf,
    pub tabular_after: PathBuf,
    pub regions: PathBuf,
}

/// One interactive session over the four datasets.
///
/// Datasets arrive through the `on_*` hooks in any order. Aggregation needs
/// both tables, highlighting needs the change map, and a transition matrix
/// requested before the change map arrives is computed on arrival.
pub struct Explorer<S: MapSurface> {
    config: ExplorerConfig,
    store: DatasetStore,
    highlights: HighlightRegistry,
    geometry: Readiness<Selection>,
    surface: S,
    diagnostics: EventBus,
    selection: Option<Selection>,
    ready_matrix: Option<TransitionMatrix>,
}

impl<S: MapSurface> Explorer<S> {
    pub fn new(config: ExplorerConfig, surface: S) -> Self {
        let highlights = HighlightRegistry::new(config.highlight.clone());
        Self {
            config,
            store: DatasetStore::new(),
            highlights,
            geometry: Readiness::new(),
            surface,
            diagnostics: EventBus::new(),
            selection: None,
            ready_matrix: None,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn highlights(&self) -> &HighlightRegistry {
        &self.highlights
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.events()
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }

    pub fn on_change_map_loaded(&mut self, map: ChangeMap) {
        self.store.set_change_map(map);
        if let Some(selection) = self.geometry.mark_ready() {
            let matrix = self.transition_matrix(&selection);
            info!(%selection, cells = matrix.total(), "deferred transition matrix ready");
            self.ready_matrix = Some(matrix);
        }
    }

    pub fn on_tabular_before_loaded(&mut self, rows: Vec<TabularRecord>) {
        self.store.set_tabular_before(rows);
    }

    pub fn on_tabular_after_loaded(&mut self, rows: Vec<TabularRecord>) {
        self.store.set_tabular_after(rows);
    }

    pub fn on_regions_loaded(&mut self, regions: RegionDirectory) {
        self.store.set_regions(regions);
    }

    /// Marks `id` failed for the rest of the session.
    pub fn on_load_failed(&mut self, id: DatasetId, reason: impl std::fmt::Display) {
        let message = format!("{id}: {reason}");
        self.store.mark_failed(id, message.clone());
        self.diagnostics.emit(DiagnosticKind::LoadFailure, message);
    }

    /// Reads every dataset from disk, change map last. Returns the number of
    /// datasets that failed.
    pub fn load_all(&mut self, paths: &DatasetPaths) -> usize {
        let mut failed = 0;

        match load_region_directory(&paths.regions) {
            Ok(regions) => self.on_regions_loaded(regions),
            Err(err) => {
                self.on_load_failed(DatasetId::RegionMapping, err);
                failed += 1;
            }
        }
        match load_tabular(&paths.tabular_before, &self.config.tabular) {
            Ok(rows) => self.on_tabular_before_loaded(rows),
            Err(err) => {
                self.on_load_failed(DatasetId::TabularBefore, err);
                failed += 1;
            }
        }
        match load_tabular(&paths.tabular_after, &self.config.tabular) {
            Ok(rows) => self.on_tabular_after_loaded(rows),
            Err(err) => {
                self.on_load_failed(DatasetId::TabularAfter, err);
                failed += 1;
            }
        }
        match load_change_map(&paths.change_map, &self.config.change_map) {
            Ok(map) => self.on_change_map_loaded(map),
            Err(err) => {
                self.on_load_failed(DatasetId::ChangeMap, err);
                failed += 1;
            }
        }
        failed
    }

    /// Provinces in mapping order. Empty until the mapping is loaded.
    pub fn provinces(&self) -> Vec<&str> {
        self.store.regions().provinces()
    }

    pub fn municipalities(&self, sido: &str) -> Vec<&str> {
        self.store.regions().municipalities(sido)
    }

    pub fn selection_from_raw(&mut self, sido: &str, sgg: &str) -> Result<Selection, ExplorerError> {
        Selection::from_raw(sido, sgg).map_err(|err| {
            self.diagnostics
                .emit(DiagnosticKind::UnresolvableSelection, err.to_string());
            ExplorerError::from(err)
        })
    }

    /// Frames the map on `selection` and tabulates both years inside it.
    ///
    /// Fails without touching the map when a table is missing or the region
    /// is unknown. A different selection than the previous query clears all
    /// highlight overlays.
    pub fn run_aggregation(&mut self, selection: Selection) -> Result<AggregationReport, ExplorerError> {
        if !self.store.is_loaded(DatasetId::TabularBefore)
            || !self.store.is_loaded(DatasetId::TabularAfter)
        {
            self.diagnostics
                .emit(DiagnosticKind::NotReady, "aggregation needs both tabular datasets");
            return Err(ExplorerError::TabularNotReady);
        }

        let view = match self.resolve_view(&selection) {
            Some(view) => view,
            None => {
                self.diagnostics.emit(
                    DiagnosticKind::UnresolvableSelection,
                    format!("{selection} is not in the region mapping"),
                );
                return Err(ExplorerError::UnresolvableSelection(selection.to_string()));
            }
        };

        if self.selection.as_ref().is_some_and(|prev| *prev != selection) {
            self.highlights.clear(&mut self.surface);
        }
        self.surface.set_view(view.center, view.zoom);

        let before = count_by_category(filter_region(self.store.before(), &selection));
        let after = count_by_category(filter_region(self.store.after(), &selection));
        let comparison = compare_counts(&before, &after);

        self.ready_matrix = None;
        let matrix = match self.geometry.submit(selection.clone()) {
            Some(selection) => Some(self.transition_matrix(&selection)),
            None => {
                debug!(%selection, "transition matrix deferred until the change map loads");
                None
            }
        };

        info!(%selection, categories = comparison.len(), "aggregation done");
        self.selection = Some(selection.clone());
        Ok(AggregationReport {
            selection,
            view,
            comparison,
            matrix,
        })
    }

    /// Matrix of a query that was deferred and has since been computed.
    pub fn take_transition_matrix(&mut self) -> Option<TransitionMatrix> {
        self.ready_matrix.take()
    }

    /// Highlights `category` inside `selection`. A failed change map answers
    /// `NoMatchingCells`.
    pub fn show_category(
        &mut self,
        category: &str,
        selection: &Selection,
        now: Time,
    ) -> Result<HighlightOutcome, ExplorerError> {
        if !self.require_geometry("highlight")? {
            return Ok(HighlightOutcome::NoMatchingCells);
        }
        let outcome = self.highlights.show_category(
            &mut self.surface,
            self.store.features(),
            category,
            selection,
            now,
        );
        if outcome == HighlightOutcome::NoMatchingCells {
            self.diagnostics.emit(
                DiagnosticKind::EmptyResult,
                format!("no cells changed to or from {category} in {selection}"),
            );
        }
        Ok(outcome)
    }

    pub fn hide_category(&mut self, category: &str) -> bool {
        self.highlights.hide_category(&mut self.surface, category)
    }

    pub fn show_all_changes(&mut self, selection: &Selection) -> Result<HighlightOutcome, ExplorerError> {
        if !self.require_geometry("all-changes highlight")? {
            return Ok(HighlightOutcome::NoMatchingCells);
        }
        let outcome =
            self.highlights
                .show_all_changes(&mut self.surface, self.store.features(), selection);
        if outcome == HighlightOutcome::NoMatchingCells {
            self.diagnostics.emit(
                DiagnosticKind::EmptyResult,
                format!("no changed cells in {selection}"),
            );
        }
        Ok(outcome)
    }

    pub fn hide_all_changes(&mut self) -> bool {
        self.highlights.hide_all_changes(&mut self.surface)
    }

    /// Runs highlight animation steps due at or before `now`.
    pub fn advance(&mut self, now: Time) -> usize {
        self.highlights.advance(&mut self.surface, now)
    }

    /// `Ok(false)` once the change map has failed: nothing can ever be drawn.
    fn require_geometry(&mut self, action: &str) -> Result<bool, ExplorerError> {
        if self.geometry.is_ready() {
            return Ok(true);
        }
        if let LoadState::Failed(_) = self.store.state(DatasetId::ChangeMap) {
            self.diagnostics.emit(
                DiagnosticKind::EmptyResult,
                format!("{action}: change map unavailable"),
            );
            return Ok(false);
        }
        self.diagnostics.emit(
            DiagnosticKind::NotReady,
            format!("{action} needs the change map"),
        );
        Err(ExplorerError::GeometryNotReady)
    }

    fn resolve_view(&self, selection: &Selection) -> Option<Viewport> {
        let view = &self.config.view;
        let regions = self.store.regions();
        match selection {
            Selection::Nationwide => Some(Viewport {
                center: view.nationwide_center,
                zoom: view.nationwide_zoom,
            }),
            Selection::Province { sido } => regions.find_province(sido).map(|e| Viewport {
                center: e.province_centroid(),
                zoom: view.province_zoom,
            }),
            Selection::Municipality { sido, sgg } => {
                regions.find_municipality(sido, sgg).map(|e| Viewport {
                    center: e.municipality_centroid(),
                    zoom: view.municipality_zoom,
                })
            }
        }
    }

    fn transition_matrix(&self, selection: &Selection) -> TransitionMatrix {
        build_transition_matrix(filter_region(self.store.features(), selection))
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetPaths, Explorer, ExplorerError, Viewport};
    use crate::config::ExplorerConfig;
    use catalog::{DatasetId, LoadState};
    use compute::{Selection, TransitionMatrix};
    use formats::{
        CellGeometry, ChangeFeature, ChangeMap, RegionDirectory, RegionEntry, TabularRecord,
        derive_changed,
    };
    use foundation::geo::GeoPoint;
    use foundation::time::Time;
    use layers::headless::{HeadlessSurface, ViewChange};
    use layers::HighlightOutcome;
    use pretty_assertions::assert_eq;
    use runtime::event_bus::DiagnosticKind;
    use std::fs;

    fn cell(sido: &str, sgg: &str, lon: f64, lat: f64, before: Option<&str>, after: Option<&str>) -> ChangeFeature {
        let d = 0.01;
        ChangeFeature {
            id: None,
            geometry: Some(CellGeometry::Polygon(vec![vec![
                GeoPoint::new(lon, lat),
                GeoPoint::new(lon + d, lat),
                GeoPoint::new(lon + d, lat + d),
                GeoPoint::new(lon, lat),
            ]])),
            sido: sido.to_string(),
            sgg: sgg.to_string(),
            type_before: before.map(str::to_string),
            type_after: after.map(str::to_string),
            changed: derive_changed(before, after),
        }
    }

    fn change_map() -> ChangeMap {
        ChangeMap {
            features: vec![
                cell("Seoul", "Gangnam", 127.00, 37.50, Some("A"), Some("B")),
                cell("Seoul", "Gangnam", 127.02, 37.51, Some("A"), Some("A")),
                cell("Seoul", "Mapo", 126.90, 37.55, Some("B"), Some("B")),
                cell("Busan", "Haeundae", 129.10, 35.16, Some("C"), Some("A")),
            ],
        }
    }

    fn entry(sido: &str, sgg: &str, lat: f64, lon: f64) -> RegionEntry {
        RegionEntry {
            sido: sido.to_string(),
            sgg: sgg.to_string(),
            lat_sido: lat,
            lon_sido: lon,
            lat_sgg: lat + 0.1,
            lon_sgg: lon + 0.1,
        }
    }

    fn regions() -> RegionDirectory {
        RegionDirectory::new(vec![
            entry("Seoul", "Gangnam", 37.5, 127.0),
            entry("Seoul", "Mapo", 37.5, 127.0),
            entry("Busan", "Haeundae", 35.1, 129.0),
        ])
    }

    fn rows(spec: &[(&str, &str, &str)]) -> Vec<TabularRecord> {
        spec.iter()
            .map(|&(sido, sgg, cat)| TabularRecord::new(sido, sgg, Some(cat)))
            .collect()
    }

    fn explorer_with_tables() -> Explorer<HeadlessSurface> {
        let mut ex = Explorer::new(ExplorerConfig::default(), HeadlessSurface::new());
        ex.on_regions_loaded(regions());
        ex.on_tabular_before_loaded(rows(&[
            ("Seoul", "Gangnam", "A"),
            ("Seoul", "Gangnam", "A"),
            ("Seoul", "Mapo", "B"),
            ("Busan", "Haeundae", "C"),
        ]));
        ex.on_tabular_after_loaded(rows(&[
            ("Seoul", "Gangnam", "A"),
            ("Seoul", "Gangnam", "B"),
            ("Seoul", "Mapo", "B"),
            ("Seoul", "Mapo", "C"),
            ("Busan", "Haeundae", "A"),
        ]));
        ex
    }

    fn ready_explorer() -> Explorer<HeadlessSurface> {
        let mut ex = explorer_with_tables();
        ex.on_change_map_loaded(change_map());
        ex
    }

    #[test]
    fn aggregation_counts_within_province() {
        let mut ex = ready_explorer();
        let report = ex.run_aggregation(Selection::province("Seoul")).unwrap();

        let rows: Vec<(String, u64, u64, i64)> = report
            .comparison
            .iter()
            .map(|r| (r.category.clone(), r.before, r.after, r.delta))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("A".to_string(), 2, 1, -1),
                ("B".to_string(), 1, 2, 1),
                ("C".to_string(), 0, 1, 1),
            ]
        );

        let matrix = report.matrix.unwrap();
        assert_eq!(matrix.row_categories, vec!["A", "B"]);
        assert_eq!(matrix.col_categories, vec!["A", "B"]);
        assert_eq!(matrix.cells, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn aggregation_frames_the_selection() {
        let mut ex = ready_explorer();

        let nationwide = ex.run_aggregation(Selection::Nationwide).unwrap();
        assert_eq!(nationwide.view.zoom, 7);
        assert_eq!(nationwide.view.center, GeoPoint::from_lat_lon(37.5665, 126.9780));

        let province = ex.run_aggregation(Selection::province("Busan")).unwrap();
        assert_eq!(
            province.view,
            Viewport {
                center: GeoPoint::from_lat_lon(35.1, 129.0),
                zoom: 10
            }
        );

        let municipality = ex
            .run_aggregation(Selection::municipality("Busan", "Haeundae"))
            .unwrap();
        assert_eq!(municipality.view.zoom, 12);
        assert_eq!(
            ex.surface().last_view(),
            Some(&ViewChange::SetView {
                center: municipality.view.center,
                zoom: 12
            })
        );
        assert_eq!(ex.surface().views().len(), 3);
    }

    #[test]
    fn aggregation_before_tables_is_not_ready() {
        let mut ex = Explorer::new(ExplorerConfig::default(), HeadlessSurface::new());
        ex.on_regions_loaded(regions());
        ex.on_tabular_before_loaded(rows(&[("Seoul", "Gangnam", "A")]));

        let err = ex.run_aggregation(Selection::Nationwide).unwrap_err();
        assert!(matches!(err, ExplorerError::TabularNotReady));
        assert_eq!(ex.diagnostics()[0].kind, DiagnosticKind::NotReady);
        assert!(ex.surface().views().is_empty());
    }

    #[test]
    fn unknown_region_is_rejected_without_side_effects() {
        let mut ex = ready_explorer();
        let err = ex
            .run_aggregation(Selection::municipality("Seoul", "Haeundae"))
            .unwrap_err();
        assert!(matches!(err, ExplorerError::UnresolvableSelection(_)));
        assert!(ex.surface().views().is_empty());
        assert!(ex.selection().is_none());
        assert_eq!(
            ex.diagnostics().last().map(|d| d.kind),
            Some(DiagnosticKind::UnresolvableSelection)
        );
    }

    #[test]
    fn inconsistent_raw_selection_is_reported() {
        let mut ex = ready_explorer();
        assert!(matches!(
            ex.selection_from_raw("all", "Gangnam"),
            Err(ExplorerError::InvalidSelection(_))
        ));
        assert_eq!(
            ex.selection_from_raw("Seoul", "all").unwrap(),
            Selection::province("Seoul")
        );
        assert_eq!(ex.diagnostics().len(), 1);
    }

    #[test]
    fn matrix_is_deferred_until_change_map_arrives() {
        let mut ex = explorer_with_tables();

        let first = ex.run_aggregation(Selection::province("Busan")).unwrap();
        assert_eq!(first.matrix, None);
        let second = ex.run_aggregation(Selection::province("Seoul")).unwrap();
        assert_eq!(second.matrix, None);
        assert_eq!(ex.take_transition_matrix(), None);

        ex.on_change_map_loaded(change_map());
        let matrix = ex.take_transition_matrix().unwrap();
        assert_eq!(matrix.row_categories, vec!["A", "B"]);
        assert_eq!(matrix.total(), 3);
        assert_eq!(ex.take_transition_matrix(), None);

        let third = ex.run_aggregation(Selection::Nationwide).unwrap();
        assert_eq!(third.matrix.map(|m| m.total()), Some(4));
    }

    #[test]
    fn failed_change_map_keeps_matrix_pending() {
        let mut ex = explorer_with_tables();
        ex.run_aggregation(Selection::Nationwide).unwrap();
        ex.on_load_failed(DatasetId::ChangeMap, "bad json");

        assert_eq!(ex.take_transition_matrix(), None::<TransitionMatrix>);
        assert!(matches!(ex.store().state(DatasetId::ChangeMap), LoadState::Failed(_)));
        assert_eq!(ex.diagnostics()[0].kind, DiagnosticKind::LoadFailure);
    }

    #[test]
    fn highlight_before_geometry_is_not_ready() {
        let mut ex = explorer_with_tables();
        assert!(matches!(
            ex.show_category("A", &Selection::Nationwide, Time(0)),
            Err(ExplorerError::GeometryNotReady)
        ));
        assert!(matches!(
            ex.show_all_changes(&Selection::Nationwide),
            Err(ExplorerError::GeometryNotReady)
        ));
        assert_eq!(ex.surface().live_layers(), 0);
        assert_eq!(ex.diagnostics().len(), 2);
        assert_eq!(ex.diagnostics()[0].kind, DiagnosticKind::NotReady);
    }

    #[test]
    fn failed_change_map_answers_with_no_cells() {
        let mut ex = explorer_with_tables();
        ex.on_load_failed(DatasetId::ChangeMap, "404");

        assert_eq!(
            ex.show_category("A", &Selection::Nationwide, Time(0)).unwrap(),
            HighlightOutcome::NoMatchingCells
        );
        assert_eq!(
            ex.show_all_changes(&Selection::Nationwide).unwrap(),
            HighlightOutcome::NoMatchingCells
        );
        let kinds: Vec<DiagnosticKind> = ex.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::LoadFailure,
                DiagnosticKind::EmptyResult,
                DiagnosticKind::EmptyResult,
            ]
        );
        assert_eq!(ex.surface().live_layers(), 0);
    }

    #[test]
    fn highlight_lifecycle_inside_a_selection() {
        let mut ex = ready_explorer();
        let seoul = Selection::province("Seoul");
        ex.run_aggregation(seoul.clone()).unwrap();

        let outcome = ex.show_category("A", &seoul, Time(0)).unwrap();
        assert!(matches!(outcome, HighlightOutcome::Shown { cells: 1, .. }));

        assert_eq!(
            ex.show_category("C", &seoul, Time(0)).unwrap(),
            HighlightOutcome::NoMatchingCells
        );
        assert_eq!(
            ex.diagnostics().last().map(|d| d.kind),
            Some(DiagnosticKind::EmptyResult)
        );

        assert!(matches!(
            ex.show_all_changes(&seoul).unwrap(),
            HighlightOutcome::Shown { cells: 1, .. }
        ));
        assert_eq!(ex.highlights().live_overlay_count(), 2);

        assert!(ex.hide_category("A"));
        assert!(!ex.hide_category("A"));
        assert!(ex.hide_all_changes());
        assert_eq!(ex.surface().live_layers(), 0);
    }

    #[test]
    fn highlight_follows_its_own_selection_not_the_last_query() {
        let mut ex = ready_explorer();
        ex.run_aggregation(Selection::province("Seoul")).unwrap();

        let busan = Selection::province("Busan");
        let HighlightOutcome::Shown { layer, cells, .. } =
            ex.show_category("A", &busan, Time(0)).unwrap()
        else {
            panic!("expected a Busan overlay");
        };
        assert_eq!(cells, 1);
        let tooltips = &ex.surface().layer(layer).unwrap().tooltips;
        assert_eq!(tooltips.len(), 1);
        assert!(tooltips[0].contains("C → A"));

        assert_eq!(
            ex.show_category("C", &Selection::province("Seoul"), Time(0)).unwrap(),
            HighlightOutcome::NoMatchingCells
        );
        assert_eq!(ex.selection(), Some(&Selection::province("Seoul")));
    }

    #[test]
    fn new_selection_clears_overlays() {
        let mut ex = ready_explorer();
        ex.run_aggregation(Selection::Nationwide).unwrap();
        ex.show_category("A", &Selection::Nationwide, Time(0)).unwrap();
        ex.show_all_changes(&Selection::Nationwide).unwrap();

        ex.run_aggregation(Selection::Nationwide).unwrap();
        assert_eq!(ex.highlights().live_overlay_count(), 2);

        ex.run_aggregation(Selection::province("Busan")).unwrap();
        assert_eq!(ex.highlights().live_overlay_count(), 0);
        assert_eq!(ex.surface().live_layers(), 0);
        assert_eq!(ex.highlights().pending_animations(), 0);
    }

    #[test]
    fn advance_runs_the_blink() {
        let mut ex = ready_explorer();
        ex.show_category("A", &Selection::Nationwide, Time(0)).unwrap();
        assert_eq!(ex.advance(Time(10_000)), 8);
        assert_eq!(ex.highlights().pending_animations(), 0);
    }

    #[test]
    fn selector_lists_follow_mapping_order() {
        let ex = ready_explorer();
        assert_eq!(ex.provinces(), vec!["Seoul", "Busan"]);
        assert_eq!(ex.municipalities("Seoul"), vec!["Gangnam", "Mapo"]);
        assert!(ex.municipalities("Daegu").is_empty());
    }

    #[test]
    fn load_all_reads_files_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DatasetPaths {
            change_map: dir.path().join("missing.geojson"),
            tabular_before: dir.path().join("bf.csv"),
            tabular_after: dir.path().join("af.csv"),
            regions: dir.path().join("regions.json"),
        };
        fs::write(&paths.tabular_before, "SIDO_NM,SGG_NM,type\nSeoul,Gangnam,A\n").unwrap();
        fs::write(&paths.tabular_after, "SIDO_NM,SGG_NM,type\nSeoul,Gangnam,B\n").unwrap();
        fs::write(
            &paths.regions,
            r#"[{"SIDO_NM":"Seoul","SGG_NM":"Gangnam","lat_sido":37.5,"lon_sido":127.0,"lat_sgg":37.49,"lon_sgg":127.04}]"#,
        )
        .unwrap();

        let mut ex = Explorer::new(ExplorerConfig::default(), HeadlessSurface::new());
        assert_eq!(ex.load_all(&paths), 1);
        assert_eq!(ex.provinces(), vec!["Seoul"]);
        assert!(matches!(ex.store().state(DatasetId::ChangeMap), LoadState::Failed(_)));

        let report = ex
            .run_aggregation(Selection::municipality("Seoul", "Gangnam"))
            .unwrap();
        assert_eq!(report.comparison.len(), 2);
        assert_eq!(report.matrix, None);
    }
}
