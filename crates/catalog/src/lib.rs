use std::collections::BTreeMap;

use formats::{ChangeFeature, ChangeMap, RegionDirectory, TabularRecord};
use tracing::{error, info};

/// The four inputs a session loads once at startup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetId {
    ChangeMap,
    TabularBefore,
    TabularAfter,
    RegionMapping,
}

impl DatasetId {
    pub const ALL: [DatasetId; 4] = [
        DatasetId::ChangeMap,
        DatasetId::TabularBefore,
        DatasetId::TabularAfter,
        DatasetId::RegionMapping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetId::ChangeMap => "change_map",
            DatasetId::TabularBefore => "tabular_before",
            DatasetId::TabularAfter => "tabular_after",
            DatasetId::RegionMapping => "region_mapping",
        }
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded { items: usize },
    Failed(String),
}

/// Owned store for every dataset of one session.
///
/// A dataset that is pending or failed reads as empty; callers that need to
/// distinguish "no data yet" from "no rows" ask [`DatasetStore::state`].
#[derive(Debug, Default)]
pub struct DatasetStore {
    change_map: ChangeMap,
    before: Vec<TabularRecord>,
    after: Vec<TabularRecord>,
    regions: RegionDirectory,
    failures: BTreeMap<DatasetId, String>,
    loaded: BTreeMap<DatasetId, usize>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: DatasetId) -> LoadState {
        if let Some(msg) = self.failures.get(&id) {
            return LoadState::Failed(msg.clone());
        }
        match self.loaded.get(&id) {
            Some(&items) => LoadState::Loaded { items },
            None => LoadState::Pending,
        }
    }

    pub fn is_loaded(&self, id: DatasetId) -> bool {
        matches!(self.state(id), LoadState::Loaded { .. })
    }

    pub fn set_change_map(&mut self, map: ChangeMap) {
        self.mark_loaded(DatasetId::ChangeMap, map.len());
        self.change_map = map;
    }

    pub fn set_tabular_before(&mut self, rows: Vec<TabularRecord>) {
        self.mark_loaded(DatasetId::TabularBefore, rows.len());
        self.before = rows;
    }

    pub fn set_tabular_after(&mut self, rows: Vec<TabularRecord>) {
        self.mark_loaded(DatasetId::TabularAfter, rows.len());
        self.after = rows;
    }

    pub fn set_regions(&mut self, regions: RegionDirectory) {
        self.mark_loaded(DatasetId::RegionMapping, regions.entries().len());
        self.regions = regions;
    }

    /// Records a terminal load failure. The dataset stays in its empty initial state.
    pub fn mark_failed(&mut self, id: DatasetId, message: impl Into<String>) {
        let message = message.into();
        error!(dataset = id.as_str(), "load failed: {message}");
        self.loaded.remove(&id);
        match id {
            DatasetId::ChangeMap => self.change_map = ChangeMap::default(),
            DatasetId::TabularBefore => self.before.clear(),
            DatasetId::TabularAfter => self.after.clear(),
            DatasetId::RegionMapping => self.regions = RegionDirectory::default(),
        }
        self.failures.insert(id, message);
    }

    pub fn features(&self) -> &[ChangeFeature] {
        &self.change_map.features
    }

    pub fn before(&self) -> &[TabularRecord] {
        &self.before
    }

    pub fn after(&self) -> &[TabularRecord] {
        &self.after
    }

    pub fn regions(&self) -> &RegionDirectory {
        &self.regions
    }

    fn mark_loaded(&mut self, id: DatasetId, items: usize) {
        info!(dataset = id.as_str(), items, "dataset loaded");
        self.failures.remove(&id);
        self.loaded.insert(id, items);
    }
}
