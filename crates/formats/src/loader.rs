use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::change_map::{ChangeMap, ChangeMapError, ChangeMapSchema};
use crate::region_mapping::{RegionDirectory, RegionMappingError};
use crate::tabular::{TabularError, TabularRecord, TabularSchema, parse_tabular};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode change map {}: {source}", path.display())]
    ChangeMap {
        path: PathBuf,
        source: ChangeMapError,
    },
    #[error("failed to decode table {}: {source}", path.display())]
    Tabular {
        path: PathBuf,
        source: TabularError,
    },
    #[error("failed to decode region mapping {}: {source}", path.display())]
    RegionMapping {
        path: PathBuf,
        source: RegionMappingError,
    },
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_change_map(
    path: impl AsRef<Path>,
    schema: &ChangeMapSchema,
) -> Result<ChangeMap, LoadError> {
    let path = path.as_ref();
    let payload = read_text(path)?;
    let map = ChangeMap::from_geojson_str(&payload, schema).map_err(|source| {
        LoadError::ChangeMap {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!("loaded {} change cells from {}", map.len(), path.display());
    Ok(map)
}

pub fn load_tabular(
    path: impl AsRef<Path>,
    schema: &TabularSchema,
) -> Result<Vec<TabularRecord>, LoadError> {
    let path = path.as_ref();
    let payload = read_text(path)?;
    let rows = parse_tabular(&payload, schema).map_err(|source| LoadError::Tabular {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_region_directory(path: impl AsRef<Path>) -> Result<RegionDirectory, LoadError> {
    let path = path.as_ref();
    let payload = read_text(path)?;
    let dir = RegionDirectory::from_json_str(&payload).map_err(|source| {
        LoadError::RegionMapping {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        "loaded {} region entries from {}",
        dir.entries().len(),
        path.display()
    );
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::{LoadError, load_change_map, load_region_directory, load_tabular};
    use crate::change_map::ChangeMapSchema;
    use crate::tabular::TabularSchema;
    use std::fs;

    #[test]
    fn loads_each_dataset_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let geo = dir.path().join("type_change_map.geojson");
        fs::write(
            &geo,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature",
                "properties":{"SIDO_NM":"A","SGG_NM":"a","type_2021":"X","type_2023":"Y"},
                "geometry":{"type":"Point","coordinates":[127.0,37.0]}}]}"#,
        )
        .unwrap();
        let map = load_change_map(&geo, &ChangeMapSchema::default()).unwrap();
        assert_eq!(map.len(), 1);

        let csv = dir.path().join("bf_2021.csv");
        fs::write(&csv, "SIDO_NM,SGG_NM,type\nA,a,X\nA,a,Y\n").unwrap();
        let rows = load_tabular(&csv, &TabularSchema::default()).unwrap();
        assert_eq!(rows.len(), 2);

        let mapping = dir.path().join("mapping.json");
        fs::write(
            &mapping,
            r#"[{"SIDO_NM":"A","SGG_NM":"a","lat_sido":1,"lon_sido":2,"lat_sgg":3,"lon_sgg":4}]"#,
        )
        .unwrap();
        let regions = load_region_directory(&mapping).unwrap();
        assert_eq!(regions.provinces(), vec!["A"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("af_2023.csv");
        match load_tabular(&missing, &TabularSchema::default()) {
            Err(LoadError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decode_errors_are_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let geo = dir.path().join("broken.geojson");
        fs::write(&geo, "{").unwrap();
        let err = load_change_map(&geo, &ChangeMapSchema::default()).unwrap_err();
        assert!(matches!(err, LoadError::ChangeMap { .. }));
        assert!(err.to_string().contains("broken.geojson"));
    }
}
