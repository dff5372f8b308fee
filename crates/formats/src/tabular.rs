use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column names used to read a year dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularSchema {
    pub sido_column: String,
    pub sgg_column: String,
    pub category_column: String,
}

impl Default for TabularSchema {
    fn default() -> Self {
        Self {
            sido_column: "SIDO_NM".to_string(),
            sgg_column: "SGG_NM".to_string(),
            category_column: "type".to_string(),
        }
    }
}

/// One row of a year dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRecord {
    pub sido: String,
    pub sgg: String,
    pub category: Option<String>,
    /// Remaining columns, in header order.
    pub extra: Vec<(String, String)>,
}

impl TabularRecord {
    pub fn new(sido: impl Into<String>, sgg: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            sido: sido.into(),
            sgg: sgg.into(),
            category: category.map(str::to_string),
            extra: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// Parses a headed CSV document into records. Blank lines are skipped.
pub fn parse_tabular(text: &str, schema: &TabularSchema) -> Result<Vec<TabularRecord>, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TabularError::MissingColumn(name.to_string()))
    };
    let sido_idx = column(schema.sido_column.as_str())?;
    let sgg_idx = column(schema.sgg_column.as_str())?;
    let category_idx = column(schema.category_column.as_str())?;

    let mut out = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let cell = |idx: usize| row.get(idx).unwrap_or("").to_string();
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| ![sido_idx, sgg_idx, category_idx].contains(idx))
            .map(|(idx, name)| (name.clone(), cell(idx)))
            .collect();

        out.push(TabularRecord {
            sido: cell(sido_idx),
            sgg: cell(sgg_idx),
            category: Some(cell(category_idx)).filter(|c| !c.is_empty()),
            extra,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{TabularError, TabularSchema, parse_tabular};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_rows_and_keeps_passthrough_fields() {
        let text = "\u{feff}grid_id,SIDO_NM,SGG_NM,type,pop\n\
                    g1,서울특별시,강남구,중심지 I,120\n\
                    \n\
                    g2,서울특별시,서초구,,80\n";
        let rows = parse_tabular(text, &TabularSchema::default()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].sido, "서울특별시");
        assert_eq!(rows[0].sgg, "강남구");
        assert_eq!(rows[0].category.as_deref(), Some("중심지 I"));
        assert_eq!(
            rows[0].extra,
            vec![
                ("grid_id".to_string(), "g1".to_string()),
                ("pop".to_string(), "120".to_string())
            ]
        );
        assert_eq!(rows[0].field("pop"), Some("120"));

        assert_eq!(rows[1].category, None);
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let text = "SIDO_NM,SGG_NM,type\nA,B\n";
        let rows = parse_tabular(text, &TabularSchema::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, None);
    }

    #[test]
    fn missing_category_column_is_an_error() {
        let text = "SIDO_NM,SGG_NM,kind\nA,B,C\n";
        match parse_tabular(text, &TabularSchema::default()) {
            Err(TabularError::MissingColumn(col)) => assert_eq!(col, "type"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
