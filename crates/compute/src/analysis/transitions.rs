use std::collections::{BTreeMap, BTreeSet};

use formats::{ChangeFeature, TabularRecord};
use serde::Serialize;

/// Category label to occurrence count. Only observed categories are keyed.
pub type CategoryCounts = BTreeMap<String, u64>;

pub fn count_by_category<'a>(records: impl IntoIterator<Item = &'a TabularRecord>) -> CategoryCounts {
    let mut counts = CategoryCounts::new();
    for record in records {
        if let Some(category) = &record.category {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// One row of the before/after comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountComparison {
    pub category: String,
    pub before: u64,
    pub after: u64,
    pub delta: i64,
}

impl CountComparison {
    /// Signed delta with an explicit `+` for growth.
    pub fn delta_label(&self) -> String {
        if self.delta > 0 {
            format!("+{}", self.delta)
        } else {
            self.delta.to_string()
        }
    }
}

/// Rows for the union of both years' categories, ascending by label.
pub fn compare_counts(before: &CategoryCounts, after: &CategoryCounts) -> Vec<CountComparison> {
    let categories: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    categories
        .into_iter()
        .map(|category| {
            let b = before.get(category).copied().unwrap_or(0);
            let a = after.get(category).copied().unwrap_or(0);
            CountComparison {
                category: category.clone(),
                before: b,
                after: a,
                delta: a as i64 - b as i64,
            }
        })
        .collect()
}

/// Before-category × after-category cross tabulation.
///
/// Rows and columns only list categories present in the tabulated cells, so
/// the shape depends on the region queried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionMatrix {
    pub row_categories: Vec<String>,
    pub col_categories: Vec<String>,
    pub cells: Vec<Vec<u64>>,
}

impl TransitionMatrix {
    pub fn is_empty(&self) -> bool {
        self.row_categories.is_empty() || self.col_categories.is_empty()
    }

    pub fn count(&self, before: &str, after: &str) -> u64 {
        let Some(r) = self.row_categories.iter().position(|c| c == before) else {
            return 0;
        };
        let Some(c) = self.col_categories.iter().position(|c| c == after) else {
            return 0;
        };
        self.cells[r][c]
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    pub fn row_total(&self, row: usize) -> u64 {
        self.cells.get(row).map(|r| r.iter().sum()).unwrap_or(0)
    }

    pub fn col_total(&self, col: usize) -> u64 {
        self.cells.iter().filter_map(|r| r.get(col)).sum()
    }

    /// Cells that moved to a different category.
    pub fn changed_total(&self) -> u64 {
        let mut sum = 0;
        for (r, row) in self.cells.iter().enumerate() {
            for (c, n) in row.iter().enumerate() {
                if self.row_categories[r] != self.col_categories[c] {
                    sum += n;
                }
            }
        }
        sum
    }
}

/// Cells missing either category are left out of the matrix.
pub fn build_transition_matrix<'a>(
    features: impl IntoIterator<Item = &'a ChangeFeature>,
) -> TransitionMatrix {
    let features: Vec<&ChangeFeature> = features.into_iter().collect();

    let rows: BTreeSet<&str> = features
        .iter()
        .filter_map(|f| f.type_before.as_deref())
        .collect();
    let cols: BTreeSet<&str> = features
        .iter()
        .filter_map(|f| f.type_after.as_deref())
        .collect();
    let row_categories: Vec<String> = rows.into_iter().map(str::to_string).collect();
    let col_categories: Vec<String> = cols.into_iter().map(str::to_string).collect();

    let mut cells = vec![vec![0u64; col_categories.len()]; row_categories.len()];
    for f in &features {
        let (Some(before), Some(after)) = (f.type_before.as_deref(), f.type_after.as_deref())
        else {
            continue;
        };
        let (Ok(r), Ok(c)) = (
            row_categories.binary_search_by(|x| x.as_str().cmp(before)),
            col_categories.binary_search_by(|x| x.as_str().cmp(after)),
        ) else {
            continue;
        };
        cells[r][c] += 1;
    }

    TransitionMatrix {
        row_categories,
        col_categories,
        cells,
    }
}
