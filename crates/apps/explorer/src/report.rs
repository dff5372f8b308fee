use std::fmt::Write as _;

use compute::{CountComparison, TransitionMatrix};
use serde_json::{Value, json};

use crate::session::AggregationReport;

const CATEGORY_WIDTH: usize = 12;
const COUNT_WIDTH: usize = 8;

/// Before/after table with a signed change column.
pub fn render_comparison(rows: &[CountComparison]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<cw$}{:>w$}{:>w$}{:>w$}",
        "category",
        "before",
        "after",
        "change",
        cw = CATEGORY_WIDTH,
        w = COUNT_WIDTH
    );
    if rows.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }
    for row in rows {
        let _ = writeln!(
            out,
            "{:<cw$}{:>w$}{:>w$}{:>w$}",
            row.category,
            row.before,
            row.after,
            row.delta_label(),
            cw = CATEGORY_WIDTH,
            w = COUNT_WIDTH
        );
    }
    out
}

/// Cross tabulation, rows are the earlier category.
pub fn render_matrix(matrix: &TransitionMatrix) -> String {
    let mut out = String::new();
    if matrix.is_empty() {
        out.push_str("(no transitions)\n");
        return out;
    }

    let _ = write!(out, "{:<cw$}", "before\\after", cw = CATEGORY_WIDTH);
    for col in &matrix.col_categories {
        let _ = write!(out, "{col:>w$}", w = COUNT_WIDTH);
    }
    let _ = writeln!(out, "{:>w$}", "total", w = COUNT_WIDTH);

    for (r, row) in matrix.cells.iter().enumerate() {
        let _ = write!(out, "{:<cw$}", matrix.row_categories[r], cw = CATEGORY_WIDTH);
        for n in row {
            let _ = write!(out, "{n:>w$}", w = COUNT_WIDTH);
        }
        let _ = writeln!(out, "{:>w$}", matrix.row_total(r), w = COUNT_WIDTH);
    }

    let _ = writeln!(
        out,
        "changed {} of {} cells",
        matrix.changed_total(),
        matrix.total()
    );
    out
}

pub fn to_json(report: &AggregationReport) -> Value {
    json!({
        "selection": report.selection.to_string(),
        "view": report.view,
        "comparison": report.comparison,
        "matrix": report.matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::{render_comparison, render_matrix, to_json};
    use crate::session::{AggregationReport, Viewport};
    use compute::{Selection, TransitionMatrix, compare_counts};
    use foundation::geo::GeoPoint;
    use std::collections::BTreeMap;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn comparison_table_signs_deltas() {
        let rows = compare_counts(&counts(&[("A", 2), ("B", 1)]), &counts(&[("A", 1), ("B", 2), ("C", 1)]));
        let text = render_comparison(&rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with('A') && lines[1].ends_with("-1"));
        assert!(lines[2].starts_with('B') && lines[2].ends_with("+1"));
        assert!(lines[3].starts_with('C') && lines[3].ends_with("+1"));
    }

    #[test]
    fn empty_tables_say_so() {
        assert!(render_comparison(&[]).ends_with("(no data)\n"));
        assert_eq!(render_matrix(&TransitionMatrix::default()), "(no transitions)\n");
    }

    #[test]
    fn matrix_has_row_totals_and_changed_summary() {
        let matrix = TransitionMatrix {
            row_categories: vec!["A".into(), "B".into()],
            col_categories: vec!["A".into(), "B".into()],
            cells: vec![vec![1, 1], vec![0, 1]],
        };
        let text = render_matrix(&matrix);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with('A') && lines[1].ends_with('2'));
        assert_eq!(lines[3], "changed 1 of 3 cells");
    }

    #[test]
    fn json_report_keeps_pending_matrix_as_null() {
        let report = AggregationReport {
            selection: Selection::province("Seoul"),
            view: Viewport {
                center: GeoPoint::from_lat_lon(37.5, 127.0),
                zoom: 10,
            },
            comparison: Vec::new(),
            matrix: None,
        };
        let value = to_json(&report);
        assert!(value["matrix"].is_null());
        assert_eq!(value["view"]["zoom"], 10);
        assert_eq!(value["selection"], report.selection.to_string());
    }
}
