/// Placeholder shown for a year in which the cell had no category ("none").
pub const ABSENT_CATEGORY: &str = "없음";

/// Heading of the hover tooltip ("center change").
pub const TOOLTIP_TITLE: &str = "중심지 변화";

/// Hover text for one cell: `"{before} → {after}"`.
pub fn transition_label(before: Option<&str>, after: Option<&str>, absent: &str) -> String {
    format!("{} → {}", before.unwrap_or(absent), after.unwrap_or(absent))
}
