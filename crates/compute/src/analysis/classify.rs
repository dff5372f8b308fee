use formats::ChangeFeature;

use super::region::{Selection, matches};

pub fn is_any_change(feature: &ChangeFeature) -> bool {
    feature.changed
}

/// A changed cell whose before or after category is `category`.
pub fn is_change_of_category(feature: &ChangeFeature, category: &str) -> bool {
    feature.changed
        && (feature.type_before.as_deref() == Some(category)
            || feature.type_after.as_deref() == Some(category))
}

/// Which changed cells a highlight should cover.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeFilter {
    Category(String),
    AnyChange,
}

impl ChangeFilter {
    pub fn accepts(&self, feature: &ChangeFeature) -> bool {
        match self {
            ChangeFilter::Category(c) => is_change_of_category(feature, c),
            ChangeFilter::AnyChange => is_any_change(feature),
        }
    }
}

/// Cells inside `selection` accepted by `filter`, in dataset order.
pub fn select_cells<'a>(
    features: &'a [ChangeFeature],
    selection: &Selection,
    filter: &ChangeFilter,
) -> Vec<&'a ChangeFeature> {
    features
        .iter()
        .filter(|f| matches(*f, selection) && filter.accepts(f))
        .collect()
}
