use formats::{ChangeFeature, RegionEntry, TabularRecord};
use thiserror::Error;

/// Selector value meaning "no restriction at this level".
pub const ALL: &str = "all";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Nationwide,
    Province,
    Municipality,
}

/// Region the user drilled into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Nationwide,
    Province { sido: String },
    Municipality { sido: String, sgg: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("municipality {sgg:?} selected without a province")]
    MunicipalityWithoutProvince { sgg: String },
}

impl Selection {
    pub fn province(sido: impl Into<String>) -> Self {
        Selection::Province { sido: sido.into() }
    }

    pub fn municipality(sido: impl Into<String>, sgg: impl Into<String>) -> Self {
        Selection::Municipality {
            sido: sido.into(),
            sgg: sgg.into(),
        }
    }

    /// Builds a selection from raw selector values, where [`ALL`] (or an empty
    /// string) leaves a level unset.
    pub fn from_raw(sido: &str, sgg: &str) -> Result<Self, SelectionError> {
        let unset = |v: &str| v.is_empty() || v == ALL;
        match (unset(sido), unset(sgg)) {
            (true, true) => Ok(Selection::Nationwide),
            (true, false) => Err(SelectionError::MunicipalityWithoutProvince {
                sgg: sgg.to_string(),
            }),
            (false, true) => Ok(Selection::province(sido)),
            (false, false) => Ok(Selection::municipality(sido, sgg)),
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Selection::Nationwide => Scope::Nationwide,
            Selection::Province { .. } => Scope::Province,
            Selection::Municipality { .. } => Scope::Municipality,
        }
    }

    pub fn sido(&self) -> Option<&str> {
        match self {
            Selection::Nationwide => None,
            Selection::Province { sido } | Selection::Municipality { sido, .. } => {
                Some(sido.as_str())
            }
        }
    }

    pub fn sgg(&self) -> Option<&str> {
        match self {
            Selection::Municipality { sgg, .. } => Some(sgg.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Nationwide => write!(f, "nationwide"),
            Selection::Province { sido } => write!(f, "{sido}"),
            Selection::Municipality { sido, sgg } => write!(f, "{sido} {sgg}"),
        }
    }
}

/// Province and municipality names carried by a record.
///
/// Geometry cells and tabular rows both implement this so one predicate
/// filters both datasets.
pub trait RegionFields {
    fn sido(&self) -> &str;
    fn sgg(&self) -> &str;
}

impl RegionFields for ChangeFeature {
    fn sido(&self) -> &str {
        &self.sido
    }
    fn sgg(&self) -> &str {
        &self.sgg
    }
}

impl RegionFields for TabularRecord {
    fn sido(&self) -> &str {
        &self.sido
    }
    fn sgg(&self) -> &str {
        &self.sgg
    }
}

impl RegionFields for RegionEntry {
    fn sido(&self) -> &str {
        &self.sido
    }
    fn sgg(&self) -> &str {
        &self.sgg
    }
}

/// Exact string match on the levels the selection sets.
pub fn matches<R: RegionFields + ?Sized>(record: &R, selection: &Selection) -> bool {
    match selection {
        Selection::Nationwide => true,
        Selection::Province { sido } => record.sido() == sido.as_str(),
        Selection::Municipality { sido, sgg } => {
            record.sido() == sido.as_str() && record.sgg() == sgg.as_str()
        }
    }
}

pub fn filter_region<'a, R: RegionFields>(
    records: &'a [R],
    selection: &'a Selection,
) -> impl Iterator<Item = &'a R> + 'a {
    records.iter().filter(move |r| matches(*r, selection))
}
