use serde::Serialize;

use crate::domain::DocumentId;
use crate::registry::{DatasetRange, GapRange, Registry};

/// Where a parsed id landed in the registry. Exactly one variant applies to
/// every id; gap membership is tested before the above-maximum/not-found
/// fallthrough.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// The id is owned by a real dataset range.
    Found { dataset: &'a DatasetRange },
    /// The id falls in a tabulated gap; `fallback` is the gap's first
    /// candidate and worth trying anyway.
    Gap {
        gap: &'a GapRange,
        fallback: &'a DatasetRange,
    },
    /// The id exceeds the highest cataloged end id.
    AboveMaximum { max_id: DocumentId },
    /// Below the maximum, but no dataset or gap claims it.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStatus {
    Found,
    Gap,
    AboveMaximum,
    NotFound,
    InvalidFormat,
}

impl Lookup<'_> {
    pub fn status(&self) -> LookupStatus {
        match self {
            Lookup::Found { .. } => LookupStatus::Found,
            Lookup::Gap { .. } => LookupStatus::Gap,
            Lookup::AboveMaximum { .. } => LookupStatus::AboveMaximum,
            Lookup::NotFound => LookupStatus::NotFound,
        }
    }
}

pub fn classify(registry: &Registry, id: DocumentId) -> Lookup<'_> {
    if let Some(dataset) = registry.dataset_for(id) {
        return Lookup::Found { dataset };
    }

    if let Some(gap) = registry.gap_for(id) {
        if let Some(fallback) = gap
            .candidates
            .first()
            .and_then(|candidate| registry.dataset_by_id(*candidate))
        {
            return Lookup::Gap { gap, fallback };
        }
    }

    let max_id = registry.max_end_id();
    if id > max_id {
        return Lookup::AboveMaximum { max_id };
    }

    Lookup::NotFound
}

/// Human-readable explanation of a lookup, in the wording the result panel
/// shows.
pub fn describe(id: DocumentId, lookup: &Lookup<'_>) -> String {
    match lookup {
        Lookup::Found { dataset } => format!(
            "{id} is located in {name}. Range: {start} - {end} ({files} files, {size}).",
            name = dataset.name,
            start = dataset.start_id,
            end = dataset.end_id,
            files = dataset.file_count,
            size = dataset.size_label,
        ),
        Lookup::Gap { gap, fallback } => format!(
            "{id} is in a gap between datasets ({start} - {end}). This document id may \
             not exist in the released files; {name} is the closest place to try.",
            start = gap.start,
            end = gap.end,
            name = fallback.name,
        ),
        Lookup::AboveMaximum { max_id } => format!(
            "{id} exceeds the maximum document id in the currently released files ({max_id})."
        ),
        Lookup::NotFound => format!("{id} was not found in any dataset."),
    }
}
