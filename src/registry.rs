use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::DocumentId;
use crate::error::LocatorError;

/// One released batch of documents, owning an inclusive id range.
///
/// `file_count` and `size_label` are informational: ranges are derived from
/// partial inventories and a range may own far more ids than it has files
/// (dataset 9 spans over a million ids). Ownership of an id says nothing
/// about whether a file actually exists behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRange {
    pub id: u32,
    pub name: String,
    pub start_id: DocumentId,
    pub end_id: DocumentId,
    pub file_count: u64,
    pub size_label: String,
    pub external_url: String,
    pub folder_name: String,
}

impl DatasetRange {
    pub fn contains(&self, id: DocumentId) -> bool {
        self.start_id <= id && id <= self.end_id
    }
}

/// An inclusive id interval known to fall between two datasets, with the
/// dataset ids worth trying anyway, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRange {
    pub start: DocumentId,
    pub end: DocumentId,
    pub candidates: Vec<u32>,
}

impl GapRange {
    pub fn contains(&self, id: DocumentId) -> bool {
        self.start <= id && id <= self.end
    }
}

/// A resolved id: the owning (or best-guess) dataset, and the gap it was
/// reached through when the resolution was a fallback.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub dataset: &'a DatasetRange,
    pub via_gap: Option<&'a GapRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub datasets: Vec<DatasetRange>,
    #[serde(default)]
    pub gaps: Vec<GapRange>,
}

impl Registry {
    /// The DOJ disclosure table as released. Datasets are listed in
    /// ascending start-id order and never overlap, but are not contiguous;
    /// the known holes between them are tabulated as gaps.
    pub fn builtin() -> Self {
        let dataset = |id: u32, start: u64, end: u64, files: u64, size: &str| DatasetRange {
            id,
            name: format!("Dataset {id}"),
            start_id: DocumentId::new(start),
            end_id: DocumentId::new(end),
            file_count: files,
            size_label: size.to_string(),
            external_url: format!(
                "https://www.justice.gov/epstein/doj-disclosures/data-set-{id}-files"
            ),
            folder_name: format!("DataSet {id}"),
        };
        let gap = |start: u64, end: u64, candidates: &[u32]| GapRange {
            start: DocumentId::new(start),
            end: DocumentId::new(end),
            candidates: candidates.to_vec(),
        };

        Self {
            datasets: vec![
                dataset(1, 1, 3_158, 3_142, "1.26 GB"),
                dataset(2, 3_159, 3_857, 574, "629 MB"),
                dataset(3, 3_858, 5_586, 67, "598 MB"),
                dataset(4, 5_705, 8_320, 152, "356 MB"),
                dataset(5, 8_409, 8_528, 120, "61 MB"),
                dataset(6, 8_529, 9_200, 150, "~200 MB"),
                dataset(7, 9_201, 9_700, 200, "~250 MB"),
                dataset(8, 9_701, 12_210, 980, "~1.9 GB"),
                dataset(9, 12_501, 1_135_189, 11_040, "~8.5 GB"),
            ],
            gaps: vec![
                gap(5_587, 5_704, &[3, 4]),
                gap(8_321, 8_408, &[4, 5]),
                gap(12_211, 12_500, &[8, 9]),
            ],
        }
    }

    /// Checks the invariants every registry must hold: ordered ascending,
    /// well-formed bounds, no overlap of any kind, and every gap candidate
    /// naming a dataset that exists.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if self.datasets.is_empty() {
            return Err(LocatorError::RegistryInvalid(
                "registry has no datasets".to_string(),
            ));
        }

        for dataset in &self.datasets {
            if dataset.start_id > dataset.end_id {
                return Err(LocatorError::RegistryInvalid(format!(
                    "dataset {} has startId {} past endId {}",
                    dataset.id, dataset.start_id, dataset.end_id
                )));
            }
        }

        for pair in self.datasets.windows(2) {
            if pair[1].start_id <= pair[0].end_id {
                return Err(LocatorError::RegistryInvalid(format!(
                    "datasets {} and {} overlap or are out of order",
                    pair[0].id, pair[1].id
                )));
            }
        }

        for gap in &self.gaps {
            if gap.start > gap.end {
                return Err(LocatorError::RegistryInvalid(format!(
                    "gap {}..{} has start past end",
                    gap.start, gap.end
                )));
            }
            if gap.candidates.is_empty() {
                return Err(LocatorError::RegistryInvalid(format!(
                    "gap {}..{} has no candidate datasets",
                    gap.start, gap.end
                )));
            }
            for candidate in &gap.candidates {
                if self.dataset_by_id(*candidate).is_none() {
                    return Err(LocatorError::RegistryInvalid(format!(
                        "gap {}..{} names unknown dataset {candidate}",
                        gap.start, gap.end
                    )));
                }
            }
            for dataset in &self.datasets {
                if gap.start <= dataset.end_id && dataset.start_id <= gap.end {
                    return Err(LocatorError::RegistryInvalid(format!(
                        "gap {}..{} overlaps dataset {}",
                        gap.start, gap.end, dataset.id
                    )));
                }
            }
        }

        for pair in self.gaps.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(LocatorError::RegistryInvalid(format!(
                    "gaps {}..{} and {}..{} overlap or are out of order",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                )));
            }
        }

        Ok(())
    }

    pub fn dataset_by_id(&self, id: u32) -> Option<&DatasetRange> {
        self.datasets.iter().find(|dataset| dataset.id == id)
    }

    /// First dataset whose range owns `id`. Primary resolution only; gaps
    /// are not consulted.
    pub fn dataset_for(&self, id: DocumentId) -> Option<&DatasetRange> {
        self.datasets.iter().find(|dataset| dataset.contains(id))
    }

    pub fn gap_for(&self, id: DocumentId) -> Option<&GapRange> {
        self.gaps.iter().find(|gap| gap.contains(id))
    }

    /// Resolves `id` to a dataset: the owning range first, then the first
    /// candidate of a containing gap. The gap fallback is a best-effort
    /// guess, not a guarantee the document resides there; later candidates
    /// are deliberately never tried.
    pub fn resolve(&self, id: DocumentId) -> Option<Resolution<'_>> {
        if let Some(dataset) = self.dataset_for(id) {
            return Some(Resolution {
                dataset,
                via_gap: None,
            });
        }
        let gap = self.gap_for(id)?;
        let fallback = gap
            .candidates
            .first()
            .and_then(|candidate| self.dataset_by_id(*candidate))?;
        Some(Resolution {
            dataset: fallback,
            via_gap: Some(gap),
        })
    }

    pub fn max_end_id(&self) -> DocumentId {
        self.datasets
            .iter()
            .map(|dataset| dataset.end_id)
            .max()
            .unwrap_or(DocumentId::new(0))
    }

    /// Smallest dataset start strictly greater than `id`.
    pub fn next_start_after(&self, id: DocumentId) -> Option<DocumentId> {
        self.datasets
            .iter()
            .map(|dataset| dataset.start_id)
            .filter(|start| *start > id)
            .min()
    }

    /// Largest dataset end strictly less than `id`.
    pub fn prev_end_before(&self, id: DocumentId) -> Option<DocumentId> {
        self.datasets
            .iter()
            .map(|dataset| dataset.end_id)
            .filter(|end| *end < id)
            .max()
    }
}

pub struct RegistryLoader;

impl RegistryLoader {
    /// Resolves the registry to use: an explicit file, else
    /// `efta-datasets.json` in the working directory, else the built-in
    /// table. Loaded tables are validated before use.
    pub fn resolve(path: Option<&str>) -> Result<Registry, LocatorError> {
        let registry_path = match path {
            Some(path) => PathBuf::from(path),
            None => {
                let default = PathBuf::from("efta-datasets.json");
                if !default.exists() {
                    return Ok(Registry::builtin());
                }
                default
            }
        };

        let content = fs::read_to_string(&registry_path)
            .map_err(|_| LocatorError::RegistryRead(registry_path.clone()))?;
        let registry: Registry = serde_json::from_str(&content)
            .map_err(|err| LocatorError::RegistryParse(err.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }
}
