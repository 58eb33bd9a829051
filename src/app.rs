use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::domain::{Direction, DocumentId};
use crate::error::LocatorError;
use crate::lookup::{self, Lookup, LookupStatus};
use crate::navigate;
use crate::probe::{DocumentLoader, ProbeStep, ViewerSession};
use crate::registry::{DatasetRange, GapRange, Registry};
use crate::urls::{self, SearchProvider};

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub id: u32,
    pub name: String,
    pub first_id: String,
    pub last_id: String,
    pub file_count: u64,
    pub size_label: String,
    pub external_url: String,
}

impl From<&DatasetRange> for DatasetSummary {
    fn from(dataset: &DatasetRange) -> Self {
        Self {
            id: dataset.id,
            name: dataset.name.clone(),
            first_id: dataset.start_id.to_string(),
            last_id: dataset.end_id.to_string(),
            file_count: dataset.file_count,
            size_label: dataset.size_label.clone(),
            external_url: dataset.external_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GapSummary {
    pub first_id: String,
    pub last_id: String,
    pub candidates: Vec<u32>,
}

impl From<&GapRange> for GapSummary {
    fn from(gap: &GapRange) -> Self {
        Self {
            first_id: gap.start.to_string(),
            last_id: gap.end.to_string(),
            candidates: gap.candidates.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupResult {
    pub input: String,
    pub status: LookupStatus,
    pub document_id: Option<String>,
    pub dataset: Option<DatasetSummary>,
    pub gap_candidates: Option<Vec<u32>>,
    pub max_document_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlResult {
    pub document_id: String,
    pub extension: String,
    pub url: Option<String>,
    pub dataset_page_url: Option<String>,
    pub dataset: Option<DatasetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigateResult {
    pub from: String,
    pub direction: &'static str,
    pub to: Option<String>,
    pub dataset: Option<DatasetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    pub extension: String,
    pub url: String,
    pub timeout_secs: u64,
    pub loaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenResult {
    pub document_id: String,
    pub dataset: DatasetSummary,
    pub via_gap: bool,
    pub loaded: bool,
    pub extension: Option<String>,
    pub url: Option<String>,
    pub attempts: Vec<AttemptReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetListResult {
    pub datasets: Vec<DatasetSummary>,
    pub gaps: Vec<GapSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub provider: SearchProvider,
    pub query: String,
    pub url: String,
}

/// Operations facade over the registry and the environment's load signal.
/// Every operation returns a serializable result; lookup outcomes are
/// classified data, never errors.
#[derive(Clone)]
pub struct App<L: DocumentLoader> {
    registry: Registry,
    loader: L,
}

impl<L: DocumentLoader> App<L> {
    pub fn new(registry: Registry, loader: L) -> Self {
        Self { registry, loader }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn lookup(&self, input: &str) -> LookupResult {
        let Some(id) = DocumentId::parse(input) else {
            return LookupResult {
                input: input.to_string(),
                status: LookupStatus::InvalidFormat,
                document_id: None,
                dataset: None,
                gap_candidates: None,
                max_document_id: None,
                message: "Invalid document id format. Enter a number or EFTA format \
                          (e.g. EFTA00001234 or 1234)."
                    .to_string(),
            };
        };

        let outcome = lookup::classify(&self.registry, id);
        debug!(id = %id, status = ?outcome.status(), "lookup");
        let message = lookup::describe(id, &outcome);

        let (dataset, gap_candidates, max_document_id) = match &outcome {
            Lookup::Found { dataset } => (Some(DatasetSummary::from(*dataset)), None, None),
            Lookup::Gap { gap, fallback } => (
                Some(DatasetSummary::from(*fallback)),
                Some(gap.candidates.clone()),
                None,
            ),
            Lookup::AboveMaximum { max_id } => (None, None, Some(max_id.to_string())),
            Lookup::NotFound => (None, None, None),
        };

        LookupResult {
            input: input.to_string(),
            status: outcome.status(),
            document_id: Some(id.to_string()),
            dataset,
            gap_candidates,
            max_document_id,
            message,
        }
    }

    pub fn locate_url(&self, input: &str, extension: &str) -> Result<UrlResult, LocatorError> {
        let id: DocumentId = input.parse()?;
        Ok(UrlResult {
            document_id: id.to_string(),
            extension: extension.to_string(),
            url: urls::document_url(&self.registry, id, extension),
            dataset_page_url: urls::dataset_page_url(&self.registry, id),
            dataset: self
                .registry
                .resolve(id)
                .map(|resolution| DatasetSummary::from(resolution.dataset)),
        })
    }

    pub fn navigate(
        &self,
        input: &str,
        direction: Direction,
    ) -> Result<NavigateResult, LocatorError> {
        let from: DocumentId = input.parse()?;
        let to = navigate::navigate(&self.registry, from, direction);
        Ok(NavigateResult {
            from: from.to_string(),
            direction: direction.label(),
            to: to.map(|id| id.to_string()),
            dataset: to
                .and_then(|id| self.registry.dataset_for(id))
                .map(DatasetSummary::from),
        })
    }

    /// Opens a document and drives the extension probe to completion:
    /// try an extension, wait out the bounded timeout, advance, until a
    /// load succeeds or the candidate list is exhausted.
    pub fn open(&self, input: &str, sink: &dyn ProgressSink) -> Result<OpenResult, LocatorError> {
        let id: DocumentId = input.parse()?;
        let resolution = self
            .registry
            .resolve(id)
            .ok_or_else(|| LocatorError::DocumentNotFound(id.to_string()))?;
        let dataset = DatasetSummary::from(resolution.dataset);
        let via_gap = resolution.via_gap.is_some();

        let started = Instant::now();
        let mut session = ViewerSession::new();
        let mut attempt = session.open(&self.registry, id)?;
        let mut attempts = Vec::new();

        loop {
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Probe; trying .{} (timeout {}s)",
                    attempt.extension,
                    attempt.timeout.as_secs()
                ),
                elapsed: Some(started.elapsed()),
            });
            debug!(url = %attempt.url, extension = attempt.extension, "probe attempt");

            let loaded = self.loader.check(&attempt.url, attempt.timeout);
            attempts.push(AttemptReport {
                extension: attempt.extension.to_string(),
                url: attempt.url.clone(),
                timeout_secs: attempt.timeout.as_secs(),
                loaded,
            });

            if loaded {
                session.on_loaded(attempt.generation);
                sink.event(ProgressEvent {
                    message: format!("phase=Loaded; .{}", attempt.extension),
                    elapsed: Some(started.elapsed()),
                });
                return Ok(OpenResult {
                    document_id: id.to_string(),
                    dataset,
                    via_gap,
                    loaded: true,
                    extension: Some(attempt.extension.to_string()),
                    url: Some(attempt.url),
                    attempts,
                });
            }

            match session.on_timeout(attempt.generation, &self.registry) {
                ProbeStep::Retry(next) => attempt = next,
                ProbeStep::Exhausted | ProbeStep::Stale => break,
            }
        }

        sink.event(ProgressEvent {
            message: "phase=Exhausted; no extension loaded".to_string(),
            elapsed: Some(started.elapsed()),
        });
        Ok(OpenResult {
            document_id: id.to_string(),
            dataset,
            via_gap,
            loaded: false,
            extension: None,
            url: None,
            attempts,
        })
    }

    pub fn datasets(&self, filter: Option<u32>) -> Result<DatasetListResult, LocatorError> {
        match filter {
            Some(id) => {
                let dataset = self
                    .registry
                    .dataset_by_id(id)
                    .ok_or(LocatorError::UnknownDataset(id))?;
                Ok(DatasetListResult {
                    datasets: vec![DatasetSummary::from(dataset)],
                    gaps: Vec::new(),
                })
            }
            None => Ok(DatasetListResult {
                datasets: self.registry.datasets.iter().map(Into::into).collect(),
                gaps: self.registry.gaps.iter().map(Into::into).collect(),
            }),
        }
    }

    pub fn search(&self, provider: SearchProvider, query: &str) -> SearchResult {
        SearchResult {
            provider,
            query: query.to_string(),
            url: urls::search_url(provider, query),
        }
    }
}
