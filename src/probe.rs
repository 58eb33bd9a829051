use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;

use crate::domain::DocumentId;
use crate::error::LocatorError;
use crate::registry::Registry;
use crate::urls;

/// Candidate file extensions, tried in order: the document format first,
/// then image, video/audio, and office/text formats.
pub const EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "tif", "mp4", "mp3", "wav", "docx", "xlsx", "txt",
];

/// Bounded wait for the first load attempt.
pub const FIRST_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
/// Bounded wait for every retry after the first.
pub const RETRY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Every candidate extension failed to load within its timeout. The
    /// dataset folder resolved; no extension produced a loadable resource.
    Exhausted,
}

/// One scheduled load attempt. The `generation` ties the attempt to the
/// session that issued it; a signal carrying an older generation is stale
/// and must be ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub generation: u64,
    pub extension: &'static str,
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStep {
    /// Try the next candidate extension.
    Retry(ProbeAttempt),
    /// The candidate list ran out without a successful load.
    Exhausted,
    /// The signal belonged to a session that has moved on; nothing changed.
    Stale,
}

/// Viewer-session state: which document is open, which extension is being
/// probed, and the generation counter that invalidates signals from
/// superseded opens. Mutated only through [`open`](Self::open),
/// [`on_loaded`](Self::on_loaded), [`on_timeout`](Self::on_timeout) and
/// [`close`](Self::close).
#[derive(Debug, Default)]
pub struct ViewerSession {
    current: Option<DocumentId>,
    extension_index: usize,
    generation: u64,
    state: ProbeState,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<DocumentId> {
        self.current
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Extension currently being probed, when one is in flight. `None`
    /// for an idle or exhausted session.
    pub fn extension(&self) -> Option<&'static str> {
        self.current?;
        EXTENSIONS.get(self.extension_index).copied()
    }

    /// Opens `id` in the viewer: resets the extension cursor, invalidates
    /// any pending probe for a previous id, and yields the first attempt.
    pub fn open(
        &mut self,
        registry: &Registry,
        id: DocumentId,
    ) -> Result<ProbeAttempt, LocatorError> {
        let url = urls::document_url(registry, id, EXTENSIONS[0])
            .ok_or_else(|| LocatorError::DocumentNotFound(id.to_string()))?;

        self.current = Some(id);
        self.extension_index = 0;
        self.generation += 1;
        self.state = ProbeState::Loading;

        Ok(ProbeAttempt {
            generation: self.generation,
            extension: EXTENSIONS[0],
            url,
            timeout: FIRST_ATTEMPT_TIMEOUT,
        })
    }

    /// The environment observed a successful load for `generation`.
    /// Returns false without touching the session when the signal is stale.
    pub fn on_loaded(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != ProbeState::Loading {
            return false;
        }
        self.state = ProbeState::Loaded;
        true
    }

    /// The attempt for `generation` timed out. Advances to the next
    /// candidate extension, or exhausts the session when none remain.
    pub fn on_timeout(&mut self, generation: u64, registry: &Registry) -> ProbeStep {
        if generation != self.generation || self.state != ProbeState::Loading {
            return ProbeStep::Stale;
        }

        self.extension_index += 1;
        let (Some(id), Some(&extension)) = (self.current, EXTENSIONS.get(self.extension_index))
        else {
            self.state = ProbeState::Exhausted;
            return ProbeStep::Exhausted;
        };

        match urls::document_url(registry, id, extension) {
            Some(url) => ProbeStep::Retry(ProbeAttempt {
                generation: self.generation,
                extension,
                url,
                timeout: RETRY_TIMEOUT,
            }),
            None => {
                self.state = ProbeState::Exhausted;
                ProbeStep::Exhausted
            }
        }
    }

    /// Closes the viewer. Bumps the generation so any probe still in
    /// flight for the closed document is ignored when it lands.
    pub fn close(&mut self) {
        self.current = None;
        self.extension_index = 0;
        self.generation += 1;
        self.state = ProbeState::Idle;
    }
}

/// Environment signal source: did this URL load within the bounded wait?
/// The core cannot compute load success from the registry, so it is
/// observed here and fed back into the session.
pub trait DocumentLoader: Send + Sync {
    fn check(&self, url: &str, timeout: Duration) -> bool;
}

#[derive(Clone)]
pub struct HttpLoader {
    client: Client,
}

impl HttpLoader {
    pub fn new() -> Result<Self, LocatorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("efta-locate/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| LocatorError::ProbeClient(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| LocatorError::ProbeClient(err.to_string()))?;
        Ok(Self { client })
    }
}

impl DocumentLoader for HttpLoader {
    fn check(&self, url: &str, timeout: Duration) -> bool {
        // A timeout, a transport error, and a non-success status all read
        // the same from the session's point of view: not loaded.
        self.client
            .head(url)
            .timeout(timeout)
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }
}
