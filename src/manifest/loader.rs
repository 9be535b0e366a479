use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    foundation::error::{PagespotError, PagespotResult},
    manifest::model::ManifestDef,
};

/// Identifies one manifest load request. Only the most recent ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Clone, Debug, Default)]
/// Observable state of the manifest load lifecycle.
pub enum LoadState {
    /// Nothing requested yet, or the last request was cancelled.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request produced a manifest.
    Ready(Arc<ManifestDef>),
    /// The latest request failed; the message is user-presentable.
    Failed(String),
}

impl LoadState {
    /// The loaded manifest, once ready.
    pub fn manifest(&self) -> Option<&Arc<ManifestDef>> {
        match self {
            Self::Ready(m) => Some(m),
            _ => None,
        }
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Last-request-wins coordinator for manifest fetches.
///
/// Transport lives outside this crate: callers obtain a [`LoadTicket`] from
/// [`ManifestLoader::begin`], perform the fetch, and hand the outcome back to
/// [`ManifestLoader::complete`]. Starting a new load supersedes the previous ticket, whose
/// late completion is dropped.
#[derive(Debug, Default)]
pub struct ManifestLoader {
    issued: u64,
    in_flight: Option<LoadTicket>,
    state: LoadState,
}

impl ManifestLoader {
    /// Idle loader with no ticket issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, cancelling any in-flight one.
    pub fn begin(&mut self) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        if let Some(prev) = self.in_flight.replace(ticket) {
            tracing::debug!(superseded = prev.0, current = ticket.0, "manifest load superseded");
        }
        self.state = LoadState::Loading;
        ticket
    }

    /// Cancel the in-flight load, if any. Its completion will be ignored.
    pub fn cancel(&mut self) {
        if self.in_flight.take().is_some() && self.state.is_loading() {
            self.state = LoadState::Idle;
        }
    }

    /// Whether `ticket` is the one a completion is expected for.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Apply a finished load. Returns `false` (and changes nothing) for stale tickets.
    #[tracing::instrument(skip(self, outcome))]
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        outcome: PagespotResult<ManifestDef>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping stale manifest result");
            return false;
        }
        self.in_flight = None;
        self.state = match outcome {
            Ok(manifest) => LoadState::Ready(Arc::new(manifest)),
            Err(err) => {
                tracing::warn!(error = %err, "manifest load failed");
                LoadState::Failed(err.to_string())
            }
        };
        true
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }
}

/// Parse manifest JSON. Any syntax or shape error rejects the whole document.
pub fn parse_manifest(bytes: &[u8]) -> PagespotResult<ManifestDef> {
    serde_json::from_slice::<ManifestDef>(bytes)
        .map_err(|e| PagespotError::manifest_unavailable(format!("invalid manifest json: {e}")))
}

/// Read and parse a manifest from disk.
pub fn load_manifest_file(path: impl AsRef<Path>) -> PagespotResult<ManifestDef> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("read manifest '{}'", path.display()))
        .map_err(|e| PagespotError::manifest_unavailable(format!("{e:#}")))?;
    parse_manifest(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/loader.rs"]
mod tests;
