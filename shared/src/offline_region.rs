use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capabilities::{LoadProgress, LoadRegionRequest, TileRegion, TilesetDescriptor};
use crate::config::MapConfig;
use crate::geo::CoordinateBounds;

/// Builds the tile store request for downloading `bounds` under the
/// configured region id.
#[must_use]
pub fn build_load_request(config: &MapConfig, bounds: &CoordinateBounds) -> LoadRegionRequest {
    LoadRegionRequest {
        id: config.region_id.clone(),
        geometry: bounds.to_geometry(),
        descriptors: vec![TilesetDescriptor::new(
            config.style_uri.clone(),
            config.zoom_range(),
        )],
        accept_expired: config.accept_expired,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading { progress: Option<LoadProgress> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalSummary {
    pub requested: usize,
    pub removed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RemovalSummary {
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Counted join over a fan-out of region deletions. Entered once with the
/// number of deletions, left once per completion; yields its summary on the
/// last leave and never again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalBarrier {
    remaining: usize,
    fired: bool,
    summary: RemovalSummary,
}

impl RemovalBarrier {
    #[must_use]
    pub fn enter(count: usize) -> Self {
        Self {
            remaining: count,
            fired: false,
            summary: RemovalSummary {
                requested: count,
                ..RemovalSummary::default()
            },
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Completes immediately for an empty fan-out.
    pub fn check_empty(&mut self) -> Option<RemovalSummary> {
        if self.remaining == 0 && !self.fired {
            self.fired = true;
            return Some(self.summary.clone());
        }
        None
    }

    pub fn leave(&mut self, id: String, outcome: Result<(), String>) -> Option<RemovalSummary> {
        if self.fired || self.remaining == 0 {
            warn!(region_id = %id, "removal completion after barrier fired");
            return None;
        }

        self.remaining -= 1;
        match outcome {
            Ok(()) => self.summary.removed.push(id),
            Err(reason) => self.summary.failed.push((id, reason)),
        }

        if self.remaining == 0 {
            self.fired = true;
            Some(self.summary.clone())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalStart {
    /// A remove-all is already waiting on its deletions.
    AlreadyRunning,
    /// Nothing to delete; the completion is immediate.
    Completed(RemovalSummary),
    Started(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfflineRegionManager {
    download: DownloadState,
    known_regions: Vec<TileRegion>,
    removal: Option<RemovalBarrier>,
    last_removal: Option<RemovalSummary>,
}

impl OfflineRegionManager {
    #[must_use]
    pub fn download_state(&self) -> &DownloadState {
        &self.download
    }

    #[must_use]
    pub fn is_downloading(&self) -> bool {
        matches!(self.download, DownloadState::Downloading { .. })
    }

    #[must_use]
    pub fn progress(&self) -> Option<LoadProgress> {
        match &self.download {
            DownloadState::Downloading { progress } => *progress,
            DownloadState::Idle => None,
        }
    }

    #[must_use]
    pub fn known_regions(&self) -> &[TileRegion] {
        &self.known_regions
    }

    #[must_use]
    pub fn is_removing(&self) -> bool {
        self.removal.is_some()
    }

    #[must_use]
    pub fn last_removal(&self) -> Option<&RemovalSummary> {
        self.last_removal.as_ref()
    }

    /// Starts tracking a download. A download already in flight is replaced.
    pub fn begin_download(&mut self) {
        if self.is_downloading() {
            debug!("replacing tracked download");
        }
        self.download = DownloadState::Downloading { progress: None };
    }

    /// Returns false when no download is tracked.
    pub fn record_progress(&mut self, update: LoadProgress) -> bool {
        match &mut self.download {
            DownloadState::Downloading { progress } => {
                *progress = Some(update);
                true
            }
            DownloadState::Idle => false,
        }
    }

    pub fn finish_download(&mut self) {
        self.download = DownloadState::Idle;
    }

    pub fn set_known_regions(&mut self, regions: Vec<TileRegion>) {
        self.known_regions = regions;
    }

    /// Inserts or replaces the region with the same id.
    pub fn record_region(&mut self, region: TileRegion) {
        match self.known_regions.iter_mut().find(|known| known.id == region.id) {
            Some(known) => *known = region,
            None => self.known_regions.push(region),
        }
    }

    pub fn begin_removal(&mut self, ids: Vec<String>) -> RemovalStart {
        if self.removal.is_some() {
            return RemovalStart::AlreadyRunning;
        }

        let mut barrier = RemovalBarrier::enter(ids.len());
        if let Some(summary) = barrier.check_empty() {
            self.last_removal = Some(summary.clone());
            return RemovalStart::Completed(summary);
        }

        self.removal = Some(barrier);
        RemovalStart::Started(ids)
    }

    /// Records one deletion outcome; returns the summary once all are in.
    pub fn record_removal(
        &mut self,
        id: String,
        outcome: Result<(), String>,
    ) -> Option<RemovalSummary> {
        let barrier = self.removal.as_mut()?;
        let summary = barrier.leave(id, outcome)?;

        self.removal = None;
        self.known_regions
            .retain(|region| !summary.removed.contains(&region.id));
        self.last_removal = Some(summary.clone());
        Some(summary)
    }
}
