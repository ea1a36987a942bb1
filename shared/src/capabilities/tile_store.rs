use std::ops::RangeInclusive;

use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Style and zoom range the tile store fetches tiles for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetDescriptor {
    pub style_uri: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl TilesetDescriptor {
    pub fn new(style_uri: impl Into<String>, zoom_range: RangeInclusive<u8>) -> Self {
        Self {
            style_uri: style_uri.into(),
            min_zoom: *zoom_range.start(),
            max_zoom: *zoom_range.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRegionRequest {
    pub id: String,
    pub geometry: geojson::Geometry,
    pub descriptors: Vec<TilesetDescriptor>,
    pub accept_expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TileStoreOperation {
    /// Streamed: zero or more `Progress` outputs, then one `Region` or an error.
    LoadRegion(LoadRegionRequest),
    GetRegion { id: String },
    ListRegions,
    RemoveRegion { id: String },
}

impl Operation for TileStoreOperation {
    type Output = TileStoreResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProgress {
    pub completed: u64,
    pub required: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRegion {
    pub id: String,
    pub completed_resource_count: u64,
    pub required_resource_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TileStoreOutput {
    Progress(LoadProgress),
    Region(TileRegion),
    Regions(Vec<TileRegion>),
    Removed { id: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum TileStoreError {
    #[error("tile region '{id}' does not exist")]
    RegionNotFound { id: String },

    #[error("tile region load was canceled")]
    Canceled,

    #[error("not enough disk space for the tile region")]
    DiskFull,

    #[error("tile count limit exceeded")]
    TileCountExceeded,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("{message}")]
    Other { message: String },

    #[error("tile store returned an unexpected response to {operation}")]
    Unexpected { operation: String },
}

impl TileStoreError {
    fn unexpected(operation: &str) -> Self {
        Self::Unexpected {
            operation: operation.to_string(),
        }
    }
}

pub type TileStoreResult = Result<TileStoreOutput, TileStoreError>;

/// Offline tile storage owned by the map SDK in the shell.
pub struct TileStore<Ev> {
    context: CapabilityContext<TileStoreOperation, Ev>,
}

impl<Ev> Capability<Ev> for TileStore<Ev> {
    type Operation = TileStoreOperation;
    type MappedSelf<MappedEv> = TileStore<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        TileStore::new(self.context.map_event(f))
    }
}

impl<Ev> TileStore<Ev> {
    pub fn new(context: CapabilityContext<TileStoreOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> TileStore<Ev>
where
    Ev: Send + 'static,
{
    /// Starts loading a region. `on_progress` fires for every progress
    /// report, `on_complete` exactly once when the stream ends.
    pub fn load_region<P, C>(&self, request: LoadRegionRequest, on_progress: P, on_complete: C)
    where
        P: Fn(LoadProgress) -> Ev + Send + 'static,
        C: FnOnce(Result<TileRegion, TileStoreError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut stream = std::pin::pin!(
                context.stream_from_shell(TileStoreOperation::LoadRegion(request))
            );

            let outcome = loop {
                match stream.next().await {
                    Some(Ok(TileStoreOutput::Progress(progress))) => {
                        context.update_app(on_progress(progress));
                    }
                    Some(Ok(TileStoreOutput::Region(region))) => break Ok(region),
                    Some(Ok(_)) => break Err(TileStoreError::unexpected("load_region")),
                    Some(Err(e)) => break Err(e),
                    None => break Err(TileStoreError::Canceled),
                }
            };

            context.update_app(on_complete(outcome));
        });
    }

    pub fn get_region<F>(&self, id: impl Into<String>, callback: F)
    where
        F: FnOnce(Result<TileRegion, TileStoreError>) -> Ev + Send + 'static,
    {
        let id = id.into();
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(TileStoreOperation::GetRegion { id })
                .await;
            let region = match result {
                Ok(TileStoreOutput::Region(region)) => Ok(region),
                Ok(_) => Err(TileStoreError::unexpected("get_region")),
                Err(e) => Err(e),
            };
            context.update_app(callback(region));
        });
    }

    pub fn list_regions<F>(&self, callback: F)
    where
        F: FnOnce(Result<Vec<TileRegion>, TileStoreError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(TileStoreOperation::ListRegions)
                .await;
            let regions = match result {
                Ok(TileStoreOutput::Regions(regions)) => Ok(regions),
                Ok(_) => Err(TileStoreError::unexpected("list_regions")),
                Err(e) => Err(e),
            };
            context.update_app(callback(regions));
        });
    }

    pub fn remove_region<F>(&self, id: impl Into<String>, callback: F)
    where
        F: FnOnce(Result<(), TileStoreError>) -> Ev + Send + 'static,
    {
        let id = id.into();
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(TileStoreOperation::RemoveRegion { id })
                .await;
            let removed = match result {
                Ok(TileStoreOutput::Removed { .. }) => Ok(()),
                Ok(_) => Err(TileStoreError::unexpected("remove_region")),
                Err(e) => Err(e),
            };
            context.update_app(callback(removed));
        });
    }
}
