use serde::{Deserialize, Serialize};

use crate::capabilities::{
    DirectionsError, KvError, LoadProgress, RouteResponse, TileRegion, TileStoreError,
};
use crate::config::MapConfig;
use crate::geo::{Coordinate, CoordinateBounds};
use crate::search::{FavoriteRecord, SearchCategory, SearchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    AppStarted {
        last_known_location: Option<Coordinate>,
    },
    Configure(Box<MapConfig>),

    // Map & alerts
    MapTapped {
        latitude: f64,
        longitude: f64,
    },
    DirectionRequested,
    AlertDismissed,

    // Offline regions
    DownloadRequested,
    ViewOfflineRequested,
    ListRegionsRequested,
    RemoveAllRegionsRequested,

    // Search
    SearchResultSelected(Box<SearchResult>),
    CategoryResultsReceived {
        category: SearchCategory,
        results: Vec<SearchResult>,
    },
    FavoriteSelected(Box<FavoriteRecord>),

    // Capability responses
    #[serde(skip)]
    DownloadProgressed(LoadProgress),
    #[serde(skip)]
    DownloadFinished {
        bounds: CoordinateBounds,
        result: Result<TileRegion, TileStoreError>,
    },
    #[serde(skip)]
    BoundsPersisted {
        region_id: String,
        result: Result<(), KvError>,
    },
    #[serde(skip)]
    RegionLookedUp(Result<TileRegion, TileStoreError>),
    #[serde(skip)]
    PersistedBoundsRead(Result<Option<Vec<u8>>, KvError>),
    #[serde(skip)]
    RegionsListed(Result<Vec<TileRegion>, TileStoreError>),
    #[serde(skip)]
    RegionsListedForRemoval(Result<Vec<TileRegion>, TileStoreError>),
    #[serde(skip)]
    RegionRemoved {
        id: String,
        result: Result<(), TileStoreError>,
    },
    #[serde(skip)]
    RouteCalculated(Result<RouteResponse, DirectionsError>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted { .. } => "app_started",
            Self::Configure(_) => "configure",
            Self::MapTapped { .. } => "map_tapped",
            Self::DirectionRequested => "direction_requested",
            Self::AlertDismissed => "alert_dismissed",
            Self::DownloadRequested => "download_requested",
            Self::ViewOfflineRequested => "view_offline_requested",
            Self::ListRegionsRequested => "list_regions_requested",
            Self::RemoveAllRegionsRequested => "remove_all_regions_requested",
            Self::SearchResultSelected(_) => "search_result_selected",
            Self::CategoryResultsReceived { .. } => "category_results_received",
            Self::FavoriteSelected(_) => "favorite_selected",
            Self::DownloadProgressed(_) => "download_progressed",
            Self::DownloadFinished { .. } => "download_finished",
            Self::BoundsPersisted { .. } => "bounds_persisted",
            Self::RegionLookedUp(_) => "region_looked_up",
            Self::PersistedBoundsRead(_) => "persisted_bounds_read",
            Self::RegionsListed(_) => "regions_listed",
            Self::RegionsListedForRemoval(_) => "regions_listed_for_removal",
            Self::RegionRemoved { .. } => "region_removed",
            Self::RouteCalculated(_) => "route_calculated",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::MapTapped { .. }
                | Self::DirectionRequested
                | Self::AlertDismissed
                | Self::DownloadRequested
                | Self::ViewOfflineRequested
                | Self::ListRegionsRequested
                | Self::RemoveAllRegionsRequested
                | Self::SearchResultSelected(_)
                | Self::CategoryResultsReceived { .. }
                | Self::FavoriteSelected(_)
        )
    }
}
