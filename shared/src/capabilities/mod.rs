mod directions;
mod kv;
mod map_camera;
mod tile_store;

pub use self::directions::{
    Directions, DirectionsError, DirectionsOperation, Route, RouteResponse, RoutingProfile,
};
pub use self::kv::{read_result, write_result, KvError, KvKey, TypedKvStore, MAX_KEY_LENGTH};
pub use self::map_camera::{CameraOptions, EdgeInsets, MapCamera, MapCameraOperation};
pub use self::tile_store::{
    LoadProgress, LoadRegionRequest, TileRegion, TileStore, TileStoreError, TileStoreOperation,
    TileStoreOutput, TileStoreResult, TilesetDescriptor,
};

/// Render capability re-export.
///
/// We use Crux's built-in Render capability directly because it provides
/// all necessary functionality for triggering view updates.
pub use crux_core::render::Render;
pub use crux_kv::error::KeyValueError;
pub use crux_kv::{KeyValue, KeyValueOperation, KeyValueResponse, KeyValueResult};

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub tile_store: TileStore<Event>,
    pub directions: Directions<Event>,
    pub kv: KeyValue<Event>,
    pub camera: MapCamera<Event>,
}
