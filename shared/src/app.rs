use tracing::{debug, error, info, warn};

use crate::capabilities::{
    read_result, write_result, CameraOptions, Capabilities, DirectionsError, EdgeInsets, KvKey,
    RouteResponse, RoutingProfile, TypedKvStore,
};
use crate::event::Event;
use crate::geo::{Coordinate, CoordinateBounds, PersistedBounds};
use crate::model::{Alert, AlertAction, Model};
use crate::offline_region::{build_load_request, RemovalStart};
use crate::overlay::Marker;
use crate::route_picker::TapOutcome;
use crate::view::ViewModel;
use crate::{AppError, AppResult, ErrorKind};

#[derive(Default)]
pub struct App;

impl App {
    fn bounds_store() -> TypedKvStore<PersistedBounds> {
        TypedKvStore::default()
    }

    fn decode_bounds(bytes: &[u8]) -> AppResult<CoordinateBounds> {
        let persisted = Self::bounds_store().decode(bytes)?;
        Ok(CoordinateBounds::try_from(persisted)?)
    }

    fn persist_bounds(
        region_id: String,
        bounds: CoordinateBounds,
        caps: &Capabilities,
    ) -> AppResult<()> {
        let key = KvKey::new(region_id.clone())?;
        let value = Self::bounds_store().encode(&PersistedBounds::from(bounds))?;
        caps.kv.set(key.into_inner(), value, move |result| Event::BoundsPersisted {
            region_id,
            result: write_result(result),
        });
        Ok(())
    }

    fn read_bounds(region_id: &str, caps: &Capabilities) -> AppResult<()> {
        let key = KvKey::new(region_id)?;
        caps.kv.get(key.into_inner(), |result| {
            Event::PersistedBoundsRead(read_result(result))
        });
        Ok(())
    }

    /// Single pin, camera fly-to, then hands the point to the route picker.
    fn focus_on(marker: Marker, model: &mut Model, caps: &Capabilities) {
        let coordinate = marker.coordinate;
        model.overlays.show_markers(vec![marker]);
        caps.camera
            .fly_to(CameraOptions::centered(coordinate, model.config.marker_zoom));

        match model.route_picker.consume_tap(coordinate) {
            TapOutcome::Ignored => {}
            TapOutcome::PickupRecorded(pickup) => {
                debug!(
                    latitude = pickup.latitude(),
                    longitude = pickup.longitude(),
                    "pickup recorded"
                );
            }
            TapOutcome::RouteRequested(leg) => {
                info!(
                    pickup_latitude = leg.pickup.latitude(),
                    pickup_longitude = leg.pickup.longitude(),
                    drop_latitude = leg.drop.latitude(),
                    drop_longitude = leg.drop.longitude(),
                    "requesting route"
                );
                caps.directions.calculate_route(
                    leg.waypoints(),
                    RoutingProfile::Driving,
                    Event::RouteCalculated,
                );
            }
        }
    }

    fn show_route(
        model: &mut Model,
        result: Result<RouteResponse, DirectionsError>,
    ) -> AppResult<()> {
        let response = result?;
        let route = response.routes.first().ok_or(DirectionsError::NoRoute)?;
        let path = route.path()?;
        debug!(
            points = path.len(),
            distance = route.distance,
            expected_travel_time = route.expected_travel_time,
            "drawing route"
        );
        model.overlays.show_route_line(path);
        Ok(())
    }

    fn show_offline_region(
        model: &mut Model,
        bytes: Option<Vec<u8>>,
        caps: &Capabilities,
    ) -> AppResult<()> {
        let bytes = bytes.ok_or_else(|| {
            AppError::not_found("No saved bounds for the offline region.")
                .with_context("region_id", model.config.region_id.clone())
        })?;
        let bounds = Self::decode_bounds(&bytes)?;

        caps.camera.fit_bounds(
            bounds,
            EdgeInsets::uniform(model.config.fit_padding),
            model.config.fit_max_zoom,
        );
        model.overlays.show_region_outline(&bounds);
        info!(region_id = %model.config.region_id, "offline region shown");
        Ok(())
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        if event.is_user_initiated() {
            debug!(event = event_name, "user action");
        } else {
            debug!(event = event_name, "event");
        }

        match event {
            Event::AppStarted {
                last_known_location,
            } => {
                let center = last_known_location.unwrap_or(model.config.fallback_center);
                if last_known_location.is_none() {
                    debug!("no last known location, using fallback centre");
                }
                caps.camera
                    .set_camera(CameraOptions::centered(center, model.config.initial_zoom));
                caps.render.render();
            }

            Event::Configure(config) => {
                match config.validated() {
                    Ok(config) => {
                        info!(region_id = %config.region_id, "configuration applied");
                        model.config = config;
                    }
                    Err(e) => {
                        warn!(error = %e, "rejected configuration");
                        model.push_error(&AppError::from(e));
                    }
                }
                caps.render.render();
            }

            Event::MapTapped {
                latitude,
                longitude,
            } => {
                match Coordinate::new(latitude, longitude) {
                    Ok(coordinate) => Self::focus_on(Marker::pin(coordinate), model, caps),
                    Err(e) => {
                        warn!(latitude, longitude, error = %e, "ignoring invalid tap");
                        model.push_error(&AppError::from(e));
                    }
                }
                caps.render.render();
            }

            Event::SearchResultSelected(result) => {
                debug!(result_id = %result.id, "search result selected");
                Self::focus_on(Marker::pin(result.coordinate), model, caps);
                caps.render.render();
            }

            Event::FavoriteSelected(favorite) => {
                let marker = Marker {
                    coordinate: favorite.coordinate,
                    icon: favorite.icon(),
                };
                Self::focus_on(marker, model, caps);
                caps.render.render();
            }

            Event::CategoryResultsReceived { category, results } => {
                debug!(category = %category.id, count = results.len(), "category results");
                model
                    .overlays
                    .show_markers(results.iter().map(|r| Marker::pin(r.coordinate)).collect());
                if let Some(first) = results.first() {
                    caps.camera
                        .set_camera(CameraOptions::center_only(first.coordinate));
                }
                caps.render.render();
            }

            Event::DirectionRequested => {
                if model.route_picker.is_armed() || model.has_pending_direction_prompt() {
                    debug!("route picking already armed");
                    return;
                }
                model.alerts.push_back(Alert::direction_prompt());
                caps.render.render();
            }

            Event::AlertDismissed => {
                if let Some(alert) = model.dismiss_alert() {
                    if alert.on_dismiss == Some(AlertAction::ArmRoutePicking)
                        && model.route_picker.enable_picking()
                    {
                        info!("route picking armed");
                    }
                }
                caps.render.render();
            }

            Event::RouteCalculated(result) => {
                model.route_picker.complete_request();
                if let Err(e) = Self::show_route(model, result) {
                    warn!(error = %e, "route calculation failed");
                    model.push_error(&e);
                }
                caps.render.render();
            }

            Event::DownloadRequested => {
                let bounds = model.config.region_bounds;
                let request = build_load_request(&model.config, &bounds);
                info!(region_id = %request.id, "downloading offline region");

                model.regions.begin_download();
                caps.tile_store.load_region(
                    request,
                    Event::DownloadProgressed,
                    move |result| Event::DownloadFinished { bounds, result },
                );
                caps.render.render();
            }

            Event::DownloadProgressed(progress) => {
                if model.regions.record_progress(progress) {
                    debug!(
                        completed = progress.completed,
                        required = progress.required,
                        "download progress"
                    );
                    caps.render.render();
                } else {
                    debug!("progress for untracked download");
                }
            }

            Event::DownloadFinished { bounds, result } => {
                model.regions.finish_download();
                match result {
                    Ok(region) => {
                        info!(
                            region_id = %region.id,
                            completed = region.completed_resource_count,
                            required = region.required_resource_count,
                            "offline region downloaded"
                        );
                        let region_id = region.id.clone();
                        model.regions.record_region(region);
                        if let Err(e) = Self::persist_bounds(region_id, bounds, caps) {
                            error!(error = %e, "could not persist region bounds");
                            model.push_error(&e);
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "offline region download failed");
                        model.push_error(&AppError::from_tile_store(ErrorKind::Download, &e));
                    }
                }
                caps.render.render();
            }

            Event::BoundsPersisted { region_id, result } => match result {
                Ok(()) => info!(region_id = %region_id, "offline region bounds saved"),
                Err(e) => {
                    error!(region_id = %region_id, error = %e, "failed to save region bounds");
                    model.push_error(&AppError::from(e).with_context("region_id", region_id));
                    caps.render.render();
                }
            },

            Event::ViewOfflineRequested => {
                caps.tile_store
                    .get_region(model.config.region_id.clone(), Event::RegionLookedUp);
            }

            Event::RegionLookedUp(result) => {
                let looked_up = result
                    .map_err(|e| AppError::from_tile_store(ErrorKind::RegionLookup, &e))
                    .and_then(|region| {
                        debug!(region_id = %region.id, "offline region found");
                        Self::read_bounds(&model.config.region_id, caps)
                    });
                if let Err(e) = looked_up {
                    warn!(error = %e, "offline region lookup failed");
                    model.push_error(&e);
                    caps.render.render();
                }
            }

            Event::PersistedBoundsRead(result) => {
                let shown = result
                    .map_err(AppError::from)
                    .and_then(|bytes| Self::show_offline_region(model, bytes, caps));
                if let Err(e) = shown {
                    warn!(error = %e, "could not show offline region");
                    model.push_error(&e);
                }
                caps.render.render();
            }

            Event::ListRegionsRequested => {
                caps.tile_store.list_regions(Event::RegionsListed);
            }

            Event::RegionsListed(result) => {
                match result {
                    Ok(regions) => {
                        info!(count = regions.len(), "offline regions listed");
                        model.regions.set_known_regions(regions);
                    }
                    Err(e) => {
                        warn!(error = %e, "listing offline regions failed");
                        model.push_error(&AppError::from_tile_store(ErrorKind::RegionList, &e));
                    }
                }
                caps.render.render();
            }

            Event::RemoveAllRegionsRequested => {
                if model.regions.is_removing() {
                    warn!("remove-all already in progress, ignoring");
                    return;
                }
                caps.tile_store.list_regions(Event::RegionsListedForRemoval);
            }

            Event::RegionsListedForRemoval(result) => {
                let regions = match result {
                    Ok(regions) => regions,
                    Err(e) => {
                        warn!(error = %e, "listing offline regions for removal failed");
                        model.push_error(&AppError::from_tile_store(ErrorKind::RegionRemoval, &e));
                        caps.render.render();
                        return;
                    }
                };

                let ids = regions.into_iter().map(|region| region.id).collect();
                match model.regions.begin_removal(ids) {
                    RemovalStart::AlreadyRunning => {
                        warn!("remove-all already in progress, ignoring");
                    }
                    RemovalStart::Completed(_) => {
                        info!(count = 0, "all offline regions removed");
                        caps.render.render();
                    }
                    RemovalStart::Started(ids) => {
                        info!(count = ids.len(), "removing offline regions");
                        for id in ids {
                            let completed_id = id.clone();
                            caps.tile_store.remove_region(id, move |result| {
                                Event::RegionRemoved {
                                    id: completed_id,
                                    result,
                                }
                            });
                        }
                    }
                }
            }

            Event::RegionRemoved { id, result } => {
                let outcome = match result {
                    Ok(()) => {
                        info!(region_id = %id, "offline region removed");
                        Ok(())
                    }
                    Err(e) => {
                        warn!(region_id = %id, error = %e, "failed to remove offline region");
                        Err(e.to_string())
                    }
                };

                if let Some(summary) = model.regions.record_removal(id, outcome) {
                    if summary.is_complete_success() {
                        info!(count = summary.requested, "all offline regions removed");
                    } else {
                        warn!(
                            count = summary.requested,
                            removed = summary.removed.len(),
                            failed = summary.failed.len(),
                            "offline region removal finished with failures"
                        );
                    }
                    caps.render.render();
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
