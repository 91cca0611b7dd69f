// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use anyhow::{anyhow, Result};
use credits::{CreditDictionary, CreditsAccumulator};
use geodesy::{CoordinateManipulator, SrsKind};
use geometry::Frustum;
use map_core::{
    config::{EngineOpts, EngineOptions},
    node_info::NodeInfo,
    stats::Statistics,
    tile_id::TileId,
};
use mapconfig::{resolve_surface_stack, MapConfigData};
use navigation::{
    build_camera, effective_mode, wrap_longitude, CameraOverrides, InertiaCoefficients,
    NavigationInertia, PositionUrl,
};
use resource_cache::ResourceCache;
use std::path::PathBuf;
use structopt::StructOpt;
use traversal::{Traversal, TraverseContext};

/// Minimal stand-in for the proj/GDAL-backed coordinate manipulator a host
/// would normally supply; real projection math lives outside this crate.
/// Treats navigation-SRS degrees as physical-SRS meters directly and
/// approximates geodesic walks as flat-plane offsets; good enough to drive
/// the traversal loop end to end without a real projection library.
struct FlatEarthCoord;

impl CoordinateManipulator for FlatEarthCoord {
    fn convert(&self, _from: SrsKind, _to: SrsKind, point: [f64; 3]) -> Result<[f64; 3]> {
        Ok(point)
    }

    fn nav_geodesic_direct(
        &self,
        lat_lon_rad: [f64; 2],
        azimuth_rad: f64,
        distance_m: f64,
    ) -> Result<[f64; 2]> {
        let dlat = azimuth_rad.cos() * distance_m * 1e-7;
        let dlon = azimuth_rad.sin() * distance_m * 1e-7;
        Ok([lat_lon_rad[0] + dlat, lat_lon_rad[1] + dlon])
    }

    fn nav_geodesic_inverse(&self, from: [f64; 2], to: [f64; 2]) -> Result<(f64, f64)> {
        let dlat = to[0] - from[0];
        let dlon = to[1] - from[1];
        let distance = (dlat * dlat + dlon * dlon).sqrt() / 1e-7;
        let azimuth = dlon.atan2(dlat);
        Ok((distance, azimuth))
    }
}

/// A map config embedded so the demo runs without any external server; a
/// real deployment passes `--map-config` at a live endpoint instead.
const DEMO_MAP_CONFIG: &str = r#"{
    "srs": "epsg:3857",
    "surfaces": [
        {"name": ["terrain"], "metaUrl": "m/{lod}-{x}-{y}.meta", "meshUrl": "s/{lod}-{x}-{y}.mesh", "textureUrl": "s/{lod}-{x}-{y}.jpg"}
    ],
    "boundLayers": [],
    "position": "obj,14.4,50.07,fixed,0,290,0,0,1200,60"
}"#;

/// Drive the tile-traversal engine for a fixed number of ticks against a map
/// config, logging the resulting draw-task and credit counts each tick.
/// Rendering itself (GPU upload, draw submission) is a host responsibility
/// the core only produces `RenderTask`s for; this binary stops at that
/// boundary.
#[derive(Clone, Debug, StructOpt)]
struct Opt {
    #[structopt(flatten)]
    engine_opts: EngineOpts,

    /// Path to a map-config JSON file; falls back to a small embedded demo
    /// config when omitted.
    #[structopt(long)]
    map_config: Option<PathBuf>,

    /// Directory for the on-disk resource cache tier.
    #[structopt(long, default_value = "vts-cache")]
    cache_dir: PathBuf,

    /// Number of traversal ticks to simulate.
    #[structopt(long, default_value = "60")]
    ticks: u64,

    /// Override the default position URL embedded in the map config.
    #[structopt(long)]
    position: Option<String>,

    /// Output image aspect ratio, width / height.
    #[structopt(long, default_value = "1.7777777")]
    aspect: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let map_config_bytes = match &opt.map_config {
        Some(path) => std::fs::read(path)?,
        None => DEMO_MAP_CONFIG.as_bytes().to_vec(),
    };
    let map_config = MapConfigData::parse(&map_config_bytes)?;

    let position_text = opt
        .position
        .as_deref()
        .or(map_config.default_position.as_deref())
        .ok_or_else(|| anyhow!("no position URL given and map config carries no default"))?;
    let position = PositionUrl::parse(position_text)?;

    let options: EngineOptions = opt.engine_opts.to_engine_options();

    let cache = ResourceCache::new(
        opt.cache_dir.clone(),
        None,
        options.max_concurrent_downloads,
        options.max_resources_memory,
        options.max_resource_processes_per_tick,
    )?;

    let surface_stack = resolve_surface_stack(&map_config.surfaces, &map_config.default_view);
    let mut traversal = Traversal::new();
    traversal.set_root(NodeInfo::new(
        TileId::root(),
        SrsKind::Physical,
        [[-20_037_508.0, -20_037_508.0], [20_037_508.0, 20_037_508.0]],
    ));

    let mut inertia = NavigationInertia {
        position_xy: [position.longitude, position.latitude],
        position_z: 0.0,
        orientation: [position.yaw, position.pitch, position.roll],
        vertical_extent: position.view_extent,
        ..NavigationInertia::default()
    };
    inertia.target_point = inertia.position_xy;
    inertia.target_rotation = inertia.orientation;
    inertia.target_view_extent = inertia.vertical_extent;

    let coord = FlatEarthCoord;
    let mut credits = CreditsAccumulator::new();
    let credit_dictionary = CreditDictionary::new();
    let mut stats = Statistics::new();

    log::info!(
        "starting traversal demo: {} surfaces, {} ticks",
        surface_stack.len(),
        opt.ticks
    );

    for _ in 0..opt.ticks {
        inertia.integrate(InertiaCoefficients {
            pan: options.camera_inertia_pan,
            zoom: options.camera_inertia_zoom,
            rotate: options.camera_inertia_rotate,
            altitude: options.camera_inertia_altitude,
        });
        let _mode = effective_mode(
            options.navigation_mode,
            inertia.position_xy[1],
            options.navigation_latitude_threshold,
            1e-3,
        );
        inertia.position_xy[0] = wrap_longitude(inertia.position_xy[0]);

        let camera = build_camera(
            [inertia.position_xy[0], inertia.position_xy[1], inertia.position_z],
            inertia.orientation,
            false,
            &coord,
            6_378_137.0,
            opt.aspect,
            &CameraOverrides::default(),
        )?;
        let view_proj = camera.proj * camera.view;
        let frustum = Frustum::from_view_projection(&view_proj);

        cache.tick_render();
        cache.tick_data();
        stats.begin_tick();

        let ctx = TraverseContext {
            surface_stack: &surface_stack,
            cache: &cache,
            coord: &coord,
            frustum: &frustum,
            view_proj: &view_proj,
            window_height: 1080.0,
            options: &options,
        };
        let tick = cache.current_tick();
        let outcome = traversal.traverse(&ctx, &mut credits, &mut stats, tick);

        let cache_stats = cache.statistics();
        log::info!(
            "tick {}: {} opaque, {} transparent, {} nodes resident, {} nodes visited, {} resources resident",
            tick,
            outcome.opaque.len(),
            outcome.transparent.len(),
            traversal.node_count(),
            stats.total_nodes_visited(),
            cache_stats.current_resources,
        );
    }

    let resolved_credits = credits.resolve(&credit_dictionary, 2026);
    let cache_stats = cache.statistics();
    log::info!("final credit list: {} entries", resolved_credits.len());
    log::info!(
        "resource lifecycle: {} downloaded, {} disk-loaded, {} released, {} ignored",
        cache_stats.resources_downloaded,
        cache_stats.resources_disk_loaded,
        cache_stats.resources_released,
        cache_stats.resources_ignored,
    );

    Ok(())
}
