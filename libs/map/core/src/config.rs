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
use std::str::FromStr;
use structopt::StructOpt;

/// Traversal descent strategy (spec §4.2, Configuration Surface `traverseMode`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TraverseMode {
    Hierarchical,
    Flat,
    Balanced,
}

impl FromStr for TraverseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "hierarchical" => Self::Hierarchical,
            "flat" => Self::Flat,
            "balanced" => Self::Balanced,
            other => anyhow::bail!("unrecognized traverse mode: {other}"),
        })
    }
}

/// Navigation pole-handling strategy (spec §4.4, `navigationMode`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NavigationMode {
    Azimuthal,
    Free,
    Dynamic,
}

impl FromStr for NavigationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "azimuthal" => Self::Azimuthal,
            "free" => Self::Free,
            "dynamic" => Self::Dynamic,
            other => anyhow::bail!("unrecognized navigation mode: {other}"),
        })
    }
}

/// Every key from spec §6's Configuration Surface table, with defaults
/// taken from the original's `options.cpp`. Plain struct rather than a
/// trait-object config, matching the teacher's `DetailLevelOpts`/`CatalogOpts`.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub max_texel_to_pixel_scale: f64,
    pub max_balanced_coarseness_scale: f64,
    pub max_concurrent_downloads: u32,
    pub max_resource_processes_per_tick: u32,
    pub max_node_updates_per_tick: u32,
    pub max_resources_memory: u64,

    pub camera_inertia_pan: f64,
    pub camera_inertia_zoom: f64,
    pub camera_inertia_rotate: f64,
    pub camera_inertia_altitude: f64,

    pub camera_sensitivity_pan: f64,
    pub camera_sensitivity_zoom: f64,
    pub camera_sensitivity_rotate: f64,

    pub navigation_latitude_threshold: f64,
    pub navigation_samples_per_view_extent: f64,
    pub navigation_mode: NavigationMode,
    pub traverse_mode: TraverseMode,

    pub render_surrogates: bool,
    pub render_mesh_boxes: bool,
    pub render_tile_boxes: bool,
    pub render_object_position: bool,
    pub render_target_position: bool,

    pub debug_detached_camera: bool,
    pub debug_disable_meta5: bool,
    pub debug_disable_virtual_surfaces: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_texel_to_pixel_scale: 1.5,
            max_balanced_coarseness_scale: 3.0,
            max_concurrent_downloads: 20,
            max_resource_processes_per_tick: 4,
            max_node_updates_per_tick: 64,
            max_resources_memory: 512 * 1024 * 1024,

            camera_inertia_pan: 0.8,
            camera_inertia_zoom: 0.8,
            camera_inertia_rotate: 0.7,
            camera_inertia_altitude: 0.95,

            camera_sensitivity_pan: 1.0,
            camera_sensitivity_zoom: 1.0,
            camera_sensitivity_rotate: 1.0,

            navigation_latitude_threshold: 80.0,
            navigation_samples_per_view_extent: 8.0,
            navigation_mode: NavigationMode::Azimuthal,
            traverse_mode: TraverseMode::Hierarchical,

            render_surrogates: false,
            render_mesh_boxes: false,
            render_tile_boxes: false,
            render_object_position: false,
            render_target_position: false,

            debug_detached_camera: false,
            debug_disable_meta5: false,
            debug_disable_virtual_surfaces: false,
        }
    }
}

/// CLI-overridable subset of `EngineOptions`, flattened into the demo
/// binary's `Opt` the way `gpu::DetailLevelOpts` is flattened into the
/// teacher's `main.rs::Opt`.
#[derive(Clone, Debug, StructOpt)]
pub struct EngineOpts {
    /// Coarseness threshold in pixels; smaller means more detail.
    #[structopt(long)]
    max_texel_to_pixel_scale: Option<f64>,

    /// Fetcher concurrency cap.
    #[structopt(long)]
    max_concurrent_downloads: Option<u32>,

    /// Byte budget for cache eviction.
    #[structopt(long)]
    max_resources_memory: Option<u64>,

    /// Traversal descent strategy: hierarchical, flat, or balanced.
    #[structopt(long)]
    traverse_mode: Option<TraverseMode>,

    /// Navigation pole-handling strategy: azimuthal, free, or dynamic.
    #[structopt(long)]
    navigation_mode: Option<NavigationMode>,
}

impl EngineOpts {
    pub fn to_engine_options(&self) -> EngineOptions {
        let mut opts = EngineOptions::default();
        if let Some(v) = self.max_texel_to_pixel_scale {
            opts.max_texel_to_pixel_scale = v;
        }
        if let Some(v) = self.max_concurrent_downloads {
            opts.max_concurrent_downloads = v;
        }
        if let Some(v) = self.max_resources_memory {
            opts.max_resources_memory = v;
        }
        if let Some(v) = self.traverse_mode {
            opts.traverse_mode = v;
        }
        if let Some(v) = self.navigation_mode {
            opts.navigation_mode = v;
        }
        opts
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_traverse_mode_parses_case_insensitively() {
        assert_eq!(
            "Balanced".parse::<TraverseMode>().unwrap(),
            TraverseMode::Balanced
        );
    }

    #[test]
    fn test_default_inertia_in_unit_interval() {
        let opts = EngineOptions::default();
        assert!(opts.camera_inertia_pan >= 0.0 && opts.camera_inertia_pan < 1.0);
    }
}
