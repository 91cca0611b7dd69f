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
use crate::view::ViewSpec;
use fxhash::FxHashMap;
use map_core::{error::MapConfigError, surface::{BoundLayer, SurfaceInfo}};
use serde::Deserialize;

/// Wire shape of one surface entry, mirroring the original's `mapConfig.json`
/// `surfaces`/`glue` arrays. `name` is a list so a glue (len > 1) and a plain
/// surface (len == 1) share one wire representation, matching the source.
#[derive(Clone, Debug, Deserialize)]
struct WireSurface {
    name: Vec<String>,
    #[serde(rename = "metaUrl")]
    meta_url: String,
    #[serde(rename = "meshUrl")]
    mesh_url: String,
    #[serde(rename = "textureUrl")]
    texture_url: String,
    #[serde(rename = "navUrl", default)]
    nav_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct WireBoundLayer {
    id: String,
    #[serde(rename = "colorUrl")]
    color_url: String,
    #[serde(rename = "maskUrl", default)]
    mask_url: Option<String>,
    #[serde(rename = "metaUrl", default)]
    meta_url: Option<String>,
    #[serde(rename = "lodRange")]
    lod_range: (u32, u32),
    #[serde(rename = "tileRange")]
    tile_range: [[u32; 2]; 2],
    #[serde(default)]
    watertight: bool,
    #[serde(default)]
    transparent: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct WireMapConfig {
    srs: String,
    surfaces: Vec<WireSurface>,
    #[serde(default, rename = "boundLayers")]
    bound_layers: Vec<WireBoundLayer>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    view: ViewSpec,
}

/// Root of the parsed map-config (spec §3 `SurfaceInfo`/`BoundLayer`, §6
/// "Configuration surface"). Populated by `parse`, which is the one place
/// this crate does its own JSON decoding rather than delegating to a host
/// decoder: spec §1 calls map-config JSON parsing out of scope for content
/// opaque to the core, but the *shape* this struct exposes (surfaces, bound
/// layers, default view) is itself named by spec §3, so decoding straight
/// into those named types is the natural home for it, the same way
/// `map_core::surface` defines the types without also defining their wire
/// format.
#[derive(Clone, Debug, Default)]
pub struct MapConfigData {
    pub srs: String,
    pub surfaces: Vec<SurfaceInfo>,
    pub bound_layers: FxHashMap<String, BoundLayer>,
    pub default_position: Option<String>,
    pub default_view: ViewSpec,
}

impl MapConfigData {
    pub fn parse(bytes: &[u8]) -> Result<Self, MapConfigError> {
        let wire: WireMapConfig = serde_json::from_slice(bytes)
            .map_err(|e| MapConfigError(format!("malformed map config: {e}")))?;

        let surfaces = wire
            .surfaces
            .into_iter()
            .map(|s| {
                SurfaceInfo::new(s.name, s.meta_url, s.mesh_url, s.texture_url, s.nav_url)
            })
            .collect();

        let mut bound_layers = FxHashMap::default();
        for bl in wire.bound_layers {
            bound_layers.insert(
                bl.id.clone(),
                BoundLayer::new(
                    bl.id,
                    bl.color_url,
                    bl.mask_url,
                    bl.meta_url,
                    bl.lod_range,
                    bl.tile_range,
                    None,
                    bl.watertight,
                    bl.transparent,
                ),
            );
        }

        Ok(Self {
            srs: wire.srs,
            surfaces,
            bound_layers,
            default_position: wire.position,
            default_view: wire.view,
        })
    }

    pub fn surface_by_name(&self, name: &str) -> Option<&SurfaceInfo> {
        self.surfaces.iter().find(|s| s.name().first().map(String::as_str) == Some(name))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FIXTURE: &str = r#"{
        "srs": "epsg:3857",
        "surfaces": [
            {"name": ["base"], "metaUrl": "m/{lod}-{x}-{y}.meta", "meshUrl": "s/{lod}-{x}-{y}.mesh", "textureUrl": "s/{lod}-{x}-{y}.jpg"},
            {"name": ["base", "overlay"], "metaUrl": "g/{lod}-{x}-{y}.meta", "meshUrl": "g/{lod}-{x}-{y}.mesh", "textureUrl": "g/{lod}-{x}-{y}.jpg"}
        ],
        "boundLayers": [
            {"id": "ortho", "colorUrl": "b/{lod}-{x}-{y}.jpg", "lodRange": [0, 20], "tileRange": [[0,0],[1048576,1048576]]}
        ],
        "position": "obj,14.429,50.094,fixed,0,270,0,0,1000,90"
    }"#;

    #[test]
    fn test_parse_fixture() {
        let cfg = MapConfigData::parse(FIXTURE.as_bytes()).unwrap();
        assert_eq!(cfg.srs, "epsg:3857");
        assert_eq!(cfg.surfaces.len(), 2);
        assert!(cfg.surfaces[1].is_glue());
        assert_eq!(cfg.bound_layers.len(), 1);
        assert!(cfg.default_position.is_some());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(MapConfigData::parse(b"not json").is_err());
    }
}
