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
use map_core::tile_id::TileId;

/// Substitute `{lod}`, `{x}` and `{y}` in a surface/bound-layer URL template
/// with `id`'s components (spec §3 `SurfaceInfo`/`BoundLayer` URL templates,
/// §6 "Resource naming"). Unrecognized placeholders are left untouched.
pub fn expand_tile_template(template: &str, id: TileId) -> String {
    template
        .replace("{lod}", &id.lod().to_string())
        .replace("{x}", &id.x().to_string())
        .replace("{y}", &id.y().to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_expand_substitutes_all_placeholders() {
        let url = expand_tile_template("m/{lod}-{x}-{y}.meta", TileId::new(5, 3, 7));
        assert_eq!(url, "m/5-3-7.meta");
    }

    #[test]
    fn test_expand_leaves_unrelated_text_alone() {
        let url = expand_tile_template("https://host/fixed/path.bin", TileId::new(5, 3, 7));
        assert_eq!(url, "https://host/fixed/path.bin");
    }

    #[test]
    fn test_expand_handles_repeated_placeholders() {
        let url = expand_tile_template("{lod}/{lod}-{x}-{y}", TileId::new(2, 1, 1));
        assert_eq!(url, "2/2-1-1");
    }
}
