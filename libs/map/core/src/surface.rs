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

/// A single data source: URL templates for meta / mesh / internal-texture /
/// nav-tile blobs. `name` has length >1 iff this entry is a glue.
#[derive(Clone, Debug)]
pub struct SurfaceInfo {
    name: Vec<String>,
    meta_url: String,
    mesh_url: String,
    texture_url: String,
    nav_url: Option<String>,
}

impl SurfaceInfo {
    pub fn new(
        name: Vec<String>,
        meta_url: String,
        mesh_url: String,
        texture_url: String,
        nav_url: Option<String>,
    ) -> Self {
        Self {
            name,
            meta_url,
            mesh_url,
            texture_url,
            nav_url,
        }
    }

    pub fn name(&self) -> &[String] {
        &self.name
    }

    pub fn is_glue(&self) -> bool {
        self.name.len() > 1
    }

    pub fn meta_url(&self) -> &str {
        &self.meta_url
    }

    pub fn mesh_url(&self) -> &str {
        &self.mesh_url
    }

    pub fn texture_url(&self) -> &str {
        &self.texture_url
    }

    pub fn nav_url(&self) -> Option<&str> {
        self.nav_url.as_deref()
    }
}

/// An entry in the resolved surface stack: compositing order defines
/// precedence; glues precede their constituents.
#[derive(Clone, Debug)]
pub struct SurfaceStackEntry {
    surface: SurfaceInfo,
    /// HSV-derived debug color, unique per stack entry.
    color: [f32; 3],
    alien: bool,
}

impl SurfaceStackEntry {
    pub fn new(surface: SurfaceInfo, color: [f32; 3], alien: bool) -> Self {
        Self {
            surface,
            color,
            alien,
        }
    }

    pub fn surface(&self) -> &SurfaceInfo {
        &self.surface
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn is_alien(&self) -> bool {
        self.alien
    }
}

/// Ordered list of surfaces contributing to one view. Order defines
/// compositing precedence.
#[derive(Clone, Debug, Default)]
pub struct SurfaceStack {
    entries: Vec<SurfaceStackEntry>,
}

impl SurfaceStack {
    pub fn new(entries: Vec<SurfaceStackEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SurfaceStackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assign each entry a unique HSV-derived debug color, evenly spaced
    /// around the hue wheel.
    pub fn assign_debug_colors(&mut self) {
        let n = self.entries.len().max(1) as f32;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let hue = 360.0 * (i as f32) / n;
            entry.color = hsv_to_rgb(hue, 0.6, 0.95);
        }
    }
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r1 + m, g1 + m, b1 + m]
}

/// A raster overlay addressed by (tile, localId, submeshIndex) through URL
/// templates for color, mask, and optional metadata.
#[derive(Clone, Debug)]
pub struct BoundLayer {
    id: String,
    color_url: String,
    mask_url: Option<String>,
    meta_url: Option<String>,
    lod_range: (u32, u32),
    tile_range: [[u32; 2]; 2],
    /// 256x256 per-tile availability bitmap, if the layer exposes one.
    availability: Option<Vec<u8>>,
    watertight: bool,
    transparent: bool,
}

impl BoundLayer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        color_url: String,
        mask_url: Option<String>,
        meta_url: Option<String>,
        lod_range: (u32, u32),
        tile_range: [[u32; 2]; 2],
        availability: Option<Vec<u8>>,
        watertight: bool,
        transparent: bool,
    ) -> Self {
        Self {
            id,
            color_url,
            mask_url,
            meta_url,
            lod_range,
            tile_range,
            availability,
            watertight,
            transparent,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn color_url(&self) -> &str {
        &self.color_url
    }

    pub fn mask_url(&self) -> Option<&str> {
        self.mask_url.as_deref()
    }

    pub fn meta_url(&self) -> Option<&str> {
        self.meta_url.as_deref()
    }

    pub fn lod_range(&self) -> (u32, u32) {
        self.lod_range
    }

    pub fn tile_range(&self) -> [[u32; 2]; 2] {
        self.tile_range
    }

    pub fn has_meta(&self) -> bool {
        self.meta_url.is_some()
    }

    /// Look up the availability bit for `(x & 255, y & 255)`, along with the
    /// per-tile watertight bit, which is packed into the high bit of the
    /// same byte. Returns `None` if this layer carries no meta-tile.
    pub fn availability_at(&self, x: u32, y: u32) -> Option<(bool, bool)> {
        let bits = self.availability.as_ref()?;
        let idx = ((y & 255) * 256 + (x & 255)) as usize;
        let byte = *bits.get(idx)?;
        Some((byte & 0b01 != 0, byte & 0b10 != 0))
    }

    pub fn is_watertight(&self) -> bool {
        self.watertight
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }
}

/// A bound layer resolved for one sub-mesh: the source layer plus the
/// computed sampling depth and template variables at that depth.
#[derive(Clone, Debug)]
pub struct BoundParamInfo {
    layer_id: String,
    /// LODs above the requested tile this sample was taken at.
    depth: u32,
    tile_id: (u32, u32, u32),
    local_id: (u32, u32),
    sub_mesh: u32,
    watertight: bool,
    transparent: bool,
}

impl BoundParamInfo {
    pub fn new(
        layer_id: String,
        depth: u32,
        tile_id: (u32, u32, u32),
        local_id: (u32, u32),
        sub_mesh: u32,
        watertight: bool,
        transparent: bool,
    ) -> Self {
        Self {
            layer_id,
            depth,
            tile_id,
            local_id,
            sub_mesh,
            watertight,
            transparent,
        }
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn local_id(&self) -> (u32, u32) {
        self.local_id
    }

    pub fn is_watertight(&self) -> bool {
        self.watertight
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// The 3x3 UV matrix for this bound-param's depth, per spec §4.3.
    pub fn uv_matrix(&self) -> [[f64; 3]; 3] {
        if self.depth == 0 {
            return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        }
        let d = self.depth;
        let scale = 1.0 / (1u64 << d) as f64;
        let (lx, ly) = self.local_id;
        let tx = scale * (lx - ((lx >> d) << d)) as f64;
        let ty = 1.0 - scale - scale * (ly - ((ly >> d) << d)) as f64;
        [[scale, 0.0, tx], [0.0, scale, ty], [0.0, 0.0, 1.0]]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uv_matrix_identity_at_depth_zero() {
        let bpi = BoundParamInfo::new("a".into(), 0, (5, 1, 1), (1, 1), 0, true, false);
        assert_eq!(
            bpi.uv_matrix(),
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn test_uv_matrix_at_depth_one() {
        let bpi = BoundParamInfo::new("a".into(), 1, (5, 3, 1), (3, 1), 0, true, false);
        let m = bpi.uv_matrix();
        assert_relative_eq!(m[0][0], 0.5);
        assert_relative_eq!(m[1][1], 0.5);
        assert_relative_eq!(m[0][2], 0.5);
        assert_relative_eq!(m[1][2], 0.0);
    }

    #[test]
    fn test_availability_bit_unpacking() {
        let mut bits = vec![0u8; 256 * 256];
        bits[(1 * 256 + 2) as usize] = 0b11;
        let layer = BoundLayer::new(
            "l".into(),
            "color".into(),
            None,
            Some("meta".into()),
            (0, 20),
            [[0, 0], [1 << 20, 1 << 20]],
            Some(bits),
            false,
            false,
        );
        assert_eq!(layer.availability_at(2, 1), Some((true, true)));
        assert_eq!(layer.availability_at(0, 0), Some((false, false)));
    }
}
