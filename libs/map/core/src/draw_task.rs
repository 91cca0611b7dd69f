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

/// Opaque GPU handle, filled in by the host's upload callbacks (spec §6)
/// via `GpuHandle::userData`. The core never interprets the value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GpuHandle(pub u64);

/// One unit of rendering work handed to the external renderer (spec §3).
#[derive(Clone, Debug)]
pub struct DrawTask {
    pub mesh: GpuHandle,
    pub tex_color: GpuHandle,
    pub tex_mask: Option<GpuHandle>,
    /// Row-major model-view-projection matrix.
    pub mvp: [[f32; 4]; 4],
    /// Row-major UV matrix; see `BoundParamInfo::uv_matrix` for bound-layer
    /// textures, identity for mesh-internal UVs.
    pub uv: [[f32; 3]; 3],
    pub color: [f32; 4],
    /// True when `uv` addresses a bound layer rather than the mesh's own
    /// baked-in internal texture coordinates.
    pub external_uv: bool,
}

impl DrawTask {
    pub fn identity_uv() -> [[f32; 3]; 3] {
        [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
    }
}
