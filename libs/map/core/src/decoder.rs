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
use crate::{
    auth::AuthConfigData,
    error::DecodeError,
    gpu_spec::{GpuMeshSpec, GpuTextureSpec},
    meta::MetaTile,
    tile_id::TileId,
};

/// The host-provided decoders spec §6 calls out as external collaborators:
/// opaque meta-tile/mesh/texture/auth blobs go in, the populated structs
/// spec §3/§6 name come out. The core never parses these formats itself;
/// `resource_cache`'s callers hold one of these and invoke it once a
/// resource reaches `Downloaded`, then store the result back onto the
/// `Resource` via `store_ready`.
pub trait DecoderBridge: Send + Sync {
    fn decode_meta_tile(&self, bytes: &[u8], origin: TileId, k: u32) -> Result<MetaTile, DecodeError>;
    fn decode_mesh(&self, bytes: &[u8]) -> Result<GpuMeshSpec, DecodeError>;
    fn decode_texture(&self, bytes: &[u8]) -> Result<GpuTextureSpec, DecodeError>;
    fn decode_auth_config(&self, bytes: &[u8]) -> Result<AuthConfigData, DecodeError>;
}
