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
pub mod auth;
pub mod config;
pub mod decoder;
pub mod draw_task;
pub mod error;
pub mod gpu_spec;
pub mod meta;
pub mod node_info;
pub mod resource;
pub mod stats;
pub mod surface;
pub mod tile_id;

pub use crate::{
    auth::AuthConfigData,
    config::{EngineOpts, EngineOptions, NavigationMode, TraverseMode},
    decoder::DecoderBridge,
    draw_task::{DrawTask, GpuHandle},
    error::{DecodeError, MapConfigError},
    gpu_spec::{Decodable, FaceMode, GpuMeshAttribute, GpuMeshSpec, GpuTextureSpec},
    meta::{MetaNode, MetaTile},
    node_info::NodeInfo,
    resource::{AvailabilityTest, Resource, ResourcePayload, ResourceState, Validity},
    stats::Statistics,
    surface::{BoundLayer, BoundParamInfo, SurfaceInfo, SurfaceStack, SurfaceStackEntry},
    tile_id::TileId,
};
