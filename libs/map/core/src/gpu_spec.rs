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
use crate::error::DecodeError;

/// Populated by a host-provided texture decoder (spec §6). The core never
/// decodes image formats itself.
#[derive(Clone, Debug, Default)]
pub struct GpuTextureSpec {
    pub width: u32,
    pub height: u32,
    /// 1=grey, 2=grey+alpha, 3=rgb, 4=rgba.
    pub components: u8,
    pub bytes: Vec<u8>,
}

impl GpuTextureSpec {
    pub fn memory_cost(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// A single vertex attribute stream (position, normal, uv, ...), flattened
/// to raw floats; the host decoder knows the stride and semantics.
#[derive(Clone, Debug)]
pub struct GpuMeshAttribute {
    pub name: String,
    pub components: u8,
    pub data: Vec<f32>,
}

/// Populated by a host-provided mesh decoder (spec §6).
#[derive(Clone, Debug, Default)]
pub struct GpuMeshSpec {
    pub vertices: u32,
    pub indices: Vec<u32>,
    pub attributes: Vec<GpuMeshAttribute>,
    pub face_mode: Option<FaceMode>,
}

impl GpuMeshSpec {
    pub fn memory_cost(&self) -> u64 {
        let attr_bytes: usize = self
            .attributes
            .iter()
            .map(|a| a.data.len() * std::mem::size_of::<f32>())
            .sum();
        (attr_bytes + self.indices.len() * std::mem::size_of::<u32>()) as u64
    }
}

impl Default for FaceMode {
    fn default() -> Self {
        Self::Triangles
    }
}

/// Common interface every concrete resource payload implements (spec §9):
/// decode from a byte buffer, and report RAM/GPU memory cost once decoded.
pub trait Decodable {
    fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError>;
    /// (ram, gpu) bytes held by this payload.
    fn memory_cost(&self) -> (u64, u64);
}

impl Decodable for GpuTextureSpec {
    fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Malformed("empty texture payload".to_owned()));
        }
        self.bytes = bytes.to_vec();
        Ok(())
    }

    fn memory_cost(&self) -> (u64, u64) {
        (0, self.memory_cost())
    }
}

impl Decodable for GpuMeshSpec {
    fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Malformed("empty mesh payload".to_owned()));
        }
        Ok(())
    }

    fn memory_cost(&self) -> (u64, u64) {
        (0, self.memory_cost())
    }
}
