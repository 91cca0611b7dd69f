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
use crate::TileId;
use smallvec::SmallVec;

/// Per-tile metadata record, decoded from a meta-tile blob.
#[derive(Clone, Debug)]
pub struct MetaNode {
    has_geometry: bool,
    alien: bool,
    /// Bit i set means child i (see `TileId::child`) exists.
    child_flags: u8,
    /// Axis-aligned extents in the node's local SRS: [lo, hi] x 3.
    geometric_extents: Option<[[f64; 3]; 2]>,
    surrogate: Option<f64>,
    texel_size: Option<f64>,
    display_size: Option<f64>,
    /// Index into the surface stack, for virtual surfaces. 0 means "not virtual".
    source_reference: u32,
    credits: SmallVec<[u32; 4]>,
}

impl MetaNode {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        has_geometry: bool,
        alien: bool,
        child_flags: u8,
        geometric_extents: Option<[[f64; 3]; 2]>,
        surrogate: Option<f64>,
        texel_size: Option<f64>,
        display_size: Option<f64>,
        source_reference: u32,
        credits: SmallVec<[u32; 4]>,
    ) -> Self {
        Self {
            has_geometry,
            alien,
            child_flags,
            geometric_extents,
            surrogate,
            texel_size,
            display_size,
            source_reference,
            credits,
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.has_geometry
    }

    pub fn is_alien(&self) -> bool {
        self.alien
    }

    pub fn child_flags(&self) -> u8 {
        self.child_flags
    }

    pub fn has_child(&self, bit: u8) -> bool {
        self.child_flags & (1 << bit) != 0
    }

    pub fn geometric_extents(&self) -> Option<[[f64; 3]; 2]> {
        self.geometric_extents
    }

    pub fn surrogate(&self) -> Option<f64> {
        self.surrogate
    }

    pub fn texel_size(&self) -> Option<f64> {
        self.texel_size
    }

    pub fn display_size(&self) -> Option<f64> {
        self.display_size
    }

    /// Per spec §9's open question: the source asserts `source_reference > 0`
    /// for a virtual surface. 0 means this node is not virtual.
    pub fn source_reference(&self) -> Option<u32> {
        if self.source_reference == 0 {
            None
        } else {
            Some(self.source_reference)
        }
    }

    pub fn credits(&self) -> &[u32] {
        &self.credits
    }
}

/// A dense grid of up to 2^k x 2^k MetaNodes, addressed by TileId rounded
/// down to the meta-tile's origin.
#[derive(Clone, Debug)]
pub struct MetaTile {
    origin: TileId,
    k: u32,
    nodes: Vec<Option<MetaNode>>,
}

impl MetaTile {
    pub fn new(origin: TileId, k: u32) -> Self {
        let side = 1usize << k;
        Self {
            origin,
            k,
            nodes: vec![None; side * side],
        }
    }

    pub fn origin(&self) -> TileId {
        self.origin
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    fn index_of(&self, id: TileId) -> Option<usize> {
        if id.lod() != self.origin.lod() {
            return None;
        }
        let side = 1u32 << self.k;
        let dx = id.x().checked_sub(self.origin.x())?;
        let dy = id.y().checked_sub(self.origin.y())?;
        if dx >= side || dy >= side {
            return None;
        }
        Some((dy * side + dx) as usize)
    }

    pub fn get(&self, id: TileId) -> Option<&MetaNode> {
        self.index_of(id).and_then(|i| self.nodes[i].as_ref())
    }

    pub fn set(&mut self, id: TileId, node: MetaNode) {
        if let Some(i) = self.index_of(id) {
            self.nodes[i] = Some(node);
        }
    }

    /// Rough RAM footprint: one `MetaNode`-sized slot per grid cell.
    pub fn memory_cost(&self) -> u64 {
        (self.nodes.len() * std::mem::size_of::<Option<MetaNode>>()) as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn leaf_node() -> MetaNode {
        MetaNode::new(true, false, 0, None, Some(42.0), None, None, 0, SmallVec::new())
    }

    #[test]
    fn test_source_reference_zero_is_not_virtual() {
        let n = leaf_node();
        assert_eq!(n.source_reference(), None);
    }

    #[test]
    fn test_meta_tile_get_set() {
        let origin = TileId::new(4, 0, 0);
        let mut tile = MetaTile::new(origin, 2);
        let id = TileId::new(4, 3, 1);
        tile.set(id, leaf_node());
        assert!(tile.get(id).is_some());
        assert!(tile.get(TileId::new(4, 3, 2)).is_none());
        assert!(tile.get(TileId::new(5, 0, 0)).is_none());
    }
}
