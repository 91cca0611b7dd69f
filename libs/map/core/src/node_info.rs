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
use geodesy::SrsKind;

/// Geometric extension of a TileId: which SRS this subtree lives in, its
/// 2-D extents in that SRS, and how far it is from the root in LOD steps.
#[derive(Clone, Copy, Debug)]
pub struct NodeInfo {
    id: TileId,
    srs: SrsKind,
    extents: [[f64; 2]; 2],
}

impl NodeInfo {
    pub fn new(id: TileId, srs: SrsKind, extents: [[f64; 2]; 2]) -> Self {
        Self { id, srs, extents }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn srs(&self) -> SrsKind {
        self.srs
    }

    pub fn extents(&self) -> [[f64; 2]; 2] {
        self.extents
    }

    pub fn distance_from_root(&self) -> u32 {
        self.id.lod()
    }

    /// The extents of the given child index, dividing this node's extents
    /// into equal quadrants.
    pub fn child_extents(&self, bit: u8) -> [[f64; 2]; 2] {
        let [[lox, loy], [hix, hiy]] = self.extents;
        let midx = (lox + hix) / 2.0;
        let midy = (loy + hiy) / 2.0;
        let (x_lo, x_hi) = if bit & 1 == 0 { (lox, midx) } else { (midx, hix) };
        let (y_lo, y_hi) = if bit & 2 == 0 { (loy, midy) } else { (midy, hiy) };
        [[x_lo, y_lo], [x_hi, y_hi]]
    }

    pub fn child(&self, bit: u8) -> NodeInfo {
        NodeInfo::new(self.id.child(bit), self.srs, self.child_extents(bit))
    }
}
