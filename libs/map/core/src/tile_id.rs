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

/// Identifies a node in the quadtree. Root is (0,0,0); children of (L,x,y)
/// are (L+1, 2x+{0,1}, 2y+{0,1}).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TileId {
    lod: u32,
    x: u32,
    y: u32,
}

impl TileId {
    pub fn new(lod: u32, x: u32, y: u32) -> Self {
        Self { lod, x, y }
    }

    pub fn root() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// The four children of this tile, in (0,0) (1,0) (0,1) (1,1) order.
    pub fn children(&self) -> [TileId; 4] {
        [
            TileId::new(self.lod + 1, self.x * 2, self.y * 2),
            TileId::new(self.lod + 1, self.x * 2 + 1, self.y * 2),
            TileId::new(self.lod + 1, self.x * 2, self.y * 2 + 1),
            TileId::new(self.lod + 1, self.x * 2 + 1, self.y * 2 + 1),
        ]
    }

    /// The child at the given bit index (0=↙,1=↘,2=↖,3=↗), matching the
    /// child-availability bitmap ordering used by MetaNode.
    pub fn child(&self, bit: u8) -> TileId {
        debug_assert!(bit < 4);
        self.children()[bit as usize]
    }

    pub fn parent(&self) -> Option<TileId> {
        if self.lod == 0 {
            return None;
        }
        Some(TileId::new(self.lod - 1, self.x / 2, self.y / 2))
    }

    /// Shift this tile's (x,y) up by `levels` LODs, towards the root.
    pub fn shift_up(&self, levels: u32) -> TileId {
        TileId::new(
            self.lod.saturating_sub(levels),
            self.x >> levels.min(self.lod),
            self.y >> levels.min(self.lod),
        )
    }

    /// The origin tile of the meta-tile (of 2^k x 2^k nodes) that covers this tile.
    pub fn meta_tile_origin(&self, k: u32) -> TileId {
        let mask = !((1u32 << k) - 1);
        TileId::new(self.lod, self.x & mask, self.y & mask)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.lod, self.x, self.y)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_children_of_root() {
        let kids = TileId::root().children();
        assert_eq!(kids[0], TileId::new(1, 0, 0));
        assert_eq!(kids[1], TileId::new(1, 1, 0));
        assert_eq!(kids[2], TileId::new(1, 0, 1));
        assert_eq!(kids[3], TileId::new(1, 1, 1));
    }

    #[test]
    fn test_parent_roundtrip() {
        let tile = TileId::new(3, 5, 2);
        let child = tile.child(3);
        assert_eq!(child.parent(), Some(tile));
    }

    #[test]
    fn test_root_has_no_parent() {
        assert_eq!(TileId::root().parent(), None);
    }

    #[test]
    fn test_meta_tile_origin() {
        let tile = TileId::new(5, 13, 9);
        assert_eq!(tile.meta_tile_origin(2), TileId::new(5, 12, 8));
    }
}
