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
use crate::node::{NodeIndex, TraverseTree};

/// How many idle ticks a node may go before its Meta/children/render tasks
/// are released (spec §4.2 "Periodic clearing").
const STALE_AFTER_TICKS: u64 = 5;

/// LOD at which the clearing walk starts sampling instead of visiting every
/// tile (spec §4.2 "Periodic clearing").
const SAMPLING_LOD: u32 = 3;

/// Whether tile `(x, y)` at `SAMPLING_LOD` is this tick's 1-in-64 sample
/// (spec §4.2: "selected by `(y*8 + x) mod 64 == tickIndex mod 64`").
pub fn lod3_sample_selected(x: u32, y: u32, tick: u64) -> bool {
    let sample = u64::from(y * 8 + x) % 64;
    sample == tick % 64
}

/// Walk the tree releasing stale subtrees (spec §4.2 `traverseClearing`).
/// Runs once per render tick. To bound cost, at `SAMPLING_LOD` only 1/64 of
/// tiles are visited per tick; the rest are left untouched until their turn
/// comes around.
pub fn traverse_clearing(tree: &mut TraverseTree, tick: u64) {
    if let Some(root) = tree.root() {
        clear_node(tree, root, tick);
    }
}

fn clear_node(tree: &mut TraverseTree, idx: NodeIndex, tick: u64) {
    let (lod, x, y, last_access, children) = match tree.get(idx) {
        Some(node) => (
            node.info.id().lod(),
            node.info.id().x(),
            node.info.id().y(),
            node.last_access_tick,
            node.children,
        ),
        None => return,
    };

    if lod == SAMPLING_LOD && !lod3_sample_selected(x, y, tick) {
        return;
    }

    if last_access + STALE_AFTER_TICKS < tick {
        release_node_contents(tree, idx);
        return;
    }

    for child in children.into_iter().flatten() {
        clear_node(tree, child, tick);
    }
}

fn release_node_contents(tree: &mut TraverseTree, idx: NodeIndex) {
    let children = match tree.get(idx) {
        Some(node) => node.children,
        None => return,
    };
    for child in children.into_iter().flatten() {
        tree.release_subtree(child);
    }
    if let Some(node) = tree.get_mut(idx) {
        node.children = [None; 4];
        node.meta = None;
        node.opaque.clear();
        node.transparent.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geodesy::SrsKind;
    use map_core::tile_id::TileId;

    fn root_info() -> map_core::node_info::NodeInfo {
        map_core::node_info::NodeInfo::new(TileId::root(), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]])
    }

    #[test]
    fn test_stale_node_has_children_released() {
        let mut tree = TraverseTree::new();
        let root = tree.set_root(root_info());
        let child_info = tree.get(root).unwrap().info.child(0);
        let child = tree.child_or_create(root, 0, child_info);
        tree.get_mut(root).unwrap().last_access_tick = 0;
        let before = tree.len();
        traverse_clearing(&mut tree, 100);
        assert!(tree.get(child).is_none());
        assert!(tree.len() < before);
    }

    #[test]
    fn test_fresh_node_is_not_released() {
        let mut tree = TraverseTree::new();
        let root = tree.set_root(root_info());
        tree.get_mut(root).unwrap().last_access_tick = 10;
        traverse_clearing(&mut tree, 11);
        assert!(tree.get(root).is_some());
    }

    #[test]
    fn test_lod3_sampling_selects_exactly_one_in_64() {
        let selected: Vec<_> = (0..64)
            .filter(|&i| lod3_sample_selected(i % 8, i / 8, 5))
            .collect();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_lod3_sampling_rotates_with_tick() {
        assert!(lod3_sample_selected(0, 0, 0));
        assert!(!lod3_sample_selected(0, 0, 1));
        assert!(lod3_sample_selected(1, 0, 1));
    }
}
