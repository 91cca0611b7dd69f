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
use geometry::Obb;
use map_core::node_info::NodeInfo;
use nalgebra::Point3;
use smallvec::SmallVec;

/// Index of a `TraverseNode` in a `TraverseTree`'s arena. Stands in for the
/// source's raw pointer / weak handle (spec §9 "Cyclic parent/child
/// references").
pub type NodeIndex = usize;

/// Resolved, per-frame geometric state of a node (spec §3 `TraverseNode`'s
/// `Option<Meta>` block), produced by `geometry::resolve_geometry` once the
/// node's `MetaNode` is known.
#[derive(Clone, Debug)]
pub struct NodeMeta {
    pub corners_phys: [Point3<f64>; 8],
    /// Present from depth >2 (spec §4.2 step 4).
    pub aabb_phys: Option<(Point3<f64>, Point3<f64>)>,
    /// Present from depth >4 (spec §4.2 step 4).
    pub obb_phys: Option<Obb>,
    pub surrogate_phys: Point3<f64>,
    pub has_geometry: bool,
    pub texel_size: Option<f64>,
    pub display_size: Option<f64>,
    /// Child-availability bits merged across the surface stack (spec §4.2
    /// step 3).
    pub child_flags: u8,
    /// Index into the surface stack this node renders from, if any (`None`
    /// means "empty": Meta present but nothing to draw).
    pub surface_index: Option<usize>,
    pub credits: SmallVec<[u32; 4]>,
}

/// One piece of rendering work accumulated on a node before being turned
/// into a `DrawTask` at emission time (spec §3 `TraverseNode`'s
/// `opaque`/`transparent` lists).
#[derive(Clone, Debug)]
pub struct RenderTask {
    pub mesh_name: String,
    pub tex_color_name: String,
    pub tex_mask_name: Option<String>,
    pub uv: [[f32; 3]; 3],
    pub color: [f32; 4],
    pub external_uv: bool,
    /// Screen-space clip rectangle `(u0, v0, u1, v1)` used by Balanced mode
    /// to fill only the quadrants a not-yet-renderable child is missing
    /// (spec §4.2 "Balanced"). `None` covers the whole node.
    pub uv_clip: Option<[f32; 4]>,
}

/// A live quadtree node (spec §3 `TraverseNode`). Owned by a `TraverseTree`
/// arena; `parent` is a non-owning back-reference by index.
pub struct TraverseNode {
    pub info: NodeInfo,
    pub parent: Option<NodeIndex>,
    pub children: [Option<NodeIndex>; 4],
    pub meta: Option<NodeMeta>,
    pub opaque: Vec<RenderTask>,
    pub transparent: Vec<RenderTask>,
    pub last_access_tick: u64,
    pub priority: f64,
}

impl TraverseNode {
    fn new(info: NodeInfo, parent: Option<NodeIndex>) -> Self {
        Self {
            info,
            parent,
            children: [None; 4],
            meta: None,
            opaque: Vec::new(),
            transparent: Vec::new(),
            last_access_tick: 0,
            priority: 0.0,
        }
    }

    /// A node is unresolved until Meta has been determined, per spec §3's
    /// invariant, "unresolved / empty / renderable".
    pub fn is_unresolved(&self) -> bool {
        self.meta.is_none()
    }

    pub fn is_renderable(&self) -> bool {
        !self.opaque.is_empty() || !self.transparent.is_empty()
    }
}

/// Arena of `TraverseNode`s. Slots of released subtrees are tombstoned and
/// reused by later `child_or_create` calls, avoiding unbounded growth as the
/// view pans (spec §9: "Eviction destroys subtrees bottom-up").
#[derive(Default)]
pub struct TraverseTree {
    slots: Vec<Option<TraverseNode>>,
    free: Vec<NodeIndex>,
    root: Option<NodeIndex>,
}

impl TraverseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Insert the root node, replacing any prior tree (spec §9's map-config
    /// `purge` "drops the traverse tree").
    pub fn set_root(&mut self, info: NodeInfo) -> NodeIndex {
        self.slots.clear();
        self.free.clear();
        let idx = self.insert(TraverseNode::new(info, None));
        self.root = Some(idx);
        idx
    }

    fn insert(&mut self, node: TraverseNode) -> NodeIndex {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&TraverseNode> {
        self.slots.get(idx).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut TraverseNode> {
        self.slots.get_mut(idx).and_then(|s| s.as_mut())
    }

    /// Returns the existing child at `bit`, or creates it from `info` (spec
    /// §4.2 step 5, "Child spawning").
    pub fn child_or_create(&mut self, parent: NodeIndex, bit: u8, info: NodeInfo) -> NodeIndex {
        if let Some(existing) = self.get(parent).and_then(|p| p.children[bit as usize]) {
            return existing;
        }
        let child = self.insert(TraverseNode::new(info, Some(parent)));
        if let Some(p) = self.get_mut(parent) {
            p.children[bit as usize] = Some(child);
        }
        child
    }

    /// Release `idx` and everything beneath it, tombstoning their slots for
    /// reuse. Does not touch the parent's child slot; callers clear that
    /// themselves (spec §4.2 "Periodic clearing").
    pub fn release_subtree(&mut self, idx: NodeIndex) {
        let children = self.get(idx).map(|n| n.children).unwrap_or([None; 4]);
        for child in children.into_iter().flatten() {
            self.release_subtree(child);
        }
        if self.slots.get(idx).map(|s| s.is_some()).unwrap_or(false) {
            self.slots[idx] = None;
            self.free.push(idx);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geodesy::SrsKind;
    use map_core::tile_id::TileId;

    fn root_info() -> NodeInfo {
        NodeInfo::new(TileId::root(), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]])
    }

    #[test]
    fn test_set_root_then_spawn_children() {
        let mut tree = TraverseTree::new();
        let root = tree.set_root(root_info());
        let child = tree.child_or_create(root, 2, tree.get(root).unwrap().info.child(2));
        assert_eq!(tree.get(child).unwrap().parent, Some(root));
        assert_eq!(tree.get(root).unwrap().children[2], Some(child));
    }

    #[test]
    fn test_child_or_create_is_idempotent() {
        let mut tree = TraverseTree::new();
        let root = tree.set_root(root_info());
        let info = tree.get(root).unwrap().info.child(0);
        let a = tree.child_or_create(root, 0, info);
        let b = tree.child_or_create(root, 0, info);
        assert_eq!(a, b);
    }

    #[test]
    fn test_release_subtree_frees_slots_for_reuse() {
        let mut tree = TraverseTree::new();
        let root = tree.set_root(root_info());
        let info = tree.get(root).unwrap().info.child(0);
        let child = tree.child_or_create(root, 0, info);
        let before = tree.len();
        tree.release_subtree(child);
        assert_eq!(tree.len(), before - 1);
        assert!(tree.get(child).is_none());
    }
}
