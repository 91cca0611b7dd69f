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
pub mod clearing;
pub mod coarseness;
pub mod geometry;
pub mod meta;
pub mod mode;
pub mod node;
pub mod visibility;

pub use crate::{
    clearing::traverse_clearing,
    coarseness::coarseness,
    geometry::resolve_geometry,
    meta::{determine_meta, EntrySample, MetaDetermination},
    mode::{decide, quadrant_uv_clip, ModeOutcome},
    node::{NodeIndex, NodeMeta, RenderTask, TraverseNode, TraverseTree},
    visibility::is_visible,
};

use ::geometry::Frustum;
use credits::{CreditScope, CreditsAccumulator};
use geodesy::CoordinateManipulator;
use map_core::{
    config::EngineOptions,
    meta::MetaNode,
    node_info::NodeInfo,
    resource::{ResourcePayload, Validity},
    stats::Statistics,
    surface::SurfaceStack,
};
use mapconfig::expand_tile_template;
use nalgebra::Matrix4;
use resource_cache::ResourceCache;
use smallvec::SmallVec;

/// Binary order (2^k x 2^k nodes per meta-tile) used when fetching meta
/// tiles (spec §4.2 step 3, §6 `debugDisableMeta5`). Inferred from that
/// config flag's name: disabling it falls back to one `MetaNode` per
/// meta-tile (`k = 0`).
const META_TILE_ORDER: u32 = 5;

/// Read-only inputs to one `Traversal::traverse` call, gathered once per
/// frame by the caller (spec §4.2's per-frame traversal entry point).
pub struct TraverseContext<'a> {
    pub surface_stack: &'a SurfaceStack,
    pub cache: &'a ResourceCache,
    pub coord: &'a dyn CoordinateManipulator,
    pub frustum: &'a Frustum,
    pub view_proj: &'a Matrix4<f64>,
    pub window_height: f64,
    pub options: &'a EngineOptions,
}

/// The render-ready output of one traversal pass: per spec §3's
/// `TraverseNode` `opaque`/`transparent` lists, flattened across the whole
/// visible tree.
#[derive(Clone, Debug, Default)]
pub struct TraverseOutcome {
    pub opaque: Vec<RenderTask>,
    pub transparent: Vec<RenderTask>,
}

/// Priority assigned to a node this tick (spec §4.2 step 2, left
/// unspecified). Finer nodes are weighted above their ancestors: whatever a
/// frame is currently resolving detail for is, by construction, the subtree
/// nearest the camera, and coarser ancestors are usually already resident
/// from earlier frames.
fn node_priority(depth: u32) -> f64 {
    depth as f64 + 1.0
}

/// Owns the live quadtree and drives one traversal pass per tick (spec §3
/// `TraverseNode`, §4.2 "Traversal"). The top-level entry point other
/// crates reach for on a map-config change (see `mapconfig::lifecycle`'s
/// `purge_for_map_config_change`, which handles the resource-cache half of
/// the same event).
#[derive(Default)]
pub struct Traversal {
    tree: TraverseTree,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root, discarding any existing tree (spec §4.2 "a
    /// map-config change resets traversal at the root").
    pub fn set_root(&mut self, info: NodeInfo) {
        self.tree.set_root(info);
    }

    pub fn tree(&self) -> &TraverseTree {
        &self.tree
    }

    /// Drop the whole traverse tree (spec §9/§5 `purge`). Callers run this
    /// alongside `mapconfig::purge_for_map_config_change` on a map-config
    /// swap.
    pub fn purge(&mut self) {
        self.tree = TraverseTree::new();
    }

    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Run one traversal pass (spec §4.2): visits the tree top-down,
    /// resolving meta, visibility and coarseness per node, deciding each
    /// node's render mode bottom-up from its children's results, then
    /// sweeps stale subtrees via `traverse_clearing`. `tick` is the
    /// monotonic render tick, matching `ResourceCache::current_tick`.
    /// `stats` collects the per-LOD visit counters spec §4.2 step 1 makes
    /// the first action for every visited node; callers typically call
    /// `stats.begin_tick()` beforehand to reset the per-tick histogram.
    pub fn traverse(
        &mut self,
        ctx: &TraverseContext,
        credits: &mut CreditsAccumulator,
        stats: &mut Statistics,
        tick: u64,
    ) -> TraverseOutcome {
        let outcome = match self.tree.root() {
            Some(root) => {
                let result = visit_node(&mut self.tree, root, ctx, credits, stats, tick);
                TraverseOutcome {
                    opaque: result.opaque,
                    transparent: result.transparent,
                }
            }
            None => TraverseOutcome::default(),
        };
        traverse_clearing(&mut self.tree, tick);
        outcome
    }
}

#[derive(Default)]
struct VisitResult {
    renderable: bool,
    opaque: Vec<RenderTask>,
    transparent: Vec<RenderTask>,
}

/// One node's meta-tile lookup across a single surface stack entry (spec
/// §4.2 step 3). `k` is the meta-tile binary order in effect this frame.
fn sample_entry(
    surface_index: usize,
    stack: &SurfaceStack,
    id: map_core::tile_id::TileId,
    k: u32,
    cache: &ResourceCache,
    tick: u64,
    priority: f64,
) -> EntrySample {
    let entry = &stack.entries()[surface_index];
    let origin = id.meta_tile_origin(k);
    let url = expand_tile_template(entry.surface().meta_url(), origin);
    let res = cache.get(&url, None);
    res.touch(tick, priority);
    let meta = res.with_payload(|payload| match payload {
        Some(ResourcePayload::MetaTile(tile)) => tile.get(id).cloned(),
        _ => None,
    });
    EntrySample {
        alien: entry.is_alien(),
        validity: res.validity(),
        meta,
    }
}

/// Fetch (and touch) this node's mesh and texture resources for the surface
/// at `surface_index`, returning a `RenderTask` once both are `Ready` (spec
/// §4.2 step 6 "Render task emission"). Bound-layer overlay resolution
/// (`mapconfig::bound_layer`) composes on top of this at the host's
/// draw-task assembly step; this crate stops at naming the node's own
/// surface mesh/texture, per the open decision recorded in DESIGN.md.
fn build_render_task(
    info: &NodeInfo,
    surface_index: usize,
    stack: &SurfaceStack,
    cache: &ResourceCache,
    tick: u64,
    priority: f64,
    uv_clip: Option<[f32; 4]>,
) -> Option<RenderTask> {
    let entry = stack.entries().get(surface_index)?;
    let mesh_name = expand_tile_template(entry.surface().mesh_url(), info.id());
    let tex_name = expand_tile_template(entry.surface().texture_url(), info.id());

    let mesh_res = cache.get(&mesh_name, None);
    let tex_res = cache.get(&tex_name, None);
    mesh_res.touch(tick, priority);
    tex_res.touch(tick, priority);

    if mesh_res.validity() != Validity::Valid || tex_res.validity() != Validity::Valid {
        return None;
    }

    Some(RenderTask {
        mesh_name,
        tex_color_name: tex_name,
        tex_mask_name: None,
        uv: map_core::draw_task::DrawTask::identity_uv(),
        color: [1.0, 1.0, 1.0, 1.0],
        external_uv: false,
        uv_clip,
    })
}

/// Build the placeholder `MetaNode` used when no surface stack entry
/// contributes geometry at this node (spec §4.2 step 3's "empty" outcome):
/// keeps the merged child-availability bits so the node can still spawn
/// children and stay in the tree for staleness tracking, but carries no
/// drawable surface of its own.
fn empty_meta_node(merged_child_flags: u8, credits: &[u32]) -> MetaNode {
    MetaNode::new(
        false,
        false,
        merged_child_flags,
        None,
        None,
        None,
        None,
        0,
        SmallVec::from_slice(credits),
    )
}

fn visit_node(
    tree: &mut TraverseTree,
    idx: NodeIndex,
    ctx: &TraverseContext,
    credits: &mut CreditsAccumulator,
    stats: &mut Statistics,
    tick: u64,
) -> VisitResult {
    let info = match tree.get(idx) {
        Some(node) => node.info,
        None => return VisitResult::default(),
    };
    let depth = info.distance_from_root();
    stats.record_node_visit(depth);
    let priority = node_priority(depth);

    if let Some(node) = tree.get_mut(idx) {
        node.last_access_tick = tick;
        node.priority = priority;
    }

    let k = if ctx.options.debug_disable_meta5 { 0 } else { META_TILE_ORDER };
    let samples: Vec<EntrySample> = (0..ctx.surface_stack.len())
        .map(|i| sample_entry(i, ctx.surface_stack, info.id(), k, ctx.cache, tick, priority))
        .collect();

    let (surface_index, merged_child_flags, credits_list, chosen) = match determine_meta(&samples) {
        MetaDetermination::Indeterminate => return VisitResult::default(),
        MetaDetermination::Resolved {
            surface_index,
            merged_child_flags,
            credits,
            chosen,
            ..
        } => (surface_index, merged_child_flags, credits, chosen),
    };

    let meta_node = chosen.unwrap_or_else(|| empty_meta_node(merged_child_flags, &credits_list));
    let node_meta = match resolve_geometry(&info, &meta_node, ctx.coord) {
        Ok(mut resolved) => {
            resolved.surface_index = surface_index;
            resolved
        }
        Err(e) => {
            log::warn!("node {} failed to resolve geometry: {}", info.id(), e);
            return VisitResult::default();
        }
    };

    if !is_visible(ctx.frustum, &node_meta) {
        if let Some(node) = tree.get_mut(idx) {
            node.meta = Some(node_meta);
            node.opaque.clear();
            node.transparent.clear();
        }
        return VisitResult::default();
    }

    let coarseness_val = coarseness(
        &node_meta.corners_phys,
        node_meta.texel_size,
        node_meta.texel_size.is_some(),
        ctx.view_proj,
        ctx.window_height,
    );

    let mut child_renderable = [false; 4];
    let mut child_results: [Option<VisitResult>; 4] = Default::default();
    for bit in 0..4u8 {
        if node_meta.child_flags & (1 << bit) != 0 {
            let child_info = info.child(bit);
            let child_idx = tree.child_or_create(idx, bit, child_info);
            let result = visit_node(tree, child_idx, ctx, credits, stats, tick);
            child_renderable[bit as usize] = result.renderable;
            child_results[bit as usize] = Some(result);
        }
    }

    let outcome = decide(
        ctx.options.traverse_mode,
        coarseness_val,
        ctx.options.max_texel_to_pixel_scale,
        ctx.options.max_balanced_coarseness_scale,
        node_meta.child_flags,
        child_renderable,
    );

    let mut result = VisitResult::default();
    let own_priority = node_priority(depth);

    match outcome {
        ModeOutcome::RenderWhole => {
            if let Some(surf_idx) = node_meta.surface_index {
                if let Some(task) = build_render_task(
                    &info,
                    surf_idx,
                    ctx.surface_stack,
                    ctx.cache,
                    tick,
                    own_priority,
                    None,
                ) {
                    result.opaque.push(task);
                    result.renderable = true;
                }
            }
        }
        ModeOutcome::Descend => {
            for child in child_results.into_iter().flatten() {
                result.opaque.extend(child.opaque);
                result.transparent.extend(child.transparent);
                result.renderable |= child.renderable;
            }
        }
        ModeOutcome::PartialRender(clips) => {
            for child in child_results.into_iter().flatten() {
                result.opaque.extend(child.opaque);
                result.transparent.extend(child.transparent);
                result.renderable |= child.renderable;
            }
            if let Some(surf_idx) = node_meta.surface_index {
                for (_bit, clip) in clips {
                    if let Some(task) = build_render_task(
                        &info,
                        surf_idx,
                        ctx.surface_stack,
                        ctx.cache,
                        tick,
                        own_priority,
                        Some(clip),
                    ) {
                        result.opaque.push(task);
                        result.renderable = true;
                    }
                }
            }
        }
    }

    if result.renderable {
        for &credit_id in &node_meta.credits {
            credits.hit(CreditScope::Imagery, credit_id, depth);
        }
    }

    if let Some(node) = tree.get_mut(idx) {
        node.opaque = result.opaque.clone();
        node.transparent = result.transparent.clone();
        node.meta = Some(node_meta);
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::bail;
    use geodesy::SrsKind;
    use map_core::surface::{SurfaceInfo, SurfaceStackEntry};
    use map_core::tile_id::TileId;
    use nalgebra::Perspective3;

    struct IdentityCoord;
    impl CoordinateManipulator for IdentityCoord {
        fn convert(&self, _from: SrsKind, _to: SrsKind, point: [f64; 3]) -> anyhow::Result<[f64; 3]> {
            Ok(point)
        }
        fn nav_geodesic_direct(&self, _ll: [f64; 2], _az: f64, _d: f64) -> anyhow::Result<[f64; 2]> {
            bail!("unused in this test")
        }
        fn nav_geodesic_inverse(&self, _a: [f64; 2], _b: [f64; 2]) -> anyhow::Result<(f64, f64)> {
            bail!("unused in this test")
        }
    }

    fn empty_stack() -> SurfaceStack {
        let surface = SurfaceInfo::new(
            vec!["base".to_owned()],
            "m/{lod}-{x}-{y}.meta".to_owned(),
            "s/{lod}-{x}-{y}.mesh".to_owned(),
            "s/{lod}-{x}-{y}.jpg".to_owned(),
            None,
        );
        SurfaceStack::new(vec![SurfaceStackEntry::new(surface, [0.0; 3], false)])
    }

    fn far_view_proj() -> Matrix4<f64> {
        *Perspective3::new(1.0, std::f64::consts::FRAC_PI_2, 0.1, 100_000.0).as_matrix()
    }

    #[test]
    fn test_traverse_with_no_meta_resources_never_renders() {
        let mut traversal = Traversal::new();
        traversal.set_root(NodeInfo::new(
            TileId::root(),
            SrsKind::Physical,
            [[-1.0, -1.0], [1.0, 1.0]],
        ));

        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::new(dir.path(), None, 4, 1024 * 1024, 64).unwrap();
        let stack = empty_stack();
        let coord = IdentityCoord;
        let frustum = Frustum::from_view_projection(&far_view_proj());
        let view_proj = far_view_proj();
        let options = EngineOptions::default();
        let ctx = TraverseContext {
            surface_stack: &stack,
            cache: &cache,
            coord: &coord,
            frustum: &frustum,
            view_proj: &view_proj,
            window_height: 1080.0,
            options: &options,
        };
        let mut credits = CreditsAccumulator::new();
        let mut stats = Statistics::new();

        let outcome = traversal.traverse(&ctx, &mut credits, &mut stats, 1);
        assert!(outcome.opaque.is_empty());
        assert!(outcome.transparent.is_empty());
        assert_eq!(traversal.node_count(), 1);
        assert_eq!(stats.total_nodes_visited(), 1);
    }

    #[test]
    fn test_purge_drops_the_tree() {
        let mut traversal = Traversal::new();
        traversal.set_root(NodeInfo::new(
            TileId::root(),
            SrsKind::Physical,
            [[-1.0, -1.0], [1.0, 1.0]],
        ));
        assert_eq!(traversal.node_count(), 1);
        traversal.purge();
        assert_eq!(traversal.node_count(), 0);
    }
}
