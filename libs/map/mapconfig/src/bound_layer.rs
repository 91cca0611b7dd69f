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
use map_core::{surface::BoundLayer, surface::BoundParamInfo, tile_id::TileId};

/// Outcome of preparing one bound layer against one sub-mesh (spec §4.3
/// step 1). `Indeterminate` means the layer's meta-tile resource hasn't
/// decoded yet and the whole sub-mesh's texturing must wait another tick.
#[derive(Clone, Debug)]
pub enum PrepareOutcome {
    Invalid,
    Indeterminate,
    Ready(BoundParamInfo),
}

/// Prepare one `BoundParamInfo` for `layer` against `tile`/`sub_mesh` (spec
/// §4.3 step 1). `meta_ready` tells us whether the layer's own meta-tile
/// resource (if any) has finished decoding; until it has, a layer that
/// carries availability data can't be resolved either way.
///
/// This crate doesn't model the original's merged "local tile" addressing
/// (multiple source tiles sharing one mesh); `orig_local_lod_delta` stands
/// in for `origLocal.lod - vars.local.lod` and is 0 for every caller in this
/// codebase, which is the un-merged case (documented as an open decision in
/// DESIGN.md).
pub fn prepare_bound_param(
    layer: &BoundLayer,
    tile: TileId,
    sub_mesh: u32,
    meta_ready: bool,
    orig_local_lod_delta: i64,
) -> PrepareOutcome {
    let (lod_min, lod_max) = layer.lod_range();
    if tile.lod() < lod_min {
        return PrepareOutcome::Invalid;
    }

    let shifted = tile.shift_up(tile.lod() - lod_min);
    let [[rx_lo, ry_lo], [rx_hi, ry_hi]] = layer.tile_range();
    if shifted.x() < rx_lo || shifted.x() >= rx_hi || shifted.y() < ry_lo || shifted.y() >= ry_hi {
        return PrepareOutcome::Invalid;
    }

    let depth = (tile.lod() as i64 - lod_max as i64).max(0) + orig_local_lod_delta;
    let depth = depth.max(0) as u32;
    let clamped = tile.shift_up(depth);

    let (watertight, transparent) = if layer.has_meta() {
        if !meta_ready {
            return PrepareOutcome::Indeterminate;
        }
        match layer.availability_at(clamped.x(), clamped.y()) {
            Some((available, watertight)) if available => (watertight, layer.is_transparent()),
            _ => return PrepareOutcome::Invalid,
        }
    } else {
        (layer.is_watertight(), layer.is_transparent())
    };

    PrepareOutcome::Ready(BoundParamInfo::new(
        layer.id().to_owned(),
        depth,
        (clamped.lod(), clamped.x(), clamped.y()),
        (clamped.x(), clamped.y()),
        sub_mesh,
        watertight,
        transparent,
    ))
}

/// Sort ascending by depth, then drop the covered suffix: spec §4.3 step 3's
/// "skip overlaps". A watertight, opaque entry "can hide everything below
/// it" (spec GLOSSARY "Watertight"), so the finest (smallest-depth, first in
/// ascending order) such entry is already a complete backstop: everything
/// coarser than it is permanently hidden underneath and can be dropped.
/// Entries at or finer than it survive, since finer detail always draws
/// over the backstop. Testable property 6: the surviving list's last
/// element is watertight and opaque, unless the list is empty.
pub fn resolve_bound_params(mut ready: Vec<BoundParamInfo>) -> Vec<BoundParamInfo> {
    ready.sort_by_key(|b| b.depth());
    if let Some(cut) = ready
        .iter()
        .position(|b| b.is_watertight() && !b.is_transparent())
    {
        ready.truncate(cut + 1);
    }
    ready
}

#[cfg(test)]
mod test {
    use super::*;

    fn layer(id: &str, lod_max: u32, watertight: bool, transparent: bool) -> BoundLayer {
        BoundLayer::new(
            id.into(),
            "c".into(),
            None,
            None,
            (0, lod_max),
            [[0, 0], [1 << 20, 1 << 20]],
            None,
            watertight,
            transparent,
        )
    }

    #[test]
    fn test_below_min_lod_is_invalid() {
        let l = BoundLayer::new(
            "a".into(), "c".into(), None, None, (5, 20),
            [[0, 0], [1 << 20, 1 << 20]], None, true, false,
        );
        let outcome = prepare_bound_param(&l, TileId::new(2, 0, 0), 0, true, 0);
        assert!(matches!(outcome, PrepareOutcome::Invalid));
    }

    #[test]
    fn test_depth_zero_within_lod_range() {
        let l = layer("a", 20, true, false);
        let outcome = prepare_bound_param(&l, TileId::new(10, 3, 5), 0, true, 0);
        match outcome {
            PrepareOutcome::Ready(p) => assert_eq!(p.depth(), 0),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_clamps_beyond_max_lod() {
        let l = layer("a", 10, true, false);
        let outcome = prepare_bound_param(&l, TileId::new(13, 8, 8), 0, true, 0);
        match outcome {
            PrepareOutcome::Ready(p) => assert_eq!(p.depth(), 3),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_indeterminate_until_meta_ready() {
        let l = BoundLayer::new(
            "a".into(), "c".into(), None, Some("meta".into()), (0, 20),
            [[0, 0], [1 << 20, 1 << 20]], Some(vec![0u8; 256 * 256]), false, false,
        );
        let outcome = prepare_bound_param(&l, TileId::new(5, 1, 1), 0, false, 0);
        assert!(matches!(outcome, PrepareOutcome::Indeterminate));
    }

    #[test]
    fn test_resolve_keeps_smallest_watertight_suffix() {
        let l1 = BoundParamInfo::new("l1".into(), 0, (5, 1, 1), (1, 1), 0, false, false);
        let l2 = BoundParamInfo::new("l2".into(), 2, (5, 1, 1), (1, 1), 0, true, false);
        let resolved = resolve_bound_params(vec![l1, l2]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.last().unwrap().layer_id(), "l2");
    }

    #[test]
    fn test_resolve_drops_everything_below_finest_watertight() {
        let deep = BoundParamInfo::new("deep".into(), 3, (5, 1, 1), (1, 1), 0, false, false);
        let mid = BoundParamInfo::new("mid".into(), 1, (5, 1, 1), (1, 1), 0, true, false);
        let shallow = BoundParamInfo::new("shallow".into(), 0, (5, 1, 1), (1, 1), 0, true, false);
        let resolved = resolve_bound_params(vec![deep, mid, shallow]);
        // `shallow` (finest) is already watertight and opaque, so it alone
        // "can hide everything below it" (spec GLOSSARY "Watertight"):
        // both `mid` and `deep` are permanently hidden beneath it and drop.
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].layer_id(), "shallow");
    }

    #[test]
    fn test_resolve_keeps_finer_non_watertight_over_coarser_backstop() {
        let deep = BoundParamInfo::new("deep".into(), 3, (5, 1, 1), (1, 1), 0, false, false);
        let mid = BoundParamInfo::new("mid".into(), 1, (5, 1, 1), (1, 1), 0, true, false);
        let shallow = BoundParamInfo::new("shallow".into(), 0, (5, 1, 1), (1, 1), 0, false, false);
        let resolved = resolve_bound_params(vec![deep, mid, shallow]);
        // `shallow` (finest) has no coverage guarantee, so `mid`'s watertight
        // backstop is still needed; only `deep` (coarser than that backstop)
        // is redundant and drops.
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].layer_id(), "shallow");
        assert_eq!(resolved[1].layer_id(), "mid");
    }
}
