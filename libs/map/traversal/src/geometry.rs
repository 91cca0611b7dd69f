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
use crate::node::NodeMeta;
use anyhow::Result;
use geodesy::{CoordinateManipulator, SrsKind};
use geometry::Obb;
use map_core::meta::MetaNode;
use map_core::node_info::NodeInfo;
use nalgebra::{Point3, Rotation3, UnitQuaternion, Vector3};
use smallvec::SmallVec;

/// Depth (LOD) at which a node starts carrying an AABB (spec §4.2 step 4).
const AABB_MIN_DEPTH: u32 = 2;
/// Depth (LOD) at which a node starts carrying an OBB (spec §4.2 step 4).
const OBB_MIN_DEPTH: u32 = 4;

/// The 8 corners of `extents` (`[[lo_x, lo_y, lo_z], [hi_x, hi_y, hi_z]]`) in
/// a consistent winding, with corner 0 at the low-x/low-y/low-z vertex and
/// corner 4 directly "above" (high z) corner 0, matching spec §4.2 step 4's
/// "`corners[4]-corners[0]` as forward, `corners[2]-corners[0]` as up".
fn box_corners(extents: [[f64; 3]; 2]) -> [[f64; 3]; 8] {
    let [lo, hi] = extents;
    let mut out = [[0.0; 3]; 8];
    for (i, slot) in out.iter_mut().enumerate() {
        let x = if i & 1 == 0 { lo[0] } else { hi[0] };
        let y = if i & 2 == 0 { lo[1] } else { hi[1] };
        let z = if i & 4 == 0 { lo[2] } else { hi[2] };
        *slot = [x, y, z];
    }
    out
}

/// Resolve a node's physical-space geometry (spec §4.2 step 4). `local_srs`
/// is the SRS `extents`/`geometric_extents` are expressed in (typically
/// `NodeInfo::srs()`); corners are converted to `Physical` via `coord`.
pub fn resolve_geometry(
    node_info: &NodeInfo,
    meta: &MetaNode,
    coord: &dyn CoordinateManipulator,
) -> Result<NodeMeta> {
    let local_extents = match meta.geometric_extents() {
        Some(e) => e,
        None => {
            let [[lox, loy], [hix, hiy]] = node_info.extents();
            [[lox, loy, 0.0], [hix, hiy, 0.0]]
        }
    };
    let local_corners = box_corners(local_extents);

    let mut corners_phys = [Point3::origin(); 8];
    for (i, c) in local_corners.iter().enumerate() {
        let p = coord.convert(node_info.srs(), SrsKind::Physical, *c)?;
        corners_phys[i] = Point3::from(p);
    }

    let surrogate_local = {
        let [[lox, loy, _], [hix, hiy, _]] = local_extents;
        let z = meta.surrogate().unwrap_or(0.0);
        [(lox + hix) / 2.0, (loy + hiy) / 2.0, z]
    };
    let surrogate_phys = Point3::from(coord.convert(node_info.srs(), SrsKind::Physical, surrogate_local)?);

    let depth = node_info.distance_from_root();

    let aabb_phys = if depth > AABB_MIN_DEPTH {
        let mut lo = corners_phys[0];
        let mut hi = corners_phys[0];
        for c in &corners_phys[1..] {
            lo = Point3::new(lo.x.min(c.x), lo.y.min(c.y), lo.z.min(c.z));
            hi = Point3::new(hi.x.max(c.x), hi.y.max(c.y), hi.z.max(c.z));
        }
        Some((lo, hi))
    } else {
        None
    };

    let obb_phys = if depth > OBB_MIN_DEPTH {
        Some(build_obb(&corners_phys))
    } else {
        None
    };

    Ok(NodeMeta {
        corners_phys,
        aabb_phys,
        obb_phys,
        surrogate_phys,
        has_geometry: meta.has_geometry(),
        texel_size: meta.texel_size(),
        display_size: meta.display_size(),
        child_flags: meta.child_flags(),
        surface_index: None,
        credits: SmallVec::from_slice(meta.credits()),
    })
}

/// Build the node's OBB by averaging corners to a center, taking
/// `corners[4]-corners[0]` as forward and `corners[2]-corners[0]` as up,
/// then projecting all 8 corners into that local frame (spec §4.2 step 4).
fn build_obb(corners: &[Point3<f64>; 8]) -> Obb {
    let center = Point3::from(
        corners
            .iter()
            .fold(Vector3::zeros(), |acc, c| acc + c.coords)
            / 8.0,
    );

    let forward = (corners[4] - corners[0]).normalize();
    let up_raw = corners[2] - corners[0];
    let right = up_raw.cross(&forward).normalize();
    let up = forward.cross(&right).normalize();

    let rotation_matrix = Rotation3::from_matrix_unchecked(nalgebra::Matrix3::from_columns(&[
        right, up, forward,
    ]));
    let rotation = UnitQuaternion::from_rotation_matrix(&rotation_matrix);

    let mut half_extents = Vector3::zeros();
    for c in corners {
        let local = rotation.inverse() * (c - center);
        half_extents.x = half_extents.x.max(local.x.abs());
        half_extents.y = half_extents.y.max(local.y.abs());
        half_extents.z = half_extents.z.max(local.z.abs());
    }

    Obb::new(center, half_extents, rotation)
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::bail;
    use map_core::tile_id::TileId;
    use smallvec::smallvec;

    struct IdentityCoord;
    impl CoordinateManipulator for IdentityCoord {
        fn convert(&self, _from: SrsKind, _to: SrsKind, point: [f64; 3]) -> Result<[f64; 3]> {
            Ok(point)
        }
        fn nav_geodesic_direct(&self, _ll: [f64; 2], _az: f64, _d: f64) -> Result<[f64; 2]> {
            bail!("unused in this test")
        }
        fn nav_geodesic_inverse(&self, _a: [f64; 2], _b: [f64; 2]) -> Result<(f64, f64)> {
            bail!("unused in this test")
        }
    }

    fn leaf_meta(extents: [[f64; 3]; 2]) -> MetaNode {
        MetaNode::new(true, false, 0b1111, Some(extents), Some(1.0), Some(2.0), Some(3.0), 0, smallvec![1, 2])
    }

    #[test]
    fn test_aabb_only_appears_past_depth_threshold() {
        let info_shallow = NodeInfo::new(TileId::new(1, 0, 0), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]]);
        let info_deep = NodeInfo::new(TileId::new(5, 0, 0), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]]);
        let meta = leaf_meta([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);

        let shallow = resolve_geometry(&info_shallow, &meta, &IdentityCoord).unwrap();
        let deep = resolve_geometry(&info_deep, &meta, &IdentityCoord).unwrap();
        assert!(shallow.aabb_phys.is_none());
        assert!(deep.aabb_phys.is_some());
    }

    #[test]
    fn test_obb_only_appears_past_depth_threshold() {
        let info_mid = NodeInfo::new(TileId::new(4, 0, 0), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]]);
        let info_deep = NodeInfo::new(TileId::new(6, 0, 0), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]]);
        let meta = leaf_meta([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);

        let mid = resolve_geometry(&info_mid, &meta, &IdentityCoord).unwrap();
        let deep = resolve_geometry(&info_deep, &meta, &IdentityCoord).unwrap();
        assert!(mid.obb_phys.is_none());
        assert!(deep.obb_phys.is_some());
    }

    #[test]
    fn test_aabb_bounds_contain_all_corners() {
        let info = NodeInfo::new(TileId::new(5, 0, 0), SrsKind::Physical, [[0.0, 0.0], [1.0, 1.0]]);
        let meta = leaf_meta([[-2.0, -3.0, -1.0], [4.0, 5.0, 6.0]]);
        let resolved = resolve_geometry(&info, &meta, &IdentityCoord).unwrap();
        let (lo, hi) = resolved.aabb_phys.unwrap();
        for c in &resolved.corners_phys {
            assert!(c.x >= lo.x - 1e-9 && c.x <= hi.x + 1e-9);
            assert!(c.y >= lo.y - 1e-9 && c.y <= hi.y + 1e-9);
            assert!(c.z >= lo.z - 1e-9 && c.z <= hi.z + 1e-9);
        }
    }

    #[test]
    fn test_falls_back_to_node_info_extents_without_geometric_extents() {
        let info = NodeInfo::new(TileId::new(1, 0, 0), SrsKind::Physical, [[0.0, 0.0], [10.0, 10.0]]);
        let meta = MetaNode::new(true, false, 0, None, None, None, None, 0, SmallVec::new());
        let resolved = resolve_geometry(&info, &meta, &IdentityCoord).unwrap();
        assert_eq!(resolved.corners_phys[7], Point3::new(10.0, 10.0, 0.0));
    }
}
