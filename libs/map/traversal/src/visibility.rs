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
use geometry::{Frustum, Obb};
use nalgebra::Point3;

/// P-vertex (a.k.a. "positive vertex") test: for each frustum plane, pick
/// the AABB corner furthest along the plane's normal and reject the box the
/// moment that corner is behind some plane (spec §4.2 "Visibility test").
/// Cheaper than testing all 8 corners since only one corner per plane can
/// possibly be the deciding one.
pub fn aabb_p_vertex_visible(frustum: &Frustum, lo: &Point3<f64>, hi: &Point3<f64>) -> bool {
    frustum.planes().iter().all(|plane| {
        let n = plane.normal();
        let p_vertex = Point3::new(
            if n.x >= 0.0 { hi.x } else { lo.x },
            if n.y >= 0.0 { hi.y } else { lo.y },
            if n.z >= 0.0 { hi.z } else { lo.z },
        );
        plane.point_is_in_front(&p_vertex)
    })
}

/// Additional OBB test run when a node carries one (spec §4.2: "if an OBB
/// exists, additionally test its 8 corners against the ... frustum
/// planes"). A box is rejected only when every corner is behind the same
/// plane.
pub fn obb_visible(frustum: &Frustum, obb: &Obb) -> bool {
    let corners = obb.corners();
    frustum
        .planes()
        .iter()
        .all(|plane| corners.iter().any(|c| plane.point_is_in_front(c)))
}

/// Full visibility test for one node's resolved geometry (spec §4.2
/// "Visibility test"): AABB p-vertex test first (when an AABB exists),
/// then the OBB corner test (when an OBB exists); rejects on first
/// failure. A node with neither (too shallow, per spec §4.2 step 4's depth
/// thresholds) is never culled here.
pub fn is_visible(frustum: &Frustum, meta: &NodeMeta) -> bool {
    if let Some((lo, hi)) = &meta.aabb_phys {
        if !aabb_p_vertex_visible(frustum, lo, hi) {
            return false;
        }
    }
    if let Some(obb) = &meta.obb_phys {
        if !obb_visible(frustum, obb) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Perspective3, UnitQuaternion, Vector3};

    fn frustum() -> Frustum {
        let proj = Perspective3::new(1.0, std::f64::consts::FRAC_PI_2, 0.1, 1000.0);
        Frustum::from_view_projection(proj.as_matrix())
    }

    #[test]
    fn test_aabb_in_front_is_visible() {
        let f = frustum();
        let lo = Point3::new(-1.0, -1.0, -11.0);
        let hi = Point3::new(1.0, 1.0, -9.0);
        assert!(aabb_p_vertex_visible(&f, &lo, &hi));
    }

    #[test]
    fn test_aabb_behind_camera_is_culled() {
        let f = frustum();
        let lo = Point3::new(-1.0, -1.0, 9.0);
        let hi = Point3::new(1.0, 1.0, 11.0);
        assert!(!aabb_p_vertex_visible(&f, &lo, &hi));
    }

    #[test]
    fn test_obb_in_front_is_visible() {
        let f = frustum();
        let obb = Obb::new(
            Point3::new(0.0, 0.0, -10.0),
            Vector3::new(1.0, 1.0, 1.0),
            UnitQuaternion::identity(),
        );
        assert!(obb_visible(&f, &obb));
    }

    #[test]
    fn test_obb_behind_camera_is_culled() {
        let f = frustum();
        let obb = Obb::new(
            Point3::new(0.0, 0.0, 10.0),
            Vector3::new(1.0, 1.0, 1.0),
            UnitQuaternion::identity(),
        );
        assert!(!obb_visible(&f, &obb));
    }
}
