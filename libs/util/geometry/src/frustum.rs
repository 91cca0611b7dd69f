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
use crate::{Obb, Plane, Sphere};
use nalgebra::{Matrix4, Vector3};

/// The six half-spaces of a view frustum, extracted from a combined
/// view-projection matrix. Used to cull traversal nodes whose bounding
/// volume lies entirely outside the camera's view.
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Extract the 6 frustum planes from a view-projection matrix, following
    /// the standard Gribb/Hartmann row-extraction method. Plane normals point
    /// inward, towards the interior of the frustum.
    pub fn from_view_projection(vp: &Matrix4<f64>) -> Self {
        let row = |i: usize| Vector3::new(vp[(i, 0)], vp[(i, 1)], vp[(i, 2)]);
        let w = (row(3), vp[(3, 3)]);
        let make = |(n, d): (Vector3<f64>, f64)| {
            let len = n.norm();
            Plane::from_normal_and_distance(n / len, -d / len)
        };

        let left = (w.0 + row(0), w.1 + vp[(0, 3)]);
        let right = (w.0 - row(0), w.1 - vp[(0, 3)]);
        let bottom = (w.0 + row(1), w.1 + vp[(1, 3)]);
        let top = (w.0 - row(1), w.1 - vp[(1, 3)]);
        let near = (w.0 + row(2), w.1 + vp[(2, 3)]);
        let far = (w.0 - row(2), w.1 - vp[(2, 3)]);

        Self {
            planes: [
                make(left),
                make(right),
                make(bottom),
                make(top),
                make(near),
                make(far),
            ],
        }
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// True unless the sphere is entirely on the negative side of some plane.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.planes
            .iter()
            .all(|p| p.distance_to_point(sphere.center()) >= -sphere.radius())
    }

    /// True unless the box is entirely on the negative side of some plane.
    pub fn intersects_obb(&self, obb: &Obb) -> bool {
        self.planes.iter().all(|p| {
            let r = obb.projected_radius(p.normal());
            p.distance_to_point(obb.center()) >= -r
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Perspective3, Point3};

    #[test]
    fn test_sphere_in_front_of_camera_is_visible() {
        let proj = Perspective3::new(1.0, std::f64::consts::FRAC_PI_2, 0.1, 1000.0);
        let vp = *proj.as_matrix();
        let frustum = Frustum::from_view_projection(&vp);
        let sphere = Sphere::from_center_and_radius(&Point3::new(0.0, 0.0, -10.0), 1.0);
        assert!(frustum.intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_behind_camera_is_culled() {
        let proj = Perspective3::new(1.0, std::f64::consts::FRAC_PI_2, 0.1, 1000.0);
        let vp = *proj.as_matrix();
        let frustum = Frustum::from_view_projection(&vp);
        let sphere = Sphere::from_center_and_radius(&Point3::new(0.0, 0.0, 10.0), 1.0);
        assert!(!frustum.intersects_sphere(&sphere));
    }
}
