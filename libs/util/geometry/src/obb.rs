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
use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Oriented bounding box: a center, half-extents along the box's own axes,
/// and the rotation taking box-local axes to world axes.
#[derive(Clone, Copy, Debug)]
pub struct Obb {
    center: Point3<f64>,
    half_extents: Vector3<f64>,
    rotation: UnitQuaternion<f64>,
}

impl Obb {
    pub fn new(center: Point3<f64>, half_extents: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// An Obb with no rotation, equivalent to an axis-aligned box.
    pub fn from_center_and_half_extents(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self::new(center, half_extents, UnitQuaternion::identity())
    }

    pub fn center(&self) -> &Point3<f64> {
        &self.center
    }

    pub fn half_extents(&self) -> &Vector3<f64> {
        &self.half_extents
    }

    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }

    /// The box's three local axes expressed in world space.
    pub fn axes(&self) -> [Vector3<f64>; 3] {
        [
            self.rotation * Vector3::x(),
            self.rotation * Vector3::y(),
            self.rotation * Vector3::z(),
        ]
    }

    /// The 8 corners of the box in world space.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let axes = self.axes();
        let mut out = [Point3::origin(); 8];
        for (i, slot) in out.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *slot = self.center
                + axes[0] * (sx * self.half_extents.x)
                + axes[1] * (sy * self.half_extents.y)
                + axes[2] * (sz * self.half_extents.z);
        }
        out
    }

    /// Projected radius of the box onto `axis` (need not be unit length... but should be).
    pub fn projected_radius(&self, axis: &Vector3<f64>) -> f64 {
        let local_axes = self.axes();
        local_axes[0].dot(axis).abs() * self.half_extents.x
            + local_axes[1].dot(axis).abs() * self.half_extents.y
            + local_axes[2].dot(axis).abs() * self.half_extents.z
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_corners() {
        let obb = Obb::from_center_and_half_extents(Point3::origin(), Vector3::new(1.0, 2.0, 3.0));
        let corners = obb.corners();
        assert_relative_eq!(corners[0], Point3::new(-1.0, -2.0, -3.0));
        assert_relative_eq!(corners[7], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_projected_radius_axis_aligned() {
        let obb = Obb::from_center_and_half_extents(Point3::origin(), Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(obb.projected_radius(&Vector3::x()), 1.0);
        assert_relative_eq!(obb.projected_radius(&Vector3::z()), 3.0);
    }
}
