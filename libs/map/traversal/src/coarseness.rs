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
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Project `p` through `view_proj` and return its NDC y coordinate
/// (perspective-divided), unlike `Matrix4::transform_point` which assumes
/// an affine (non-projective) matrix.
fn project_ndc_y(view_proj: &Matrix4<f64>, p: &Point3<f64>) -> f64 {
    let clip = view_proj * Vector4::new(p.x, p.y, p.z, 1.0);
    clip.y / clip.w
}

/// Screen-space pixel size of a node's texel (spec §4.2 "Coarseness
/// value"). `apply_texel_size` mirrors the meta-tile's applicability flag:
/// when unset, the node never meets a coarseness threshold and must always
/// descend. The vertical texel offset is applied along physical +Y,
/// matching this crate's Y-up physical-space convention.
pub fn coarseness(
    corners_phys: &[Point3<f64>; 8],
    texel_size: Option<f64>,
    apply_texel_size: bool,
    view_proj: &Matrix4<f64>,
    window_height: f64,
) -> f64 {
    if !apply_texel_size {
        return f64::INFINITY;
    }
    let Some(texel) = texel_size else {
        return f64::INFINITY;
    };

    let mut max_delta = 0.0_f64;
    for c in corners_phys {
        let offset = c + Vector3::new(0.0, texel, 0.0);
        let y0 = project_ndc_y(view_proj, c);
        let y1 = project_ndc_y(view_proj, &offset);
        let delta = (y1 - y0).abs() * window_height * 0.5;
        max_delta = max_delta.max(delta);
    }
    max_delta
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Perspective3;

    fn corners_at(z: f64) -> [Point3<f64>; 8] {
        [Point3::new(0.0, 0.0, z); 8]
    }

    fn view_proj() -> Matrix4<f64> {
        *Perspective3::new(1.0, std::f64::consts::FRAC_PI_2, 0.1, 1000.0).as_matrix()
    }

    #[test]
    fn test_coarseness_is_infinite_when_apply_flag_unset() {
        let vp = view_proj();
        let c = coarseness(&corners_at(-10.0), Some(1.0), false, &vp, 1080.0);
        assert_eq!(c, f64::INFINITY);
    }

    #[test]
    fn test_coarseness_is_infinite_without_texel_size() {
        let vp = view_proj();
        let c = coarseness(&corners_at(-10.0), None, true, &vp, 1080.0);
        assert_eq!(c, f64::INFINITY);
    }

    #[test]
    fn test_coarseness_decreases_with_distance() {
        let vp = view_proj();
        let near = coarseness(&corners_at(-5.0), Some(1.0), true, &vp, 1080.0);
        let far = coarseness(&corners_at(-50.0), Some(1.0), true, &vp, 1080.0);
        assert!(near > far);
    }

    #[test]
    fn test_coarseness_scales_with_window_height() {
        let vp = view_proj();
        let small = coarseness(&corners_at(-10.0), Some(1.0), true, &vp, 540.0);
        let large = coarseness(&corners_at(-10.0), Some(1.0), true, &vp, 1080.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }
}
