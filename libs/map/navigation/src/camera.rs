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
use anyhow::Result;
use geodesy::{CoordinateManipulator, SrsKind};
use nalgebra::{Matrix4, Point3, Vector3};

/// Replaces the source's virtual camera-build hooks (spec §9 "Overrides as
/// config, not inheritance"): zero or more of these run, in field order, at
/// the corresponding point during `build_camera`.
#[derive(Default)]
pub struct CameraOverrides {
    pub eye: Option<Box<dyn Fn(Point3<f64>) -> Point3<f64> + Send + Sync>>,
    pub target: Option<Box<dyn Fn(Point3<f64>) -> Point3<f64> + Send + Sync>>,
    pub up: Option<Box<dyn Fn(Vector3<f64>) -> Vector3<f64> + Send + Sync>>,
    pub view: Option<Box<dyn Fn(Matrix4<f64>) -> Matrix4<f64> + Send + Sync>>,
    pub proj: Option<Box<dyn Fn(Matrix4<f64>) -> Matrix4<f64> + Send + Sync>>,
    /// `(fov_y_radians, aspect, near, far)`.
    pub fov_aspect_near_far: Option<Box<dyn Fn((f64, f64, f64, f64)) -> (f64, f64, f64, f64) + Send + Sync>>,
}

/// The resolved eye/target/up/view/proj for one frame (spec §4.4 "Camera
/// construction").
#[derive(Clone, Copy, Debug)]
pub struct CameraState {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub view: Matrix4<f64>,
    pub proj: Matrix4<f64>,
    pub fov_y_radians: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

/// Build the camera for the current nav-SRS position/orientation (spec
/// §4.4 "Camera construction" and "Projection"). `planet_radius` and
/// `terrain_radius_under_camera` are both measured from the coordinate
/// manipulator's physical-SRS origin.
#[allow(clippy::too_many_arguments)]
pub fn build_camera(
    nav_position: [f64; 3],
    orientation: [f64; 3],
    geographic: bool,
    coord: &dyn CoordinateManipulator,
    terrain_radius_under_camera: f64,
    aspect: f64,
    overrides: &CameraOverrides,
) -> Result<CameraState> {
    let center_phys = coord.convert(SrsKind::Navigation, SrsKind::Physical, nav_position)?;
    let center = Point3::from(center_phys);

    let yaw = orientation[0].to_radians();
    let pitch = orientation[1].to_radians();
    let roll = orientation[2].to_radians();

    // Local dir/up in a yaw/pitch/roll-derived frame before re-orienting
    // into either the projected or geographic basis (spec §4.4).
    let dir_local = Vector3::new(
        pitch.sin() * yaw.sin(),
        pitch.cos(),
        pitch.sin() * yaw.cos(),
    );
    let up_local = Vector3::new(
        -pitch.cos() * yaw.sin() * roll.cos() - yaw.cos() * roll.sin(),
        pitch.sin() * roll.cos(),
        -pitch.cos() * yaw.cos() * roll.cos() + yaw.sin() * roll.sin(),
    );

    let (dir, up) = if !geographic {
        // Projected SRS: swap XY, invert Z (spec §4.4).
        let swap_invert = |v: Vector3<f64>| Vector3::new(v.y, v.x, -v.z);
        (swap_invert(dir_local), swap_invert(up_local))
    } else {
        // Geographic SRS: build the local NED frame from two 100 m
        // geodesic walks (north, east) projected to physical space, then
        // rotate (dir, up) by it (spec §4.4).
        let lat_lon = [nav_position[1].to_radians(), nav_position[0].to_radians()];
        let north_ll = coord.nav_geodesic_direct(lat_lon, 0.0, 100.0)?;
        let east_ll = coord.nav_geodesic_direct(lat_lon, std::f64::consts::FRAC_PI_2, 100.0)?;
        let north_phys = Point3::from(coord.convert(
            SrsKind::Navigation,
            SrsKind::Physical,
            [north_ll[1].to_degrees(), north_ll[0].to_degrees(), nav_position[2]],
        )?);
        let east_phys = Point3::from(coord.convert(
            SrsKind::Navigation,
            SrsKind::Physical,
            [east_ll[1].to_degrees(), east_ll[0].to_degrees(), nav_position[2]],
        )?);
        let north = (north_phys - center).normalize();
        let east = (east_phys - center).normalize();
        let down = north.cross(&east).normalize();
        let rotate = |v: Vector3<f64>| north * v.z + east * v.x - down * v.y;
        (rotate(dir_local).normalize(), rotate(up_local).normalize())
    };

    let mut eye = center;
    let mut target = center + dir;
    let mut up = up;

    if let Some(f) = &overrides.eye {
        eye = f(eye);
    }
    if let Some(f) = &overrides.target {
        target = f(target);
    }
    if let Some(f) = &overrides.up {
        up = f(up);
    }

    let mut view = Matrix4::look_at_rh(&eye, &target, &up);
    if let Some(f) = &overrides.view {
        view = f(view);
        // When the caller overrides the view matrix outright, eye/target/up
        // must be re-derived from its inverse (spec §4.4).
        if let Some(inv) = view.try_inverse() {
            eye = Point3::from(inv.transform_point(&Point3::origin()));
            let forward = inv.transform_vector(&Vector3::new(0.0, 0.0, -1.0));
            target = eye + forward;
            up = inv.transform_vector(&Vector3::new(0.0, 1.0, 0.0));
        }
    }

    let dist_to_target = (target - eye).norm();
    let dist_from_origin = eye.coords.norm();
    let near = 2.0_f64.max(dist_to_target * 0.1);
    let horizon_arg = (dist_from_origin * dist_from_origin
        - terrain_radius_under_camera * terrain_radius_under_camera)
        .max(0.0);
    let camera_to_horizon = horizon_arg.sqrt();
    let far_radius = terrain_radius_under_camera + 5000.0;
    let far_arg = (far_radius * far_radius
        - terrain_radius_under_camera * terrain_radius_under_camera)
        .max(0.0);
    let far = camera_to_horizon + far_arg.sqrt();

    let mut fov_y = 60.0_f64.to_radians();
    let mut aspect = aspect;
    let mut near = near;
    let mut far = far;
    if let Some(f) = &overrides.fov_aspect_near_far {
        let (fov, a, n, fa) = f((fov_y, aspect, near, far));
        fov_y = fov;
        aspect = a;
        near = n;
        far = fa;
    }

    let mut proj = Matrix4::new_perspective(aspect, fov_y, near, far);
    if let Some(f) = &overrides.proj {
        proj = f(proj);
    }

    Ok(CameraState {
        eye,
        target,
        up,
        view,
        proj,
        fov_y_radians: fov_y,
        aspect,
        near,
        far,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::bail;

    struct IdentityCoord;

    impl CoordinateManipulator for IdentityCoord {
        fn convert(&self, _from: SrsKind, _to: SrsKind, point: [f64; 3]) -> Result<[f64; 3]> {
            Ok(point)
        }
        fn nav_geodesic_direct(
            &self,
            lat_lon_rad: [f64; 2],
            azimuth_rad: f64,
            distance_m: f64,
        ) -> Result<[f64; 2]> {
            if distance_m < 0.0 {
                bail!("negative distance");
            }
            let bump = if azimuth_rad.cos().abs() > azimuth_rad.sin().abs() {
                [distance_m * 1e-6, 0.0]
            } else {
                [0.0, distance_m * 1e-6]
            };
            Ok([lat_lon_rad[0] + bump[0], lat_lon_rad[1] + bump[1]])
        }
        fn nav_geodesic_inverse(&self, a: [f64; 2], b: [f64; 2]) -> Result<(f64, f64)> {
            let dx = b[0] - a[0];
            let dy = b[1] - a[1];
            Ok(((dx * dx + dy * dy).sqrt(), 0.0))
        }
    }

    #[test]
    fn test_build_camera_projected_srs_produces_finite_matrices() {
        let overrides = CameraOverrides::default();
        let state = build_camera(
            [100.0, 200.0, 5000.0],
            [0.0, 300.0, 0.0],
            false,
            &IdentityCoord,
            6_378_137.0,
            16.0 / 9.0,
            &overrides,
        )
        .unwrap();
        assert!(state.near < state.far);
        assert!(state.view.iter().all(|v| v.is_finite()));
        assert!(state.proj.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_build_camera_geographic_srs_produces_finite_matrices() {
        let overrides = CameraOverrides::default();
        let state = build_camera(
            [14.4, 50.07, 1_000_000.0],
            [0.0, 300.0, 0.0],
            true,
            &IdentityCoord,
            6_378_137.0,
            16.0 / 9.0,
            &overrides,
        )
        .unwrap();
        assert!(state.near < state.far);
        assert!(state.eye.coords.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_eye_override_is_applied() {
        let mut overrides = CameraOverrides::default();
        overrides.eye = Some(Box::new(|p: Point3<f64>| Point3::new(p.x + 10.0, p.y, p.z)));
        let baseline = build_camera(
            [0.0, 0.0, 1000.0],
            [0.0, 300.0, 0.0],
            false,
            &IdentityCoord,
            6_378_137.0,
            1.0,
            &CameraOverrides::default(),
        )
        .unwrap();
        let overridden = build_camera(
            [0.0, 0.0, 1000.0],
            [0.0, 300.0, 0.0],
            false,
            &IdentityCoord,
            6_378_137.0,
            1.0,
            &overrides,
        )
        .unwrap();
        assert!((overridden.eye.x - baseline.eye.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_far_clamped_to_zero_arg_when_camera_below_terrain_radius() {
        let overrides = CameraOverrides::default();
        let state = build_camera(
            [0.0, 0.0, -1000.0],
            [0.0, 300.0, 0.0],
            false,
            &IdentityCoord,
            6_378_137.0,
            1.0,
            &overrides,
        )
        .unwrap();
        assert!(state.far.is_finite());
        assert!(state.far >= 0.0);
    }
}
