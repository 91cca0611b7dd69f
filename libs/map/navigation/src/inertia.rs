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
use map_core::config::NavigationMode;

/// Position + orientation + zoom, all smoothed toward a moving target by
/// per-axis damping coefficients in `[0, 1)` (spec §4.4 "Inertia
/// integration"). `1` would mean "no motion", `0` "instantaneous"; the
/// type itself doesn't enforce the open upper bound, callers are expected
/// to clamp `EngineOptions`' `cameraInertia*` keys on the way in.
#[derive(Clone, Copy, Debug)]
pub struct NavigationInertia {
    /// Current navigation-SRS (x, y) position.
    pub position_xy: [f64; 2],
    /// Current altitude component, integrated separately (coefficient
    /// `cameraInertiaAltitude`) since it's driven by height pinning rather
    /// than direct pan input.
    pub position_z: f64,
    /// Current yaw/pitch/roll, degrees.
    pub orientation: [f64; 3],
    pub vertical_extent: f64,

    /// Remaining pan velocity not yet applied to `position_xy`.
    pub inertia_xy: [f64; 2],
    pub inertia_z: f64,
    pub inertia_rotation: [f64; 3],
    pub inertia_zoom: f64,

    pub target_point: [f64; 2],
    pub target_rotation: [f64; 3],
    pub target_view_extent: f64,
}

impl Default for NavigationInertia {
    fn default() -> Self {
        Self {
            position_xy: [0.0, 0.0],
            position_z: 0.0,
            orientation: [0.0, 270.0, 0.0],
            vertical_extent: 1000.0,
            inertia_xy: [0.0, 0.0],
            inertia_z: 0.0,
            inertia_rotation: [0.0, 0.0, 0.0],
            inertia_zoom: 0.0,
            target_point: [0.0, 0.0],
            target_rotation: [0.0, 270.0, 0.0],
            target_view_extent: 1000.0,
        }
    }
}

/// Damping coefficients for one tick's integration, taken from
/// `EngineOptions::camera_inertia_{pan,zoom,rotate,altitude}`.
#[derive(Clone, Copy, Debug)]
pub struct InertiaCoefficients {
    pub pan: f64,
    pub zoom: f64,
    pub rotate: f64,
    pub altitude: f64,
}

impl NavigationInertia {
    /// Queue a pan: `dz` is interpreted as zoom, exponential on
    /// `vertical_extent` by `1.001.powf(-dz)` (spec §4.4 "Inputs"),
    /// scaled by `sensitivity`.
    pub fn pan(&mut self, dx: f64, dy: f64, dz: f64, sensitivity: f64) {
        self.inertia_xy[0] += dx * sensitivity;
        self.inertia_xy[1] += dy * sensitivity;
        self.inertia_zoom += dz * sensitivity;
    }

    pub fn rotate(&mut self, dyaw: f64, dpitch: f64, droll: f64, sensitivity: f64) {
        self.inertia_rotation[0] += dyaw * sensitivity;
        self.inertia_rotation[1] += dpitch * sensitivity;
        self.inertia_rotation[2] += droll * sensitivity;
    }

    /// One tick of inertia integration (spec §4.4 "Inertia integration").
    pub fn integrate(&mut self, coeff: InertiaCoefficients) {
        for i in 0..2 {
            self.position_xy[i] += (1.0 - coeff.pan) * self.inertia_xy[i];
            self.inertia_xy[i] *= coeff.pan;
        }
        self.position_z += (1.0 - coeff.altitude) * self.inertia_z;
        self.inertia_z *= coeff.altitude;

        for i in 0..3 {
            self.orientation[i] += (1.0 - coeff.rotate) * self.inertia_rotation[i];
            self.inertia_rotation[i] *= coeff.rotate;
        }

        if self.inertia_zoom != 0.0 {
            self.vertical_extent *= 1.001_f64.powf(-(1.0 - coeff.zoom) * self.inertia_zoom);
            self.inertia_zoom *= coeff.zoom;
        }
    }

    /// Feed a completed height sample back into the altitude inertia so the
    /// camera smoothly tracks terrain instead of teleporting (spec §4.4
    /// "Altitude pinning").
    pub fn pin_altitude(&mut self, terrain_height: f64) {
        self.inertia_z += terrain_height - self.position_z;
    }

    /// Normalize position/orientation after integration (spec §4.4
    /// "Normalization", testable property 8). `geographic` selects
    /// longitude-wrap + latitude-clamp behavior; a projected SRS skips both.
    pub fn normalize(&mut self, geographic: bool, mode: NavigationMode, latitude_threshold: f64) {
        if geographic {
            self.position_xy[0] = wrap_longitude(self.position_xy[0]);
            if mode != NavigationMode::Free {
                self.position_xy[1] = self.position_xy[1].clamp(-latitude_threshold, latitude_threshold);
            }
        }
        for angle in &mut self.orientation {
            *angle = angle.rem_euclid(360.0);
        }
        self.orientation[1] = self.orientation[1].clamp(270.0, 350.0);
    }

    pub fn inertia_xy_magnitude(&self) -> f64 {
        (self.inertia_xy[0] * self.inertia_xy[0] + self.inertia_xy[1] * self.inertia_xy[1]).sqrt()
    }

    pub fn inertia_rotation_magnitude(&self) -> f64 {
        self.inertia_rotation.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

/// Wrap longitude to `(-180, 180]` (spec §4.4 "Normalization").
pub fn wrap_longitude(lon: f64) -> f64 {
    let mut out = lon;
    while out <= -180.0 {
        out += 360.0;
    }
    while out > 180.0 {
        out -= 360.0;
    }
    out
}

/// Decide the effective navigation mode for this tick: `Dynamic` switches
/// from Azimuthal to Free once `|latitude| >= threshold - eps` (spec §4.4
/// "Navigation modes").
pub fn effective_mode(mode: NavigationMode, latitude: f64, threshold: f64, eps: f64) -> NavigationMode {
    match mode {
        NavigationMode::Dynamic if latitude.abs() >= threshold - eps => NavigationMode::Free,
        NavigationMode::Dynamic => NavigationMode::Azimuthal,
        other => other,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn coeff() -> InertiaCoefficients {
        InertiaCoefficients {
            pan: 0.8,
            zoom: 0.8,
            rotate: 0.7,
            altitude: 0.9,
        }
    }

    #[test]
    fn test_inertia_contracts_each_tick_with_no_input() {
        let mut inertia = NavigationInertia::default();
        inertia.pan(10.0, 5.0, 0.0, 1.0);
        inertia.rotate(3.0, 1.0, 0.0, 1.0);

        let mut prev_xy = inertia.inertia_xy_magnitude();
        let mut prev_rot = inertia.inertia_rotation_magnitude();
        for _ in 0..10 {
            inertia.integrate(coeff());
            let xy = inertia.inertia_xy_magnitude();
            let rot = inertia.inertia_rotation_magnitude();
            assert!(xy < prev_xy || xy == 0.0);
            assert!(rot < prev_rot || rot == 0.0);
            prev_xy = xy;
            prev_rot = rot;
        }
    }

    #[test]
    fn test_wrap_longitude_edges() {
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert!((wrap_longitude(181.0) - (-179.0)).abs() < 1e-9);
        assert!((wrap_longitude(-181.0) - 179.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_clamps_latitude_outside_free_mode() {
        let mut inertia = NavigationInertia::default();
        inertia.position_xy = [0.0, 89.0];
        inertia.normalize(true, NavigationMode::Azimuthal, 80.0);
        assert_eq!(inertia.position_xy[1], 80.0);
    }

    #[test]
    fn test_normalize_does_not_clamp_latitude_in_free_mode() {
        let mut inertia = NavigationInertia::default();
        inertia.position_xy = [0.0, 89.0];
        inertia.normalize(true, NavigationMode::Free, 80.0);
        assert_eq!(inertia.position_xy[1], 89.0);
    }

    #[test]
    fn test_pitch_clamped_to_spec_range() {
        let mut inertia = NavigationInertia::default();
        inertia.orientation[1] = 10.0;
        inertia.normalize(false, NavigationMode::Azimuthal, 80.0);
        assert_eq!(inertia.orientation[1], 270.0);
    }

    #[test]
    fn test_effective_mode_switches_dynamic_to_free_near_pole() {
        assert_eq!(
            effective_mode(NavigationMode::Dynamic, 79.99, 80.0, 0.1),
            NavigationMode::Free
        );
        assert_eq!(
            effective_mode(NavigationMode::Dynamic, 10.0, 80.0, 0.1),
            NavigationMode::Azimuthal
        );
    }
}
