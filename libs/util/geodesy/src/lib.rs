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
mod cartesian;
mod graticule;

pub use crate::cartesian::{Cartesian, CartesianOrigin};
pub use crate::graticule::{Graticule, GraticuleOrigin};

/// Earth-centered, earth-fixed: distance is measured from the planet center.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct GeoCenter;
impl GraticuleOrigin for GeoCenter {
    fn origin_marker() -> &'static str {
        "@Earth"
    }
}
impl CartesianOrigin for GeoCenter {
    fn origin_name() -> &'static str {
        "@Earth"
    }
}

/// Earth-surface relative: distance is height above mean radius.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct GeoSurface;
impl GraticuleOrigin for GeoSurface {
    fn origin_marker() -> &'static str {
        "@Surface"
    }
}

/// A point expressed relative to some other point, rather than planet center.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Target;
impl GraticuleOrigin for Target {
    fn origin_marker() -> &'static str {
        "@Target"
    }
}
impl CartesianOrigin for Target {
    fn origin_name() -> &'static str {
        "@Target"
    }
}

/// The spatial reference systems a map config can name for a surface or
/// bound layer. The core never performs the actual reprojection math for
/// anything beyond the built-in geographic system above: everything else
/// is resolved by an external `CoordinateManipulator` (e.g. proj4/GDAL
/// bindings), matching the way the source system keeps its own `Srs`
/// enum as a tag it dispatches on rather than a set of formulas it owns.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SrsKind {
    /// 3-D geocentric cartesian, meters from planet center.
    Physical,
    /// Lat/lon/height, used for navigation and height queries.
    Navigation,
    /// The SRS exposed to API consumers for position URLs.
    Public,
    /// Used by the search resource to geocode free-text queries.
    Search,
    Custom1,
    Custom2,
}

/// Conversion and geodesic contract the core delegates to, since actual
/// projection math (beyond the built-in spherical geographic model above)
/// is out of scope for this crate.
pub trait CoordinateManipulator {
    /// Convert a 3-vector from one named SRS to another.
    fn convert(&self, from: SrsKind, to: SrsKind, point: [f64; 3]) -> anyhow::Result<[f64; 3]>;

    /// Direct geodesic problem: walk `distance` meters on azimuth `azimuth_rad`
    /// starting from `lat_lon_rad`, returning the resulting lat/lon.
    fn nav_geodesic_direct(
        &self,
        lat_lon_rad: [f64; 2],
        azimuth_rad: f64,
        distance_m: f64,
    ) -> anyhow::Result<[f64; 2]>;

    /// Inverse geodesic problem: distance and azimuth between two lat/lon points.
    fn nav_geodesic_inverse(
        &self,
        from_lat_lon_rad: [f64; 2],
        to_lat_lon_rad: [f64; 2],
    ) -> anyhow::Result<(f64, f64)>;
}
