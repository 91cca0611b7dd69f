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
use absolute_unit::{meters, Length, Meters};
use once_cell::sync::Lazy;

/// Mean radius used by the geographic SRS conversions in `geodesy`.
pub static EARTH_RADIUS: Lazy<Length<Meters>> = Lazy::new(|| meters!(6_356_766));

pub const EARTH_RADIUS_KM: f64 = 6360.0;
pub const EARTH_RADIUS_KM_32: f32 = EARTH_RADIUS_KM as f32;
