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

pub(crate) mod angle;
pub(crate) mod generic;
pub(crate) mod length;
pub(crate) mod time;
pub(crate) mod unit;

/// Must be implemented by all quantity types.
pub trait Quantity {}

pub mod prelude {
    pub use crate::{
        angle::{Angle, AngleUnit},
        arcminutes, arcseconds, degrees,
        length::{Length, LengthUnit},
        kilometers, meters, radians, scalar, seconds,
        time::{Time, TimeUnit},
        unit::{
            arcminutes::ArcMinutes, arcseconds::ArcSeconds, degrees::Degrees,
            kilometers::Kilometers, meters::Meters, radians::Radians, scalar::Scalar,
            seconds::Seconds, Unit,
        },
    };
}
pub use crate::prelude::*;

// For use from macros
pub use approx;
pub use ordered_float;
