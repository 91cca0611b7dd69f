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

// Angular
pub(crate) mod arcminutes;
pub(crate) mod arcseconds;
pub(crate) mod degrees;
pub(crate) mod radians;

// Distance
pub(crate) mod kilometers;
pub(crate) mod meters;

// Time
pub(crate) mod seconds;

// Dimensionless
pub(crate) mod scalar;

/// Identity of a concrete unit marker type: name and display suffix.
pub trait Unit: Copy + std::fmt::Debug + Eq + PartialEq + 'static {
    const UNIT_NAME: &'static str;
    const UNIT_SHORT_NAME: &'static str;
    const UNIT_SUFFIX: &'static str;
}
