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
use std::fmt;

/// Returned by a `Decodable::load` implementation. Any failure here moves
/// the owning resource straight to `ErrorFatal`; it never retries.
#[derive(Clone, Debug)]
pub enum DecodeError {
    Malformed(String),
    Unsupported(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed payload: {msg}"),
            Self::Unsupported(msg) => write!(f, "unsupported variant: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Raised to the host through a named failure channel per spec §7's
/// `FatalForMapConfig` kind: map-config or auth could not be parsed at all.
/// The map stays unusable until a new config path is set.
#[derive(Clone, Debug)]
pub struct MapConfigError(pub String);

impl fmt::Display for MapConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map config failure: {}", self.0)
    }
}

impl std::error::Error for MapConfigError {}
