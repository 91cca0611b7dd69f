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
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named view preset: which surfaces are visible, which are alien, and any
/// per-bound-layer free-layer override. Grounded on the original's `View`
/// struct (`map.hpp`) and `getViewJson`/`setViewJson` (`mapApiC.cpp`); spec
/// §8 names the round-trip law directly (`setViewJson(name, getViewJson(name))`
/// preserves semantics).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    /// Surface names to include, in config order. Empty means "all surfaces
    /// named in the map config".
    #[serde(default)]
    pub surfaces: Vec<String>,
    /// Surfaces that should be treated as alien for traversal purposes (spec
    /// GLOSSARY "Alien").
    #[serde(default)]
    pub alien_surfaces: BTreeSet<String>,
    /// `bound-layer-id -> free-layer-url-override`, matching the original's
    /// per-view bound-layer substitution.
    #[serde(default)]
    pub free_layer_overrides: std::collections::BTreeMap<String, String>,
}

impl ViewSpec {
    pub fn includes_surface(&self, name: &str) -> bool {
        self.surfaces.is_empty() || self.surfaces.iter().any(|s| s == name)
    }

    pub fn is_alien(&self, name: &str) -> bool {
        self.alien_surfaces.contains(name)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_json_round_trip_preserves_semantics() {
        let mut view = ViewSpec::default();
        view.surfaces.push("base".to_owned());
        view.alien_surfaces.insert("overlay".to_owned());
        view.free_layer_overrides
            .insert("ortho".to_owned(), "https://alt/{lod}-{x}-{y}.jpg".to_owned());

        let json = view.to_json().unwrap();
        let round_tripped = ViewSpec::from_json(&json).unwrap();
        assert_eq!(view, round_tripped);
    }

    #[test]
    fn test_empty_surface_list_includes_everything() {
        let view = ViewSpec::default();
        assert!(view.includes_surface("anything"));
    }
}
