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
use crate::view::ViewSpec;
use map_core::surface::{SurfaceInfo, SurfaceStack, SurfaceStackEntry};

/// Resolve a view over a map config's surface list into an ordered
/// `SurfaceStack` (spec §3 `SurfaceStack`, §4.2 step 3's fold over surface
/// entries). Glues are moved ahead of all plain surfaces so the invariant
/// "glues must precede their constituent surfaces" holds regardless of the
/// order surfaces happen to appear in the config (grounded on the original's
/// `mapConfig.json` surface-stack construction in `mapConfig.cpp`, which
/// layers glues on top for exactly this reason: a glue's stitched geometry
/// must win over either of its constituents at the same node).
pub fn resolve_surface_stack(surfaces: &[SurfaceInfo], view: &ViewSpec) -> SurfaceStack {
    let relevant: Vec<&SurfaceInfo> = surfaces
        .iter()
        .filter(|s| s.name().iter().any(|n| view.includes_surface(n)))
        .collect();

    let (glues, plains): (Vec<&&SurfaceInfo>, Vec<&&SurfaceInfo>) =
        relevant.iter().partition(|s| s.is_glue());

    let mut entries = Vec::with_capacity(relevant.len());
    for surface in glues.into_iter().chain(plains.into_iter()) {
        let alien = surface.name().iter().any(|n| view.is_alien(n));
        entries.push(SurfaceStackEntry::new((*surface).clone(), [0.0; 3], alien));
    }

    let mut stack = SurfaceStack::new(entries);
    stack.assign_debug_colors();
    stack
}

#[cfg(test)]
mod test {
    use super::*;

    fn surface(name: &[&str]) -> SurfaceInfo {
        SurfaceInfo::new(
            name.iter().map(|s| s.to_string()).collect(),
            "m".into(),
            "s".into(),
            "t".into(),
            None,
        )
    }

    #[test]
    fn test_glue_is_ordered_before_constituents() {
        let surfaces = vec![surface(&["base"]), surface(&["overlay"]), surface(&["base", "overlay"])];
        let view = ViewSpec::default();
        let stack = resolve_surface_stack(&surfaces, &view);
        assert!(stack.entries()[0].surface().is_glue());
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_view_filters_to_named_surfaces_only() {
        let surfaces = vec![surface(&["base"]), surface(&["other"])];
        let mut view = ViewSpec::default();
        view.surfaces.push("base".to_owned());
        let stack = resolve_surface_stack(&surfaces, &view);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_alien_flag_follows_view() {
        let surfaces = vec![surface(&["base"])];
        let mut view = ViewSpec::default();
        view.alien_surfaces.insert("base".to_owned());
        let stack = resolve_surface_stack(&surfaces, &view);
        assert!(stack.entries()[0].is_alien());
    }

    #[test]
    fn test_debug_colors_are_assigned_and_distinct() {
        let surfaces = vec![surface(&["a"]), surface(&["b"]), surface(&["c"])];
        let stack = resolve_surface_stack(&surfaces, &ViewSpec::default());
        let colors: Vec<_> = stack.entries().iter().map(|e| e.color()).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}
