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
use map_core::config::TraverseMode;
use smallvec::SmallVec;

/// Overlap margin on each side of a Balanced-mode partial-render UV clip
/// (spec §9 "balanced-mode UV-clip exact ranges (±0.05 skirt) ... document
/// as a deliberate overlap margin but do not change"). Kept exactly as
/// specified; do not tune.
const OVERLAP_SKIRT: f32 = 0.05;

/// What a node should do this frame, per the configured `TraverseMode`
/// (spec §4.2 "Traversal modes").
#[derive(Clone, Debug, PartialEq)]
pub enum ModeOutcome {
    RenderWhole,
    Descend,
    /// Balanced-mode boundary band: render here, but clip out the
    /// quadrants covered by children that are already independently
    /// renderable (spec §4.2 "Balanced").
    PartialRender(SmallVec<[(u8, [f32; 4]); 4]>),
}

/// The UV-space clip rectangle `(u0, v0, u1, v1)` covering child quadrant
/// `bit`, expanded by `OVERLAP_SKIRT` on every side and flipped vertically
/// to match `BoundParamInfo::uv_matrix`'s top-origin convention (spec §4.2
/// testable property 6).
pub fn quadrant_uv_clip(bit: u8) -> [f32; 4] {
    let (u0, u1) = if bit & 1 == 0 { (0.0, 0.5) } else { (0.5, 1.0) };
    let (v0_raw, v1_raw) = if bit & 2 == 0 { (0.0, 0.5) } else { (0.5, 1.0) };
    let (v0, v1) = (1.0 - v1_raw, 1.0 - v0_raw);
    [
        u0 as f32 - OVERLAP_SKIRT,
        v0 as f32 - OVERLAP_SKIRT,
        u1 as f32 + OVERLAP_SKIRT,
        v1 as f32 + OVERLAP_SKIRT,
    ]
}

/// Decide what a node does this frame (spec §4.2 "Traversal modes").
/// `child_flags` marks which of the 4 children exist; `child_renderable[b]`
/// is only meaningful where the corresponding bit is set.
pub fn decide(
    mode: TraverseMode,
    coarseness: f64,
    max_texel_to_pixel_scale: f64,
    max_balanced_coarseness_scale: f64,
    child_flags: u8,
    child_renderable: [bool; 4],
) -> ModeOutcome {
    let has_children = child_flags != 0;
    let any_child_not_renderable =
        (0u8..4).any(|b| child_flags & (1 << b) != 0 && !child_renderable[b as usize]);

    match mode {
        TraverseMode::Hierarchical => {
            if !has_children || coarseness <= max_texel_to_pixel_scale || any_child_not_renderable {
                ModeOutcome::RenderWhole
            } else {
                ModeOutcome::Descend
            }
        }
        TraverseMode::Flat => {
            if !has_children || coarseness <= max_texel_to_pixel_scale {
                ModeOutcome::RenderWhole
            } else {
                ModeOutcome::Descend
            }
        }
        TraverseMode::Balanced => {
            if coarseness > max_balanced_coarseness_scale {
                ModeOutcome::Descend
            } else if !has_children || coarseness < max_texel_to_pixel_scale {
                ModeOutcome::RenderWhole
            } else if !any_child_not_renderable {
                ModeOutcome::Descend
            } else {
                let mut clips = SmallVec::new();
                for b in 0..4u8 {
                    if child_flags & (1 << b) != 0 && !child_renderable[b as usize] {
                        clips.push((b, quadrant_uv_clip(b)));
                    }
                }
                ModeOutcome::PartialRender(clips)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadrant_uv_clip_matches_spec_fixture() {
        let clip = quadrant_uv_clip(3);
        assert_relative_eq!(clip[0], 0.45, epsilon = 1e-6);
        assert_relative_eq!(clip[1], -0.05, epsilon = 1e-6);
        assert_relative_eq!(clip[2], 1.05, epsilon = 1e-6);
        assert_relative_eq!(clip[3], 0.55, epsilon = 1e-6);
    }

    #[test]
    fn test_hierarchical_renders_when_fine_enough() {
        let outcome = decide(TraverseMode::Hierarchical, 0.5, 1.5, 3.0, 0b1111, [true; 4]);
        assert_eq!(outcome, ModeOutcome::RenderWhole);
    }

    #[test]
    fn test_hierarchical_renders_when_a_child_not_renderable() {
        let outcome = decide(
            TraverseMode::Hierarchical,
            10.0,
            1.5,
            3.0,
            0b1111,
            [true, true, true, false],
        );
        assert_eq!(outcome, ModeOutcome::RenderWhole);
    }

    #[test]
    fn test_hierarchical_descends_when_coarse_and_children_ready() {
        let outcome = decide(TraverseMode::Hierarchical, 10.0, 1.5, 3.0, 0b1111, [true; 4]);
        assert_eq!(outcome, ModeOutcome::Descend);
    }

    #[test]
    fn test_flat_only_renders_fine_nodes() {
        let fine = decide(TraverseMode::Flat, 0.5, 1.5, 3.0, 0b1111, [true; 4]);
        let coarse = decide(TraverseMode::Flat, 10.0, 1.5, 3.0, 0b1111, [false; 4]);
        assert_eq!(fine, ModeOutcome::RenderWhole);
        assert_eq!(coarse, ModeOutcome::Descend);
    }

    #[test]
    fn test_balanced_descends_when_too_coarse() {
        let outcome = decide(TraverseMode::Balanced, 10.0, 1.5, 3.0, 0b1111, [true; 4]);
        assert_eq!(outcome, ModeOutcome::Descend);
    }

    #[test]
    fn test_balanced_partial_render_in_boundary_band() {
        let outcome = decide(
            TraverseMode::Balanced,
            2.0,
            1.5,
            3.0,
            0b1111,
            [true, false, true, true],
        );
        match outcome {
            ModeOutcome::PartialRender(clips) => {
                assert_eq!(clips.len(), 1);
                assert_eq!(clips[0].0, 1);
            }
            other => panic!("expected PartialRender, got {other:?}"),
        }
    }

    #[test]
    fn test_balanced_fully_renders_below_texel_threshold() {
        let outcome = decide(TraverseMode::Balanced, 0.1, 1.5, 3.0, 0b1111, [false; 4]);
        assert_eq!(outcome, ModeOutcome::RenderWhole);
    }
}
