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
use map_core::meta::MetaNode;
use map_core::resource::Validity;
use smallvec::SmallVec;

/// One surface stack entry's meta-tile lookup result for a single node
/// (spec §4.2 step 3).
pub struct EntrySample {
    pub alien: bool,
    pub validity: Validity,
    pub meta: Option<MetaNode>,
}

/// Outcome of folding every surface stack entry's meta sample for one node
/// (spec §4.2 step 3, "Meta determination").
pub enum MetaDetermination {
    /// Some entry's meta-tile is still downloading; revisit this node next
    /// frame without producing draws.
    Indeterminate,
    Resolved {
        /// Index into the surface stack this node renders from; `None`
        /// means "empty" (Meta present, nothing to draw, may still have
        /// children).
        surface_index: Option<usize>,
        /// Child-availability bits merged (bitwise OR) across every entry.
        merged_child_flags: u8,
        has_geometry: bool,
        credits: SmallVec<[u32; 4]>,
        /// The MetaNode backing `surface_index`, if any; carries
        /// texel/display size and geometric extents for geometry
        /// resolution.
        chosen: Option<MetaNode>,
    },
}

/// Fold `samples` (one per surface-stack entry, in compositing-precedence
/// order) into this node's resolved Meta (spec §4.2 step 3): the topmost
/// non-alien entry reporting geometry becomes the node's surface, unless
/// its MetaNode carries a `source_reference` (virtual surface), in which
/// case that referenced index is used instead. Child-availability bits are
/// merged across every entry regardless of which one supplies geometry.
pub fn determine_meta(samples: &[EntrySample]) -> MetaDetermination {
    if samples.iter().any(|s| s.validity == Validity::Indeterminate) {
        return MetaDetermination::Indeterminate;
    }

    let mut merged_child_flags = 0u8;
    for s in samples {
        if let Some(meta) = &s.meta {
            merged_child_flags |= meta.child_flags();
        }
    }

    let mut surface_index = None;
    let mut chosen: Option<MetaNode> = None;
    for (i, s) in samples.iter().enumerate() {
        if s.alien {
            continue;
        }
        if let Some(meta) = &s.meta {
            if meta.has_geometry() {
                surface_index = Some(meta.source_reference().map(|r| r as usize).unwrap_or(i));
                chosen = Some(meta.clone());
                break;
            }
        }
    }

    let has_geometry = chosen.is_some();
    let credits = chosen
        .as_ref()
        .map(|m| SmallVec::from_slice(m.credits()))
        .unwrap_or_default();

    MetaDetermination::Resolved {
        surface_index,
        merged_child_flags,
        has_geometry,
        credits,
        chosen,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use smallvec::smallvec;

    fn geom_node(child_flags: u8, source_reference: u32) -> MetaNode {
        MetaNode::new(true, false, child_flags, None, Some(1.0), None, None, source_reference, smallvec![7])
    }

    fn empty_node(child_flags: u8) -> MetaNode {
        MetaNode::new(false, false, child_flags, None, None, None, None, 0, SmallVec::new())
    }

    #[test]
    fn test_indeterminate_if_any_entry_pending() {
        let samples = vec![
            EntrySample { alien: false, validity: Validity::Valid, meta: Some(geom_node(0, 0)) },
            EntrySample { alien: false, validity: Validity::Indeterminate, meta: None },
        ];
        assert!(matches!(determine_meta(&samples), MetaDetermination::Indeterminate));
    }

    #[test]
    fn test_topmost_non_alien_geometry_entry_wins() {
        let samples = vec![
            EntrySample { alien: true, validity: Validity::Valid, meta: Some(geom_node(0, 0)) },
            EntrySample { alien: false, validity: Validity::Valid, meta: Some(geom_node(0, 0)) },
        ];
        match determine_meta(&samples) {
            MetaDetermination::Resolved { surface_index, .. } => assert_eq!(surface_index, Some(1)),
            _ => panic!("expected Resolved"),
        }
    }

    #[test]
    fn test_virtual_surface_redirects_to_source_reference() {
        let samples = vec![EntrySample {
            alien: false,
            validity: Validity::Valid,
            meta: Some(geom_node(0, 3)),
        }];
        match determine_meta(&samples) {
            MetaDetermination::Resolved { surface_index, .. } => assert_eq!(surface_index, Some(3)),
            _ => panic!("expected Resolved"),
        }
    }

    #[test]
    fn test_child_flags_merge_across_all_entries() {
        let samples = vec![
            EntrySample { alien: false, validity: Validity::Valid, meta: Some(empty_node(0b0001)) },
            EntrySample { alien: false, validity: Validity::Valid, meta: Some(empty_node(0b0010)) },
        ];
        match determine_meta(&samples) {
            MetaDetermination::Resolved { merged_child_flags, .. } => {
                assert_eq!(merged_child_flags, 0b0011);
            }
            _ => panic!("expected Resolved"),
        }
    }

    #[test]
    fn test_no_geometry_anywhere_is_empty_node() {
        let samples = vec![EntrySample {
            alien: false,
            validity: Validity::Valid,
            meta: Some(empty_node(0b1111)),
        }];
        match determine_meta(&samples) {
            MetaDetermination::Resolved { surface_index, has_geometry, .. } => {
                assert_eq!(surface_index, None);
                assert!(!has_geometry);
            }
            _ => panic!("expected Resolved"),
        }
    }
}
