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
use map_core::tile_id::TileId;
use std::collections::VecDeque;

/// A pending terrain-height query at a navigation-SRS (x, y) position
/// (spec §4.4 "Altitude pinning"). At most 2 may be queued at once; new
/// requests replace the back of the queue, matching the source's
/// `heightRequests` deque behavior.
#[derive(Clone, Copy, Debug)]
pub struct HeightRequest {
    pub x: f64,
    pub y: f64,
    pub lod: u32,
}

/// One SDS-cell corner's contribution to a height request: either a
/// surrogate value, or a reason it can't contribute yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CornerSample {
    Ready(ordered_float::NotNan<f64>),
    /// The corner's TraverseNode hasn't resolved Meta yet; defer the whole
    /// request to a later tick.
    Indeterminate,
    /// The corner's TraverseNode is permanently invalid; poison the request.
    Invalid,
}

mod ordered_float {
    /// Minimal not-NaN float wrapper so `CornerSample` can derive `PartialEq`
    /// without dragging in the `ordered-float` crate for one field; height
    /// samples are never NaN by construction (surrogates come from decoded
    /// meta-tiles).
    #[derive(Clone, Copy, Debug)]
    pub struct NotNan<T>(T);
    impl<T: PartialEq> PartialEq for NotNan<T> {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl<T> Eq for NotNan<T> {}
    impl NotNan<f64> {
        pub fn new(v: f64) -> Self {
            Self(v)
        }
        pub fn get(&self) -> f64 {
            self.0
        }
    }
}

/// Outcome of attempting to resolve one queued `HeightRequest` this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightOutcome {
    Deferred,
    Poisoned,
    Height(f64),
}

/// Bounded (max 2) queue of in-flight height queries, plus the LOD-selection
/// and bilinear-interpolation logic from spec §4.4.
#[derive(Default)]
pub struct HeightPinning {
    queue: VecDeque<HeightRequest>,
}

const MAX_QUEUED: usize = 2;

impl HeightPinning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a new request at `(x, y)`; if the queue is already full, the
    /// new request replaces the back (spec §4.4: "new requests replace the
    /// back of the queue").
    pub fn enqueue(&mut self, x: f64, y: f64, lod: u32) {
        if self.queue.len() >= MAX_QUEUED {
            self.queue.pop_back();
        }
        self.queue.push_back(HeightRequest { x, y, lod });
    }

    pub fn front(&self) -> Option<&HeightRequest> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pop_front(&mut self) -> Option<HeightRequest> {
        self.queue.pop_front()
    }

    /// Choose the sampling LOD so that
    /// `navigationSamplesPerViewExtent * extent(node) / verticalExtent >= 2^3`
    /// (spec §4.4), by halving `extent` (doubling LOD) until the inequality
    /// holds or `max_lod` is reached.
    pub fn select_lod(
        root_extent: f64,
        vertical_extent: f64,
        samples_per_view_extent: f64,
        max_lod: u32,
    ) -> u32 {
        let mut lod = 0u32;
        let mut extent = root_extent;
        while lod < max_lod
            && samples_per_view_extent * extent / vertical_extent < 8.0
        {
            extent /= 2.0;
            lod += 1;
        }
        lod
    }

    /// Bilinear interpolation over the 4 corner samples of the SDS cell
    /// (spec §4.4): a single `Indeterminate` corner defers the request, a
    /// single `Invalid` corner poisons it; `u`/`v` are the fractional
    /// position within the cell, each in `[0, 1]`.
    pub fn resolve(corners: [CornerSample; 4], u: f64, v: f64) -> HeightOutcome {
        if corners.iter().any(|c| *c == CornerSample::Invalid) {
            return HeightOutcome::Poisoned;
        }
        if corners.iter().any(|c| *c == CornerSample::Indeterminate) {
            return HeightOutcome::Deferred;
        }
        let get = |c: &CornerSample| match c {
            CornerSample::Ready(v) => v.get(),
            _ => unreachable!("checked above"),
        };
        // corners ordered (0,0) (1,0) (0,1) (1,1).
        let top = get(&corners[0]) * (1.0 - u) + get(&corners[1]) * u;
        let bottom = get(&corners[2]) * (1.0 - u) + get(&corners[3]) * u;
        HeightOutcome::Height(top * (1.0 - v) + bottom * v)
    }
}

pub fn ready(v: f64) -> CornerSample {
    CornerSample::Ready(ordered_float::NotNan::new(v))
}

/// Convenience: derive the SDS-cell `TileId` (and fractional offset within
/// it) containing navigation-SRS point `(x, y)` at `lod`, given the root
/// extent `[[lo_x, lo_y], [hi_x, hi_y]]` (spec §4.4 "the 4 corner
/// TraverseNodes of the SDS cell").
pub fn cell_at(x: f64, y: f64, lod: u32, extents: [[f64; 2]; 2]) -> (TileId, f64, f64) {
    let side = (1u64 << lod) as f64;
    let [[lo_x, lo_y], [hi_x, hi_y]] = extents;
    let fx = ((x - lo_x) / (hi_x - lo_x) * side).clamp(0.0, side - f64::EPSILON);
    let fy = ((y - lo_y) / (hi_y - lo_y) * side).clamp(0.0, side - f64::EPSILON);
    let tile = TileId::new(lod, fx as u32, fy as u32);
    (tile, fx.fract(), fy.fract())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_queue_caps_at_two_replacing_the_back() {
        let mut q = HeightPinning::new();
        q.enqueue(1.0, 1.0, 5);
        q.enqueue(2.0, 2.0, 5);
        q.enqueue(3.0, 3.0, 5);
        assert_eq!(q.len(), 2);
        assert_eq!(q.front().unwrap().x, 1.0);
    }

    #[test]
    fn test_resolve_bilinear_average_at_center() {
        let corners = [ready(10.0), ready(20.0), ready(30.0), ready(40.0)];
        let outcome = HeightPinning::resolve(corners, 0.5, 0.5);
        assert_eq!(outcome, HeightOutcome::Height(25.0));
    }

    #[test]
    fn test_resolve_defers_on_indeterminate_corner() {
        let corners = [ready(10.0), CornerSample::Indeterminate, ready(30.0), ready(40.0)];
        assert_eq!(HeightPinning::resolve(corners, 0.5, 0.5), HeightOutcome::Deferred);
    }

    #[test]
    fn test_resolve_poisons_on_invalid_corner_even_with_indeterminate_present() {
        let corners = [ready(10.0), CornerSample::Indeterminate, CornerSample::Invalid, ready(40.0)];
        assert_eq!(HeightPinning::resolve(corners, 0.5, 0.5), HeightOutcome::Poisoned);
    }

    #[test]
    fn test_select_lod_increases_with_smaller_vertical_extent() {
        let lod_far = HeightPinning::select_lod(1_000_000.0, 1_000_000.0, 8.0, 20);
        let lod_near = HeightPinning::select_lod(1_000_000.0, 100.0, 8.0, 20);
        assert!(lod_near > lod_far);
    }

    #[test]
    fn test_cell_at_root_covers_whole_extent() {
        let (tile, _, _) = cell_at(50.0, 50.0, 0, [[0.0, 0.0], [100.0, 100.0]]);
        assert_eq!(tile, TileId::root());
    }
}
