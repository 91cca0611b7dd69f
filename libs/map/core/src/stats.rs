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

/// Traversal counters are keyed on LOD, clamped to this ceiling (spec §4.2
/// step 1): deep pyramids still get a bounded-size histogram.
pub const MAX_TRACKED_LOD: usize = 30;

/// Per-frame/per-session counters, grounded on the original's
/// `MapStatistics` (`resources.cpp`): traversal hit counts by LOD plus the
/// resource-lifecycle tallies the eviction and cold-start scenarios in
/// spec §8 depend on.
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    pub tick_index: u64,
    nodes_visited_by_lod: [u64; MAX_TRACKED_LOD + 1],
    pub resources_downloaded: u64,
    pub resources_disk_loaded: u64,
    pub resources_ignored: u64,
    pub resources_released: u64,
    pub current_resources: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the visit counter for `lod`, clamped per spec §4.2 step 1.
    pub fn record_node_visit(&mut self, lod: u32) {
        let idx = (lod as usize).min(MAX_TRACKED_LOD);
        self.nodes_visited_by_lod[idx] += 1;
    }

    pub fn nodes_visited_at_lod(&self, lod: u32) -> u64 {
        self.nodes_visited_by_lod[(lod as usize).min(MAX_TRACKED_LOD)]
    }

    pub fn total_nodes_visited(&self) -> u64 {
        self.nodes_visited_by_lod.iter().sum()
    }

    pub fn begin_tick(&mut self) {
        self.tick_index += 1;
        self.nodes_visited_by_lod = [0; MAX_TRACKED_LOD + 1];
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lod_beyond_ceiling_is_clamped() {
        let mut stats = Statistics::new();
        stats.record_node_visit(1000);
        assert_eq!(stats.nodes_visited_at_lod(1000), 1);
        assert_eq!(stats.nodes_visited_at_lod(MAX_TRACKED_LOD as u32), 1);
    }

    #[test]
    fn test_begin_tick_resets_per_tick_counters_not_totals() {
        let mut stats = Statistics::new();
        stats.record_node_visit(2);
        stats.resources_released += 3;
        stats.begin_tick();
        assert_eq!(stats.nodes_visited_at_lod(2), 0);
        assert_eq!(stats.resources_released, 3);
    }
}
