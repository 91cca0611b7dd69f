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
use parking_lot::Mutex;

/// Double-buffered set used for both the per-tick touch requests and the
/// failed-availability URLs (spec §5 "cross-worker invariants"). The render
/// worker accumulates into `new` all tick long, uncontended since only it
/// ever writes there; once per render tick it swaps `new` into `locked`,
/// which is the only side the data worker reads. This keeps the data
/// worker from ever blocking on a per-access lock held by the render path.
pub struct DoubleBufferedSet<T> {
    new: Mutex<Vec<T>>,
    locked: Mutex<Vec<T>>,
}

impl<T> Default for DoubleBufferedSet<T> {
    fn default() -> Self {
        Self {
            new: Mutex::new(Vec::new()),
            locked: Mutex::new(Vec::new()),
        }
    }
}

impl<T> DoubleBufferedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the render worker on every access.
    pub fn push(&self, item: T) {
        self.new.lock().push(item);
    }

    /// Called once per render tick: swap `new` into `locked`.
    pub fn swap_into_locked(&self) {
        let mut new = self.new.lock();
        if new.is_empty() {
            return;
        }
        self.locked.lock().append(&mut new);
    }

    /// Called by the data worker: drain everything the render worker has
    /// swapped in so far.
    pub fn drain_locked(&self) -> Vec<T> {
        std::mem::take(&mut *self.locked.lock())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_items_are_invisible_until_swap() {
        let set: DoubleBufferedSet<u32> = DoubleBufferedSet::new();
        set.push(1);
        set.push(2);
        assert!(set.drain_locked().is_empty());
        set.swap_into_locked();
        let mut drained = set.drain_locked();
        drained.sort();
        assert_eq!(drained, vec![1, 2]);
    }

    #[test]
    fn test_drain_is_idempotent_empty_after() {
        let set: DoubleBufferedSet<u32> = DoubleBufferedSet::new();
        set.push(7);
        set.swap_into_locked();
        assert_eq!(set.drain_locked(), vec![7]);
        assert!(set.drain_locked().is_empty());
    }
}
