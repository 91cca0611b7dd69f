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
use crate::dictionary::CreditDictionary;
use fxhash::FxHashMap;

/// Whether a credit hit came from imagery (texture) or data (geometry/nav)
/// tiles, per spec §4.6.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CreditScope {
    Imagery,
    Data,
}

#[derive(Copy, Clone, Debug, Default)]
struct Tally {
    hits: u64,
    max_lod: u32,
}

/// A resolved entry in the frame's final credit list (spec §4.6).
#[derive(Clone, Debug, PartialEq)]
pub struct CreditEntry {
    pub id: u32,
    pub scope: CreditScope,
    pub text: String,
    pub hits: u64,
    pub max_lod: u32,
}

/// Per-tick hit counting of attribution IDs (spec §4.6). Built fresh once
/// per frame by the traversal engine's emission step; `resolve` turns the
/// raw tally into the frame's final credit list.
#[derive(Default)]
pub struct CreditsAccumulator {
    imagery: FxHashMap<u32, Tally>,
    data: FxHashMap<u32, Tally>,
}

impl CreditsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.imagery.clear();
        self.data.clear();
    }

    /// Insert or update the `{hits, maxLod}` entry for `id` under `scope`
    /// (spec §4.6 `hit`).
    pub fn hit(&mut self, scope: CreditScope, id: u32, lod: u32) {
        let table = match scope {
            CreditScope::Imagery => &mut self.imagery,
            CreditScope::Data => &mut self.data,
        };
        let tally = table.entry(id).or_default();
        tally.hits += 1;
        tally.max_lod = tally.max_lod.max(lod);
    }

    /// Resolve every tallied id against `dictionary`, dropping unknown ids,
    /// and return the frame's credit list sorted by hits descending (spec
    /// §4.6 "end of tick").
    pub fn resolve(&self, dictionary: &CreditDictionary, year: u32) -> Vec<CreditEntry> {
        let mut out = Vec::new();
        for (scope, table) in [
            (CreditScope::Imagery, &self.imagery),
            (CreditScope::Data, &self.data),
        ] {
            for (&id, tally) in table {
                if let Some(text) = dictionary.expand(id, year) {
                    out.push(CreditEntry {
                        id,
                        scope,
                        text,
                        hits: tally.hits,
                        max_lod: tally.max_lod,
                    });
                }
            }
        }
        out.sort_by(|a, b| b.hits.cmp(&a.hits).then(a.id.cmp(&b.id)));
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hit_accumulates_count_and_max_lod() {
        let mut acc = CreditsAccumulator::new();
        acc.hit(CreditScope::Imagery, 1, 5);
        acc.hit(CreditScope::Imagery, 1, 8);
        acc.hit(CreditScope::Imagery, 1, 2);

        let mut dict = CreditDictionary::new();
        dict.insert(1, "Example");
        let resolved = acc.resolve(&dict, 2026);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].hits, 3);
        assert_eq!(resolved[0].max_lod, 8);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let mut acc = CreditsAccumulator::new();
        acc.hit(CreditScope::Data, 42, 1);
        let dict = CreditDictionary::new();
        assert!(acc.resolve(&dict, 2026).is_empty());
    }

    #[test]
    fn test_resolve_sorts_by_hits_descending() {
        let mut acc = CreditsAccumulator::new();
        acc.hit(CreditScope::Imagery, 1, 1);
        acc.hit(CreditScope::Imagery, 2, 1);
        acc.hit(CreditScope::Imagery, 2, 1);
        acc.hit(CreditScope::Imagery, 2, 1);

        let mut dict = CreditDictionary::new();
        dict.insert(1, "A");
        dict.insert(2, "B");
        let resolved = acc.resolve(&dict, 2026);
        assert_eq!(resolved[0].id, 2);
        assert_eq!(resolved[1].id, 1);
    }

    #[test]
    fn test_clear_resets_both_scopes() {
        let mut acc = CreditsAccumulator::new();
        acc.hit(CreditScope::Imagery, 1, 1);
        acc.hit(CreditScope::Data, 2, 1);
        acc.clear();
        let dict = CreditDictionary::new();
        assert!(acc.resolve(&dict, 2026).is_empty());
    }
}
