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
use fxhash::FxHashMap;

/// Maps a credit ID (spec §3 `MetaNode`'s `credits: Vec<creditId>`) to its
/// display template. Templates may contain the literal substrings `{copy}`
/// and `{Y}`, expanded at resolve time (spec §4.6).
#[derive(Clone, Debug, Default)]
pub struct CreditDictionary {
    templates: FxHashMap<u32, String>,
}

impl CreditDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, template: impl Into<String>) {
        self.templates.insert(id, template.into());
    }

    /// Expand `{copy}` to `©` and `{Y}` to `year`. Returns `None` for an
    /// unknown id (spec §4.6: "Unknown IDs are silently dropped").
    pub fn expand(&self, id: u32, year: u32) -> Option<String> {
        let template = self.templates.get(&id)?;
        Some(template.replace("{copy}", "\u{00A9}").replace("{Y}", &year.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_expand_substitutes_copy_and_year() {
        let mut dict = CreditDictionary::new();
        dict.insert(1, "{copy} {Y} Example Corp");
        assert_eq!(dict.expand(1, 2026).unwrap(), "\u{00A9} 2026 Example Corp");
    }

    #[test]
    fn test_unknown_id_is_none() {
        let dict = CreditDictionary::new();
        assert!(dict.expand(99, 2026).is_none());
    }
}
