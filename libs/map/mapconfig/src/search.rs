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
use serde::Deserialize;

/// One hit from a geocoding query, grounded on the original's `search.cpp`
/// / `include/vts-browser/search.h`. Parsing the wire JSON is the one place
/// this crate does its own decoding, the same exception `MapConfigData`
/// makes: the shape is named by spec §3's `Search` resource variant, so it
/// belongs next to the other named types rather than behind a host decoder.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    /// Geographic navigation-SRS position: [lon, lat, height].
    pub position: [f64; 3],
    #[serde(default)]
    pub region: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl SearchResult {
    pub fn parse_list(bytes: &[u8]) -> anyhow::Result<Vec<SearchResult>> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_search_results() {
        let fixture = br#"[
            {"title": "Prague", "position": [14.42, 50.09, 200.0], "region": "CZ"},
            {"title": "Prague Castle", "position": [14.40, 50.09, 250.0], "type": "landmark"}
        ]"#;
        let results = SearchResult::parse_list(fixture).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Prague");
        assert_eq!(results[1].kind.as_deref(), Some("landmark"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(SearchResult::parse_list(b"not json").is_err());
    }
}
