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
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Decoded form of the auth-config resource (grounded on the original's
/// `AuthConfig`, `resourceAuth.cpp`/`auth.cpp`): a bearer token, the set of
/// hostnames it applies to (empty means "all hosts"), and a refresh
/// deadline derived from the server's `expires`/`now` fields.
#[derive(Clone, Debug, Default)]
pub struct AuthConfigData {
    token: String,
    hostnames: HashSet<String>,
    /// Unix seconds at which this token must be considered stale and
    /// re-fetched, per the original's `timeParsed + timeValid` check.
    expires_at: u64,
}

/// Seconds of slack subtracted from the server-reported expiry before we
/// call the token stale, matching the original's `t + 60 > timeParsed + timeValid`.
const REFRESH_MARGIN_SECS: u64 = 60;

impl AuthConfigData {
    pub fn new(token: String, hostnames: HashSet<String>, expires_in_secs: u64) -> Self {
        let now = unix_now();
        Self {
            token,
            hostnames,
            expires_at: now + expires_in_secs.max(REFRESH_MARGIN_SECS),
        }
    }

    /// A permanently-valid token parsed from a bare `token:...` resource
    /// name, bypassing the network round-trip entirely (the original's
    /// `AuthConfig` constructor special-case).
    pub fn from_literal_token(token: String) -> Self {
        Self {
            token,
            hostnames: HashSet::new(),
            expires_at: unix_now() + 60 * 60 * 24 * 365 * 100,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn hostnames(&self) -> &HashSet<String> {
        &self.hostnames
    }

    /// True once within `REFRESH_MARGIN_SECS` of `expires_at`; the cache
    /// should force the auth resource back to `Initializing`.
    pub fn needs_refresh(&self) -> bool {
        unix_now() + REFRESH_MARGIN_SECS > self.expires_at
    }

    /// True if this token should be attached to requests against `host`.
    /// An empty allow-list means every host gets the token.
    pub fn applies_to(&self, host: &str) -> bool {
        self.hostnames.is_empty() || self.hostnames.contains(host)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Extracts the `host[:port]` component from a URL, matching the original's
/// `extractUrlHost`: strip the scheme up to `://`, then take up to the next `/`.
pub fn extract_url_host(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    let rest = &url[after_scheme..];
    match rest.find('/') {
        Some(i) => &rest[..i],
        None => rest,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_url_host_with_scheme() {
        assert_eq!(
            extract_url_host("https://example.com/path/to/tile"),
            "example.com"
        );
    }

    #[test]
    fn test_extract_url_host_without_scheme() {
        assert_eq!(extract_url_host("example.com/path"), "example.com");
    }

    #[test]
    fn test_applies_to_empty_allowlist_matches_all() {
        let auth = AuthConfigData::new("tok".into(), HashSet::new(), 3600);
        assert!(auth.applies_to("anything.example"));
    }

    #[test]
    fn test_applies_to_respects_allowlist() {
        let mut hosts = HashSet::new();
        hosts.insert("good.example".to_owned());
        let auth = AuthConfigData::new("tok".into(), hosts, 3600);
        assert!(auth.applies_to("good.example"));
        assert!(!auth.applies_to("bad.example"));
    }

    #[test]
    fn test_literal_token_never_needs_refresh_soon() {
        let auth = AuthConfigData::from_literal_token("tok".into());
        assert!(!auth.needs_refresh());
    }
}
