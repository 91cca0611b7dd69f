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
use crate::task::FetchTask;
use map_core::auth::{extract_url_host, AuthConfigData};

/// Attach the `Accept: token/<token>, */*` header the original's
/// `AuthConfig::authorize` uses, if `auth` applies to this task's host
/// (spec §1: "core only consumes token lifetime + a per-host allow-list").
pub fn apply_auth(task: &mut FetchTask, auth: &AuthConfigData) {
    let host = extract_url_host(&task.query_url);
    if !auth.applies_to(host) {
        return;
    }
    task.headers.insert(
        "Accept".to_owned(),
        format!("token/{}, */*", auth.token()),
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_apply_auth_adds_header_for_allowed_host() {
        let auth = AuthConfigData::new("abc123".into(), HashSet::new(), 3600);
        let mut task = FetchTask::new("https://tiles.example/meta/0-0-0.bin");
        apply_auth(&mut task, &auth);
        assert_eq!(task.headers.get("Accept").unwrap(), "token/abc123, */*");
    }

    #[test]
    fn test_apply_auth_skips_disallowed_host() {
        let mut hosts = HashSet::new();
        hosts.insert("other.example".to_owned());
        let auth = AuthConfigData::new("abc123".into(), hosts, 3600);
        let mut task = FetchTask::new("https://tiles.example/meta/0-0-0.bin");
        apply_auth(&mut task, &auth);
        assert!(task.headers.get("Accept").is_none());
    }
}
