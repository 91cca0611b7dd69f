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
use crate::availability::{check_availability, AvailabilityOutcome};
use map_core::resource::AvailabilityTest;
use std::collections::HashMap;

/// Redirects are capped at 5 (spec §4.5, testable property 5): the 6th
/// attempt, whatever its result, terminates the task.
pub const MAX_REDIRECTS: u32 = 5;

/// One in-flight fetch (spec §4.5/§6). `redirects_followed` is bumped by
/// the cache each time `queryUrl` is swapped for `replyRedirectUrl`.
#[derive(Clone, Debug)]
pub struct FetchTask {
    pub query_url: String,
    pub headers: HashMap<String, String>,
    pub redirects_followed: u32,
}

impl FetchTask {
    pub fn new(query_url: impl Into<String>) -> Self {
        Self {
            query_url: query_url.into(),
            headers: HashMap::new(),
            redirects_followed: 0,
        }
    }
}

/// Filled in by the host's fetcher implementation once a request resolves
/// (spec §4.5/§6).
#[derive(Clone, Debug, Default)]
pub struct FetchCompletion {
    pub content_data: Vec<u8>,
    pub content_type: String,
    pub reply_code: u16,
    pub reply_redirect_url: Option<String>,
}

/// What the cache should do next with a completed fetch (spec §4.1's
/// `Downloading` transitions).
#[derive(Clone, Debug)]
pub enum FetchOutcome {
    /// availability test failed, or non-2xx/3xx code, or too many redirects.
    Fatal,
    /// 3xx with a redirect target and budget remaining: restart at the new URL.
    Redirect(String),
    /// 2xx: persist to disk cache and move to `Downloaded`.
    Downloaded(Vec<u8>),
}

/// Interpret a completed fetch per spec §4.1/§4.5: availability test first,
/// then redirect handling, then status-code classification.
pub fn classify_completion(
    task: &FetchTask,
    completion: &FetchCompletion,
    availability_test: Option<&AvailabilityTest>,
) -> FetchOutcome {
    if let Some(test) = availability_test {
        if let AvailabilityOutcome::Failed = check_availability(test, completion) {
            return FetchOutcome::Fatal;
        }
    }

    if (300..400).contains(&completion.reply_code) {
        return match &completion.reply_redirect_url {
            Some(url) if task.redirects_followed < MAX_REDIRECTS => {
                FetchOutcome::Redirect(url.clone())
            }
            _ => FetchOutcome::Fatal,
        };
    }

    if (200..300).contains(&completion.reply_code) {
        return FetchOutcome::Downloaded(completion.content_data.clone());
    }

    FetchOutcome::Fatal
}

#[cfg(test)]
mod test {
    use super::*;

    fn completion(code: u16) -> FetchCompletion {
        FetchCompletion {
            content_data: vec![1, 2, 3],
            content_type: "application/octet-stream".to_owned(),
            reply_code: code,
            reply_redirect_url: None,
        }
    }

    #[test]
    fn test_2xx_is_downloaded() {
        let task = FetchTask::new("http://example/a");
        let outcome = classify_completion(&task, &completion(200), None);
        assert!(matches!(outcome, FetchOutcome::Downloaded(_)));
    }

    #[test]
    fn test_4xx_is_fatal() {
        let task = FetchTask::new("http://example/a");
        let outcome = classify_completion(&task, &completion(404), None);
        assert!(matches!(outcome, FetchOutcome::Fatal));
    }

    #[test]
    fn test_redirect_within_budget_redirects() {
        let task = FetchTask::new("http://example/a");
        let mut c = completion(302);
        c.reply_redirect_url = Some("http://example/b".to_owned());
        let outcome = classify_completion(&task, &c, None);
        assert!(matches!(outcome, FetchOutcome::Redirect(u) if u == "http://example/b"));
    }

    #[test]
    fn test_redirect_past_budget_is_fatal() {
        let mut task = FetchTask::new("http://example/a");
        task.redirects_followed = MAX_REDIRECTS;
        let mut c = completion(302);
        c.reply_redirect_url = Some("http://example/b".to_owned());
        let outcome = classify_completion(&task, &c, None);
        assert!(matches!(outcome, FetchOutcome::Fatal));
    }
}
