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
use crate::task::FetchCompletion;
use map_core::resource::AvailabilityTest;

/// Result of running a resource's negative availability test against a
/// fetch completion (spec §4.1/§4.5). These are "negative" tests: the
/// configured condition indicates a *missing* resource, not a present one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AvailabilityOutcome {
    Passed,
    Failed,
}

pub fn check_availability(
    test: &AvailabilityTest,
    completion: &FetchCompletion,
) -> AvailabilityOutcome {
    let failed = match test {
        AvailabilityTest::NegativeCode(codes) => !codes.contains(&completion.reply_code),
        AvailabilityTest::NegativeType(mime) => completion.content_type == *mime,
        AvailabilityTest::NegativeSize(min) => completion.content_data.len() as u64 <= *min,
    };
    if failed {
        AvailabilityOutcome::Failed
    } else {
        AvailabilityOutcome::Passed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn completion(code: u16, ty: &str, len: usize) -> FetchCompletion {
        FetchCompletion {
            content_data: vec![0u8; len],
            content_type: ty.to_owned(),
            reply_code: code,
            reply_redirect_url: None,
        }
    }

    #[test]
    fn test_negative_code_fails_when_code_not_in_set() {
        let test = AvailabilityTest::NegativeCode(vec![200, 204]);
        assert_eq!(
            check_availability(&test, &completion(404, "image/png", 10)),
            AvailabilityOutcome::Failed
        );
        assert_eq!(
            check_availability(&test, &completion(200, "image/png", 10)),
            AvailabilityOutcome::Passed
        );
    }

    #[test]
    fn test_negative_type_fails_when_type_matches() {
        let test = AvailabilityTest::NegativeType("application/json".to_owned());
        assert_eq!(
            check_availability(&test, &completion(200, "application/json", 10)),
            AvailabilityOutcome::Failed
        );
        assert_eq!(
            check_availability(&test, &completion(200, "image/png", 10)),
            AvailabilityOutcome::Passed
        );
    }

    #[test]
    fn test_negative_size_fails_when_too_small() {
        let test = AvailabilityTest::NegativeSize(100);
        assert_eq!(
            check_availability(&test, &completion(200, "image/png", 50)),
            AvailabilityOutcome::Failed
        );
        assert_eq!(
            check_availability(&test, &completion(200, "image/png", 200)),
            AvailabilityOutcome::Passed
        );
    }
}
