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
pub mod auth;
pub mod availability;
pub mod task;

pub use crate::{
    auth::apply_auth,
    availability::{check_availability, AvailabilityOutcome},
    task::{FetchCompletion, FetchOutcome, FetchTask, MAX_REDIRECTS},
};

use async_trait::async_trait;

/// Abstract fetcher the core calls to begin a request (spec §4.5/§6). The
/// HTTP implementation itself is an external collaborator; the core only
/// depends on this trait.
#[async_trait]
pub trait FetcherBridge: Send + Sync {
    /// Begin fetching `task.query_url`. Completion arrives later, from an
    /// arbitrary background context, via whatever channel the host wires
    /// the bridge up with; this call itself must not block past issuing
    /// the request.
    async fn start(&self, task: &FetchTask) -> anyhow::Result<()>;
}
