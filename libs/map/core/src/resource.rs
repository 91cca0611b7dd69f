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
use crate::{
    auth::AuthConfigData,
    error::DecodeError,
    gpu_spec::{GpuMeshSpec, GpuTextureSpec},
    meta::MetaTile,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// One resource's place in the state machine (spec §4.1). Stored as a
/// single atomic byte so `validity()` can be read without taking a lock.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ResourceState {
    Initializing = 0,
    Downloading = 1,
    Downloaded = 2,
    Ready = 3,
    ErrorRetry = 4,
    ErrorFatal = 5,
    Finalizing = 6,
}

impl ResourceState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Initializing,
            1 => Self::Downloading,
            2 => Self::Downloaded,
            3 => Self::Ready,
            4 => Self::ErrorRetry,
            5 => Self::ErrorFatal,
            _ => Self::Finalizing,
        }
    }
}

/// What `validity()` reports for a resource name, per spec §4.1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Validity {
    Invalid,
    Indeterminate,
    Valid,
}

/// The uniform union of all decoded payload kinds a resource can hold
/// (spec §3). `External` covers bound-layer config and anything else the
/// host attaches opaquely.
#[derive(Debug)]
pub enum ResourcePayload {
    AuthConfig(AuthConfigData),
    MapConfig(Vec<u8>),
    MetaTile(MetaTile),
    Mesh(GpuMeshSpec),
    Texture(GpuTextureSpec),
    NavTile(Vec<u8>),
    BoundMeta(Vec<u8>),
    BoundMask(GpuTextureSpec),
    ExternalBoundLayer(Vec<u8>),
    Search(Vec<u8>),
}

impl ResourcePayload {
    /// Decode raw bytes into payloads that are self-contained blobs, not
    /// routed through a host `DecoderBridge` (spec §9's `Decodable`
    /// contract, for the variants that don't need an external decoder).
    /// `MetaTile`, `Mesh`, `Texture`, `BoundMask` and `AuthConfig` are
    /// always produced by `resource_cache` via `DecoderBridge` instead.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        match self {
            Self::MapConfig(buf) | Self::NavTile(buf) | Self::BoundMeta(buf) => {
                if bytes.is_empty() {
                    return Err(DecodeError::Malformed("empty payload".to_owned()));
                }
                *buf = bytes.to_vec();
                Ok(())
            }
            Self::ExternalBoundLayer(buf) | Self::Search(buf) => {
                *buf = bytes.to_vec();
                Ok(())
            }
            Self::AuthConfig(_) | Self::MetaTile(_) | Self::Mesh(_) | Self::Texture(_)
            | Self::BoundMask(_) => Err(DecodeError::Unsupported(
                "this variant is decoded externally via DecoderBridge".to_owned(),
            )),
        }
    }

    pub fn memory_cost(&self) -> (u64, u64) {
        match self {
            Self::AuthConfig(_) => (std::mem::size_of::<AuthConfigData>() as u64, 0),
            Self::MapConfig(b) | Self::NavTile(b) | Self::BoundMeta(b) => (b.len() as u64, 0),
            Self::ExternalBoundLayer(b) | Self::Search(b) => (b.len() as u64, 0),
            Self::MetaTile(t) => (t.memory_cost(), 0),
            Self::Mesh(spec) => spec.memory_cost(),
            Self::Texture(spec) | Self::BoundMask(spec) => spec.memory_cost(),
        }
    }
}

/// Negative availability test descriptor (spec §4.5). Failure moves the
/// resource to `ErrorFatal` and records its name in the failed-avail set.
#[derive(Clone, Debug)]
pub enum AvailabilityTest {
    NegativeCode(Vec<u16>),
    NegativeType(String),
    NegativeSize(u64),
}

/// The cache's uniform element (spec §3). Interior-mutable so the data and
/// render workers can share a handle without the cache itself locking on
/// every touch.
#[derive(Debug)]
pub struct Resource {
    name: String,
    state: AtomicU8,
    /// Bits of an f64, stored atomically; see `priority()`/`touch()`.
    priority_bits: AtomicU64,
    last_access_tick: AtomicU64,
    ram_memory_cost: AtomicU64,
    gpu_memory_cost: AtomicU64,
    availability_test: Option<AvailabilityTest>,
    payload: Mutex<Option<ResourcePayload>>,
    /// Number of redirects followed so far, capped at 5 (spec §4.1/§4.5).
    redirect_count: AtomicU64,
}

impl Resource {
    pub fn new(name: impl Into<String>, availability_test: Option<AvailabilityTest>) -> Self {
        Self {
            name: name.into(),
            state: AtomicU8::new(ResourceState::Initializing as u8),
            priority_bits: AtomicU64::new(0),
            last_access_tick: AtomicU64::new(0),
            ram_memory_cost: AtomicU64::new(0),
            gpu_memory_cost: AtomicU64::new(0),
            availability_test,
            payload: Mutex::new(None),
            redirect_count: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ResourceState {
        ResourceState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set_state(&self, state: ResourceState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn validity(&self) -> Validity {
        match self.state() {
            ResourceState::Ready => Validity::Valid,
            ResourceState::ErrorFatal => Validity::Invalid,
            _ => Validity::Indeterminate,
        }
    }

    pub fn priority(&self) -> f64 {
        f64::from_bits(self.priority_bits.load(Ordering::Relaxed))
    }

    /// Marks the resource used this tick and raises its priority to the max
    /// of the existing and the new value (spec §4.1 `touch`). Re-queues a
    /// `Finalizing` resource back to `Initializing`.
    pub fn touch(&self, tick: u64, priority: f64) {
        self.last_access_tick.store(tick, Ordering::Relaxed);
        let mut cur = self.priority_bits.load(Ordering::Relaxed);
        loop {
            let cur_val = f64::from_bits(cur);
            if cur_val >= priority {
                break;
            }
            match self.priority_bits.compare_exchange_weak(
                cur,
                priority.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => cur = actual,
            }
        }
        if self.state() == ResourceState::Finalizing {
            self.set_state(ResourceState::Initializing);
        }
    }

    pub fn last_access_tick(&self) -> u64 {
        self.last_access_tick.load(Ordering::Relaxed)
    }

    pub fn ram_memory_cost(&self) -> u64 {
        self.ram_memory_cost.load(Ordering::Relaxed)
    }

    pub fn gpu_memory_cost(&self) -> u64 {
        self.gpu_memory_cost.load(Ordering::Relaxed)
    }

    pub fn set_memory_cost(&self, ram: u64, gpu: u64) {
        self.ram_memory_cost.store(ram, Ordering::Relaxed);
        self.gpu_memory_cost.store(gpu, Ordering::Relaxed);
    }

    pub fn availability_test(&self) -> Option<&AvailabilityTest> {
        self.availability_test.as_ref()
    }

    pub fn redirect_count(&self) -> u64 {
        self.redirect_count.load(Ordering::Relaxed)
    }

    pub fn bump_redirect_count(&self) -> u64 {
        self.redirect_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Decode `bytes` into this resource's payload slot for self-contained
    /// variants, updating its memory cost, then transitions to `Ready` (or
    /// `ErrorFatal` on failure). Runs on the data worker (spec §4.1).
    pub fn decode(&self, mut payload: ResourcePayload, bytes: &[u8]) {
        match payload.load(bytes) {
            Ok(()) => self.store_ready(payload),
            Err(e) => {
                log::warn!("resource {} failed to decode: {}", self.name, e);
                self.set_state(ResourceState::ErrorFatal);
            }
        }
    }

    /// Install an already-decoded payload (produced externally, e.g. via
    /// `DecoderBridge`) and transition to `Ready`.
    pub fn store_ready(&self, payload: ResourcePayload) {
        let (ram, gpu) = payload.memory_cost();
        self.set_memory_cost(ram, gpu);
        *self.payload.lock() = Some(payload);
        self.set_state(ResourceState::Ready);
    }

    pub fn with_payload<T>(&self, f: impl FnOnce(Option<&ResourcePayload>) -> T) -> T {
        f(self.payload.lock().as_ref())
    }
}
