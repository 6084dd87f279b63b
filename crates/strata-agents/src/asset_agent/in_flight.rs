// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-flight coordination of concurrent loads.

use std::any::TypeId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use strata_core::{asset::ErasedAsset, asset::UriDescriptor, AssetResult};
use tokio::sync::OnceCell;

type LoadCell = Arc<OnceCell<AssetResult<ErasedAsset>>>;

/// Requests only share a load when they ask for the same asset type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FlightKey {
    descriptor: Arc<UriDescriptor>,
    type_id: TypeId,
}

struct Pending {
    cell: LoadCell,
    participants: usize,
}

/// Collapses concurrent loads of one descriptor and type into a single operation.
///
/// The first caller installs a shared cell and runs its load inside it; later
/// callers await the same cell. If the running caller is dropped mid-load,
/// one of the waiters takes the load over. The entry is removed once the
/// cell holds an outcome or the last participant leaves, so neither failures
/// nor cancelled loads are remembered.
#[derive(Default)]
pub(crate) struct InFlightLoads {
    pending: Mutex<HashMap<FlightKey, Pending>>,
}

/// What a caller got out of [`InFlightLoads::run`].
#[derive(Debug)]
pub(crate) struct Flight {
    pub outcome: AssetResult<ErasedAsset>,
    /// `true` if another caller's load produced the outcome.
    pub joined: bool,
}

/// Leaves the flight when dropped, including on cancellation.
struct Participant<'a> {
    loads: &'a InFlightLoads,
    key: &'a FlightKey,
    cell: LoadCell,
}

impl Drop for Participant<'_> {
    fn drop(&mut self) {
        self.loads.leave(self.key, &self.cell);
    }
}

impl InFlightLoads {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, Fut>(
        &self,
        descriptor: &Arc<UriDescriptor>,
        type_id: TypeId,
        load: F,
    ) -> Flight
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AssetResult<ErasedAsset>>,
    {
        let key = FlightKey {
            descriptor: descriptor.clone(),
            type_id,
        };
        let cell = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            let entry = pending.entry(key.clone()).or_insert_with(|| Pending {
                cell: Arc::new(OnceCell::new()),
                participants: 0,
            });
            entry.participants += 1;
            entry.cell.clone()
        };
        let participant = Participant {
            loads: self,
            key: &key,
            cell,
        };

        let mut ran = false;
        let outcome = participant
            .cell
            .get_or_init(|| {
                ran = true;
                load()
            })
            .await
            .clone();
        drop(participant);

        Flight {
            outcome,
            joined: !ran,
        }
    }

    /// Number of loads currently in flight.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    fn leave(&self, key: &FlightKey, cell: &LoadCell) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        // A newer flight may already occupy the slot; leave it alone.
        let Some(entry) = pending.get_mut(key).filter(|p| Arc::ptr_eq(&p.cell, cell)) else {
            return;
        };
        entry.participants -= 1;
        if entry.participants == 0 || cell.initialized() {
            pending.remove(key);
        }
    }
}
