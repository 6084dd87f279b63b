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

//! Counters and timings recorded by the asset service.

use strata_telemetry::{CounterHandle, HistogramHandle, MetricsRegistry, MetricsResult};

const NAMESPACE: &str = "assets";

/// Millisecond bucket bounds for `assets.load_time`.
const LOAD_TIME_BUCKETS_MS: [f64; 8] = [0.1, 0.5, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0];

/// Handles to the service's metrics, all in the `assets` namespace.
pub(crate) struct ServiceMetrics {
    pub cache_hits: CounterHandle,
    pub cache_misses: CounterHandle,
    pub loads_failed: CounterHandle,
    pub single_flight_joins: CounterHandle,
    pub load_time: HistogramHandle,
}

impl ServiceMetrics {
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            cache_hits: registry.register_counter(
                NAMESPACE,
                "cache_hits",
                "Loads answered from the result cache",
            )?,
            cache_misses: registry.register_counter(
                NAMESPACE,
                "cache_misses",
                "Loads that had to go through a load strategy",
            )?,
            loads_failed: registry.register_counter(
                NAMESPACE,
                "loads_failed",
                "Loads that ended in an error",
            )?,
            single_flight_joins: registry.register_counter(
                NAMESPACE,
                "single_flight_joins",
                "Loads that awaited another caller's in-flight load",
            )?,
            load_time: registry.register_histogram(
                NAMESPACE,
                "load_time",
                "Time spent inside load strategies",
                "ms",
                LOAD_TIME_BUCKETS_MS.to_vec(),
            )?,
        })
    }

    pub fn bump(counter: &CounterHandle) {
        if let Err(e) = counter.increment() {
            log::warn!("Failed to update metric {}: {}", counter.id(), e);
        }
    }
}

/// A point-in-time view of the service's caches and counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetServiceStats {
    /// Number of assets held by the result cache.
    pub cached_assets: usize,
    /// Number of parsed descriptors held by the resolver.
    pub cached_descriptors: usize,
    /// Loads answered from the result cache.
    pub cache_hits: u64,
    /// Loads that missed the result cache.
    pub cache_misses: u64,
    /// Loads that ended in an error.
    pub loads_failed: u64,
    /// Loads that awaited another caller's in-flight load.
    pub single_flight_joins: u64,
    /// Descriptors currently being loaded under single-flight.
    pub in_flight: usize,
}
