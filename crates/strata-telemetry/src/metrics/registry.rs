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

//! Registry for managing metrics.

use super::{type_mismatch, Metric, MetricId, MetricValue, MetricsError, MetricsResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type MetricStorage = Arc<RwLock<HashMap<MetricId, Metric>>>;

/// Central, in-memory registry for metrics.
///
/// Registration hands back a cheap, cloneable handle that updates the metric
/// in place. Registering an identifier a second time returns a handle to the
/// existing metric instead of resetting it.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    storage: MetricStorage,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or re-opens) a counter.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.put_if_absent(Metric {
            id: id.clone(),
            description: description.into(),
            unit: String::new(),
            value: MetricValue::Counter(0),
        })?;
        Ok(CounterHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Registers (or re-opens) a histogram with the given ascending bucket bounds.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        let bucket_counts = vec![0; buckets.len() + 1];
        self.put_if_absent(Metric {
            id: id.clone(),
            description: description.into(),
            unit: unit.into(),
            value: MetricValue::Histogram {
                buckets,
                bucket_counts,
                count: 0,
                sum: 0.0,
            },
        })?;
        Ok(HistogramHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Returns a snapshot of a metric.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self.storage.read().map_err(|_| MetricsError::Poisoned)?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::NotFound(id.clone()))
    }

    /// Returns snapshots of every metric in `namespace`, sorted by name.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        let Ok(storage) = self.storage.read() else {
            return Vec::new();
        };
        let mut metrics: Vec<Metric> = storage
            .values()
            .filter(|m| m.id.namespace == namespace)
            .cloned()
            .collect();
        metrics.sort_by(|a, b| a.id.name.cmp(&b.id.name));
        metrics
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    fn put_if_absent(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        if let Some(existing) = storage.get(&metric.id) {
            return if existing.value.kind() == metric.value.kind() {
                Ok(())
            } else {
                Err(type_mismatch(&metric.id, metric.value.kind(), &existing.value))
            };
        }
        log::trace!("Registered metric {}", metric.id);
        storage.insert(metric.id.clone(), metric);
        Ok(())
    }
}

/// Handle for efficient counter operations.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    storage: MetricStorage,
}

impl CounterHandle {
    /// Increments the counter by 1 and returns the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Increments the counter by `amount` and returns the new value.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        let metric = storage
            .get_mut(&self.id)
            .ok_or_else(|| MetricsError::NotFound(self.id.clone()))?;
        match &mut metric.value {
            MetricValue::Counter(value) => {
                *value += amount;
                Ok(*value)
            }
            other => Err(type_mismatch(&self.id, "counter", other)),
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> MetricsResult<u64> {
        let storage = self.storage.read().map_err(|_| MetricsError::Poisoned)?;
        let metric = storage
            .get(&self.id)
            .ok_or_else(|| MetricsError::NotFound(self.id.clone()))?;
        metric
            .value
            .as_counter()
            .ok_or_else(|| type_mismatch(&self.id, "counter", &metric.value))
    }

    /// The metric identifier.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for efficient histogram operations.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    storage: MetricStorage,
}

impl HistogramHandle {
    /// Records one observation.
    pub fn observe(&self, value: f64) -> MetricsResult<()> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        let metric = storage
            .get_mut(&self.id)
            .ok_or_else(|| MetricsError::NotFound(self.id.clone()))?;
        match &mut metric.value {
            MetricValue::Histogram {
                buckets,
                bucket_counts,
                count,
                sum,
            } => {
                let slot = buckets
                    .iter()
                    .position(|bound| value <= *bound)
                    .unwrap_or(buckets.len());
                bucket_counts[slot] += 1;
                *count += 1;
                *sum += value;
                Ok(())
            }
            other => Err(type_mismatch(&self.id, "histogram", other)),
        }
    }

    /// Returns `(count, sum)` of the observations so far.
    pub fn summary(&self) -> MetricsResult<(u64, f64)> {
        let storage = self.storage.read().map_err(|_| MetricsError::Poisoned)?;
        let metric = storage
            .get(&self.id)
            .ok_or_else(|| MetricsError::NotFound(self.id.clone()))?;
        metric
            .value
            .as_histogram()
            .ok_or_else(|| type_mismatch(&self.id, "histogram", &metric.value))
    }

    /// The metric identifier.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
