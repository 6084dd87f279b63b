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

//! Metric identifiers, values, and errors.

pub mod registry;

use std::fmt;
use thiserror::Error;

/// Identifies a metric by namespace and name (e.g. `assets.cache_hits`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The owning subsystem.
    pub namespace: String,
    /// The metric name inside the namespace.
    pub name: String,
}

impl MetricId {
    /// Creates a new metric identifier.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A monotonically increasing count.
    Counter(u64),
    /// A distribution of observations over fixed bucket bounds.
    Histogram {
        /// Upper bounds of each bucket, ascending.
        buckets: Vec<f64>,
        /// Observations per bucket; the last slot counts values above every bound.
        bucket_counts: Vec<u64>,
        /// Number of observations.
        count: u64,
        /// Sum of all observations.
        sum: f64,
    },
}

impl MetricValue {
    /// Returns the counter value, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `(count, sum)` if this is a histogram.
    pub fn as_histogram(&self) -> Option<(u64, f64)> {
        match self {
            MetricValue::Histogram { count, sum, .. } => Some((*count, *sum)),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            MetricValue::Counter(_) => "counter",
            MetricValue::Histogram { .. } => "histogram",
        }
    }
}

/// A registered metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Its identifier.
    pub id: MetricId,
    /// What it measures.
    pub description: String,
    /// Unit of observations, empty for counters.
    pub unit: String,
    /// The current value.
    pub value: MetricValue,
}

/// Errors raised by the metrics registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// No metric is registered under the identifier.
    #[error("metric '{0}' not found")]
    NotFound(MetricId),
    /// The metric exists with a different kind.
    #[error("metric '{id}' is a {found}, expected a {expected}")]
    TypeMismatch {
        /// The metric in question.
        id: MetricId,
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind actually registered.
        found: &'static str,
    },
    /// The registry lock was poisoned by a panicking writer.
    #[error("metrics storage lock poisoned")]
    Poisoned,
}

/// A convenient alias for metrics results.
pub type MetricsResult<T> = Result<T, MetricsError>;

pub(crate) fn type_mismatch(id: &MetricId, expected: &'static str, found: &MetricValue) -> MetricsError {
    MetricsError::TypeMismatch {
        id: id.clone(),
        expected,
        found: found.kind(),
    }
}
