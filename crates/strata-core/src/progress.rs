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

//! Fractional progress reporting for asset loads.

use std::sync::atomic::{AtomicU32, Ordering};

/// A sink for completion updates in the `[0.0, 1.0]` range.
pub trait LoadProgress: Send + Sync {
    /// Reports that the load is `fraction` complete.
    fn report(&self, fraction: f32);
}

impl<F> LoadProgress for F
where
    F: Fn(f32) + Send + Sync,
{
    fn report(&self, fraction: f32) {
        self(fraction)
    }
}

/// A sink that discards every update.
///
/// Substituted when the caller does not care about progress, so strategies
/// can always report unconditionally.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl LoadProgress for NoopProgress {
    fn report(&self, _fraction: f32) {}
}

/// Wraps a sink so it only ever sees strictly increasing values.
///
/// Values are clamped to `[0.0, 1.0]`. NaN and anything not greater than the
/// last forwarded value are dropped.
pub struct MonotonicProgress<'a> {
    inner: &'a dyn LoadProgress,
    last: AtomicU32,
}

impl<'a> MonotonicProgress<'a> {
    /// Wraps `inner`.
    pub fn new(inner: &'a dyn LoadProgress) -> Self {
        Self {
            inner,
            last: AtomicU32::new((-1.0f32).to_bits()),
        }
    }

    /// The last forwarded value, or `None` if nothing was reported yet.
    pub fn last(&self) -> Option<f32> {
        let last = f32::from_bits(self.last.load(Ordering::Acquire));
        (last >= 0.0).then_some(last)
    }
}

impl LoadProgress for MonotonicProgress<'_> {
    fn report(&self, fraction: f32) {
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);

        let mut current = self.last.load(Ordering::Acquire);
        loop {
            if fraction <= f32::from_bits(current) {
                return;
            }
            match self.last.compare_exchange_weak(
                current,
                fraction.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        self.inner.report(fraction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_is_a_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: f32| seen.lock().unwrap().push(p);
        sink.report(0.5);
        assert_eq!(*seen.lock().unwrap(), vec![0.5]);
    }

    #[test]
    fn test_monotonic_drops_regressions_and_clamps() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: f32| seen.lock().unwrap().push(p);
        let progress = MonotonicProgress::new(&sink);

        assert_eq!(progress.last(), None);
        for value in [0.2, 0.1, 0.2, f32::NAN, 0.6, 3.0, 1.0] {
            progress.report(value);
        }

        assert_eq!(*seen.lock().unwrap(), vec![0.2, 0.6, 1.0]);
        assert_eq!(progress.last(), Some(1.0));
    }

    #[test]
    fn test_zero_is_forwarded_once() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: f32| seen.lock().unwrap().push(p);
        let progress = MonotonicProgress::new(&sink);
        progress.report(-0.5);
        progress.report(0.0);
        assert_eq!(*seen.lock().unwrap(), vec![0.0]);
    }
}
