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

//! Caches parsed [`UriDescriptor`]s by their raw identifier.

use dashmap::DashMap;
use std::sync::Arc;
use strata_core::{asset::UriDescriptor, AssetError, AssetResult};

/// Parses raw identifiers once and hands out shared descriptors.
///
/// Every call with an equal raw string returns the very same `Arc`, as long
/// as the descriptor made it into the cache. When a capacity is configured
/// and reached, new identifiers are still parsed but no longer cached.
#[derive(Debug, Default)]
pub struct UriResolver {
    cache: DashMap<String, Arc<UriDescriptor>>,
    capacity: Option<usize>,
}

impl UriResolver {
    /// Creates an unbounded resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver that caches at most `capacity` descriptors.
    /// `None` means unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            cache: DashMap::new(),
            capacity,
        }
    }

    /// Resolves `raw` into its descriptor.
    ///
    /// # Errors
    /// [`AssetError::InvalidArgument`] for an empty string, and
    /// [`AssetError::InvalidUri`] when `raw` cannot be parsed. Failures are
    /// never cached.
    pub fn resolve(&self, raw: &str) -> AssetResult<Arc<UriDescriptor>> {
        if raw.is_empty() {
            return Err(AssetError::InvalidArgument(
                "asset uri must not be empty".to_string(),
            ));
        }

        if let Some(cached) = self.cache.get(raw) {
            return Ok(cached.value().clone());
        }

        let parsed = Arc::new(UriDescriptor::parse(raw)?);

        if let Some(capacity) = self.capacity {
            if self.cache.len() >= capacity {
                log::debug!("UriResolver: cache full ({capacity}), not caching '{raw}'");
                return Ok(parsed);
            }
        }

        // A concurrent resolve may have won the race; keep its descriptor.
        let entry = self.cache.entry(raw.to_string()).or_insert(parsed);
        Ok(entry.value().clone())
    }

    /// Returns `true` if `raw` already has a cached descriptor.
    pub fn contains(&self, raw: &str) -> bool {
        self.cache.contains_key(raw)
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if no descriptor is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_string_same_descriptor() {
        let resolver = UriResolver::new();
        let a = resolver.resolve("bundleA://icons/play").unwrap();
        let b = resolver.resolve(&String::from("bundleA://icons/play")).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_distinct_strings_distinct_descriptors() {
        let resolver = UriResolver::new();
        let a = resolver.resolve("bundleA://icons/play").unwrap();
        let b = resolver.resolve("bundleA:///icons/play").unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let resolver = UriResolver::new();
        assert!(matches!(
            resolver.resolve(""),
            Err(AssetError::InvalidArgument(_))
        ));
        assert!(matches!(
            resolver.resolve("garbage"),
            Err(AssetError::InvalidUri { .. })
        ));
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_capacity_stops_caching() {
        let resolver = UriResolver::with_capacity(Some(1));
        let first = resolver.resolve("s://a").unwrap();
        let second = resolver.resolve("s://b").unwrap();
        let second_again = resolver.resolve("s://b").unwrap();

        assert!(Arc::ptr_eq(&first, &resolver.resolve("s://a").unwrap()));
        assert!(!Arc::ptr_eq(&second, &second_again));
        assert_eq!(second, second_again);
        assert!(!resolver.contains("s://b"));
    }

    #[test]
    fn test_concurrent_resolve_converges_on_one_descriptor() {
        let resolver = Arc::new(UriResolver::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = resolver.clone();
                thread::spawn(move || resolver.resolve("bundleA://icons/play").unwrap())
            })
            .collect();

        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let cached = resolver.resolve("bundleA://icons/play").unwrap();
        assert!(descriptors.iter().all(|d| Arc::ptr_eq(d, &cached)));
    }
}
