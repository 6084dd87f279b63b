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

//! A type-erased, concurrent cache of loaded asset handles.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use strata_core::asset::{ErasedAsset, UriDescriptor};

/// Maps a resolved descriptor to the asset loaded for it.
///
/// A hit short-circuits the whole load pipeline. Writes are last-write-wins.
/// With a capacity configured, the oldest inserted entry is evicted first.
#[derive(Default)]
pub struct AssetResultCache {
    entries: DashMap<Arc<UriDescriptor>, ErasedAsset>,
    capacity: Option<usize>,
    // Insertion order, only maintained when bounded.
    order: Mutex<VecDeque<Arc<UriDescriptor>>>,
}

impl AssetResultCache {
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache holding at most `capacity` entries. `None` means unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Looks up the asset cached for `descriptor`.
    ///
    /// Never mutates the cache.
    pub fn try_get(&self, descriptor: &UriDescriptor) -> Option<ErasedAsset> {
        self.entries.get(descriptor).map(|entry| entry.value().clone())
    }

    /// Stores `asset` for `descriptor`, returning the value it replaced.
    pub fn put(&self, descriptor: Arc<UriDescriptor>, asset: ErasedAsset) -> Option<ErasedAsset> {
        let Some(capacity) = self.capacity else {
            return self.entries.insert(descriptor, asset);
        };

        // Entries and their order change together when bounded.
        let mut order = self.lock_order();
        let previous = self.entries.insert(descriptor.clone(), asset);
        if previous.is_some() {
            log::debug!("AssetResultCache: replaced entry for '{descriptor}'");
            return previous;
        }

        order.push_back(descriptor);
        while order.len() > capacity {
            if let Some(evicted) = order.pop_front() {
                self.entries.remove(evicted.as_ref());
                log::debug!("AssetResultCache: evicted '{evicted}'");
            }
        }
        None
    }

    /// Removes the entry for `descriptor`.
    pub fn remove(&self, descriptor: &UriDescriptor) -> Option<ErasedAsset> {
        if self.capacity.is_none() {
            return self.entries.remove(descriptor).map(|(_, asset)| asset);
        }

        let mut order = self.lock_order();
        let removed = self.entries.remove(descriptor).map(|(_, asset)| asset);
        if removed.is_some() {
            order.retain(|d| d.as_ref() != descriptor);
        }
        removed
    }

    /// Drops every cached asset.
    pub fn clear(&self) {
        let mut order = self.lock_order();
        self.entries.clear();
        order.clear();
    }

    /// Returns `true` if an asset is cached for `descriptor`.
    pub fn contains(&self, descriptor: &UriDescriptor) -> bool {
        self.entries.contains_key(descriptor)
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lock_order(&self) -> MutexGuard<'_, VecDeque<Arc<UriDescriptor>>> {
        self.order.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(raw: &str) -> Arc<UriDescriptor> {
        Arc::new(UriDescriptor::parse(raw).unwrap())
    }

    fn asset(value: u32) -> ErasedAsset {
        Arc::new(value)
    }

    #[test]
    fn test_put_then_get() {
        let cache = AssetResultCache::new();
        let key = uri("bundleA://icons/play");
        let value = asset(7);

        assert!(cache.try_get(&key).is_none());
        assert!(cache.put(key.clone(), value.clone()).is_none());

        let hit = cache.try_get(&key).unwrap();
        assert!(Arc::ptr_eq(&hit, &value));
    }

    #[test]
    fn test_lookup_by_equal_descriptor() {
        let cache = AssetResultCache::new();
        cache.put(uri("s://a"), asset(1));

        let other = UriDescriptor::parse("s://a").unwrap();
        assert!(cache.contains(&other));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = AssetResultCache::new();
        let key = uri("s://a");
        let first = asset(1);
        let second = asset(2);

        cache.put(key.clone(), first.clone());
        let replaced = cache.put(key.clone(), second.clone()).unwrap();

        assert!(Arc::ptr_eq(&replaced, &first));
        assert!(Arc::ptr_eq(&cache.try_get(&key).unwrap(), &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bounded_cache_evicts_oldest() {
        let cache = AssetResultCache::with_capacity(Some(2));
        let (a, b, c) = (uri("s://a"), uri("s://b"), uri("s://c"));

        cache.put(a.clone(), asset(1));
        cache.put(b.clone(), asset(2));
        cache.put(a.clone(), asset(3));
        cache.put(c.clone(), asset(4));

        assert!(!cache.contains(&a));
        assert!(cache.contains(&b));
        assert!(cache.contains(&c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = AssetResultCache::with_capacity(Some(4));
        let (a, b) = (uri("s://a"), uri("s://b"));
        cache.put(a.clone(), asset(1));
        cache.put(b.clone(), asset(2));

        assert!(cache.remove(&a).is_some());
        assert!(cache.remove(&a).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_put_and_remove_keep_order_in_sync() {
        let cache = Arc::new(AssetResultCache::with_capacity(Some(2)));
        let key = uri("s://a");

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let (cache, key) = (cache.clone(), key.clone());
                std::thread::spawn(move || {
                    for n in 0..500 {
                        if (n + i) % 2 == 0 {
                            cache.put(key.clone(), asset(n));
                        } else {
                            cache.remove(&key);
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(cache.lock_order().len(), cache.len());

        // A stale order entry would evict the live one early.
        cache.put(key.clone(), asset(1));
        cache.put(uri("s://b"), asset(2));
        assert!(cache.contains(&key));
        assert_eq!(cache.len(), 2);
    }
}
