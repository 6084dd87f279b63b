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

//! The asset service: the orchestrator between callers and load strategies.

use std::any::{type_name, TypeId};
use std::sync::Arc;

use strata_core::asset::{Asset, AssetHandle, ErasedAsset, UriDescriptor};
use strata_core::backend::{BackendSet, Installer, ManifestFetcher, Storage};
use strata_core::progress::{LoadProgress, MonotonicProgress, NoopProgress};
use strata_core::strategy::{AssetRequest, LoadStrategy};
use strata_core::{AssetError, AssetResult};
use strata_data::{AssetResultCache, BackendRegistry, UriResolver};
use strata_telemetry::{CounterHandle, MetricsError, MetricsRegistry, ScopedMetricTimer};

use super::config::AssetServiceConfig;
use super::in_flight::InFlightLoads;
use super::metrics::{AssetServiceStats, ServiceMetrics};

/// Resolves asset identifiers into loaded, shared asset handles.
///
/// A request is parsed into a cached [`UriDescriptor`], looked up in the
/// result cache, and on a miss dispatched to the [`LoadStrategy`]: the
/// resources path when the host is the reserved resources host, the bundle
/// path with the host as storage name otherwise. Successful loads are cached
/// so that later requests get the same handle back. Failures are never
/// cached and never retried.
///
/// Backends are registered during setup through `&mut self`; loading only
/// needs `&self`, so a configured service can be shared behind an `Arc`.
pub struct AssetService {
    config: AssetServiceConfig,
    resolver: UriResolver,
    results: AssetResultCache,
    backends: BackendRegistry,
    strategy: Arc<dyn LoadStrategy>,
    in_flight: InFlightLoads,
    metrics_registry: MetricsRegistry,
    metrics: ServiceMetrics,
}

impl AssetService {
    /// Creates a service with the default configuration and a private metrics registry.
    pub fn new(strategy: impl LoadStrategy + 'static) -> Self {
        let registry = MetricsRegistry::new();
        // A fresh registry holds nothing that could conflict.
        let metrics = match ServiceMetrics::register(&registry) {
            Ok(metrics) => metrics,
            Err(e) => unreachable!("fresh metrics registry rejected registration: {e}"),
        };
        Self::assemble(
            Arc::new(strategy),
            AssetServiceConfig::default(),
            registry,
            metrics,
        )
    }

    /// Creates a service with an explicit configuration, recording its
    /// metrics into `metrics_registry`.
    pub fn with_config(
        strategy: Arc<dyn LoadStrategy>,
        config: AssetServiceConfig,
        metrics_registry: MetricsRegistry,
    ) -> Result<Self, MetricsError> {
        let metrics = ServiceMetrics::register(&metrics_registry)?;
        Ok(Self::assemble(strategy, config, metrics_registry, metrics))
    }

    fn assemble(
        strategy: Arc<dyn LoadStrategy>,
        config: AssetServiceConfig,
        metrics_registry: MetricsRegistry,
        metrics: ServiceMetrics,
    ) -> Self {
        log::info!(
            "AssetService: resources host '{}', single-flight {}",
            config.resources_host,
            if config.single_flight { "on" } else { "off" }
        );
        Self {
            resolver: UriResolver::with_capacity(config.uri_cache_capacity),
            results: AssetResultCache::with_capacity(config.result_cache_capacity),
            backends: BackendRegistry::with_resources_host(config.resources_host.clone()),
            strategy,
            in_flight: InFlightLoads::new(),
            metrics_registry,
            metrics,
            config,
        }
    }

    /// Registers a manifest fetcher. Fails with
    /// [`AssetError::DuplicateRegistration`] if this exact object is already registered.
    pub fn add_manifest_fetcher(&mut self, fetcher: Arc<dyn ManifestFetcher>) -> AssetResult<()> {
        self.backends.add_manifest_fetcher(fetcher)
    }

    /// Registers a storage, addressable by its name as a URI host.
    ///
    /// # Errors
    /// - [`AssetError::DuplicateRegistration`] for an object registered before.
    /// - [`AssetError::InvalidArgument`] for an empty name.
    /// - [`AssetError::ReservedStorageName`] if the name is the resources host.
    pub fn add_storage(&mut self, storage: Arc<dyn Storage>) -> AssetResult<()> {
        self.backends.add_storage(storage)
    }

    /// Registers an installer. Fails with
    /// [`AssetError::DuplicateRegistration`] if this exact object is already registered.
    pub fn add_installer(&mut self, installer: Arc<dyn Installer>) -> AssetResult<()> {
        self.backends.add_installer(installer)
    }

    /// Loads the asset identified by `uri`, or returns the cached handle.
    pub async fn load_asset<T: Asset>(&self, uri: &str) -> AssetResult<AssetHandle<T>> {
        self.load_asset_with_progress(uri, &NoopProgress).await
    }

    /// Loads the asset identified by `uri`, reporting progress of a cache miss.
    ///
    /// `progress` is never called when the handle comes from the cache.
    /// Reported values stay within `[0, 1]` and never decrease; a successful
    /// load always ends with `1.0`.
    pub async fn load_asset_with_progress<T: Asset>(
        &self,
        uri: &str,
        progress: &dyn LoadProgress,
    ) -> AssetResult<AssetHandle<T>> {
        if uri.is_empty() {
            return Err(AssetError::InvalidArgument(
                "asset uri must not be empty".to_string(),
            ));
        }

        let descriptor = self.resolver.resolve(uri)?;

        if let Some(cached) = self.results.try_get(&descriptor) {
            ServiceMetrics::bump(&self.metrics.cache_hits);
            log::trace!("AssetService: cache hit for '{}'", descriptor);
            return typed::<T>(&descriptor, cached);
        }
        ServiceMetrics::bump(&self.metrics.cache_misses);

        let progress = MonotonicProgress::new(progress);
        let outcome = if self.config.single_flight {
            let flight = self
                .in_flight
                .run(&descriptor, TypeId::of::<T>(), || {
                    self.fetch::<T>(&descriptor, &progress)
                })
                .await;
            if flight.joined {
                ServiceMetrics::bump(&self.metrics.single_flight_joins);
            }
            flight.outcome
        } else {
            self.fetch::<T>(&descriptor, &progress).await
        };

        let handle = typed::<T>(&descriptor, outcome?)?;
        progress.report(1.0);
        Ok(handle)
    }

    /// Whether a loaded asset for `uri` is currently cached.
    pub fn contains(&self, uri: &str) -> AssetResult<bool> {
        let descriptor = self.resolver.resolve(uri)?;
        Ok(self.results.contains(&descriptor))
    }

    /// Drops every cached asset. Parsed descriptors are kept.
    pub fn clear_cache(&self) {
        log::debug!("AssetService: clearing {} cached assets", self.results.len());
        self.results.clear();
    }

    /// The registered manifest fetchers, in registration order.
    pub fn manifest_fetchers(&self) -> &[Arc<dyn ManifestFetcher>] {
        self.backends.manifest_fetchers()
    }

    /// The registered storages, in registration order.
    pub fn storages(&self) -> &[Arc<dyn Storage>] {
        self.backends.storages()
    }

    /// The registered installers, in registration order.
    pub fn installers(&self) -> &[Arc<dyn Installer>] {
        self.backends.installers()
    }

    /// The active configuration.
    pub fn config(&self) -> &AssetServiceConfig {
        &self.config
    }

    /// The registry the service records its metrics into.
    pub fn metrics_registry(&self) -> &MetricsRegistry {
        &self.metrics_registry
    }

    /// Returns a snapshot of cache sizes and counters.
    pub fn stats(&self) -> AssetServiceStats {
        let read = |counter: &CounterHandle| counter.get().unwrap_or_default();
        AssetServiceStats {
            cached_assets: self.results.len(),
            cached_descriptors: self.resolver.len(),
            cache_hits: read(&self.metrics.cache_hits),
            cache_misses: read(&self.metrics.cache_misses),
            loads_failed: read(&self.metrics.loads_failed),
            single_flight_joins: read(&self.metrics.single_flight_joins),
            in_flight: self.in_flight.len(),
        }
    }

    /// Runs the strategy for a missed descriptor and caches what it produced.
    async fn fetch<T: Asset>(
        &self,
        descriptor: &Arc<UriDescriptor>,
        progress: &dyn LoadProgress,
    ) -> AssetResult<ErasedAsset> {
        // Another flight may have finished between the miss and now.
        if let Some(cached) = self.results.try_get(descriptor) {
            return Ok(cached);
        }

        let request = AssetRequest::of::<T>(descriptor);
        let loaded = {
            let _timer = ScopedMetricTimer::new(&self.metrics.load_time);
            if descriptor.is_resource(&self.config.resources_host) {
                log::debug!("AssetService: loading '{}' from resources", descriptor);
                self.strategy.load_from_resources(&request, progress).await
            } else {
                log::debug!(
                    "AssetService: loading '{}' from storage '{}'",
                    descriptor,
                    descriptor.host()
                );
                self.strategy
                    .load_from_bundle(descriptor.host(), &request, &self.backends, progress)
                    .await
            }
        };

        match loaded {
            Ok(Some(asset)) if (*asset).is::<T>() => {
                self.results.put(descriptor.clone(), asset.clone());
                Ok(asset)
            }
            Ok(Some(_)) => {
                ServiceMetrics::bump(&self.metrics.loads_failed);
                log::warn!(
                    "AssetService: '{}' did not load as {}",
                    descriptor,
                    type_name::<T>()
                );
                Err(AssetError::TypeMismatch {
                    uri: descriptor.raw().to_string(),
                    expected: type_name::<T>(),
                })
            }
            Ok(None) => {
                ServiceMetrics::bump(&self.metrics.loads_failed);
                log::warn!("AssetService: nothing found for '{}'", descriptor);
                Err(AssetError::AssetLoadFailure {
                    uri: descriptor.raw().to_string(),
                })
            }
            Err(source) => {
                ServiceMetrics::bump(&self.metrics.loads_failed);
                log::error!("AssetService: loading '{}' failed: {}", descriptor, source);
                Err(AssetError::backend(descriptor.raw(), source))
            }
        }
    }
}

/// Downcasts a cached or freshly loaded asset to the requested type.
fn typed<T: Asset>(descriptor: &UriDescriptor, asset: ErasedAsset) -> AssetResult<AssetHandle<T>> {
    AssetHandle::from_erased(asset).map_err(|_| AssetError::TypeMismatch {
        uri: descriptor.raw().to_string(),
        expected: type_name::<T>(),
    })
}
