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

//! The bundle lane: storage lookup, manifest fetch, install, extract.

mod memory;

pub use memory::*;

use crate::asset_lane::DecoderRegistry;
use dashmap::DashMap;
use std::sync::Arc;
use strata_core::{
    asset::ErasedAsset,
    backend::{BackendSet, BundleEntry, BundleManifest, InstalledBundle, Storage},
    error::BackendError,
    progress::LoadProgress,
    strategy::AssetRequest,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InstallKey {
    storage: String,
    bundle: String,
    version: u32,
}

impl InstallKey {
    fn new(storage: &str, entry: &BundleEntry) -> Self {
        Self {
            storage: storage.to_string(),
            bundle: entry.bundle.clone(),
            version: entry.version,
        }
    }
}

/// A "Lane" that pulls an asset out of a bundle held by a named storage.
///
/// The lane chains the registered backends:
/// 1. find the storage whose name matches the URI host,
/// 2. ask the manifest fetchers, in order, for that storage's manifest,
/// 3. look the asset path up in the manifest,
/// 4. reuse the installed bundle, or read it from the storage and hand it to
///    the first installer that accepts it,
/// 5. read the asset bytes from the installed bundle and decode them.
///
/// Every "nothing there" outcome yields `Ok(None)`. Backend errors propagate.
#[derive(Default)]
pub struct BundleLane {
    installed: DashMap<InstallKey, Arc<dyn InstalledBundle>>,
}

impl BundleLane {
    /// Creates a lane with no installed bundles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bundles installed so far.
    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Returns `true` if `entry` of `storage` has already been installed.
    pub fn is_installed(&self, storage: &str, entry: &BundleEntry) -> bool {
        self.installed.contains_key(&InstallKey::new(storage, entry))
    }

    /// Runs the whole chain for `request` against `storage_name`.
    pub async fn load(
        &self,
        storage_name: &str,
        request: &AssetRequest<'_>,
        backends: &dyn BackendSet,
        decoders: &DecoderRegistry,
        progress: &dyn LoadProgress,
    ) -> Result<Option<ErasedAsset>, BackendError> {
        let Some(storage) = backends.find_storage(storage_name) else {
            log::warn!("BundleLane: no storage named '{storage_name}' is registered");
            return Ok(None);
        };

        let Some(manifest) = Self::fetch_manifest(storage.as_ref(), backends).await? else {
            log::warn!("BundleLane: no manifest available for storage '{storage_name}'");
            return Ok(None);
        };
        progress.report(0.25);

        let Some(entry) = manifest.entry_for(request.path()) else {
            log::debug!(
                "BundleLane: '{}' is not listed in the manifest of '{storage_name}'",
                request.path()
            );
            return Ok(None);
        };

        let Some(bundle) = self.ensure_installed(storage, entry, backends).await? else {
            return Ok(None);
        };
        progress.report(0.5);

        let Some(bytes) = bundle.read(request.path()).await? else {
            log::warn!(
                "BundleLane: bundle '{}' does not contain '{}' despite its manifest",
                entry.bundle,
                request.path()
            );
            return Ok(None);
        };
        progress.report(0.75);

        let asset = decoders.decode(request, &bytes)?;
        progress.report(1.0);

        Ok(Some(asset))
    }

    async fn fetch_manifest(
        storage: &dyn Storage,
        backends: &dyn BackendSet,
    ) -> Result<Option<BundleManifest>, BackendError> {
        for fetcher in backends.manifest_fetchers() {
            let Some(manifest) = fetcher.fetch_manifest(storage).await? else {
                continue;
            };
            if manifest.storage() != storage.name() {
                log::warn!(
                    "BundleLane: fetcher '{}' returned a manifest for '{}' when asked for '{}', skipping",
                    fetcher.name(),
                    manifest.storage(),
                    storage.name()
                );
                continue;
            }
            log::debug!(
                "BundleLane: manifest for '{}' from '{}' ({} entries)",
                storage.name(),
                fetcher.name(),
                manifest.len()
            );
            return Ok(Some(manifest));
        }
        Ok(None)
    }

    async fn ensure_installed(
        &self,
        storage: &Arc<dyn Storage>,
        entry: &BundleEntry,
        backends: &dyn BackendSet,
    ) -> Result<Option<Arc<dyn InstalledBundle>>, BackendError> {
        let key = InstallKey::new(storage.name(), entry);
        if let Some(installed) = self.installed.get(&key) {
            return Ok(Some(installed.value().clone()));
        }

        let Some(installer) = backends.find_installer(entry) else {
            log::warn!(
                "BundleLane: no installer accepts bundle '{}' (format '{}')",
                entry.bundle,
                entry.format
            );
            return Ok(None);
        };

        let Some(bytes) = storage.read_bundle(&entry.bundle).await? else {
            log::warn!(
                "BundleLane: storage '{}' has no bundle '{}'",
                storage.name(),
                entry.bundle
            );
            return Ok(None);
        };

        let installed = installer.install(storage.as_ref(), entry, bytes).await?;
        log::info!(
            "BundleLane: installed '{}' v{} from '{}' with '{}'",
            entry.bundle,
            entry.version,
            storage.name(),
            installer.name()
        );

        // Keep whichever install landed first so every caller shares it.
        let installed = self.installed.entry(key).or_insert(installed);
        Ok(Some(installed.value().clone()))
    }
}

