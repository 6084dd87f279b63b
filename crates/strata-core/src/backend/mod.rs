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

//! Contracts for the pluggable backend collaborators.
//!
//! The orchestrator never calls these directly. It registers them by identity
//! and hands the whole set to the bundle load strategy, which decides how to
//! chain them together. Concrete implementations (HTTP fetchers, disk
//! storages, archive installers) live outside this crate.

mod manifest;

pub use manifest::*;

use crate::error::BackendError;
use async_trait::async_trait;
use std::sync::Arc;

/// Retrieves and validates the manifest that describes a storage's bundles.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    /// A human readable name, used in logs and registration errors.
    fn name(&self) -> &str;

    /// Fetches the manifest for `storage`.
    ///
    /// Returns `Ok(None)` when this fetcher does not know the storage, so the
    /// next registered fetcher gets a chance.
    async fn fetch_manifest(
        &self,
        storage: &dyn Storage,
    ) -> Result<Option<BundleManifest>, BackendError>;
}

/// A named source of raw bundle data.
#[async_trait]
pub trait Storage: Send + Sync {
    /// The storage name. URIs select a storage through their host segment.
    fn name(&self) -> &str;

    /// Reads the raw bytes of `bundle`, or `Ok(None)` if the storage lacks it.
    async fn read_bundle(&self, bundle: &str) -> Result<Option<Vec<u8>>, BackendError>;
}

/// Turns fetched bundle bytes into a locally usable [`InstalledBundle`].
#[async_trait]
pub trait Installer: Send + Sync {
    /// A human readable name, used in logs and registration errors.
    fn name(&self) -> &str;

    /// Returns `true` if this installer understands the bundle in `entry`.
    fn can_install(&self, entry: &BundleEntry) -> bool;

    /// Materializes the bundle read from `storage`.
    async fn install(
        &self,
        storage: &dyn Storage,
        entry: &BundleEntry,
        bytes: Vec<u8>,
    ) -> Result<Arc<dyn InstalledBundle>, BackendError>;
}

/// A bundle that has been installed and can serve individual assets.
#[async_trait]
pub trait InstalledBundle: Send + Sync {
    /// Reads the bytes stored under `path`, or `Ok(None)` if absent.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, BackendError>;
}

/// A read-only view over the registered backend collections.
///
/// Iteration order is registration order.
pub trait BackendSet: Send + Sync {
    /// All registered manifest fetchers.
    fn manifest_fetchers(&self) -> &[Arc<dyn ManifestFetcher>];

    /// All registered storages.
    fn storages(&self) -> &[Arc<dyn Storage>];

    /// All registered installers.
    fn installers(&self) -> &[Arc<dyn Installer>];

    /// Finds the first storage whose name equals `name`.
    fn find_storage(&self, name: &str) -> Option<&Arc<dyn Storage>> {
        self.storages().iter().find(|s| s.name() == name)
    }

    /// Finds the first installer able to handle `entry`.
    fn find_installer(&self, entry: &BundleEntry) -> Option<&Arc<dyn Installer>> {
        self.installers().iter().find(|i| i.can_install(entry))
    }
}
