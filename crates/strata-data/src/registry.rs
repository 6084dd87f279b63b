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

//! Identity-keyed registries for the backend collaborators.
//!
//! Duplicates are detected by reference identity (the address of the shared
//! allocation), never by value, so two distinct backends that happen to
//! compare equal are both accepted.

use std::collections::HashSet;
use std::sync::Arc;
use strata_core::{
    asset::RESOURCES_HOST,
    backend::{BackendSet, Installer, ManifestFetcher, Storage},
    error::BackendKind,
    AssetError, AssetResult,
};

/// A stable identity token for a registered backend object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendId(usize);

impl BackendId {
    /// The identity of the object `backend` points at.
    pub fn of<T: ?Sized>(backend: &Arc<T>) -> Self {
        Self(Arc::as_ptr(backend) as *const () as usize)
    }
}

/// An append-only, ordered collection that rejects repeated objects.
pub struct BackendCollection<T: ?Sized> {
    kind: BackendKind,
    items: Vec<Arc<T>>,
    ids: HashSet<BackendId>,
}

impl<T: ?Sized> BackendCollection<T> {
    /// Creates an empty collection for `kind` backends.
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Appends `backend` unless this exact object is already present.
    ///
    /// `name` is only used for diagnostics.
    pub fn add(&mut self, backend: Arc<T>, name: &str) -> AssetResult<()> {
        if !self.ids.insert(BackendId::of(&backend)) {
            return Err(AssetError::DuplicateRegistration {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        self.items.push(backend);
        log::info!("Registered {} '{}' (#{})", self.kind, name, self.items.len());
        Ok(())
    }

    /// Returns `true` if this exact object is registered.
    pub fn contains(&self, backend: &Arc<T>) -> bool {
        self.ids.contains(&BackendId::of(backend))
    }

    /// The registered backends, in registration order.
    pub fn as_slice(&self) -> &[Arc<T>] {
        &self.items
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The three backend collections the bundle strategy draws from.
///
/// Registration needs `&mut self`; it is expected to happen during setup,
/// before the registry is shared with concurrent loads.
pub struct BackendRegistry {
    resources_host: String,
    manifest_fetchers: BackendCollection<dyn ManifestFetcher>,
    storages: BackendCollection<dyn Storage>,
    installers: BackendCollection<dyn Installer>,
}

impl BackendRegistry {
    /// Creates an empty registry that reserves the default resources host.
    pub fn new() -> Self {
        Self::with_resources_host(RESOURCES_HOST)
    }

    /// Creates an empty registry that reserves `resources_host`.
    pub fn with_resources_host(resources_host: impl Into<String>) -> Self {
        Self {
            resources_host: resources_host.into(),
            manifest_fetchers: BackendCollection::new(BackendKind::ManifestFetcher),
            storages: BackendCollection::new(BackendKind::Storage),
            installers: BackendCollection::new(BackendKind::Installer),
        }
    }

    /// Registers a manifest fetcher.
    pub fn add_manifest_fetcher(&mut self, fetcher: Arc<dyn ManifestFetcher>) -> AssetResult<()> {
        let name = fetcher.name().to_string();
        self.manifest_fetchers.add(fetcher, &name)
    }

    /// Registers a storage.
    ///
    /// # Errors
    /// - [`AssetError::InvalidArgument`] if the storage name is empty.
    /// - [`AssetError::ReservedStorageName`] if it equals the resources host.
    /// - [`AssetError::DuplicateRegistration`] if this object is already registered.
    pub fn add_storage(&mut self, storage: Arc<dyn Storage>) -> AssetResult<()> {
        let name = storage.name().to_string();
        if name.is_empty() {
            return Err(AssetError::InvalidArgument(
                "storage name must not be empty".to_string(),
            ));
        }
        if name == self.resources_host {
            return Err(AssetError::ReservedStorageName { name });
        }
        if !self.storages.contains(&storage) && self.find_storage(&name).is_some() {
            log::warn!("Storage '{name}' is shadowed by an earlier storage with the same name");
        }
        self.storages.add(storage, &name)
    }

    /// Registers an installer.
    pub fn add_installer(&mut self, installer: Arc<dyn Installer>) -> AssetResult<()> {
        let name = installer.name().to_string();
        self.installers.add(installer, &name)
    }

    /// The host reserved for in-process resources.
    pub fn resources_host(&self) -> &str {
        &self.resources_host
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendSet for BackendRegistry {
    fn manifest_fetchers(&self) -> &[Arc<dyn ManifestFetcher>] {
        self.manifest_fetchers.as_slice()
    }

    fn storages(&self) -> &[Arc<dyn Storage>] {
        self.storages.as_slice()
    }

    fn installers(&self) -> &[Arc<dyn Installer>] {
        self.installers.as_slice()
    }
}
