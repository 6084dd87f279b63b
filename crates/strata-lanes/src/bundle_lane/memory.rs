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

//! In-memory backend collaborators.
//!
//! These are complete, if simple, implementations of the backend traits.
//! They back tests and demos, and are a starting point for embedding
//! pre-built bundles directly in a binary.

use crate::error::LaneError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use strata_core::{
    backend::{BundleEntry, BundleManifest, InstalledBundle, Installer, ManifestFetcher, Storage},
    error::BackendError,
};

/// The format tag understood by [`ArchiveInstaller`].
pub const ARCHIVE_FORMAT: &str = "strata-archive";

/// A storage whose bundles live in a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    name: String,
    bundles: HashMap<String, Vec<u8>>,
    reads: AtomicUsize,
}

impl MemoryStorage {
    /// Creates an empty storage named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds (or replaces) the raw bytes of `bundle`.
    pub fn with_bundle(mut self, bundle: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.bundles.insert(bundle.into(), bytes);
        self
    }

    /// How many times a bundle was read.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_bundle(&self, bundle: &str) -> Result<Option<Vec<u8>>, BackendError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.bundles.get(bundle).cloned())
    }
}

/// A fetcher that serves manifests registered up front, keyed by storage name.
#[derive(Debug, Default)]
pub struct StaticManifestFetcher {
    manifests: HashMap<String, BundleManifest>,
}

impl StaticManifestFetcher {
    /// Creates a fetcher that knows no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the manifest of `manifest.storage()`.
    pub fn with_manifest(mut self, manifest: BundleManifest) -> Self {
        self.manifests
            .insert(manifest.storage().to_string(), manifest);
        self
    }
}

#[async_trait]
impl ManifestFetcher for StaticManifestFetcher {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_manifest(
        &self,
        storage: &dyn Storage,
    ) -> Result<Option<BundleManifest>, BackendError> {
        Ok(self.manifests.get(storage.name()).cloned())
    }
}

/// A flat path → bytes archive, encoded with bincode.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleArchive {
    files: HashMap<String, Vec<u8>>,
}

impl BundleArchive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the file at `path`.
    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    /// Encodes the archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
    }

    /// Decodes an archive produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (archive, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(archive)
    }

    /// Number of files in the archive.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the archive holds no file.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// An installed [`BundleArchive`], held fully in memory.
#[derive(Debug)]
pub struct MemoryBundle {
    archive: BundleArchive,
}

#[async_trait]
impl InstalledBundle for MemoryBundle {
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.archive.files.get(path).cloned())
    }
}

/// Installs bundles tagged [`ARCHIVE_FORMAT`] by decoding them into memory.
#[derive(Debug, Default)]
pub struct ArchiveInstaller {
    installs: AtomicUsize,
}

impl ArchiveInstaller {
    /// Creates a new installer.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many bundles were installed.
    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Installer for ArchiveInstaller {
    fn name(&self) -> &str {
        "archive"
    }

    fn can_install(&self, entry: &BundleEntry) -> bool {
        entry.format == ARCHIVE_FORMAT
    }

    async fn install(
        &self,
        _storage: &dyn Storage,
        entry: &BundleEntry,
        bytes: Vec<u8>,
    ) -> Result<Arc<dyn InstalledBundle>, BackendError> {
        let archive = BundleArchive::from_bytes(&bytes).map_err(|e| LaneError::Archive {
            bundle: entry.bundle.clone(),
            reason: e.to_string(),
        })?;
        self.installs.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(MemoryBundle { archive }))
    }
}
