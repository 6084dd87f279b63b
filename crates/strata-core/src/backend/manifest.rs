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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Locates one bundle inside a storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleEntry {
    /// The bundle name, as understood by [`Storage::read_bundle`](super::Storage::read_bundle).
    pub bundle: String,
    /// Monotonic bundle revision. A new revision is installed separately.
    pub version: u32,
    /// A free-form format tag installers use to claim the bundle.
    pub format: String,
}

impl BundleEntry {
    /// Creates an entry for `bundle` at `version` in the given `format`.
    pub fn new(bundle: impl Into<String>, version: u32, format: impl Into<String>) -> Self {
        Self {
            bundle: bundle.into(),
            version,
            format: format.into(),
        }
    }
}

/// The in-memory index of a storage: which bundle holds which asset path.
///
/// How the index is serialized on the wire is up to the
/// [`ManifestFetcher`](super::ManifestFetcher) that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    storage: String,
    entries: HashMap<String, BundleEntry>,
}

impl BundleManifest {
    /// Creates an empty manifest for `storage`.
    pub fn new(storage: impl Into<String>) -> Self {
        Self {
            storage: storage.into(),
            entries: HashMap::new(),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entry(mut self, path: impl Into<String>, entry: BundleEntry) -> Self {
        self.insert(path, entry);
        self
    }

    /// Maps an asset path to the bundle that contains it.
    pub fn insert(&mut self, path: impl Into<String>, entry: BundleEntry) {
        self.entries.insert(path.into(), entry);
    }

    /// The storage this manifest describes.
    pub fn storage(&self) -> &str {
        &self.storage
    }

    /// The bundle that contains `path`, if any.
    pub fn entry_for(&self, path: &str) -> Option<&BundleEntry> {
        self.entries.get(path)
    }

    /// Number of indexed asset paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the manifest indexes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lookup() {
        let manifest = BundleManifest::new("bundleA")
            .with_entry("icons/play", BundleEntry::new("icons", 2, "bin"))
            .with_entry("icons/stop", BundleEntry::new("icons", 2, "bin"));

        assert_eq!(manifest.storage(), "bundleA");
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entry_for("icons/play").unwrap().bundle, "icons");
        assert!(manifest.entry_for("icons/pause").is_none());
    }
}
