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

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strata_core::{
    asset::{ErasedAsset, UriDescriptor},
    backend::{BundleEntry, BundleManifest, ManifestFetcher, Storage},
    error::BackendError,
    progress::LoadProgress,
    strategy::{AssetRequest, LoadStrategy},
};
use strata_data::BackendRegistry;
use strata_lanes::bundle_lane::{
    ArchiveInstaller, BundleArchive, MemoryStorage, StaticManifestFetcher, ARCHIVE_FORMAT,
};
use strata_lanes::{asset_lane::Utf8Decoder, LaneLoadStrategy};

// --- Test Setup: in-memory bundle backends ---

fn icons_archive() -> Vec<u8> {
    BundleArchive::new()
        .with_file("icons/play", "play-icon")
        .with_file("icons/stop", "stop-icon")
        .to_bytes()
        .unwrap()
}

fn icons_manifest(storage: &str) -> BundleManifest {
    BundleManifest::new(storage)
        .with_entry("icons/play", BundleEntry::new("icons", 1, ARCHIVE_FORMAT))
        .with_entry("icons/stop", BundleEntry::new("icons", 1, ARCHIVE_FORMAT))
        .with_entry("icons/ghost", BundleEntry::new("icons", 1, ARCHIVE_FORMAT))
}

struct Setup {
    registry: BackendRegistry,
    storage: Arc<MemoryStorage>,
    installer: Arc<ArchiveInstaller>,
}

fn setup() -> Setup {
    let storage = Arc::new(MemoryStorage::new("bundleA").with_bundle("icons", icons_archive()));
    let installer = Arc::new(ArchiveInstaller::new());

    let mut registry = BackendRegistry::new();
    registry
        .add_manifest_fetcher(Arc::new(
            StaticManifestFetcher::new().with_manifest(icons_manifest("bundleA")),
        ))
        .unwrap();
    registry.add_storage(storage.clone()).unwrap();
    registry.add_installer(installer.clone()).unwrap();

    Setup {
        registry,
        storage,
        installer,
    }
}

fn strategy() -> LaneLoadStrategy {
    LaneLoadStrategy::new().with_decoder::<String>(Utf8Decoder)
}

fn as_string(asset: ErasedAsset) -> String {
    asset.downcast_ref::<String>().unwrap().clone()
}

#[derive(Default)]
struct RecordingProgress(Mutex<Vec<f32>>);

impl LoadProgress for RecordingProgress {
    fn report(&self, fraction: f32) {
        self.0.lock().unwrap().push(fraction);
    }
}

async fn load(
    strategy: &LaneLoadStrategy,
    registry: &BackendRegistry,
    uri: &str,
    progress: &dyn LoadProgress,
) -> Result<Option<ErasedAsset>, BackendError> {
    let descriptor = UriDescriptor::parse(uri).unwrap();
    let request = AssetRequest::of::<String>(&descriptor);
    strategy
        .load_from_bundle(descriptor.host(), &request, registry, progress)
        .await
}

// --- Tests ---

#[tokio::test]
async fn test_full_chain_reports_progress_in_order() {
    let Setup { registry, .. } = setup();
    let strategy = strategy();
    let progress = RecordingProgress::default();

    let asset = load(&strategy, &registry, "bundleA://icons/play", &progress)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(as_string(asset), "play-icon");
    assert_eq!(*progress.0.lock().unwrap(), vec![0.25, 0.5, 0.75, 1.0]);
}

#[tokio::test]
async fn test_bundle_is_installed_once() {
    let Setup {
        registry,
        storage,
        installer,
    } = setup();
    let strategy = strategy();

    for uri in ["bundleA://icons/play", "bundleA://icons/stop", "bundleA://icons/play"] {
        let asset = load(&strategy, &registry, uri, &|_: f32| {}).await.unwrap();
        assert!(asset.is_some(), "{uri} should load");
    }

    assert_eq!(installer.install_count(), 1);
    assert_eq!(storage.read_count(), 1);
    assert_eq!(strategy.bundles().installed_count(), 1);
    assert!(strategy
        .bundles()
        .is_installed("bundleA", &BundleEntry::new("icons", 1, ARCHIVE_FORMAT)));
}

#[tokio::test]
async fn test_not_found_steps_yield_none() {
    let Setup { registry, .. } = setup();
    let strategy = strategy();

    // Unknown storage.
    assert!(load(&strategy, &registry, "bundleB://icons/play", &|_: f32| {})
        .await
        .unwrap()
        .is_none());
    // Path missing from the manifest.
    assert!(load(&strategy, &registry, "bundleA://icons/pause", &|_: f32| {})
        .await
        .unwrap()
        .is_none());
    // Listed in the manifest but absent from the bundle.
    assert!(load(&strategy, &registry, "bundleA://icons/ghost", &|_: f32| {})
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_missing_installer_yields_none() {
    let storage = Arc::new(MemoryStorage::new("bundleA").with_bundle("icons", icons_archive()));
    let mut registry = BackendRegistry::new();
    registry
        .add_manifest_fetcher(Arc::new(
            StaticManifestFetcher::new().with_manifest(icons_manifest("bundleA")),
        ))
        .unwrap();
    registry.add_storage(storage.clone()).unwrap();

    let asset = load(&strategy(), &registry, "bundleA://icons/play", &|_: f32| {})
        .await
        .unwrap();

    assert!(asset.is_none());
    assert_eq!(storage.read_count(), 0);
}

/// A fetcher that answers every storage with a manifest for `bundleB`.
struct MisdirectedFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ManifestFetcher for MisdirectedFetcher {
    fn name(&self) -> &str {
        "misdirected"
    }

    async fn fetch_manifest(
        &self,
        _storage: &dyn Storage,
    ) -> Result<Option<BundleManifest>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(icons_manifest("bundleB")))
    }
}

#[tokio::test]
async fn test_manifest_for_another_storage_is_skipped() {
    let misdirected = Arc::new(MisdirectedFetcher {
        calls: AtomicUsize::new(0),
    });
    let mut registry = BackendRegistry::new();
    registry.add_manifest_fetcher(misdirected.clone()).unwrap();
    registry
        .add_storage(Arc::new(
            MemoryStorage::new("bundleA").with_bundle("icons", icons_archive()),
        ))
        .unwrap();
    registry.add_installer(Arc::new(ArchiveInstaller::new())).unwrap();

    let strategy = strategy();
    let asset = load(&strategy, &registry, "bundleA://icons/play", &|_: f32| {})
        .await
        .unwrap();
    assert!(asset.is_none());
    assert_eq!(misdirected.calls.load(Ordering::SeqCst), 1);

    // A later fetcher with the right manifest still wins.
    registry
        .add_manifest_fetcher(Arc::new(
            StaticManifestFetcher::new().with_manifest(icons_manifest("bundleA")),
        ))
        .unwrap();
    let asset = load(&strategy, &registry, "bundleA://icons/play", &|_: f32| {})
        .await
        .unwrap();
    assert_eq!(as_string(asset.unwrap()), "play-icon");
}

#[derive(Debug)]
struct OfflineStorage;

#[async_trait]
impl Storage for OfflineStorage {
    fn name(&self) -> &str {
        "cdn"
    }

    async fn read_bundle(&self, _bundle: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Err("connection refused".into())
    }
}

#[tokio::test]
async fn test_storage_error_propagates() {
    let mut registry = BackendRegistry::new();
    registry
        .add_manifest_fetcher(Arc::new(
            StaticManifestFetcher::new().with_manifest(icons_manifest("cdn")),
        ))
        .unwrap();
    registry.add_storage(Arc::new(OfflineStorage)).unwrap();
    registry.add_installer(Arc::new(ArchiveInstaller::new())).unwrap();

    let strategy = strategy();
    let err = load(&strategy, &registry, "cdn://icons/play", &|_: f32| {})
        .await
        .err()
        .unwrap();

    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(strategy.bundles().installed_count(), 0);
}

#[tokio::test]
async fn test_missing_decoder_is_an_error() {
    let Setup { registry, .. } = setup();
    let strategy = LaneLoadStrategy::new();

    let err = load(&strategy, &registry, "bundleA://icons/play", &|_: f32| {})
        .await
        .err()
        .unwrap();

    assert!(err.to_string().contains("String"), "{err}");
}
