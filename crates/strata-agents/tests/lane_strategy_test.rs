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

use anyhow::Result;
use std::sync::Arc;
use strata_agents::{AssetService, AssetServiceConfig};
use strata_core::asset::AssetHandle;
use strata_core::backend::{BundleEntry, BundleManifest};
use strata_lanes::asset_lane::{BytesDecoder, Utf8Decoder};
use strata_lanes::bundle_lane::{
    ArchiveInstaller, BundleArchive, MemoryStorage, StaticManifestFetcher, ARCHIVE_FORMAT,
};
use strata_lanes::LaneLoadStrategy;
use strata_telemetry::MetricsRegistry;
use tempfile::tempdir;

#[tokio::test]
async fn test_service_over_lane_strategy() -> Result<()> {
    strata_telemetry::logging::init_logging_with("debug");

    // --- 1. Setup: a RON config on disk ---
    let dir = tempdir()?;
    let config_path = dir.path().join("assets.ron");
    std::fs::write(&config_path, "(single_flight: true, result_cache_capacity: Some(16))")?;
    let config = AssetServiceConfig::load(&config_path)?;

    // --- 2. Build the strategy and the service ---
    let metrics = MetricsRegistry::new();
    let strategy = LaneLoadStrategy::with_metrics(&metrics)?
        .with_decoder::<String>(Utf8Decoder)
        .with_decoder::<Vec<u8>>(BytesDecoder)
        .with_resource("shaders/blit", "fn main() {}");
    let mut service = AssetService::with_config(Arc::new(strategy), config, metrics.clone())?;

    // --- 3. Register the bundle backends ---
    let archive = BundleArchive::new()
        .with_file("icons/play", vec![0x89, 0x50, 0x4e, 0x47])
        .to_bytes()?;
    let storage = Arc::new(MemoryStorage::new("bundleA").with_bundle("icons", archive));
    let installer = Arc::new(ArchiveInstaller::new());
    let manifest = BundleManifest::new("bundleA")
        .with_entry("icons/play", BundleEntry::new("icons", 3, ARCHIVE_FORMAT));

    service.add_manifest_fetcher(Arc::new(StaticManifestFetcher::new().with_manifest(manifest)))?;
    service.add_storage(storage.clone())?;
    service.add_installer(installer.clone())?;

    // --- 4. Load from both lanes, twice ---
    let shader = service.load_asset::<String>("resources://shaders/blit").await?;
    assert_eq!(shader.as_str(), "fn main() {}");

    let icon = service.load_asset::<Vec<u8>>("bundleA://icons/play").await?;
    assert_eq!(icon.as_slice(), &[0x89, 0x50, 0x4e, 0x47]);

    let again = service.load_asset::<Vec<u8>>("bundleA://icons/play").await?;
    assert!(AssetHandle::ptr_eq(&icon, &again));

    // --- 5. Verify backend usage and counters ---
    assert_eq!(storage.read_count(), 1);
    assert_eq!(installer.install_count(), 1);

    let stats = service.stats();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 2);
    assert_eq!(stats.cached_assets, 2);
    assert_eq!(metrics.namespace_metrics("assets").len(), 7);

    // --- 6. Unknown paths fail without touching the cache ---
    let missing = service.load_asset::<String>("resources://shaders/missing").await;
    assert!(missing.is_err());
    assert_eq!(service.stats().cached_assets, 2);

    Ok(())
}
