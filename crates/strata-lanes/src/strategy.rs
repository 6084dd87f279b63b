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

//! The default [`LoadStrategy`], composed from the resource and bundle lanes.

use crate::{
    asset_lane::{AssetDecoder, DecoderRegistry, ResourceLane},
    bundle_lane::BundleLane,
};
use async_trait::async_trait;
use strata_core::{
    asset::{Asset, ErasedAsset},
    backend::BackendSet,
    error::BackendError,
    progress::LoadProgress,
    strategy::{AssetRequest, LoadStrategy},
};
use strata_telemetry::{MetricsRegistry, MetricsResult};

/// Serves `resources://` requests from a [`ResourceLane`] and everything
/// else from a [`BundleLane`], decoding through one shared [`DecoderRegistry`].
#[derive(Default)]
pub struct LaneLoadStrategy {
    decoders: DecoderRegistry,
    resources: ResourceLane,
    bundles: BundleLane,
}

impl LaneLoadStrategy {
    /// Creates a strategy with no decoders and no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`new`](Self::new), recording decode metrics in `metrics`.
    pub fn with_metrics(metrics: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            decoders: DecoderRegistry::with_metrics(metrics)?,
            ..Self::default()
        })
    }

    /// Registers the decoder used for assets of type `A`.
    pub fn register_decoder<A: Asset>(&mut self, decoder: impl AssetDecoder<A> + 'static) {
        self.decoders.register(decoder);
    }

    /// Builder-style [`register_decoder`](Self::register_decoder).
    pub fn with_decoder<A: Asset>(mut self, decoder: impl AssetDecoder<A> + 'static) -> Self {
        self.register_decoder(decoder);
        self
    }

    /// Registers an in-process resource at `path`.
    pub fn register_resource(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.resources.register(path, bytes);
    }

    /// Builder-style [`register_resource`](Self::register_resource).
    pub fn with_resource(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.register_resource(path, bytes);
        self
    }

    /// The decoder registry.
    pub fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    /// The resource lane.
    pub fn resources(&self) -> &ResourceLane {
        &self.resources
    }

    /// The bundle lane.
    pub fn bundles(&self) -> &BundleLane {
        &self.bundles
    }
}

#[async_trait]
impl LoadStrategy for LaneLoadStrategy {
    async fn load_from_resources(
        &self,
        request: &AssetRequest<'_>,
        progress: &dyn LoadProgress,
    ) -> Result<Option<ErasedAsset>, BackendError> {
        Ok(self.resources.load(request, &self.decoders, progress)?)
    }

    async fn load_from_bundle(
        &self,
        storage_name: &str,
        request: &AssetRequest<'_>,
        backends: &dyn BackendSet,
        progress: &dyn LoadProgress,
    ) -> Result<Option<ErasedAsset>, BackendError> {
        self.bundles
            .load(storage_name, request, backends, &self.decoders, progress)
            .await
    }
}
