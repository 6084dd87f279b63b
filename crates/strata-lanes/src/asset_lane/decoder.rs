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

//! A registry of decoders, enabling typed decoding of erased asset bytes.

use crate::error::LaneError;
use std::{any::TypeId, collections::HashMap, error::Error, marker::PhantomData, sync::Arc};
use strata_core::{
    asset::{Asset, ErasedAsset},
    error::BackendError,
    strategy::AssetRequest,
};
use strata_telemetry::{
    CounterHandle, HistogramHandle, MetricsRegistry, MetricsResult, ScopedMetricTimer,
};

/// A trait for types that can decode a specific kind of asset from a byte slice.
///
/// This is the CPU side of loading: the lanes fetch the bytes, a decoder
/// turns them into an engine-ready value of type `A`.
pub trait AssetDecoder<A: Asset>: Send + Sync {
    /// Parses a byte slice and converts it into an instance of the asset `A`.
    fn decode(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;
}

impl<A, F> AssetDecoder<A> for F
where
    A: Asset,
    F: Fn(&[u8]) -> Result<A, Box<dyn Error + Send + Sync>> + Send + Sync,
{
    fn decode(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>> {
        self(bytes)
    }
}

/// Passes bytes through untouched as a `Vec<u8>` asset.
#[derive(Debug, Default, Clone, Copy)]
pub struct BytesDecoder;

impl AssetDecoder<Vec<u8>> for BytesDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        Ok(bytes.to_vec())
    }
}

/// Decodes UTF-8 text into a `String` asset.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Decoder;

impl AssetDecoder<String> for Utf8Decoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// Internal trait for decoding any asset type.
trait AnyDecoder: Send + Sync {
    fn decode_any(&self, bytes: &[u8]) -> Result<ErasedAsset, BackendError>;
}

/// Adapts a typed `AssetDecoder<A>` to `AnyDecoder`.
struct DecoderWrapper<A: Asset, D: AssetDecoder<A>>(D, PhantomData<fn() -> A>);

impl<A: Asset, D: AssetDecoder<A>> AnyDecoder for DecoderWrapper<A, D> {
    fn decode_any(&self, bytes: &[u8]) -> Result<ErasedAsset, BackendError> {
        let asset: A = self.0.decode(bytes)?;
        Ok(Arc::new(asset))
    }
}

struct DecoderMetrics {
    decode_time_ms: HistogramHandle,
    decoded_total: CounterHandle,
}

impl DecoderMetrics {
    fn new(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            decode_time_ms: registry.register_histogram(
                "assets",
                "decode_time",
                "Asset decoding time",
                "ms",
                vec![1.0, 5.0, 16.0, 33.0, 100.0, 500.0],
            )?,
            decoded_total: registry.register_counter(
                "assets",
                "decoded_total",
                "Total number of assets decoded",
            )?,
        })
    }
}

/// Maps Rust asset types to the decoder that produces them.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<TypeId, Box<dyn AnyDecoder>>,
    metrics: Option<DecoderMetrics>,
}

impl DecoderRegistry {
    /// Creates an empty registry without metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that records decode metrics in `metrics`.
    pub fn with_metrics(metrics: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            decoders: HashMap::new(),
            metrics: Some(DecoderMetrics::new(metrics)?),
        })
    }

    /// Registers the decoder for `A`, replacing any previous one.
    pub fn register<A: Asset>(&mut self, decoder: impl AssetDecoder<A> + 'static) {
        let wrapped = DecoderWrapper(decoder, PhantomData);
        if self
            .decoders
            .insert(TypeId::of::<A>(), Box::new(wrapped))
            .is_some()
        {
            log::debug!("Replaced decoder for {}", std::any::type_name::<A>());
        }
    }

    /// Returns `true` if a decoder for `A` is registered.
    pub fn contains<A: Asset>(&self) -> bool {
        self.decoders.contains_key(&TypeId::of::<A>())
    }

    /// Decodes `bytes` into the type named by `request`.
    pub fn decode(
        &self,
        request: &AssetRequest<'_>,
        bytes: &[u8],
    ) -> Result<ErasedAsset, LaneError> {
        let decoder =
            self.decoders
                .get(&request.type_id())
                .ok_or_else(|| LaneError::NoDecoder {
                    type_name: request.type_name(),
                })?;

        let _timer = self
            .metrics
            .as_ref()
            .map(|m| ScopedMetricTimer::new(&m.decode_time_ms));

        let asset = decoder
            .decode_any(bytes)
            .map_err(|source| LaneError::Decode {
                path: request.path().to_string(),
                type_name: request.type_name(),
                source,
            })?;

        if let Some(metrics) = &self.metrics {
            if let Err(e) = metrics.decoded_total.increment() {
                log::warn!("Failed to record decode metric: {e}");
            }
        }

        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::asset::{AssetHandle, UriDescriptor};

    #[derive(Debug, PartialEq)]
    struct TestTexture {
        id: u32,
    }
    impl Asset for TestTexture {}

    struct TestTextureDecoder;
    impl AssetDecoder<TestTexture> for TestTextureDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<TestTexture, Box<dyn Error + Send + Sync>> {
            let raw: [u8; 4] = bytes.try_into()?;
            Ok(TestTexture {
                id: u32::from_le_bytes(raw),
            })
        }
    }

    fn uri() -> UriDescriptor {
        UriDescriptor::parse("resources://textures/wall").unwrap()
    }

    #[test]
    fn test_decode_registered_type() {
        let mut registry = DecoderRegistry::new();
        registry.register(TestTextureDecoder);
        let uri = uri();

        let erased = registry
            .decode(&AssetRequest::of::<TestTexture>(&uri), &1234u32.to_le_bytes())
            .unwrap();
        let handle = AssetHandle::<TestTexture>::from_erased(erased).unwrap();
        assert_eq!(handle.id, 1234);
    }

    #[test]
    fn test_missing_decoder() {
        let registry = DecoderRegistry::new();
        let uri = uri();
        let err = registry
            .decode(&AssetRequest::of::<TestTexture>(&uri), &[])
            .unwrap_err();
        assert!(matches!(err, LaneError::NoDecoder { .. }));
    }

    #[test]
    fn test_decode_error_carries_path() {
        let mut registry = DecoderRegistry::new();
        registry.register(TestTextureDecoder);
        let uri = uri();

        let err = registry
            .decode(&AssetRequest::of::<TestTexture>(&uri), &[1, 2])
            .unwrap_err();
        match err {
            LaneError::Decode { path, .. } => assert_eq!(path, "textures/wall"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_closure_decoder_and_metrics() {
        let metrics = MetricsRegistry::new();
        let mut registry = DecoderRegistry::with_metrics(&metrics).unwrap();
        registry.register(|bytes: &[u8]| -> Result<TestTexture, Box<dyn Error + Send + Sync>> {
            Ok(TestTexture {
                id: bytes.len() as u32,
            })
        });
        registry.register(Utf8Decoder);
        assert!(registry.contains::<TestTexture>());
        assert!(registry.contains::<String>());

        let uri = uri();
        registry
            .decode(&AssetRequest::of::<TestTexture>(&uri), &[0; 3])
            .unwrap();
        registry
            .decode(&AssetRequest::of::<String>(&uri), b"hello")
            .unwrap();

        let decoded = metrics
            .register_counter("assets", "decoded_total", "")
            .unwrap();
        assert_eq!(decoded.get().unwrap(), 2);
    }
}
