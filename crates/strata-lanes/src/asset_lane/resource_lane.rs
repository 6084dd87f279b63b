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

use super::DecoderRegistry;
use crate::error::LaneError;
use std::{collections::HashMap, sync::Arc};
use strata_core::{asset::ErasedAsset, progress::LoadProgress, strategy::AssetRequest};

/// A "Lane" that serves assets compiled into, or registered by, the process.
///
/// Resources are plain byte blobs keyed by path. They are registered during
/// setup and decoded on demand through the shared [`DecoderRegistry`].
#[derive(Debug, Default)]
pub struct ResourceLane {
    resources: HashMap<String, Arc<[u8]>>,
}

impl ResourceLane {
    /// Creates an empty resource table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bytes of the resource at `path`, replacing any previous blob.
    pub fn register(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let path = path.into();
        let bytes: Arc<[u8]> = Arc::from(bytes.into());
        log::debug!("ResourceLane: registered '{}' ({} bytes)", path, bytes.len());
        self.resources.insert(path, bytes);
    }

    /// Returns `true` if a resource is registered at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.resources.contains_key(path)
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if no resource is registered.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Decodes the resource at the request path.
    ///
    /// Returns `Ok(None)` when no resource is registered there.
    pub fn load(
        &self,
        request: &AssetRequest<'_>,
        decoders: &DecoderRegistry,
        progress: &dyn LoadProgress,
    ) -> Result<Option<ErasedAsset>, LaneError> {
        let Some(bytes) = self.resources.get(request.path()) else {
            log::debug!("ResourceLane: no resource at '{}'", request.path());
            return Ok(None);
        };

        progress.report(0.5);
        let asset = decoders.decode(request, bytes)?;
        progress.report(1.0);

        Ok(Some(asset))
    }
}
