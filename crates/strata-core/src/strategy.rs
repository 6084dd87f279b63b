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

//! The load strategy contract the orchestrator dispatches to.

use crate::{
    asset::{Asset, ErasedAsset, UriDescriptor},
    backend::BackendSet,
    error::BackendError,
    progress::LoadProgress,
};
use async_trait::async_trait;
use std::any::{type_name, TypeId};

/// Everything a strategy needs to know about one asset request.
#[derive(Debug, Clone, Copy)]
pub struct AssetRequest<'a> {
    descriptor: &'a UriDescriptor,
    type_id: TypeId,
    type_name: &'static str,
}

impl<'a> AssetRequest<'a> {
    /// Builds a request for an asset of type `A`.
    pub fn of<A: Asset>(descriptor: &'a UriDescriptor) -> Self {
        Self {
            descriptor,
            type_id: TypeId::of::<A>(),
            type_name: type_name::<A>(),
        }
    }

    /// The resolved identifier.
    pub fn descriptor(&self) -> &'a UriDescriptor {
        self.descriptor
    }

    /// Shorthand for `descriptor().path()`.
    pub fn path(&self) -> &'a str {
        self.descriptor.path()
    }

    /// The [`TypeId`] of the requested asset type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The requested asset type's name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// The two ways an asset can be produced.
///
/// Both methods return `Ok(None)` for "not found" rather than an error. The
/// orchestrator turns that into [`AssetError::AssetLoadFailure`](crate::AssetError::AssetLoadFailure).
/// Errors are reserved for collaborator failures and are propagated as-is.
#[async_trait]
pub trait LoadStrategy: Send + Sync {
    /// Loads an asset from the in-process resource table.
    async fn load_from_resources(
        &self,
        request: &AssetRequest<'_>,
        progress: &dyn LoadProgress,
    ) -> Result<Option<ErasedAsset>, BackendError>;

    /// Loads an asset out of a bundle held by the storage named `storage_name`.
    async fn load_from_bundle(
        &self,
        storage_name: &str,
        request: &AssetRequest<'_>,
        backends: &dyn BackendSet,
        progress: &dyn LoadProgress,
    ) -> Result<Option<ErasedAsset>, BackendError>;
}
