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

use super::Asset;
use std::{any::Any, fmt, ops::Deref, sync::Arc};

/// A type-erased, shared reference to a loaded asset.
///
/// This is what load strategies produce and what the result cache stores.
/// It is turned back into an [`AssetHandle`] by [`AssetHandle::from_erased`].
pub type ErasedAsset = Arc<dyn Any + Send + Sync>;

/// A thread-safe, reference-counted handle to a loaded asset.
///
/// This acts as a smart pointer, providing shared ownership of an asset's data.
/// Cloning a handle is cheap, as it only increments the reference count
/// and does not duplicate the underlying asset data.
///
/// The result cache keeps one clone alive for as long as its entry exists.
pub struct AssetHandle<T: Asset>(Arc<T>);

impl<T: Asset> AssetHandle<T> {
    /// Creates a new `AssetHandle` that takes ownership of the asset data.
    pub fn new(asset: T) -> Self {
        Self(Arc::new(asset))
    }

    /// Wraps an already shared asset.
    pub fn from_arc(asset: Arc<T>) -> Self {
        Self(asset)
    }

    /// Recovers a typed handle from an erased one.
    ///
    /// Gives the erased value back untouched when it holds a different type.
    pub fn from_erased(erased: ErasedAsset) -> Result<Self, ErasedAsset> {
        erased.downcast::<T>().map(Self)
    }

    /// Erases the asset type so the handle can live in a heterogeneous cache.
    pub fn into_erased(self) -> ErasedAsset {
        self.0
    }

    /// Returns `true` if both handles point at the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Number of live handles (including the cached one) sharing this asset.
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }
}

impl<T: Asset> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Asset> Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Asset + fmt::Debug> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetHandle").field(&*self.0).finish()
    }
}
