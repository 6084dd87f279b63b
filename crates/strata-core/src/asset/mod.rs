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

//! Provides the foundational traits and primitive types for the asset system.
//!
//! The key components are:
//! - The [`Asset`] trait: A marker for all types that can be treated as assets.
//! - [`AssetHandle`]: the shared, typed reference handed back to callers.
//! - [`UriDescriptor`]: the parsed, cache-stable form of an asset identifier.

mod handle;
mod uri;

pub use handle::*;
pub use uri::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce critical safety guarantees:
/// - `Send` + `Sync`: The asset type can be safely shared and sent between threads.
///   Loads complete on whatever task the runtime schedules them on.
/// - `'static`: The asset type does not contain any non-static references, ensuring
///   it can be stored in the result cache for the lifetime of the service.
///
/// # Examples
///
/// ```
/// use strata_core::asset::Asset;
///
/// struct Texture {
///     width: u32,
///     height: u32,
/// }
///
/// impl Asset for Texture {}
/// ```
pub trait Asset: Send + Sync + 'static {}

impl Asset for Vec<u8> {}
impl Asset for String {}
