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

//! # Strata Data
//!
//! The stateful containers behind the asset service: the URI descriptor
//! cache, the loaded-asset result cache, and the identity-keyed backend
//! registries.

#![warn(missing_docs)]

pub mod registry;
pub mod result_cache;
pub mod uri_cache;

pub use registry::{BackendCollection, BackendId, BackendRegistry};
pub use result_cache::AssetResultCache;
pub use uri_cache::UriResolver;
