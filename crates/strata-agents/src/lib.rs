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

//! # Strata Agents
//!
//! The public face of the asset system. [`AssetService`] resolves asset
//! identifiers, serves repeated requests from its caches, and dispatches
//! misses to a [`LoadStrategy`](strata_core::strategy::LoadStrategy).

#![warn(missing_docs)]

pub mod asset_agent;

pub use asset_agent::{AssetService, AssetServiceConfig, AssetServiceStats};
