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

//! # Strata Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! shared by the asset resolution service.
//!
//! Nothing in here knows how assets are fetched or cached. The crate only
//! defines the "common language": asset handles, parsed URI descriptors, the
//! backend collaborator traits, and the load strategy contract the
//! orchestrator dispatches to.

#![warn(missing_docs)]

pub mod asset;
pub mod backend;
pub mod error;
pub mod progress;
pub mod strategy;

pub use error::{AssetError, AssetResult};
