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

//! # Strata Lanes
//!
//! The hot-path workers behind the default [`LoadStrategy`](strata_core::strategy::LoadStrategy):
//! a lane that serves in-process resources, a lane that walks the registered
//! backends to pull an asset out of a bundle, and the decoder registry both
//! of them use to turn bytes into typed assets.

#![warn(missing_docs)]

pub mod asset_lane;
pub mod bundle_lane;
pub mod error;
pub mod strategy;

pub use asset_lane::{AssetDecoder, DecoderRegistry, ResourceLane};
pub use bundle_lane::BundleLane;
pub use error::LaneError;
pub use strategy::LaneLoadStrategy;
