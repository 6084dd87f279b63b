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

//! Acts as the agent for the asset subsystem.
//!
//! This module holds the tactical logic of asset loading: it owns the
//! descriptor and result caches and the backend registry, and decides for
//! each request which lane of the load strategy runs. The heavy lifting
//! (fetching, installing, decoding) is delegated to the strategy.

mod agent;
mod config;
mod in_flight;
mod metrics;

pub use agent::AssetService;
pub use config::AssetServiceConfig;
pub use metrics::AssetServiceStats;
