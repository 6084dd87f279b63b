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

//! Errors raised inside the load lanes.

use strata_core::error::BackendError;
use thiserror::Error;

/// An error raised while decoding or unpacking asset data.
#[derive(Debug, Error)]
pub enum LaneError {
    /// No decoder was registered for the requested Rust type.
    #[error("no decoder registered for asset type '{type_name}'")]
    NoDecoder {
        /// The requested type.
        type_name: &'static str,
    },

    /// A decoder rejected the bytes.
    #[error("failed to decode '{path}' as {type_name}: {source}")]
    Decode {
        /// The asset path.
        path: String,
        /// The requested type.
        type_name: &'static str,
        /// The decoder's error.
        #[source]
        source: BackendError,
    },

    /// Bundle bytes could not be unpacked.
    #[error("malformed bundle archive '{bundle}': {reason}")]
    Archive {
        /// The bundle name.
        bundle: String,
        /// What went wrong.
        reason: String,
    },
}
