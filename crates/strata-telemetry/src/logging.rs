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

//! Installs the process-wide `env_logger` backend for the `log` facade.

use env_logger::Env;

/// The filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Initializes logging, honouring `RUST_LOG` and falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` if a logger was already installed; repeated calls are no-ops.
pub fn init_logging() -> bool {
    init_logging_with(DEFAULT_FILTER)
}

/// Same as [`init_logging`] with a custom fallback filter.
pub fn init_logging_with(default_filter: &str) -> bool {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
