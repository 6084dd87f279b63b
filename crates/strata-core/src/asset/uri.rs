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

//! Parsing of raw asset identifiers into [`UriDescriptor`]s.
//!
//! Identifiers have the shape `<host>://<path>`. The host segment routes the
//! request: the reserved [`RESOURCES_HOST`] selects the in-process resource
//! table, any other value names a registered storage.

use crate::error::{AssetError, AssetResult};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// The host literal reserved for in-process resources.
pub const RESOURCES_HOST: &str = "resources";

const SEPARATOR: &str = "://";

/// The parsed, immutable form of a raw asset identifier.
///
/// Equality and hashing only consider the raw string the descriptor was
/// parsed from, so two descriptors built from the same text are
/// interchangeable as cache keys.
#[derive(Debug, Clone)]
pub struct UriDescriptor {
    raw: String,
    host_len: usize,
    path_start: usize,
}

impl UriDescriptor {
    /// Parses a raw identifier.
    ///
    /// # Errors
    /// - [`AssetError::InvalidArgument`] if `raw` is empty.
    /// - [`AssetError::InvalidUri`] if the separator, host or path is missing.
    pub fn parse(raw: &str) -> AssetResult<Self> {
        if raw.is_empty() {
            return Err(AssetError::InvalidArgument(
                "asset uri must not be empty".to_string(),
            ));
        }

        let host_len = raw
            .find(SEPARATOR)
            .ok_or_else(|| AssetError::invalid_uri(raw, "missing '://' separator"))?;
        if host_len == 0 {
            return Err(AssetError::invalid_uri(raw, "empty host segment"));
        }

        // Leading slashes after the separator carry no meaning.
        let after = &raw[host_len + SEPARATOR.len()..];
        let trimmed = after.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(AssetError::invalid_uri(raw, "empty asset path"));
        }
        let path_start = raw.len() - trimmed.len();

        Ok(Self {
            raw: raw.to_string(),
            host_len,
            path_start,
        })
    }

    /// The identifier exactly as the caller supplied it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The routing segment in front of `://`.
    pub fn host(&self) -> &str {
        &self.raw[..self.host_len]
    }

    /// The asset path inside the resource table or storage.
    pub fn path(&self) -> &str {
        &self.raw[self.path_start..]
    }

    /// Iterates the non-empty `/`-separated segments of [`path`](Self::path).
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path().split('/').filter(|s| !s.is_empty())
    }

    /// Returns `true` if the host equals `resources_host`.
    pub fn is_resource(&self, resources_host: &str) -> bool {
        self.host() == resources_host
    }
}

impl PartialEq for UriDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for UriDescriptor {}

impl Hash for UriDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for UriDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
