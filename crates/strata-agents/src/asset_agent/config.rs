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

//! Configuration of the [`AssetService`](super::AssetService).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::asset::RESOURCES_HOST;

/// Tunables of the asset service.
///
/// Every field has a default, so a RON document only needs to list what it
/// overrides:
///
/// ```ron
/// (
///     single_flight: false,
///     result_cache_capacity: Some(512),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetServiceConfig {
    /// The host literal that routes to in-process resources.
    pub resources_host: String,
    /// Collapse concurrent loads of the same identifier into one backend call.
    pub single_flight: bool,
    /// Maximum number of cached URI descriptors. `None` is unbounded.
    pub uri_cache_capacity: Option<usize>,
    /// Maximum number of cached assets, oldest evicted first. `None` is unbounded.
    pub result_cache_capacity: Option<usize>,
}

impl Default for AssetServiceConfig {
    fn default() -> Self {
        Self {
            resources_host: RESOURCES_HOST.to_string(),
            single_flight: true,
            uri_cache_capacity: None,
            result_cache_capacity: None,
        }
    }
}

impl AssetServiceConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).context("Failed to parse asset service config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read asset service config '{}'", path.display()))?;
        Self::from_ron_str(&source)
            .with_context(|| format!("Invalid asset service config '{}'", path.display()))
    }

    /// Checks the invariants the service relies on.
    pub fn validate(&self) -> Result<()> {
        if self.resources_host.is_empty() {
            bail!("resources_host must not be empty");
        }
        if self.resources_host.contains('/') || self.resources_host.contains(':') {
            bail!(
                "resources_host '{}' must be a bare host segment",
                self.resources_host
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssetServiceConfig::default();
        assert_eq!(config.resources_host, "resources");
        assert!(config.single_flight);
        assert_eq!(config.uri_cache_capacity, None);
        assert_eq!(config.result_cache_capacity, None);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config =
            AssetServiceConfig::from_ron_str("(single_flight: false, result_cache_capacity: Some(8))")
                .unwrap();
        assert!(!config.single_flight);
        assert_eq!(config.result_cache_capacity, Some(8));
        assert_eq!(config.resources_host, "resources");
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        assert!(AssetServiceConfig::from_ron_str(r#"(resources_host: "")"#).is_err());
        assert!(AssetServiceConfig::from_ron_str(r#"(resources_host: "res://x")"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.ron");
        std::fs::write(&path, r#"(resources_host: "builtin", uri_cache_capacity: Some(64))"#)
            .unwrap();

        let config = AssetServiceConfig::load(&path).unwrap();
        assert_eq!(config.resources_host, "builtin");
        assert_eq!(config.uri_cache_capacity, Some(64));

        let missing = AssetServiceConfig::load(dir.path().join("missing.ron"));
        assert!(missing.is_err());
    }
}
