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

//! Defines the error type surfaced by every asset service operation.

use std::{error::Error, fmt, sync::Arc};
use thiserror::Error;

/// A boxed, thread-safe error produced by a backend collaborator.
pub type BackendError = Box<dyn Error + Send + Sync>;

/// A convenient alias for results returned by the asset service.
pub type AssetResult<T> = Result<T, AssetError>;

/// The three kinds of backend collaborators that can be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// A [`ManifestFetcher`](crate::backend::ManifestFetcher).
    ManifestFetcher,
    /// A [`Storage`](crate::backend::Storage).
    Storage,
    /// An [`Installer`](crate::backend::Installer).
    Installer,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::ManifestFetcher => f.write_str("manifest fetcher"),
            BackendKind::Storage => f.write_str("storage"),
            BackendKind::Installer => f.write_str("installer"),
        }
    }
}

/// An error raised while registering backends or loading an asset.
///
/// The type is `Clone` so that one outcome can be handed to every caller
/// waiting on the same in-flight load.
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    /// An argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The identifier could not be parsed.
    #[error("invalid asset uri '{uri}': {reason}")]
    InvalidUri {
        /// The offending identifier.
        uri: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The very same backend object was registered twice.
    #[error("{kind} '{name}' is already registered")]
    DuplicateRegistration {
        /// Which collection rejected the registration.
        kind: BackendKind,
        /// The name the backend reports.
        name: String,
    },

    /// A storage tried to claim the host reserved for in-process resources.
    #[error("storage name '{name}' is reserved for in-process resources")]
    ReservedStorageName {
        /// The rejected storage name.
        name: String,
    },

    /// The selected load strategy found nothing for the identifier.
    #[error("failed to load asset '{uri}'")]
    AssetLoadFailure {
        /// The identifier as the caller supplied it.
        uri: String,
    },

    /// The asset exists but is not of the requested Rust type.
    #[error("asset '{uri}' is not of type {expected}")]
    TypeMismatch {
        /// The identifier as the caller supplied it.
        uri: String,
        /// The requested type name.
        expected: &'static str,
    },

    /// A backend collaborator failed while the strategy was running.
    #[error("backend failure while loading '{uri}': {source}")]
    Backend {
        /// The identifier as the caller supplied it.
        uri: String,
        /// The collaborator's own error.
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl AssetError {
    pub(crate) fn invalid_uri(uri: &str, reason: &str) -> Self {
        AssetError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Wraps a collaborator error raised while loading `uri`.
    pub fn backend(uri: impl Into<String>, source: BackendError) -> Self {
        AssetError::Backend {
            uri: uri.into(),
            source: Arc::from(source),
        }
    }

    /// The identifier this error refers to, if any.
    pub fn uri(&self) -> Option<&str> {
        match self {
            AssetError::InvalidUri { uri, .. }
            | AssetError::AssetLoadFailure { uri }
            | AssetError::TypeMismatch { uri, .. }
            | AssetError::Backend { uri, .. } => Some(uri),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AssetError::DuplicateRegistration {
            kind: BackendKind::Storage,
            name: "bundleA".to_string(),
        };
        assert_eq!(err.to_string(), "storage 'bundleA' is already registered");

        let err = AssetError::AssetLoadFailure {
            uri: "bundleA://icons/play".to_string(),
        };
        assert_eq!(err.to_string(), "failed to load asset 'bundleA://icons/play'");
        assert_eq!(err.uri(), Some("bundleA://icons/play"));
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let source: BackendError = "disk on fire".into();
        let err = AssetError::backend("store://a", source);
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("disk on fire"));

        let cloned = err.clone();
        assert_eq!(cloned.uri(), Some("store://a"));
    }
}
