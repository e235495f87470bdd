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
//
// SPDX-License-Identifier: Apache-2.0
//! # Error
//!
//! Diverse errors that can occur while loading and resolving the check
//! configuration.
use thiserror::Error;

use crate::auth::AuthConfigError;
use crate::config::SchemaError;
use crate::endpoint::EndpointError;

/// Check configuration error.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Authentication scope or user is ambiguous or absent.
    #[error(transparent)]
    AuthConfig {
        /// The source of the error.
        #[from]
        source: AuthConfigError,
    },

    /// Configuration source error (file cannot be read or parsed).
    #[error("configuration source error: {}", source)]
    Config {
        /// The source of the error.
        #[from]
        source: config::ConfigError,
    },

    /// Endpoint resolution error.
    #[error(transparent)]
    Endpoint {
        /// The source of the error.
        #[from]
        source: EndpointError,
    },

    /// Json serialization error.
    #[error("json serde error: {}", source)]
    Json {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    /// Missing or malformed required field.
    #[error(transparent)]
    Schema {
        /// The source of the error.
        #[from]
        source: SchemaError,
    },
}

/// Builder error.
///
/// Used as the `build_fn` error of every `derive_builder` builder in the
/// crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuilderError {
    /// Uninitialized field.
    #[error("{0}")]
    UninitializedField(String),
    /// Custom validation error.
    #[error("{0}")]
    Validation(String),
}

impl From<String> for BuilderError {
    fn from(s: String) -> Self {
        Self::Validation(s)
    }
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(ufe: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(ufe.to_string())
    }
}
