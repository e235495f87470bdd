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

use thiserror::Error;

/// Missing or malformed configuration field.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two instances share the same name.
    #[error("instance name {0} is not unique")]
    DuplicateInstanceName(String),

    /// Nova v2 cannot discover hypervisors without admin scope.
    #[error("nova_api_version v2 requires a non empty hypervisor_ids list")]
    HypervisorIdsRequired,

    /// Exclusion pattern is not a valid regular expression.
    #[error("invalid pattern {pattern} in {field}: {source}")]
    InvalidPattern {
        /// Name of the list holding the pattern.
        field: &'static str,
        /// The offending pattern.
        pattern: String,
        /// The source of the error.
        source: regex::Error,
    },

    /// Url cannot be parsed or is not usable as a base.
    #[error("invalid url in {field}: {reason}")]
    InvalidUrl {
        /// Name of the field.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },

    /// The document is structurally malformed (wrong types and alike).
    #[error("malformed {section}: {source}")]
    Malformed {
        /// Section or instance that could not be read.
        section: String,
        /// The source of the error.
        source: config::ConfigError,
    },

    /// Required field is missing.
    #[error("missing required field {0}")]
    MissingField(&'static str),

    /// Unknown Nova API version.
    #[error("unsupported nova_api_version {0}, expected v2 or v2.1")]
    UnsupportedNovaApiVersion(String),

    /// Field limits violated.
    #[error("validation error: {}", source)]
    Validation {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },
}
