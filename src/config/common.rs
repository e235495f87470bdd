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
//! # Check configuration
//!
//! Helpers shared by the configuration sections.
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::config::error::SchemaError;

/// Deserializes an optional list treating an explicit `null` (a key left
/// without entries in the YAML document) the same as an absent one.
pub fn optional_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}

/// Return `true` to be used as a positive default for the serde macros.
pub fn default_true() -> bool {
    true
}

/// Parse the url and make sure further path segments can be appended to it.
pub fn parse_base_url(field: &'static str, value: &str) -> Result<Url, SchemaError> {
    let url = Url::parse(value).map_err(|err| SchemaError::InvalidUrl {
        field,
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SchemaError::InvalidUrl {
            field,
            reason: format!("{value} cannot be used as a base url"),
        });
    }
    Ok(url)
}
