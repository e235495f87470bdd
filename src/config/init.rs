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
//! Process wide `init_config` section.
use derive_builder::Builder;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;
use validator::Validate;

use crate::config::common::{default_true, optional_list, parse_base_url};
use crate::config::error::SchemaError;
use crate::error::BuilderError;
use crate::filter::PatternSet;

/// The `init_config` section as written in the document.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct RawInitConfig {
    /// Where the identity server lives. The server must support Identity API
    /// v3.
    pub keystone_server_url: Option<String>,

    /// Hostname of the host as known by Nova.
    #[validate(length(min = 1, max = 255))]
    pub os_host: Option<String>,

    /// Nova API version to use (`v2` or `v2.1`).
    pub nova_api_version: Option<String>,

    /// Hypervisors to report on with Nova v2.
    #[serde(default, deserialize_with = "optional_list")]
    pub hypervisor_ids: Vec<String>,

    /// Network id patterns to skip.
    #[serde(default, deserialize_with = "optional_list")]
    pub exclude_network_ids: Vec<String>,

    /// Whether TLS certificates of the OpenStack services are verified.
    #[serde(default = "default_true")]
    pub ssl_verify: bool,
}

impl Default for RawInitConfig {
    fn default() -> Self {
        Self {
            keystone_server_url: None,
            os_host: None,
            nova_api_version: None,
            hypervisor_ids: Vec::new(),
            exclude_network_ids: Vec::new(),
            ssl_verify: default_true(),
        }
    }
}

/// Nova API version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NovaApiVersion {
    /// v2. Listing hypervisors requires admin scope, so they must be
    /// configured explicitly.
    V2,
    /// v2.1.
    #[default]
    V2_1,
}

impl FromStr for NovaApiVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "v2" => Ok(Self::V2),
            "v2.1" => Ok(Self::V2_1),
            other => Err(SchemaError::UnsupportedNovaApiVersion(other.into())),
        }
    }
}

impl fmt::Display for NovaApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => f.write_str("v2"),
            Self::V2_1 => f.write_str("v2.1"),
        }
    }
}

/// Process wide defaults shared by all instances.
///
/// Immutable once loaded; every instance resolution receives its own copy.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(error = "BuilderError", validate = "Self::validate"))]
#[builder(setter(into))]
pub struct InitConfig {
    /// Identity service url.
    pub keystone_server_url: Url,

    /// Hostname of the host as known by Nova.
    #[builder(default, setter(into, strip_option))]
    pub os_host: Option<String>,

    /// Nova API version.
    #[builder(default)]
    pub nova_api_version: NovaApiVersion,

    /// Hypervisors to report on with Nova v2.
    #[builder(default)]
    pub hypervisor_ids: Vec<String>,

    /// Network id patterns to skip.
    #[builder(default)]
    pub exclude_network_ids: PatternSet,

    /// Whether TLS certificates are verified.
    #[builder(default = "true")]
    pub ssl_verify: bool,
}

impl InitConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(url) = self
            .keystone_server_url
            .as_ref()
            .filter(|url| url.cannot_be_a_base())
        {
            return Err(SchemaError::InvalidUrl {
                field: "keystone_server_url",
                reason: format!("{url} cannot be used as a base url"),
            }
            .to_string());
        }
        let version = self.nova_api_version.unwrap_or_default();
        let no_hypervisors = self
            .hypervisor_ids
            .as_ref()
            .is_none_or(|ids| ids.iter().all(|id| id.trim().is_empty()));
        if version == NovaApiVersion::V2 && no_hypervisors {
            return Err(SchemaError::HypervisorIdsRequired.to_string());
        }
        Ok(())
    }
}

impl TryFrom<RawInitConfig> for InitConfig {
    type Error = SchemaError;

    fn try_from(value: RawInitConfig) -> Result<Self, Self::Error> {
        value.validate()?;
        let keystone_server_url = value
            .keystone_server_url
            .as_deref()
            .ok_or(SchemaError::MissingField("keystone_server_url"))
            .and_then(|url| parse_base_url("keystone_server_url", url))?;
        let nova_api_version = value
            .nova_api_version
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        // Blank entries name no hypervisor.
        let hypervisor_ids: Vec<String> = value
            .hypervisor_ids
            .into_iter()
            .filter(|id| !id.trim().is_empty())
            .collect();
        if nova_api_version == NovaApiVersion::V2 && hypervisor_ids.is_empty() {
            return Err(SchemaError::HypervisorIdsRequired);
        }
        Ok(Self {
            keystone_server_url,
            os_host: value.os_host,
            nova_api_version,
            hypervisor_ids,
            exclude_network_ids: PatternSet::new("exclude_network_ids", value.exclude_network_ids)?,
            ssl_verify: value.ssl_verify,
        })
    }
}
