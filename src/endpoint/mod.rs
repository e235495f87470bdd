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
//! # Endpoint resolution
//!
//! Urls of the Keystone, Nova and Neutron APIs used by a check instance.
//! Everything here is a pure function of the configuration and, once
//! authenticated, the Keystone token response.
use thiserror::Error;
use url::Url;

use crate::config::NovaApiVersion;

pub mod catalog;

pub use catalog::TokenResponse;

#[derive(Error, Debug, PartialEq)]
pub enum EndpointError {
    /// Further path segments cannot be appended to the url.
    #[error("url {0} cannot be used as a base")]
    CannotBeABase(String),

    /// Service catalog has no usable Nova endpoint.
    #[error("no nova {0} endpoint with public or internal interface in the service catalog")]
    MissingNovaEndpoint(NovaApiVersion),

    /// Service catalog has no usable Neutron endpoint.
    #[error("no neutron endpoint with public or internal interface in the service catalog")]
    MissingNeutronEndpoint,

    /// Tenant id must be appended but the project id is not known.
    #[error("project id is required to append the tenant id to {0}")]
    MissingProjectId(String),

    /// Url parsing error
    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}

/// Endpoints of the services an instance collects metrics from.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEndpoints {
    /// Nova (compute) endpoint.
    pub nova: Url,
    /// Neutron (networking) endpoint.
    pub neutron: Url,
}

/// Identity API v3 token url of the Keystone server.
pub fn token_url(keystone_server_url: &Url) -> Result<Url, EndpointError> {
    append_segments(keystone_server_url, ["v3", "auth", "tokens"])
}

/// Nova endpoint optionally suffixed with the project (tenant) id.
pub fn nova_endpoint(
    base: &Url,
    append_tenant_id: bool,
    project_id: Option<&str>,
) -> Result<Url, EndpointError> {
    if !append_tenant_id {
        return Ok(base.clone());
    }
    let project_id = project_id.ok_or_else(|| EndpointError::MissingProjectId(base.to_string()))?;
    append_segments(base, [project_id])
}

fn append_segments<I>(base: &Url, segments: I) -> Result<Url, EndpointError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| EndpointError::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
