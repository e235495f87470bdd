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
//! # Service catalog
//!
//! The subset of the Keystone token response needed to find the Nova and
//! Neutron endpoints.
use serde::Deserialize;
use tracing::trace;
use url::Url;

use crate::config::NovaApiVersion;
use crate::endpoint::EndpointError;

/// Token response body.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TokenResponse {
    /// Token
    pub token: Token,
}

/// Authorization token
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Token {
    /// The project the token is scoped to.
    #[serde(default)]
    pub project: Option<Project>,

    /// A catalog object.
    #[serde(default)]
    pub catalog: Vec<CatalogService>,
}

/// Project information.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Project {
    /// Project ID.
    pub id: String,
}

/// A catalog service.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CatalogService {
    /// Service name, e.g. `novav21` or `neutron`.
    #[serde(default)]
    pub name: String,
    /// Endpoints of the service.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// A Catalog Endpoint.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Endpoint {
    /// Endpoint url.
    pub url: String,
    /// Interface (`public`, `internal` or `admin`).
    #[serde(default)]
    pub interface: Option<String>,
}

impl TokenResponse {
    /// Parse the token response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Id of the project the token is scoped to.
    pub fn project_id(&self) -> Option<&str> {
        self.token.project.as_ref().map(|project| project.id.as_str())
    }

    /// Nova endpoint for the API version.
    ///
    /// The service is matched by name (`novav21` for v2.1, `nova` for v2) or
    /// by a name containing `Compute`.
    pub fn nova_endpoint(&self, version: NovaApiVersion) -> Result<Url, EndpointError> {
        let expected = match version {
            NovaApiVersion::V2 => "nova",
            NovaApiVersion::V2_1 => "novav21",
        };
        self.find_endpoint(|service| {
            service.name == expected || service.name.contains("Compute")
        })
        .ok_or(EndpointError::MissingNovaEndpoint(version))?
    }

    /// Neutron endpoint.
    ///
    /// The service is matched by the `neutron` name or by a name containing
    /// `Networking`.
    pub fn neutron_endpoint(&self) -> Result<Url, EndpointError> {
        self.find_endpoint(|service| {
            service.name == "neutron" || service.name.contains("Networking")
        })
        .ok_or(EndpointError::MissingNeutronEndpoint)?
    }

    /// Url of the first matching service having a public or an internal
    /// endpoint. Public endpoints are preferred.
    fn find_endpoint<F>(&self, matches: F) -> Option<Result<Url, EndpointError>>
    where
        F: Fn(&CatalogService) -> bool,
    {
        self.token
            .catalog
            .iter()
            .filter(|service| matches(service))
            .find_map(|service| {
                let endpoint = service
                    .endpoint_with_interface("public")
                    .or_else(|| service.endpoint_with_interface("internal"))?;
                trace!(
                    "selected {} endpoint {} of the {} service",
                    endpoint.interface.as_deref().unwrap_or_default(),
                    endpoint.url,
                    service.name
                );
                Some(Url::parse(&endpoint.url).map_err(EndpointError::from))
            })
    }
}

impl CatalogService {
    fn endpoint_with_interface(&self, interface: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.interface.as_deref() == Some(interface))
    }
}
