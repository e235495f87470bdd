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
//! # Instance plan
//!
//! Everything the agent needs to run one check instance: where and how to
//! authenticate, which TLS verification to apply and what to skip.
use tracing::debug;
use url::Url;

use crate::auth::types::AuthRequest;
use crate::config::{InitConfig, Instance, NovaApiVersion};
use crate::endpoint::{self, EndpointError, ResolvedEndpoints, TokenResponse};
use crate::error::CheckError;
use crate::filter::FilterSet;

/// Resolved check instance.
#[derive(Clone, Debug)]
pub struct InstancePlan {
    /// Instance name.
    pub name: String,
    /// Identity API v3 token url.
    pub token_url: Url,
    /// Token request body.
    pub auth_request: AuthRequest,
    /// Project id when it is known from the configuration.
    pub project_id: Option<String>,
    /// Nova API version.
    pub nova_api_version: NovaApiVersion,
    /// Append the project id to the Nova endpoint.
    pub append_tenant_id: bool,
    /// Whether TLS certificates are verified.
    pub ssl_verify: bool,
    /// Exclusion filters.
    pub filters: FilterSet,
    /// Additional metric tags.
    pub tags: Vec<String>,
}

impl InstancePlan {
    /// Resolve the instance against the process wide defaults.
    pub fn resolve(defaults: InitConfig, instance: &Instance) -> Result<Self, CheckError> {
        let token_url = endpoint::token_url(&defaults.keystone_server_url)?;
        debug!("resolved instance {} against {}", instance.name, token_url);
        Ok(Self {
            name: instance.name.clone(),
            token_url,
            auth_request: instance.token_request(),
            project_id: instance.auth_scope.project.id().map(Into::into),
            nova_api_version: defaults.nova_api_version,
            append_tenant_id: instance.append_tenant_id,
            ssl_verify: defaults.ssl_verify,
            filters: FilterSet::new(&defaults, instance),
            tags: instance.tags.clone(),
        })
    }

    /// Serialized token request body.
    pub fn auth_body(&self) -> Result<Vec<u8>, CheckError> {
        Ok(serde_json::to_vec(&self.auth_request)?)
    }

    /// Nova and Neutron endpoints from the token response.
    ///
    /// The project id the token is scoped to takes precedence over the one
    /// from the configuration, since a project given by name only gets its id
    /// from Keystone.
    pub fn endpoints(&self, token: &TokenResponse) -> Result<ResolvedEndpoints, EndpointError> {
        let project_id = token.project_id().or(self.project_id.as_deref());
        Ok(ResolvedEndpoints {
            nova: endpoint::nova_endpoint(
                &token.nova_endpoint(self.nova_api_version)?,
                self.append_tenant_id,
                project_id,
            )?,
            neutron: token.neutron_endpoint()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    use crate::auth::{AuthScope, ProjectScope, UserCredentials};
    use crate::config::{InitConfigBuilder, InstanceBuilder};

    fn defaults() -> InitConfig {
        InitConfigBuilder::default()
            .keystone_server_url(Url::parse("http://10.0.0.1:5000").unwrap())
            .ssl_verify(false)
            .build()
            .unwrap()
    }

    fn instance(project: ProjectScope, append_tenant_id: bool) -> Instance {
        InstanceBuilder::default()
            .name("test")
            .auth_scope(AuthScope { project })
            .user(UserCredentials {
                name: "datadog".into(),
                domain_id: "default".into(),
                password: "secret".into(),
            })
            .append_tenant_id(append_tenant_id)
            .tags(vec!["env:test".to_string()])
            .build()
            .unwrap()
    }

    fn token(project_id: Option<&str>) -> TokenResponse {
        let mut body = json!({
            "token": {
                "catalog": [
                    {
                        "name": "novav21",
                        "endpoints": [
                            {"interface": "public", "url": "http://172.0.0.1:8774"}
                        ]
                    },
                    {
                        "name": "neutron",
                        "endpoints": [
                            {"interface": "public", "url": "http://172.0.0.1:9696"}
                        ]
                    }
                ]
            }
        });
        if let Some(id) = project_id {
            body["token"]["project"] = json!({"id": id});
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    #[traced_test]
    fn test_resolve() {
        let sot = InstancePlan::resolve(
            defaults(),
            &instance(ProjectScope::ById { id: "abc".into() }, false),
        )
        .unwrap();
        assert_eq!("test", sot.name);
        assert_eq!("http://10.0.0.1:5000/v3/auth/tokens", sot.token_url.as_str());
        assert_eq!(Some("abc".to_string()), sot.project_id);
        assert!(!sot.ssl_verify);
        assert_eq!(NovaApiVersion::V2_1, sot.nova_api_version);
        assert_eq!(vec!["env:test"], sot.tags);
        assert!(logs_contain("resolved instance test"));

        let body: serde_json::Value = serde_json::from_slice(&sot.auth_body().unwrap()).unwrap();
        assert_eq!(json!({"project": {"id": "abc"}}), body["auth"]["scope"]);
        assert_eq!(
            "secret",
            body["auth"]["identity"]["password"]["user"]["password"]
        );
    }

    #[test]
    fn test_endpoints_append_tenant_id() {
        let sot = InstancePlan::resolve(
            defaults(),
            &instance(ProjectScope::ById { id: "abc".into() }, true),
        )
        .unwrap();
        let endpoints = sot.endpoints(&token(None)).unwrap();
        assert_eq!("http://172.0.0.1:8774/abc", endpoints.nova.as_str());
        assert_eq!("http://172.0.0.1:9696/", endpoints.neutron.as_str());
    }

    #[test]
    fn test_endpoints_project_from_token() {
        let sot = InstancePlan::resolve(
            defaults(),
            &instance(
                ProjectScope::ByNameDomain {
                    name: "admin".into(),
                    domain_id: "default".into(),
                },
                true,
            ),
        )
        .unwrap();
        assert!(sot.project_id.is_none());
        assert_eq!(
            Err(EndpointError::MissingProjectId("http://172.0.0.1:8774/".into())),
            sot.endpoints(&token(None))
        );
        assert_eq!(
            "http://172.0.0.1:8774/def",
            sot.endpoints(&token(Some("def"))).unwrap().nova.as_str()
        );
    }

    #[test]
    fn test_endpoints_without_tenant() {
        let sot = InstancePlan::resolve(
            defaults(),
            &instance(ProjectScope::ById { id: "abc".into() }, false),
        )
        .unwrap();
        assert_eq!(
            "http://172.0.0.1:8774/",
            sot.endpoints(&token(Some("abc"))).unwrap().nova.as_str()
        );
    }
}
