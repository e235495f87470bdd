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
//! A single entry of the `instances` list, one per monitored project.
use derive_builder::Builder;
use serde::Deserialize;
use validator::Validate;

use crate::auth::types::{AuthRequest, RawAuthScope, RawUser};
use crate::auth::{AuthScope, ProjectScope, UserCredentials, token_request};
use crate::config::common::optional_list;
use crate::config::error::SchemaError;
use crate::error::{BuilderError, CheckError};
use crate::filter::PatternSet;

/// An instance as written in the document.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct RawInstance {
    /// Unique instance name.
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,

    /// Project the check authenticates into.
    #[validate(nested)]
    pub auth_scope: Option<RawAuthScope>,

    /// User credentials.
    #[validate(nested)]
    pub user: Option<RawUser>,

    /// Append the project id to the Nova endpoint.
    #[serde(default)]
    pub append_tenant_id: bool,

    /// Server id patterns to skip.
    #[serde(default, deserialize_with = "optional_list")]
    pub exclude_server_ids: Vec<String>,

    /// Additional tags attached to every metric of the instance.
    #[serde(default, deserialize_with = "optional_list")]
    pub tags: Vec<String>,
}

/// A validated check instance.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "BuilderError", validate = "Self::validate"))]
pub struct Instance {
    /// Unique instance name.
    #[builder(setter(into))]
    pub name: String,

    /// Project the token is scoped to.
    pub auth_scope: AuthScope,

    /// User credentials.
    pub user: UserCredentials,

    /// Append the project id to the Nova endpoint.
    #[builder(default)]
    pub append_tenant_id: bool,

    /// Server id patterns to skip.
    #[builder(default)]
    pub exclude_server_ids: PatternSet,

    /// Additional tags attached to every metric of the instance.
    #[builder(default, setter(into))]
    pub tags: Vec<String>,
}

impl Instance {
    /// Keystone token request for the instance.
    pub fn token_request(&self) -> AuthRequest {
        token_request(&self.auth_scope, &self.user)
    }
}

impl InstanceBuilder {
    /// Apply the limits enforced on the document to the programmatic values.
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            check_length("name", name, 64)?;
        }
        if let Some(scope) = &self.auth_scope {
            match &scope.project {
                ProjectScope::ById { id } => check_length("auth_scope.project.id", id, 64)?,
                ProjectScope::ByNameDomain { name, domain_id } => {
                    check_length("auth_scope.project.name", name, 64)?;
                    check_length("auth_scope.project.domain.id", domain_id, 64)?;
                }
            }
        }
        if let Some(user) = &self.user {
            check_length("user.name", &user.name, 255)?;
            check_length("user.domain.id", &user.domain_id, 64)?;
        }
        Ok(())
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(format!("{field} must be 1 to {max} characters long"));
    }
    Ok(())
}

impl TryFrom<RawInstance> for Instance {
    type Error = CheckError;

    fn try_from(value: RawInstance) -> Result<Self, Self::Error> {
        value.validate().map_err(SchemaError::from)?;
        let name = value.name.ok_or(SchemaError::MissingField("name"))?;
        let auth_scope = value
            .auth_scope
            .ok_or(SchemaError::MissingField("auth_scope"))?;
        let user = value.user.ok_or(SchemaError::MissingField("user"))?;
        Ok(Self {
            name,
            auth_scope: AuthScope::try_from(auth_scope)?,
            user: UserCredentials::try_from(user)?,
            append_tenant_id: value.append_tenant_id,
            exclude_server_ids: PatternSet::new("exclude_server_ids", value.exclude_server_ids)?,
            tags: value.tags,
        })
    }
}
