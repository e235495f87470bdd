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

//! Authentication information of a check instance.
//!
//! The loosely structured `auth_scope` and `user` blocks are turned into
//! explicit types once, at load time. A project is addressed either by its id
//! or by its name together with the id of the owning domain; anything in
//! between is rejected here so that the token request assembly never has to
//! deal with partial information.

use secrecy::SecretString;
use thiserror::Error;

use crate::config::SchemaError;

pub mod types;

use types::*;

/// Authentication method used for every token request.
pub const PASSWORD_METHOD: &str = "password";

#[derive(Error, Debug, PartialEq)]
pub enum AuthConfigError {
    /// Both the id and the name form of the project are present.
    #[error("auth_scope.project must be given either by id or by name and domain id, not both")]
    AmbiguousProject,

    /// Only a part of the name form is present.
    #[error("auth_scope.project name requires domain.id and domain.id requires name")]
    IncompleteProjectName,

    /// Neither form of the project is present.
    #[error("auth_scope.project is missing")]
    MissingProject,
}

/// Project the token is scoped to.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectScope {
    /// Project identified by the id.
    ById { id: String },
    /// Project identified by the name within the domain.
    ByNameDomain { name: String, domain_id: String },
}

impl ProjectScope {
    /// Project id when it is known from the configuration.
    ///
    /// For the name form the id is only known after authentication and must
    /// be taken from the token response.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ById { id } => Some(id),
            Self::ByNameDomain { .. } => None,
        }
    }
}

/// Authorization scope of a check instance.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthScope {
    /// Scoped project.
    pub project: ProjectScope,
}

impl TryFrom<RawAuthScope> for AuthScope {
    type Error = AuthConfigError;

    fn try_from(value: RawAuthScope) -> Result<Self, Self::Error> {
        let ScopeProject { id, name, domain } =
            value.project.ok_or(AuthConfigError::MissingProject)?;
        let domain_id = domain.and_then(|domain| domain.id);
        let project = match (id, name, domain_id) {
            (Some(id), None, None) => ProjectScope::ById { id },
            (None, Some(name), Some(domain_id)) => ProjectScope::ByNameDomain { name, domain_id },
            (None, None, None) => return Err(AuthConfigError::MissingProject),
            (None, _, _) => return Err(AuthConfigError::IncompleteProjectName),
            (Some(_), _, _) => return Err(AuthConfigError::AmbiguousProject),
        };
        Ok(Self { project })
    }
}

impl From<&AuthScope> for Scope {
    fn from(value: &AuthScope) -> Self {
        Scope::Project(match &value.project {
            ProjectScope::ById { id } => ScopeProject {
                id: Some(id.clone()),
                ..Default::default()
            },
            ProjectScope::ByNameDomain { name, domain_id } => ScopeProject {
                name: Some(name.clone()),
                domain: Some(Domain {
                    id: Some(domain_id.clone()),
                }),
                ..Default::default()
            },
        })
    }
}

/// Password credentials of the check user.
#[derive(Clone, Debug)]
pub struct UserCredentials {
    /// User name.
    pub name: String,
    /// Id of the domain owning the user.
    pub domain_id: String,
    /// User password.
    pub password: SecretString,
}

impl TryFrom<RawUser> for UserCredentials {
    type Error = SchemaError;

    fn try_from(value: RawUser) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.ok_or(SchemaError::MissingField("user.name"))?,
            domain_id: value
                .domain
                .and_then(|domain| domain.id)
                .ok_or(SchemaError::MissingField("user.domain.id"))?,
            password: value
                .password
                .ok_or(SchemaError::MissingField("user.password"))?,
        })
    }
}

impl From<&UserCredentials> for UserPassword {
    fn from(value: &UserCredentials) -> Self {
        Self {
            name: value.name.clone(),
            domain: Domain {
                id: Some(value.domain_id.clone()),
            },
            password: value.password.clone(),
        }
    }
}

/// Build the Identity API v3 token request for the user and the scope.
pub fn token_request(scope: &AuthScope, user: &UserCredentials) -> AuthRequest {
    AuthRequest {
        auth: AuthRequestInner {
            identity: Identity {
                methods: vec![PASSWORD_METHOD.into()],
                password: PasswordAuth { user: user.into() },
            },
            scope: scope.into(),
        },
    }
}
