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
//! # Keystone authentication types
//!
//! The `auth_scope` and `user` blocks as they are written in the instance
//! configuration, and the Identity API v3 token request built from them.
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// The `auth_scope` block of an instance.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Validate)]
pub struct RawAuthScope {
    /// Project the check authenticates into.
    #[validate(nested)]
    pub project: Option<ScopeProject>,
}

/// The `user` block of an instance.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct RawUser {
    /// User name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// User password.
    pub password: Option<SecretString>,
    /// User domain.
    #[validate(nested)]
    pub domain: Option<Domain>,
}

/// Project scope information.
///
/// An ID is sufficient to uniquely identify a project but if a project is
/// specified by name, then the domain of the project must also be specified
/// in order to uniquely identify the project by name.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
pub struct ScopeProject {
    /// Project ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,
    /// Project Name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    /// Project domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub domain: Option<Domain>,
}

/// Domain information.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
pub struct Domain {
    /// Domain ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,
}

/// An authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequest {
    /// An identity object.
    pub auth: AuthRequestInner,
}

/// An authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequestInner {
    /// An identity object.
    pub identity: Identity,

    /// The authorization scope. The check always scopes the token to a single
    /// project.
    pub scope: Scope,
}

/// An identity object.
#[derive(Clone, Debug, Serialize)]
pub struct Identity {
    /// The authentication method. Only `password` is used.
    pub methods: Vec<String>,

    /// The password object, contains the authentication information.
    pub password: PasswordAuth,
}

/// The password object, contains the authentication information.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordAuth {
    /// A user object.
    pub user: UserPassword,
}

/// User password information
#[derive(Clone, Debug, Serialize)]
pub struct UserPassword {
    /// User Name
    pub name: String,
    /// User domain
    pub domain: Domain,
    /// User password
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

/// The authorization scope of the token request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Project scope.
    Project(ScopeProject),
}

fn expose_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}
