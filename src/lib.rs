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

//! # OpenStack check configuration
//!
//! The OpenStack check of the monitoring agent authenticates against Keystone
//! (Identity API v3) and collects compute metrics from Nova and network
//! metrics from Neutron for every configured project. This crate turns the
//! check configuration into validated, immutable values ready to be used by
//! the agent:
//!
//! - [`config`] loads the `init_config` section and the `instances` list,
//!   applies the defaults and skips broken instances while keeping the rest.
//!
//! - [`auth`] models the project scope as an explicit "by id" or "by name and
//!   domain" choice and assembles the password token request.
//!
//! - [`endpoint`] derives the Keystone token url and the Nova and Neutron
//!   endpoints, optionally appending the tenant id to the Nova one.
//!
//! - [`filter`] holds the server, network and hypervisor exclusions.
//!
//! - [`plan`] ties it all together per instance.
//!
//! Talking to the OpenStack services is left to the agent; nothing here does
//! any I/O besides reading the configuration file.
//!
//! ```yaml
//! init_config:
//!   keystone_server_url: "http://10.0.0.1:5000/"
//! instances:
//!   - name: project_a
//!     auth_scope:
//!       project:
//!         id: 8f1d9c4d3c5a4b2f9a7e6d5c4b3a2f1e
//!     user:
//!       name: datadog
//!       password: secret
//!       domain:
//!         id: default
//! ```

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod plan;

pub use config::CheckConfig;
pub use error::CheckError;
pub use plan::InstancePlan;
