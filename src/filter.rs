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
//! # Exclusion filters
//!
//! Read-only sets deciding which servers, networks and hypervisors the
//! metrics collection of an instance skips.
use regex::{Regex, RegexSet};
use std::collections::BTreeSet;

use crate::config::{InitConfig, Instance, NovaApiVersion, SchemaError};

/// Compiled list of id patterns.
///
/// Every pattern is a regular expression that must match the whole id, so a
/// plain id only excludes itself.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: Option<RegexSet>,
}

impl PatternSet {
    /// Compile the patterns of the configuration list `field`.
    pub fn new<I, S>(field: &'static str, patterns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let mut anchored = Vec::with_capacity(patterns.len());
        for pattern in &patterns {
            let expr = format!("^(?:{pattern})$");
            Regex::new(&expr).map_err(|source| SchemaError::InvalidPattern {
                field,
                pattern: pattern.clone(),
                source,
            })?;
            anchored.push(expr);
        }
        let set = RegexSet::new(&anchored).map_err(|source| SchemaError::InvalidPattern {
            field,
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self {
            patterns,
            set: Some(set),
        })
    }

    /// Whether any pattern matches the id.
    pub fn is_match(&self, id: &str) -> bool {
        self.set.as_ref().is_some_and(|set| set.is_match(id))
    }

    /// Whether the set contains no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The patterns as they were configured.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

/// Hypervisors the check reports on.
#[derive(Clone, Debug, PartialEq)]
pub enum HypervisorSelection {
    /// Nova v2: only the explicitly listed hypervisors.
    Ids(BTreeSet<String>),
    /// Nova v2.1: the hypervisor running on the host. `None` means the host
    /// name the agent runs on.
    Host(Option<String>),
}

impl From<&InitConfig> for HypervisorSelection {
    fn from(value: &InitConfig) -> Self {
        match value.nova_api_version {
            NovaApiVersion::V2 => Self::Ids(value.hypervisor_ids.iter().cloned().collect()),
            NovaApiVersion::V2_1 => Self::Host(value.os_host.clone()),
        }
    }
}

/// Exclusion filters of a single instance.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSet {
    servers: PatternSet,
    networks: PatternSet,
    hypervisors: HypervisorSelection,
}

impl FilterSet {
    /// Combine the process wide filters with the instance ones.
    pub fn new(defaults: &InitConfig, instance: &Instance) -> Self {
        Self {
            servers: instance.exclude_server_ids.clone(),
            networks: defaults.exclude_network_ids.clone(),
            hypervisors: defaults.into(),
        }
    }

    /// Whether the server must be skipped.
    pub fn excludes_server(&self, server_id: &str) -> bool {
        self.servers.is_match(server_id)
    }

    /// Whether the network must be skipped.
    pub fn excludes_network(&self, network_id: &str) -> bool {
        self.networks.is_match(network_id)
    }

    /// Whether the hypervisor is reported.
    ///
    /// `local_hostname` is only consulted for v2.1 without `os_host`.
    pub fn selects_hypervisor(
        &self,
        hypervisor_id: &str,
        hypervisor_hostname: &str,
        local_hostname: &str,
    ) -> bool {
        match &self.hypervisors {
            HypervisorSelection::Ids(ids) => ids.contains(hypervisor_id),
            HypervisorSelection::Host(host) => hypervisor_hostname
                .eq_ignore_ascii_case(host.as_deref().unwrap_or(local_hostname)),
        }
    }

    /// Hypervisor selection.
    pub fn hypervisors(&self) -> &HypervisorSelection {
        &self.hypervisors
    }
}
