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
//! Parsing of the check configuration file. The document consists of the
//! process wide `init_config` section and the `instances` list with one entry
//! per monitored project.
//!
//! A broken `init_config` section fails the whole load. A broken instance is
//! reported in [`CheckConfig::rejected`] and skipped, so that the remaining
//! instances keep working.
use config::{File, FileFormat};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

mod common;
mod error;
mod init;
mod instance;

pub use error::SchemaError;
pub use init::{InitConfig, InitConfigBuilder, NovaApiVersion, RawInitConfig};
pub use instance::{Instance, InstanceBuilder, RawInstance};

use crate::error::CheckError;
use crate::plan::InstancePlan;

/// Loaded check configuration.
#[derive(Debug)]
pub struct CheckConfig {
    /// Process wide defaults.
    pub init_config: InitConfig,

    /// Valid instances in the document order.
    pub instances: Vec<Instance>,

    /// Instances skipped because of configuration errors.
    pub rejected: Vec<RejectedInstance>,
}

/// Instance skipped during the load.
#[derive(Debug)]
pub struct RejectedInstance {
    /// Position of the instance in the `instances` list.
    pub index: usize,
    /// Instance name when it could be read.
    pub name: Option<String>,
    /// Reason of the rejection.
    pub error: CheckError,
}

impl CheckConfig {
    /// Load the configuration file.
    pub fn new(path: PathBuf) -> Result<Self, CheckError> {
        let builder =
            config::Config::builder().add_source(File::from(path).format(FileFormat::Yaml));
        builder.try_into()
    }

    /// Load the configuration from the YAML document.
    pub fn from_yaml_str(document: &str) -> Result<Self, CheckError> {
        let builder =
            config::Config::builder().add_source(File::from_str(document, FileFormat::Yaml));
        builder.try_into()
    }

    /// Instance by the name.
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    /// Resolve every valid instance with its own copy of the defaults.
    pub fn plans(&self) -> Result<Vec<InstancePlan>, CheckError> {
        self.instances
            .iter()
            .map(|instance| InstancePlan::resolve(self.init_config.clone(), instance))
            .collect()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for CheckConfig {
    type Error = CheckError;

    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let document = builder.build()?;

        let init_config: InitConfig = get_optional::<RawInitConfig>(&document, "init_config")
            .map_err(|source| SchemaError::Malformed {
                section: "init_config".into(),
                source,
            })?
            .unwrap_or_default()
            .try_into()?;

        let raw_instances = get_optional::<Vec<config::Value>>(&document, "instances")
            .map_err(|source| SchemaError::Malformed {
                section: "instances".into(),
                source,
            })?
            .unwrap_or_default();

        let mut names = HashSet::new();
        let mut instances = Vec::with_capacity(raw_instances.len());
        let mut rejected = Vec::new();
        for (index, value) in raw_instances.into_iter().enumerate() {
            let name = instance_name(&value);
            let loaded = load_instance(index, value).and_then(|instance| {
                if names.insert(instance.name.clone()) {
                    Ok(instance)
                } else {
                    Err(SchemaError::DuplicateInstanceName(instance.name).into())
                }
            });
            match loaded {
                Ok(instance) => instances.push(instance),
                Err(error) => {
                    warn!(
                        "skipping instance {} ({}): {}",
                        index,
                        name.as_deref().unwrap_or("unnamed"),
                        error
                    );
                    rejected.push(RejectedInstance { index, name, error });
                }
            }
        }

        debug!(
            "loaded {} instance(s), rejected {}",
            instances.len(),
            rejected.len()
        );
        Ok(Self {
            init_config,
            instances,
            rejected,
        })
    }
}

/// Read the key, treating an absent key the same as an explicit `null`.
fn get_optional<T>(document: &config::Config, key: &str) -> Result<Option<T>, config::ConfigError>
where
    T: serde::de::DeserializeOwned,
{
    match document.get::<Option<T>>(key) {
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        other => other,
    }
}

fn load_instance(index: usize, value: config::Value) -> Result<Instance, CheckError> {
    let raw: RawInstance = value
        .try_deserialize()
        .map_err(|source| SchemaError::Malformed {
            section: format!("instances[{index}]"),
            source,
        })?;
    raw.try_into()
}

fn instance_name(value: &config::Value) -> Option<String> {
    value
        .clone()
        .into_table()
        .ok()?
        .get("name")
        .cloned()?
        .into_string()
        .ok()
}
