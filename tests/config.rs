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
//! Loading of complete configuration files.

use eyre::{OptionExt, Result};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use openstack_check::CheckConfig;
use openstack_check::auth::ProjectScope;
use openstack_check::config::{NovaApiVersion, SchemaError};
use openstack_check::endpoint::TokenResponse;
use openstack_check::error::CheckError;

fn example_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("etc/openstack.yaml.example")
}

fn write_config(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_example_config() -> Result<()> {
    let config = CheckConfig::new(example_path())?;

    assert!(config.rejected.is_empty());
    assert_eq!(
        "http://172.0.0.1:5000/",
        config.init_config.keystone_server_url.as_str()
    );
    assert_eq!(NovaApiVersion::V2_1, config.init_config.nova_api_version);
    assert!(config.init_config.ssl_verify);
    assert!(config.init_config.os_host.is_none());

    let first = config.instance("instance_1").ok_or_eyre("instance_1")?;
    assert_eq!(
        ProjectScope::ById {
            id: "my_project_id".into()
        },
        first.auth_scope.project
    );
    assert!(first.append_tenant_id);

    let second = config.instance("instance_2").ok_or_eyre("instance_2")?;
    assert_eq!(
        ProjectScope::ByNameDomain {
            name: "my_project_name".into(),
            domain_id: "my_domain_id".into()
        },
        second.auth_scope.project
    );
    assert!(!second.append_tenant_id);
    assert_eq!(vec!["env:staging"], second.tags);
    Ok(())
}

#[test]
fn test_example_plans() -> Result<()> {
    let config = CheckConfig::new(example_path())?;
    let plans = config.plans()?;
    assert_eq!(2, plans.len());

    let plan = &plans[0];
    assert_eq!("http://172.0.0.1:5000/v3/auth/tokens", plan.token_url.as_str());
    assert!(plan.filters.excludes_server("server_1"));
    assert!(plan.filters.excludes_server("canary-7"));
    assert!(!plan.filters.excludes_server("server_11"));
    assert!(plan.filters.excludes_network("network_1"));
    assert!(plan.filters.excludes_network("test-net"));
    assert!(!plan.filters.excludes_network("prod-net"));
    assert!(!plans[1].filters.excludes_server("server_1"));
    assert!(plans[1].filters.excludes_network("network_1"));

    let body: serde_json::Value = serde_json::from_slice(&plan.auth_body()?)?;
    assert_eq!(
        json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": "datadog",
                            "domain": {"id": "my_domain_id"},
                            "password": "my_password"
                        }
                    }
                },
                "scope": {"project": {"id": "my_project_id"}}
            }
        }),
        body
    );

    let token = TokenResponse::from_slice(
        serde_json::to_vec(&json!({
            "token": {
                "project": {"id": "my_project_id"},
                "catalog": [
                    {
                        "name": "novav21",
                        "type": "compute",
                        "endpoints": [
                            {"interface": "public", "url": "http://172.0.0.1:8774"}
                        ]
                    },
                    {
                        "name": "neutron",
                        "type": "network",
                        "endpoints": [
                            {"interface": "public", "url": "http://172.0.0.1:9696"}
                        ]
                    }
                ]
            }
        }))?
        .as_slice(),
    )?;
    let endpoints = plan.endpoints(&token)?;
    assert_eq!("http://172.0.0.1:8774/my_project_id", endpoints.nova.as_str());
    assert_eq!("http://172.0.0.1:9696/", endpoints.neutron.as_str());

    let endpoints = plans[1].endpoints(&token)?;
    assert_eq!("http://172.0.0.1:8774/", endpoints.nova.as_str());
    Ok(())
}

#[test]
fn test_partial_load() -> Result<()> {
    let file = write_config(
        r#"
init_config:
  keystone_server_url: "https://keystone.example.com:5000"
  ssl_verify: false
instances:
  - name: valid
    auth_scope:
      project:
        id: p1
    user:
      password: pw
      name: datadog
      domain:
        id: default
  - name: no_scope
    user:
      password: pw
      name: datadog
      domain:
        id: default
  - name: bad_pattern
    auth_scope:
      project:
        id: p2
    user:
      password: pw
      name: datadog
      domain:
        id: default
    exclude_server_ids:
      - "(unclosed"
  - name: valid
    auth_scope:
      project:
        id: p3
    user:
      password: pw
      name: datadog
      domain:
        id: default
"#,
    )?;
    let config = CheckConfig::new(file.path().to_path_buf())?;
    assert!(!config.init_config.ssl_verify);
    assert_eq!(1, config.instances.len());
    assert_eq!(Some("p1"), config.instances[0].auth_scope.project.id());

    let rejected: Vec<(usize, Option<&str>)> = config
        .rejected
        .iter()
        .map(|rejected| (rejected.index, rejected.name.as_deref()))
        .collect();
    assert_eq!(
        vec![
            (1, Some("no_scope")),
            (2, Some("bad_pattern")),
            (3, Some("valid"))
        ],
        rejected
    );
    assert!(matches!(
        config.rejected[0].error,
        CheckError::Schema {
            source: SchemaError::MissingField("auth_scope")
        }
    ));
    assert!(matches!(
        config.rejected[1].error,
        CheckError::Schema {
            source: SchemaError::InvalidPattern { .. }
        }
    ));
    assert!(matches!(
        config.rejected[2].error,
        CheckError::Schema {
            source: SchemaError::DuplicateInstanceName(_)
        }
    ));
    Ok(())
}

#[test]
fn test_invalid_init_config_fails_load() -> Result<()> {
    let file = write_config(
        r#"
init_config:
  keystone_server_url: "https://keystone.example.com:5000"
  nova_api_version: v2
instances:
  - name: valid
    auth_scope:
      project:
        id: p1
    user:
      password: pw
      name: datadog
      domain:
        id: default
"#,
    )?;
    assert!(matches!(
        CheckConfig::new(file.path().to_path_buf()),
        Err(CheckError::Schema {
            source: SchemaError::HypervisorIdsRequired
        })
    ));
    Ok(())
}
