//! Cluster object records
//!
//! Typed views of the objects an orchestration environment is made of. A
//! snapshot source that speaks in these records lowers them into a [`Value`]
//! tree with [`Environment::to_value`]; query logic only ever sees the tree.
//!
//! Zero-valued fields (empty strings and collections, `0`, `false`) are left
//! out of the lowered tree so that listings only show what is actually set.

use crate::error::Result;
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};

fn is_zero(n: &i64) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Records that belong to exactly one environment.
pub trait EnvironmentScoped {
    /// UUID of the owning environment; empty when unknown.
    fn environment_uuid(&self) -> &str;
}

/// Top-level environment record with all of its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub system: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(flatten)]
    pub children: EnvironmentChildren,
}

/// Child collections of an environment. Always present, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentChildren {
    pub containers: Vec<Container>,
    pub services: Vec<Service>,
    pub networks: Vec<Network>,
    pub hosts: Vec<Host>,
    pub stacks: Vec<Stack>,
}

impl Environment {
    /// Lower this environment into a metadata tree.
    pub fn to_value(&self) -> Result<Value> {
        Ok(Value::from(serde_json::to_value(self)?))
    }

    /// Number of children whose `environment_uuid` names another environment.
    pub fn foreign_children(&self) -> usize {
        fn count<T: EnvironmentScoped>(items: &[T], uuid: &str) -> usize {
            items
                .iter()
                .filter(|i| !i.environment_uuid().is_empty() && i.environment_uuid() != uuid)
                .count()
        }
        let c = &self.children;
        count(&c.containers, &self.uuid)
            + count(&c.services, &self.uuid)
            + count(&c.networks, &self.uuid)
            + count(&c.hosts, &self.uuid)
            + count(&c.stacks, &self.uuid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agent_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agent_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub environment_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub labels: Map,
    #[serde(skip_serializing_if = "is_zero")]
    pub memory: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub milli_cpu: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PublicEndpoint>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub environment_uuid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_ips: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    #[serde(skip_serializing_if = "is_false")]
    pub global: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub health_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    /// Scale or per-host instance info; shape depends on the service kind.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub instances: Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub labels: Map,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub links: Map,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PublicEndpoint>,
    #[serde(skip_serializing_if = "is_zero")]
    pub scale: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub selector: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sidekicks: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stack_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vip: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns_search: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub environment_uuid: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,
    pub health_check: HealthcheckInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub health_check_hosts: Vec<HealthcheckState>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub health_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub labels: Map,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "is_zero")]
    pub memory_reservation: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub milli_cpu_reservation: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub native_container: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_from_container_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PublicEndpoint>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub primary_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub primary_mac_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub service_ids: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub service_index: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub should_restart: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stack_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub start_count: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcheckState {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub health_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcheckInfo {
    #[serde(skip_serializing_if = "is_zero")]
    pub healthy_threshold: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub initializing_timeout: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub interval: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub port: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_line: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub response_timeout: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub unhealthy_threshold: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicEndpoint {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agent_ip_address: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bind_all: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bind_ip_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub private_port: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub public_port: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_policy_action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub environment_uuid: String,
    #[serde(skip_serializing_if = "is_false")]
    pub host_ports: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub policy: Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stack {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub environment_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub health_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
}

macro_rules! environment_scoped {
    ($($ty:ty),*) => {
        $(impl EnvironmentScoped for $ty {
            fn environment_uuid(&self) -> &str {
                &self.environment_uuid
            }
        })*
    };
}

environment_scoped!(Host, Service, Container, Network, Stack);
