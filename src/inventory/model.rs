//! Resource records
//!
//! Records mirror the REST representation: known fields are typed, every
//! other field is kept verbatim in `extra` so nothing the API returned is
//! lost when a record is re-serialized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::gcp::client::short_name;

/// Compute Engine zone as returned by `zones.list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Zone {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            region: None,
            status: None,
            extra: Map::new(),
        }
    }
}

/// Compute Engine VM instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            zone: None,
            machine_type: None,
            status: None,
            creation_timestamp: None,
            extra: Map::new(),
        }
    }

    pub fn zone_short(&self) -> Option<&str> {
        self.zone.as_deref().map(short_name)
    }

    pub fn machine_type_short(&self) -> Option<&str> {
        self.machine_type.as_deref().map(short_name)
    }
}

/// Compute Engine persistent disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Size in GB; the API encodes int64 as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub disk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Disk {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            zone: None,
            size_gb: None,
            disk_type: None,
            status: None,
            users: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn zone_short(&self) -> Option<&str> {
        self.zone.as_deref().map(short_name)
    }

    /// A disk with no users is not attached to any instance
    pub fn is_attached(&self) -> bool {
        !self.users.is_empty()
    }
}

/// Cloud Storage bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// VPC network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_subnetworks: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnetworks: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Regional subnetwork
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnetwork {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_cidr_range: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subnetwork {
    pub fn network_short(&self) -> Option<&str> {
        self.network.as_deref().map(short_name)
    }
}

/// VPC firewall rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firewall {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Firewall {
    /// "ALLOW" or "DENY" depending on which rule list the record carries
    pub fn action(&self) -> Option<&'static str> {
        if self.extra.contains_key("allowed") {
            Some("ALLOW")
        } else if self.extra.contains_key("denied") {
            Some("DENY")
        } else {
            None
        }
    }
}

/// Cloud SQL instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlInstance {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instance_keeps_unknown_fields() {
        let raw = json!({
            "name": "web-1",
            "id": "123",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a",
            "machineType": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/machineTypes/e2-medium",
            "status": "RUNNING",
            "labels": {"env": "prod"}
        });
        let instance: Instance = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(instance.zone_short(), Some("us-central1-a"));
        assert_eq!(instance.machine_type_short(), Some("e2-medium"));
        assert_eq!(instance.extra["labels"]["env"], "prod");
        assert_eq!(serde_json::to_value(&instance).unwrap(), raw);
    }

    #[test]
    fn test_disk_type_and_users() {
        let disk: Disk = serde_json::from_value(json!({
            "name": "data",
            "sizeGb": "100",
            "type": "projects/p/zones/z/diskTypes/pd-ssd",
            "users": ["projects/p/zones/z/instances/web-1"]
        }))
        .unwrap();
        assert_eq!(disk.size_gb.as_deref(), Some("100"));
        assert_eq!(disk.disk_type.as_deref().map(short_name), Some("pd-ssd"));
        assert!(disk.is_attached());
        assert!(!Disk::named("orphan").is_attached());
    }

    #[test]
    fn test_firewall_action() {
        let allow: Firewall =
            serde_json::from_value(json!({"name": "allow-ssh", "allowed": [{"IPProtocol": "tcp"}]})).unwrap();
        let deny: Firewall =
            serde_json::from_value(json!({"name": "deny-all", "denied": [{"IPProtocol": "all"}]})).unwrap();
        assert_eq!(allow.action(), Some("ALLOW"));
        assert_eq!(deny.action(), Some("DENY"));
    }
}
