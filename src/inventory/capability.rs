//! Per-domain capability traits
//!
//! The aggregator only talks to these traits. The REST implementations live in
//! [`crate::gcp`]; tests substitute in-memory fakes.

use async_trait::async_trait;

use super::model::{Bucket, Disk, Firewall, Instance, Network, SqlInstance, Subnetwork, Zone};
use crate::error::ApiError;

/// Compute Engine listing operations
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// List every zone visible to the project (there is no region filter)
    async fn list_zones(&self, project: &str) -> Result<Vec<Zone>, ApiError>;

    async fn list_instances(&self, project: &str, zone: &str) -> Result<Vec<Instance>, ApiError>;

    async fn list_disks(&self, project: &str, zone: &str) -> Result<Vec<Disk>, ApiError>;

    async fn list_networks(&self, project: &str) -> Result<Vec<Network>, ApiError>;

    async fn list_subnetworks(&self, project: &str, region: &str) -> Result<Vec<Subnetwork>, ApiError>;

    async fn list_firewalls(&self, project: &str) -> Result<Vec<Firewall>, ApiError>;
}

/// Cloud Storage listing operations
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn list_buckets(&self, project: &str) -> Result<Vec<Bucket>, ApiError>;
}

/// Cloud SQL admin listing operations
#[async_trait]
pub trait SqlAdminApi: Send + Sync {
    async fn list_instances(&self, project: &str) -> Result<Vec<SqlInstance>, ApiError>;
}
