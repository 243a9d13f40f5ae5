//! GCP resource inventory
//!
//! Lists compute instances, persistent disks, storage buckets, VPC networks,
//! subnets, firewall rules and Cloud SQL instances for a project across a set
//! of regions.

pub mod config;
pub mod error;
pub mod gcp;
pub mod inventory;

pub use config::{Endpoints, InventoryConfig};
pub use error::{ApiError, InventoryError, ServiceKind};
pub use inventory::{
    Capability, Collected, Inventory, PartialResult, RequestContext, ResourceKind, Scope,
    ServiceClientSet, ZoneFailure,
};
