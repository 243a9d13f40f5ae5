//! Compute Engine REST service

use async_trait::async_trait;

use super::client::RestService;
use crate::error::ApiError;
use crate::inventory::model::{Disk, Firewall, Instance, Network, Subnetwork, Zone};
use crate::inventory::ComputeApi;

/// Compute Engine v1 API
#[derive(Clone)]
pub struct ComputeService {
    rest: RestService,
}

impl ComputeService {
    pub fn new(rest: RestService) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ComputeApi for ComputeService {
    async fn list_zones(&self, project: &str) -> Result<Vec<Zone>, ApiError> {
        let url = self.rest.url(&["projects", project, "zones"])?;
        self.rest.list_all(url, "items").await
    }

    async fn list_instances(&self, project: &str, zone: &str) -> Result<Vec<Instance>, ApiError> {
        let url = self.rest.url(&["projects", project, "zones", zone, "instances"])?;
        self.rest.list_all(url, "items").await
    }

    async fn list_disks(&self, project: &str, zone: &str) -> Result<Vec<Disk>, ApiError> {
        let url = self.rest.url(&["projects", project, "zones", zone, "disks"])?;
        self.rest.list_all(url, "items").await
    }

    async fn list_networks(&self, project: &str) -> Result<Vec<Network>, ApiError> {
        let url = self.rest.url(&["projects", project, "global", "networks"])?;
        self.rest.list_all(url, "items").await
    }

    async fn list_subnetworks(&self, project: &str, region: &str) -> Result<Vec<Subnetwork>, ApiError> {
        let url = self.rest.url(&["projects", project, "regions", region, "subnetworks"])?;
        self.rest.list_all(url, "items").await
    }

    async fn list_firewalls(&self, project: &str) -> Result<Vec<Firewall>, ApiError> {
        let url = self.rest.url(&["projects", project, "global", "firewalls"])?;
        self.rest.list_all(url, "items").await
    }
}
