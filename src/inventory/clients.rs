//! Service client factory

use std::sync::Arc;
use std::time::Duration;

use super::capability::{ComputeApi, SqlAdminApi, StorageApi};
use crate::config::InventoryConfig;
use crate::error::{InventoryError, ServiceKind};
use crate::gcp::client::RestService;
use crate::gcp::{ComputeService, SqlAdminService, StorageService};

/// The compute, storage and SQL admin handles shared by every query
///
/// Built once, never mutated; clones share the same handles.
#[derive(Clone)]
pub struct ServiceClientSet {
    pub compute: Arc<dyn ComputeApi>,
    pub storage: Arc<dyn StorageApi>,
    pub sqladmin: Arc<dyn SqlAdminApi>,
}

impl ServiceClientSet {
    /// Build the REST clients for `config`, in compute, storage, SQL admin order
    ///
    /// Stops at the first client that cannot be built; no partial set is
    /// ever returned.
    pub async fn connect(config: &InventoryConfig) -> Result<Self, InventoryError> {
        config.validate()?;

        let auth = config.auth_options();
        let timeout = Duration::from_secs(config.request_timeout_secs());
        let endpoints = config.endpoints();

        let build = |service: ServiceKind, name: &'static str, base: String| {
            let auth = auth.clone();
            async move {
                RestService::new(name, &base, &auth, timeout)
                    .await
                    .map_err(|source| InventoryError::ClientConstruction { service, source })
            }
        };

        let compute = build(ServiceKind::Compute, "compute", endpoints.compute.clone()).await?;
        let storage = build(ServiceKind::Storage, "storage", endpoints.storage.clone()).await?;
        let sqladmin = build(ServiceKind::SqlAdmin, "sqladmin", endpoints.sqladmin.clone()).await?;

        tracing::info!("Service clients ready for project {}", config.project_id());

        Ok(Self {
            compute: Arc::new(ComputeService::new(compute)),
            storage: Arc::new(StorageService::new(storage)),
            sqladmin: Arc::new(SqlAdminService::new(sqladmin)),
        })
    }

    /// Assemble a set from existing implementations, e.g. test doubles
    pub fn from_parts(
        compute: Arc<dyn ComputeApi>,
        storage: Arc<dyn StorageApi>,
        sqladmin: Arc<dyn SqlAdminApi>,
    ) -> Self {
        Self {
            compute,
            storage,
            sqladmin,
        }
    }
}
