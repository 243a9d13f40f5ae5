//! Resource aggregation
//!
//! One operation per resource kind. Zone-scoped kinds resolve the region's
//! zones (fatal on failure) and fan out one call per zone (failures absorbed
//! into the [`PartialResult`]). Project-scoped kinds make a single call and
//! fail as a whole. Placeholder kinds return empty results.

use serde::Serialize;
use serde_json::{Map, Value};

use super::assembler::PartialResult;
use super::capability::ComputeApi;
use super::clients::ServiceClientSet;
use super::context::RequestContext;
use super::fanout::fan_out;
use super::kind::{Capability, ResourceKind};
use super::model::{Bucket, Disk, Firewall, Instance, Network, SqlInstance, Subnetwork};
use super::zones;
use crate::config::{InventoryConfig, DEFAULT_MAX_CONCURRENT_ZONES};
use crate::error::{ApiError, InventoryError};

/// Outcome of [`Inventory::collect`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Collected {
    /// Project-scoped kind: the single call succeeded
    Complete { items: Vec<Value> },
    /// Zone-scoped kind: merged items plus per-zone failures
    Partial(PartialResult<Value>),
    /// No query backs this kind yet
    NotImplemented,
}

impl Collected {
    pub fn items(&self) -> &[Value] {
        match self {
            Collected::Complete { items } => items,
            Collected::Partial(partial) => &partial.items,
            Collected::NotImplemented => &[],
        }
    }
}

/// Queries resources through a shared [`ServiceClientSet`]
#[derive(Clone)]
pub struct Inventory {
    clients: ServiceClientSet,
    zone_concurrency: usize,
}

impl Inventory {
    pub fn new(clients: ServiceClientSet) -> Self {
        Self {
            clients,
            zone_concurrency: DEFAULT_MAX_CONCURRENT_ZONES,
        }
    }

    /// Build the service clients for `config` and wrap them
    pub async fn connect(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let clients = ServiceClientSet::connect(config).await?;
        Ok(Self::new(clients).with_zone_concurrency(config.max_concurrent_zones()))
    }

    pub fn with_zone_concurrency(mut self, limit: usize) -> Self {
        self.zone_concurrency = limit.max(1);
        self
    }

    pub fn clients(&self) -> &ServiceClientSet {
        &self.clients
    }

    fn compute(&self) -> &dyn ComputeApi {
        self.clients.compute.as_ref()
    }

    /// Zones of `region`, in listing order
    pub async fn resolve_zones(
        &self,
        ctx: &RequestContext,
        project: &str,
        region: &str,
    ) -> Result<Vec<String>, InventoryError> {
        zones::resolve_zones(self.compute(), ctx, project, region).await
    }

    // =========================================================================
    // Zone-scoped kinds
    // =========================================================================

    pub async fn compute_instances(
        &self,
        ctx: &RequestContext,
        project: &str,
        region: &str,
    ) -> Result<PartialResult<Instance>, InventoryError> {
        let zones = self.resolve_zones(ctx, project, region).await?;
        let result = fan_out(ctx, &zones, self.zone_concurrency, |zone| {
            self.compute().list_instances(project, zone)
        })
        .await?;
        log_partial(ResourceKind::ComputeInstance, region, &result);
        Ok(result)
    }

    pub async fn persistent_disks(
        &self,
        ctx: &RequestContext,
        project: &str,
        region: &str,
    ) -> Result<PartialResult<Disk>, InventoryError> {
        let zones = self.resolve_zones(ctx, project, region).await?;
        let result = fan_out(ctx, &zones, self.zone_concurrency, |zone| {
            self.compute().list_disks(project, zone)
        })
        .await?;
        log_partial(ResourceKind::PersistentDisk, region, &result);
        Ok(result)
    }

    // =========================================================================
    // Project-scoped kinds
    // =========================================================================

    pub async fn storage_buckets(
        &self,
        ctx: &RequestContext,
        project: &str,
    ) -> Result<Vec<Bucket>, InventoryError> {
        let call = self.clients.storage.list_buckets(project);
        single_call(ctx, ResourceKind::StorageBucket, None, call).await
    }

    pub async fn vpc_networks(
        &self,
        ctx: &RequestContext,
        project: &str,
    ) -> Result<Vec<Network>, InventoryError> {
        let call = self.compute().list_networks(project);
        single_call(ctx, ResourceKind::VpcNetwork, None, call).await
    }

    /// One call for the whole region, not one per zone
    pub async fn subnets(
        &self,
        ctx: &RequestContext,
        project: &str,
        region: &str,
    ) -> Result<Vec<Subnetwork>, InventoryError> {
        zones::require_region(region)?;
        let call = self.compute().list_subnetworks(project, region);
        single_call(ctx, ResourceKind::Subnet, Some(region), call).await
    }

    pub async fn firewall_rules(
        &self,
        ctx: &RequestContext,
        project: &str,
    ) -> Result<Vec<Firewall>, InventoryError> {
        let call = self.compute().list_firewalls(project);
        single_call(ctx, ResourceKind::FirewallRule, None, call).await
    }

    pub async fn cloud_sql_instances(
        &self,
        ctx: &RequestContext,
        project: &str,
    ) -> Result<Vec<SqlInstance>, InventoryError> {
        let call = self.clients.sqladmin.list_instances(project);
        single_call(ctx, ResourceKind::CloudSqlInstance, None, call).await
    }

    // =========================================================================
    // Placeholders: always empty, never an error
    // =========================================================================

    pub async fn gke_clusters(&self, _ctx: &RequestContext, _project: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(Vec::new())
    }

    pub async fn cloud_sql_databases(&self, _ctx: &RequestContext, _project: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(Vec::new())
    }

    pub async fn cloud_sql_users(&self, _ctx: &RequestContext, _project: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(Vec::new())
    }

    pub async fn project_iam_policy(&self, _ctx: &RequestContext, _project: &str) -> Result<Map<String, Value>, InventoryError> {
        Ok(Map::new())
    }

    pub async fn service_accounts(&self, _ctx: &RequestContext, _project: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(Vec::new())
    }

    pub async fn service_account_keys(&self, _ctx: &RequestContext, _project: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(Vec::new())
    }

    pub async fn service_account_iam_policy(&self, _ctx: &RequestContext, _project: &str) -> Result<Map<String, Value>, InventoryError> {
        Ok(Map::new())
    }

    pub async fn custom_roles(&self, _ctx: &RequestContext, _project: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(Vec::new())
    }

    // =========================================================================
    // Generic dispatch
    // =========================================================================

    /// Query any kind and return its records as JSON values
    ///
    /// `region` is required for regional kinds and ignored otherwise.
    /// Placeholder kinds return [`Collected::NotImplemented`] without making
    /// any call.
    pub async fn collect(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        project: &str,
        region: Option<&str>,
    ) -> Result<Collected, InventoryError> {
        let regional = match kind.capability() {
            Capability::NotImplemented => return Ok(Collected::NotImplemented),
            Capability::Implemented { regional, scope } => {
                tracing::debug!("Collecting {} ({:?} scope)", kind, scope);
                regional
            }
        };

        let region = match (regional, region) {
            (true, Some(r)) => r,
            (true, None) => {
                return Err(InventoryError::Config(format!("{} require a region", kind)));
            }
            (false, _) => "",
        };

        let collected = match kind {
            ResourceKind::ComputeInstance => {
                Collected::Partial(to_values(self.compute_instances(ctx, project, region).await?))
            }
            ResourceKind::PersistentDisk => {
                Collected::Partial(to_values(self.persistent_disks(ctx, project, region).await?))
            }
            ResourceKind::StorageBucket => complete(self.storage_buckets(ctx, project).await?),
            ResourceKind::VpcNetwork => complete(self.vpc_networks(ctx, project).await?),
            ResourceKind::Subnet => complete(self.subnets(ctx, project, region).await?),
            ResourceKind::FirewallRule => complete(self.firewall_rules(ctx, project).await?),
            ResourceKind::CloudSqlInstance => complete(self.cloud_sql_instances(ctx, project).await?),
            ResourceKind::GkeCluster
            | ResourceKind::CloudSqlDatabase
            | ResourceKind::CloudSqlUser
            | ResourceKind::ProjectIamPolicy
            | ResourceKind::ServiceAccount
            | ResourceKind::ServiceAccountKey
            | ResourceKind::ServiceAccountIamPolicy
            | ResourceKind::CustomRole => {
                // Marked implemented in kind.rs but given no query here
                tracing::error!("{} has no query behind it", kind);
                return Err(InventoryError::Config(format!("no query implemented for {}", kind)));
            }
        };
        Ok(collected)
    }
}

/// Issue the single call behind a project-scoped kind
async fn single_call<T, F>(
    ctx: &RequestContext,
    kind: ResourceKind,
    region: Option<&str>,
    call: F,
) -> Result<Vec<T>, InventoryError>
where
    F: std::future::Future<Output = Result<Vec<T>, ApiError>>,
{
    let items = ctx
        .run(call)
        .await?
        .map_err(|source| InventoryError::ProjectScopedList {
            kind,
            region: region.map(str::to_string),
            source,
        })?;
    tracing::debug!("Listed {} {}", items.len(), kind);
    Ok(items)
}

fn log_partial<T>(kind: ResourceKind, region: &str, result: &PartialResult<T>) {
    if result.is_complete() {
        tracing::debug!(
            "Listed {} {} across {} zones of {}",
            result.items.len(),
            kind,
            result.zones_attempted.len(),
            region
        );
    } else {
        tracing::warn!(
            "Listed {} {} in {}: {} of {} zones failed",
            result.items.len(),
            kind,
            region,
            result.failures.len(),
            result.zones_attempted.len()
        );
    }
}

fn to_value<T: Serialize>(item: T) -> Value {
    // Records are plain data with string keys; serialization cannot fail
    serde_json::to_value(item).unwrap_or(Value::Null)
}

fn to_values<T: Serialize>(result: PartialResult<T>) -> PartialResult<Value> {
    result.map(to_value)
}

fn complete<T: Serialize>(items: Vec<T>) -> Collected {
    Collected::Complete {
        items: items.into_iter().map(to_value).collect(),
    }
}
