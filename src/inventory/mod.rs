//! Resource inventory
//!
//! Discovers a project's resources region by region through the service
//! clients built by [`ServiceClientSet::connect`].
//!
//! # Architecture
//!
//! - [`clients`] - Builds the compute, storage and SQL admin handles (fail fast)
//! - [`zones`] - Resolves a region to its zones from the unfiltered zone list
//! - [`aggregator`] - One operation per resource kind
//! - [`fanout`] - Bounded, cancellable per-zone dispatch
//! - [`assembler`] - Merges per-zone outcomes in zone order
//!
//! # Failure semantics
//!
//! | Failure                       | Effect                                   |
//! |-------------------------------|------------------------------------------|
//! | building a service client     | fatal, nothing is queried                |
//! | listing zones                 | fatal for that region's zone-scoped kinds |
//! | listing one zone              | absorbed, recorded in [`PartialResult`]  |
//! | a project-scoped list call    | fatal, names the kind (and region)       |
//!
//! # Example
//!
//! ```ignore
//! use gcp_inventory::{InventoryConfig, Inventory, RequestContext};
//!
//! async fn example() -> Result<(), gcp_inventory::InventoryError> {
//!     let config = InventoryConfig::new("my-project", ["us-central1"])?;
//!     let inventory = Inventory::connect(&config).await?;
//!     let ctx = RequestContext::new();
//!     let instances = inventory.compute_instances(&ctx, "my-project", "us-central1").await?;
//!     println!("{} instances, {} zones failed", instances.items.len(), instances.failures.len());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod assembler;
pub mod capability;
pub mod clients;
pub mod context;
pub mod fanout;
pub mod kind;
pub mod model;
pub mod zones;

pub use aggregator::{Collected, Inventory};
pub use assembler::{PartialResult, ZoneFailure};
pub use capability::{ComputeApi, SqlAdminApi, StorageApi};
pub use clients::ServiceClientSet;
pub use context::{Interrupted, RequestContext};
pub use kind::{Capability, ResourceKind, Scope};
