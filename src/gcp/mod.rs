//! GCP API interaction module
//!
//! Authentication, HTTP transport, and REST implementations of the inventory
//! capability traits.
//!
//! # Module Structure
//!
//! - [`auth`] - Credentials: static token, service account key, or ADC
//! - [`http`] - HTTP utilities for REST API calls
//! - [`client`] - Authenticated handle for one API surface, with pagination
//! - [`compute`], [`storage`], [`sqladmin`] - The three service clients

pub mod auth;
pub mod client;
pub mod compute;
pub mod http;
pub mod sqladmin;
pub mod storage;

pub use compute::ComputeService;
pub use sqladmin::SqlAdminService;
pub use storage::StorageService;
