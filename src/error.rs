//! Error types
//!
//! [`ApiError`] describes a failure talking to a GCP REST endpoint.
//! [`InventoryError`] is what the inventory operations return; it wraps an
//! [`ApiError`] with the context that makes it fatal (which client, region or
//! resource kind). Per-zone listing failures are never errors, they are
//! recorded in [`crate::inventory::PartialResult`] instead.

use std::fmt;

use thiserror::Error;

use crate::inventory::ResourceKind;

/// Failure of a single GCP API interaction
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("invalid endpoint {0}")]
    InvalidEndpoint(String),

    #[error("failed to obtain credentials")]
    Auth(#[source] gcp_auth::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed: {status} {message}")]
    Status { status: u16, message: String },

    #[error("failed to parse response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("page token {token} repeated while listing {url}")]
    RepeatedPageToken { url: String, token: String },
}

impl ApiError {
    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// The three service clients built by the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Compute,
    Storage,
    SqlAdmin,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceKind::Compute => "compute",
            ServiceKind::Storage => "storage",
            ServiceKind::SqlAdmin => "SQL admin",
        };
        f.write_str(name)
    }
}

/// Errors returned by inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Configuration rejected before any client was built
    #[error("invalid configuration: {0}")]
    Config(String),

    /// One of the service clients could not be built; nothing was queried
    #[error("failed to create {service} service")]
    ClientConstruction {
        service: ServiceKind,
        #[source]
        source: ApiError,
    },

    /// The unfiltered zone listing failed, so the region's zones are unknown
    #[error("failed to get zones for region {region}")]
    ZoneResolution {
        region: String,
        #[source]
        source: ApiError,
    },

    /// The single call backing a project-scoped kind failed
    #[error("failed to list {kind}{}", in_region(.region))]
    ProjectScopedList {
        kind: ResourceKind,
        region: Option<String>,
        #[source]
        source: ApiError,
    },

    /// Raised only when a caller asks for a complete zone-scoped listing
    #[error("incomplete {kind} listing for region {region}: {failed} of {attempted} zones failed")]
    IncompleteZones {
        kind: ResourceKind,
        region: String,
        attempted: usize,
        failed: usize,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl InventoryError {
    /// Region named by the error, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            InventoryError::ZoneResolution { region, .. }
            | InventoryError::IncompleteZones { region, .. } => Some(region),
            InventoryError::ProjectScopedList { region, .. } => region.as_deref(),
            _ => None,
        }
    }

    /// Resource kind named by the error, if any
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            InventoryError::ProjectScopedList { kind, .. }
            | InventoryError::IncompleteZones { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

fn in_region(region: &Option<String>) -> String {
    match region {
        Some(r) => format!(" in region {}", r),
        None => String::new(),
    }
}

/// Render an error together with its source chain on one line
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_scoped_message_names_kind_and_region() {
        let err = InventoryError::ProjectScopedList {
            kind: ResourceKind::Subnet,
            region: Some("us-central1".to_string()),
            source: ApiError::Status {
                status: 403,
                message: "forbidden".to_string(),
            },
        };
        assert_eq!(err.to_string(), "failed to list subnets in region us-central1");
        assert_eq!(err.region(), Some("us-central1"));
        assert_eq!(err.kind(), Some(ResourceKind::Subnet));
    }

    #[test]
    fn test_project_scoped_message_without_region() {
        let err = InventoryError::ProjectScopedList {
            kind: ResourceKind::StorageBucket,
            region: None,
            source: ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            },
        };
        assert_eq!(err.to_string(), "failed to list storage buckets");
        assert_eq!(err.region(), None);
    }

    #[test]
    fn test_error_chain_includes_source() {
        let err = InventoryError::ZoneResolution {
            region: "europe-west1".to_string(),
            source: ApiError::Status {
                status: 403,
                message: "Permission denied".to_string(),
            },
        };
        assert_eq!(
            error_chain(&err),
            "failed to get zones for region europe-west1: API request failed: 403 Permission denied"
        );
    }

    #[test]
    fn test_service_kind_display() {
        assert_eq!(ServiceKind::SqlAdmin.to_string(), "SQL admin");
        let err = InventoryError::ClientConstruction {
            service: ServiceKind::Storage,
            source: ApiError::InvalidEndpoint("nope".to_string()),
        };
        assert_eq!(err.to_string(), "failed to create storage service");
    }
}
