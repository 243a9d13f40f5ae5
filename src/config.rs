//! Configuration Management
//!
//! [`InventoryConfig`] is the immutable input to the inventory: which project,
//! which regions, and how to authenticate. [`ConfigFile`] persists the user's
//! defaults between runs.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::gcp::auth::{self, AuthOptions};

/// Default number of zone list calls allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT_ZONES: usize = 4;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding a pre-minted OAuth access token
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Base URLs of the three REST surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub compute: String,
    pub storage: String,
    pub sqladmin: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            compute: "https://compute.googleapis.com/compute/v1/".to_string(),
            storage: "https://storage.googleapis.com/storage/v1/".to_string(),
            sqladmin: "https://sqladmin.googleapis.com/v1beta4/".to_string(),
        }
    }
}

impl Endpoints {
    /// Point all three services at one root, e.g. a mock server
    pub fn with_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            compute: format!("{}/compute/v1/", root),
            storage: format!("{}/storage/v1/", root),
            sqladmin: format!("{}/v1beta4/", root),
        }
    }
}

/// Inventory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    project_id: String,
    #[serde(default)]
    credentials_file: Option<PathBuf>,
    #[serde(default)]
    regions: Vec<String>,
    /// Never written back to disk
    #[serde(default, skip_serializing)]
    access_token: Option<String>,
    #[serde(default = "default_max_concurrent_zones")]
    max_concurrent_zones: usize,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default)]
    endpoints: Endpoints,
}

fn default_max_concurrent_zones() -> usize {
    DEFAULT_MAX_CONCURRENT_ZONES
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl InventoryConfig {
    /// Create a configuration for a project and an ordered set of regions
    pub fn new<I, S>(project_id: &str, regions: I) -> Result<Self, InventoryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = Self {
            project_id: project_id.trim().to_string(),
            credentials_file: None,
            regions: regions.into_iter().map(Into::into).collect(),
            access_token: None,
            max_concurrent_zones: DEFAULT_MAX_CONCURRENT_ZONES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a deserialized config may have skipped
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.project_id.trim().is_empty() {
            return Err(InventoryError::Config("project ID must not be empty".to_string()));
        }
        if self.regions.iter().any(|r| r.trim().is_empty()) {
            return Err(InventoryError::Config("region identifiers must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Limit of zone calls in flight; clamped to at least one
    pub fn with_max_concurrent_zones(mut self, limit: usize) -> Self {
        self.max_concurrent_zones = limit.max(1);
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Pick up `GOOGLE_OAUTH_ACCESS_TOKEN` if no token was set explicitly
    pub fn with_env_access_token(mut self) -> Self {
        if self.access_token.is_none() {
            self.access_token = std::env::var(ACCESS_TOKEN_ENV)
                .ok()
                .filter(|t| !t.trim().is_empty());
        }
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn credentials_file(&self) -> Option<&Path> {
        self.credentials_file.as_deref()
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn max_concurrent_zones(&self) -> usize {
        self.max_concurrent_zones.max(1)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Authentication options shared by every service client
    pub fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            credentials_file: self.credentials_file.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

/// Persisted user defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Last used project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// Default regions to inventory
    #[serde(default)]
    pub regions: Vec<String>,
    /// Service account key to authenticate with
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    #[serde(default)]
    pub max_concurrent_zones: Option<usize>,
}

impl ConfigFile {
    /// Get the config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcp-inventory").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::default_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective project (CLI > config > gcloud default)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.project_id.clone())
            .or_else(auth::get_default_project)
    }

    /// Get effective regions (CLI > config > gcloud default region)
    pub fn effective_regions(&self, cli: &[String]) -> Vec<String> {
        if !cli.is_empty() {
            return cli.to_vec();
        }
        if !self.regions.is_empty() {
            return self.regions.clone();
        }
        auth::get_default_region().into_iter().collect()
    }
}
