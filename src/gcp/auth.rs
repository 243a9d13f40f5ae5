//! GCP Authentication
//!
//! Resolves credentials from, in order: a static access token, a service
//! account key file, or Application Default Credentials (ADC).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gcp_auth::{CustomServiceAccount, TokenProvider};
use tokio::sync::RwLock;

use crate::error::ApiError;

/// Default scopes for GCP API access
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Authentication options applied identically to every service client
#[derive(Debug, Clone, Default)]
pub struct AuthOptions {
    pub credentials_file: Option<PathBuf>,
    pub access_token: Option<String>,
}

#[derive(Clone)]
enum TokenSource {
    Provider(Arc<dyn TokenProvider>),
    Static(String),
}

/// GCP credentials holder with token caching
#[derive(Clone)]
pub struct GcpCredentials {
    source: TokenSource,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl GcpCredentials {
    /// Resolve credentials from the given options
    pub async fn from_options(options: &AuthOptions) -> Result<Self, ApiError> {
        if let Some(token) = &options.access_token {
            tracing::debug!("Using static access token");
            return Ok(Self::from_static_token(token));
        }

        let provider: Arc<dyn TokenProvider> = match &options.credentials_file {
            Some(path) => {
                tracing::debug!("Loading service account key from {:?}", path);
                Arc::new(CustomServiceAccount::from_file(path).map_err(ApiError::Auth)?)
            }
            None => gcp_auth::provider().await.map_err(ApiError::Auth)?,
        };

        Ok(Self {
            source: TokenSource::Provider(provider),
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Credentials backed by a fixed bearer token
    pub fn from_static_token(token: &str) -> Self {
        Self {
            source: TokenSource::Static(token.to_string()),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String, ApiError> {
        let provider = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Provider(provider) => provider,
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = provider.token(DEFAULT_SCOPES).await.map_err(ApiError::Auth)?;
        let token_str = token.as_str().to_string();

        // gcp_auth only exposes an optional expiry, use a conservative TTL
        let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token_str.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            (DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token_str)
    }
}

/// Get the gcloud configuration directory
pub fn get_gcloud_config_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|p| p.join("gcloud"))
}

/// Validate a GCP project ID format
/// Project IDs must be 6-30 characters, lowercase letters, digits, and hyphens
/// Must start with a letter and cannot end with a hyphen
pub fn validate_project_id(project: &str) -> bool {
    if project.len() < 6 || project.len() > 30 {
        return false;
    }

    match project.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {},
        _ => return false,
    }

    if project.ends_with('-') {
        return false;
    }

    project.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Read a `key = value` entry from a section of an INI-style gcloud file
fn read_gcloud_property(content: &str, section: &str, key: &str) -> Option<String> {
    let header = format!("[{}]", section);
    let mut in_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            in_section = line == header;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            if k.trim() == key {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

/// Read a property from the active gcloud configuration, then from `properties`
fn gcloud_property(section: &str, key: &str) -> Option<String> {
    let config_dir = get_gcloud_config_dir()?;

    let active_config_path = config_dir.join("active_config");
    if let Ok(active_config) = std::fs::read_to_string(&active_config_path) {
        let config_name = active_config.trim();

        // Security: Validate config name to prevent path traversal
        if config_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            let config_path = config_dir
                .join("configurations")
                .join(format!("config_{}", config_name));
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                if let Some(value) = read_gcloud_property(&content, section, key) {
                    return Some(value);
                }
            }
        } else {
            tracing::warn!("Invalid characters in active_config name");
        }
    }

    let content = std::fs::read_to_string(config_dir.join("properties")).ok()?;
    read_gcloud_property(&content, section, key)
}

/// Read the default project from the environment or gcloud configuration
/// Security: Validates project ID format before returning
pub fn get_default_project() -> Option<String> {
    for var in ["CLOUDSDK_CORE_PROJECT", "GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"] {
        if let Ok(project) = std::env::var(var) {
            if validate_project_id(&project) {
                return Some(project);
            }
            tracing::warn!("Invalid project ID format in {}", var);
        }
    }

    gcloud_property("core", "project").filter(|p| validate_project_id(p))
}

/// Get the default compute region from the environment or gcloud configuration
pub fn get_default_region() -> Option<String> {
    if let Ok(region) = std::env::var("CLOUDSDK_COMPUTE_REGION") {
        if !region.trim().is_empty() {
            return Some(region);
        }
    }

    gcloud_property("compute", "region").filter(|r| !r.is_empty())
}
