//! GCP Client
//!
//! A REST handle for one API surface: credentials, HTTP transport and the
//! service's base URL. The compute, storage and SQL admin services are thin
//! wrappers around it.

use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::auth::{AuthOptions, GcpCredentials};
use super::http::GcpHttpClient;
use crate::error::ApiError;

/// Authenticated handle for one GCP REST API
#[derive(Clone)]
pub struct RestService {
    credentials: GcpCredentials,
    http: GcpHttpClient,
    base: Url,
}

impl RestService {
    /// Build a handle for the API rooted at `base_url`
    pub async fn new(
        name: &str,
        base_url: &str,
        auth: &AuthOptions,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;
        let http = GcpHttpClient::new(&format!("gcp-inventory/{} ({})", env!("CARGO_PKG_VERSION"), name), timeout)?;
        let credentials = GcpCredentials::from_options(auth).await?;

        tracing::debug!("{} service ready at {}", name, base);

        Ok(Self {
            credentials,
            http,
            base,
        })
    }

    /// Build a URL from path segments, percent-encoding each one
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        self.base
            .join(&path)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}{}: {}", self.base, path, e)))
    }

    /// Make an authenticated GET request
    pub async fn get(&self, url: &Url) -> Result<Value, ApiError> {
        let token = self.credentials.get_token().await?;
        self.http.get(url.as_str(), &token).await
    }

    /// Fetch every page of a list call and decode the `items_key` array
    ///
    /// A `nextPageToken` seen before ends the listing with
    /// [`ApiError::RepeatedPageToken`] instead of looping.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        url: Url,
        items_key: &str,
    ) -> Result<Vec<T>, ApiError> {
        let mut all_items = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut page_url = url.clone();
            if let Some(token) = &page_token {
                page_url.query_pairs_mut().append_pair("pageToken", token);
            }

            let response = self.get(&page_url).await?;
            all_items.extend(extract_items::<T>(&response, items_key, &page_url)?);

            page_token = next_page_token(&response, &mut seen_tokens, &url)?;
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_items)
    }
}

/// Token for the next page; `None` on the last page
fn next_page_token(
    response: &Value,
    seen: &mut HashSet<String>,
    url: &Url,
) -> Result<Option<String>, ApiError> {
    let token = match response.get("nextPageToken").and_then(|v| v.as_str()) {
        Some(token) if !token.is_empty() => token,
        _ => return Ok(None),
    };
    if !seen.insert(token.to_string()) {
        tracing::warn!("Page token {} repeated while listing {}", token, url);
        return Err(ApiError::RepeatedPageToken {
            url: url.to_string(),
            token: token.to_string(),
        });
    }
    Ok(Some(token.to_string()))
}

fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    let url = Url::parse(&normalized)
        .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidEndpoint(base_url.to_string()));
    }
    Ok(url)
}

/// Decode the list under `items_key`; a missing key means an empty page
fn extract_items<T: DeserializeOwned>(
    response: &Value,
    items_key: &str,
    url: &Url,
) -> Result<Vec<T>, ApiError> {
    match response.get(items_key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items.clone()).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        }),
    }
}

/// Extract short name from a GCP resource URL
/// e.g., "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a" -> "us-central1-a"
pub fn short_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_name() {
        assert_eq!(
            short_name("https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a"),
            "us-central1-a"
        );
        assert_eq!(short_name("us-central1-a"), "us-central1-a");
    }

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("http://localhost:1234/compute/v1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/compute/v1/");
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_extract_items_missing_key_is_empty() {
        let url = Url::parse("http://localhost/").unwrap();
        let items: Vec<Value> = extract_items(&json!({"kind": "compute#zoneList"}), "items", &url).unwrap();
        assert!(items.is_empty());

        let items: Vec<Value> = extract_items(&json!({"items": [{"name": "a"}]}), "items", &url).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_next_page_token_stops_on_repeat() {
        let url = Url::parse("http://localhost/list").unwrap();
        let mut seen = HashSet::new();

        let page = json!({"items": [], "nextPageToken": "p2"});
        assert_eq!(next_page_token(&page, &mut seen, &url).unwrap().as_deref(), Some("p2"));
        assert!(matches!(
            next_page_token(&page, &mut seen, &url),
            Err(ApiError::RepeatedPageToken { ref token, .. }) if token == "p2"
        ));

        assert_eq!(next_page_token(&json!({"nextPageToken": ""}), &mut seen, &url).unwrap(), None);
        assert_eq!(next_page_token(&json!({}), &mut seen, &url).unwrap(), None);
    }

    #[test]
    fn test_extract_items_wrong_shape_is_decode_error() {
        let url = Url::parse("http://localhost/").unwrap();
        let result: Result<Vec<Value>, _> = extract_items(&json!({"items": "nope"}), "items", &url);
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }
}
