//! Cloud Storage REST service

use async_trait::async_trait;

use super::client::RestService;
use crate::error::ApiError;
use crate::inventory::model::Bucket;
use crate::inventory::StorageApi;

/// Cloud Storage JSON API v1
#[derive(Clone)]
pub struct StorageService {
    rest: RestService,
}

impl StorageService {
    pub fn new(rest: RestService) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl StorageApi for StorageService {
    async fn list_buckets(&self, project: &str) -> Result<Vec<Bucket>, ApiError> {
        let mut url = self.rest.url(&["b"])?;
        url.query_pairs_mut().append_pair("project", project);
        self.rest.list_all(url, "items").await
    }
}
