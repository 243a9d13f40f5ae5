//! Cloud SQL Admin REST service

use async_trait::async_trait;

use super::client::RestService;
use crate::error::ApiError;
use crate::inventory::model::SqlInstance;
use crate::inventory::SqlAdminApi;

/// Cloud SQL Admin API v1beta4
#[derive(Clone)]
pub struct SqlAdminService {
    rest: RestService,
}

impl SqlAdminService {
    pub fn new(rest: RestService) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl SqlAdminApi for SqlAdminService {
    async fn list_instances(&self, project: &str) -> Result<Vec<SqlInstance>, ApiError> {
        let url = self.rest.url(&["projects", project, "instances"])?;
        self.rest.list_all(url, "items").await
    }
}
