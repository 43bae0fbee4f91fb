//! API resource management.

use std::sync::Arc;

use super::{batch, prepare};
use crate::application::gateway::RequestGateway;
use crate::domain::entities::{ListResult, RecordId, Resource, ResourceQuery, StatusResult};
use crate::domain::{Outcome, RequestDescriptor};
use crate::error::ApiError;

pub struct ResourceService {
    gateway: Arc<RequestGateway>,
}

impl ResourceService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    pub async fn query(&self, query: &ResourceQuery) -> Outcome<ListResult<Resource>> {
        if let Err(e) = query.page.validate() {
            return self.gateway.reject(ApiError::validation(e));
        }

        self.gateway
            .fetch(RequestDescriptor::get("/resources").with_query(query))
            .await
    }

    pub async fn get(&self, id: &str) -> Outcome<Resource> {
        self.gateway
            .fetch(RequestDescriptor::get("/resources").with_segment(id))
            .await
    }

    pub async fn create(&self, resource: &Resource) -> Outcome<RecordId> {
        match prepare(resource) {
            Ok(body) => self
                .gateway
                .fetch(RequestDescriptor::post("/resources", body))
                .await,
            Err(e) => self.gateway.reject(e),
        }
    }

    pub async fn update(&self, resource: &Resource) -> Outcome<StatusResult> {
        if resource.record_id.is_empty() {
            return self.gateway.reject(ApiError::validation("resource id is required"));
        }

        match prepare(resource) {
            Ok(body) => self
                .gateway
                .fetch(RequestDescriptor::put("/resources", body).with_segment(&resource.record_id))
                .await,
            Err(e) => self.gateway.reject(e),
        }
    }

    pub async fn delete(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(RequestDescriptor::delete("/resources").with_segment(id))
            .await
    }

    pub async fn delete_many(&self, ids: &[String]) -> Outcome<StatusResult> {
        if ids.is_empty() {
            return self.gateway.reject(ApiError::validation("no resources selected"));
        }

        self.gateway
            .fetch(RequestDescriptor::delete("/resources").with_param("batch", batch(ids)))
            .await
    }
}
