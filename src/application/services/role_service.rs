//! Role management.

use std::sync::Arc;

use super::{batch, prepare};
use crate::application::gateway::RequestGateway;
use crate::domain::entities::{ListResult, RecordId, Role, RoleQuery, StatusResult};
use crate::domain::{Outcome, RequestDescriptor};
use crate::error::ApiError;

pub struct RoleService {
    gateway: Arc<RequestGateway>,
}

impl RoleService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    pub async fn query(&self, query: &RoleQuery) -> Outcome<ListResult<Role>> {
        if let Err(e) = query.page.validate() {
            return self.gateway.reject(ApiError::validation(e));
        }

        self.gateway
            .fetch(RequestDescriptor::get("/roles").with_query(query))
            .await
    }

    /// Enabled roles in the short form used by pickers.
    pub async fn select(&self) -> Outcome<ListResult<Role>> {
        self.gateway
            .fetch(RequestDescriptor::get("/roles.select"))
            .await
    }

    pub async fn get(&self, id: &str) -> Outcome<Role> {
        self.gateway
            .fetch(RequestDescriptor::get("/roles").with_segment(id))
            .await
    }

    pub async fn create(&self, role: &Role) -> Outcome<RecordId> {
        match prepare(role) {
            Ok(body) => self
                .gateway
                .fetch(RequestDescriptor::post("/roles", body))
                .await,
            Err(e) => self.gateway.reject(e),
        }
    }

    pub async fn update(&self, role: &Role) -> Outcome<StatusResult> {
        if role.record_id.is_empty() {
            return self.gateway.reject(ApiError::validation("role id is required"));
        }

        match prepare(role) {
            Ok(body) => self
                .gateway
                .fetch(RequestDescriptor::put("/roles", body).with_segment(&role.record_id))
                .await,
            Err(e) => self.gateway.reject(e),
        }
    }

    pub async fn delete(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(RequestDescriptor::delete("/roles").with_segment(id))
            .await
    }

    pub async fn delete_many(&self, ids: &[String]) -> Outcome<StatusResult> {
        if ids.is_empty() {
            return self.gateway.reject(ApiError::validation("no roles selected"));
        }

        self.gateway
            .fetch(RequestDescriptor::delete("/roles").with_param("batch", batch(ids)))
            .await
    }

    pub async fn enable(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(
                RequestDescriptor::patch("/roles")
                    .with_segment(id)
                    .with_segment("enable"),
            )
            .await
    }

    pub async fn disable(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(
                RequestDescriptor::patch("/roles")
                    .with_segment(id)
                    .with_segment("disable"),
            )
            .await
    }
}
