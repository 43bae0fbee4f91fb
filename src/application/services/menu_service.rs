//! Menu management.

use std::sync::Arc;

use super::{batch, prepare};
use crate::application::gateway::RequestGateway;
use crate::domain::entities::{ListResult, Menu, MenuQuery, MenuTreeNode, RecordId, StatusResult};
use crate::domain::{Outcome, RequestDescriptor};
use crate::error::ApiError;

/// CRUD over `/menus`.
///
/// Create and update enforce the menu hierarchy: a system menu is a root,
/// modules and functions live under a system or module, resources under a
/// function.
pub struct MenuService {
    gateway: Arc<RequestGateway>,
}

impl MenuService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Paged listing.
    pub async fn query(&self, query: &MenuQuery) -> Outcome<ListResult<Menu>> {
        if let Err(e) = query.page.validate() {
            return self.gateway.reject(ApiError::validation(e));
        }

        self.gateway
            .fetch(RequestDescriptor::get("/menus").with_query(query))
            .await
    }

    /// Navigable menus as a tree.
    pub async fn tree(&self) -> Outcome<ListResult<MenuTreeNode>> {
        self.gateway
            .fetch(RequestDescriptor::get("/menus").with_query(&MenuQuery::tree()))
            .await
    }

    pub async fn get(&self, id: &str) -> Outcome<Menu> {
        self.gateway
            .fetch(RequestDescriptor::get("/menus").with_segment(id))
            .await
    }

    pub async fn create(&self, menu: &Menu) -> Outcome<RecordId> {
        let body = match prepare(menu) {
            Ok(body) => body,
            Err(e) => return self.gateway.reject(e),
        };
        if let Some(failure) = self.check_hierarchy(menu).await {
            return failure;
        }

        self.gateway
            .fetch(RequestDescriptor::post("/menus", body))
            .await
    }

    pub async fn update(&self, menu: &Menu) -> Outcome<StatusResult> {
        if menu.record_id.is_empty() {
            return self.gateway.reject(ApiError::validation("menu id is required"));
        }
        let body = match prepare(menu) {
            Ok(body) => body,
            Err(e) => return self.gateway.reject(e),
        };
        if let Some(failure) = self.check_hierarchy(menu).await {
            return failure;
        }

        self.gateway
            .fetch(RequestDescriptor::put("/menus", body).with_segment(&menu.record_id))
            .await
    }

    pub async fn delete(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(RequestDescriptor::delete("/menus").with_segment(id))
            .await
    }

    pub async fn delete_many(&self, ids: &[String]) -> Outcome<StatusResult> {
        if ids.is_empty() {
            return self.gateway.reject(ApiError::validation("no menus selected"));
        }

        self.gateway
            .fetch(RequestDescriptor::delete("/menus").with_param("batch", batch(ids)))
            .await
    }

    pub async fn enable(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(
                RequestDescriptor::patch("/menus")
                    .with_segment(id)
                    .with_segment("enable"),
            )
            .await
    }

    pub async fn disable(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(
                RequestDescriptor::patch("/menus")
                    .with_segment(id)
                    .with_segment("disable"),
            )
            .await
    }

    /// `None` when the placement is allowed, otherwise the outcome to return.
    ///
    /// A rejected credential on the parent lookup ends the call with an
    /// empty success, like any other unauthorized call.
    async fn check_hierarchy<T: Default>(&self, menu: &Menu) -> Option<Outcome<T>> {
        let Some(kind) = menu.menu_kind() else {
            return Some(self.gateway.reject(ApiError::validation(format!(
                "unknown menu type {}",
                menu.kind
            ))));
        };

        let parent_kind = if menu.parent_id.is_empty() {
            None
        } else {
            let exchange = self
                .gateway
                .exchange(RequestDescriptor::get("/menus").with_segment(&menu.parent_id))
                .await;
            if exchange.session_ended() {
                return Some(Outcome::Success(T::default()));
            }

            match self.gateway.decode::<Menu>(exchange) {
                Outcome::Success(parent) if !parent.record_id.is_empty() => parent.menu_kind(),
                Outcome::Success(_) => {
                    return Some(self.gateway.reject(ApiError::validation(
                        "parent menu does not exist",
                    )));
                }
                Outcome::Failure(e) => return Some(Outcome::Failure(e)),
            }
        };

        match kind.check_parent(parent_kind) {
            Ok(()) => None,
            Err(msg) => Some(self.gateway.reject(ApiError::validation(msg))),
        }
    }
}
