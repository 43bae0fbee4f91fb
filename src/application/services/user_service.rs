//! User management.

use std::sync::Arc;

use super::prepare;
use crate::application::gateway::RequestGateway;
use crate::domain::entities::{ListResult, RecordId, StatusResult, User, UserQuery, hash_password};
use crate::domain::{Outcome, RequestDescriptor};
use crate::error::ApiError;

/// CRUD over `/users`.
///
/// A non-empty password is hashed before it leaves the process; an empty one
/// is omitted so that updates keep the stored password.
pub struct UserService {
    gateway: Arc<RequestGateway>,
}

impl UserService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    pub async fn query(&self, query: &UserQuery) -> Outcome<ListResult<User>> {
        if let Err(e) = query.page.validate() {
            return self.gateway.reject(ApiError::validation(e));
        }

        self.gateway
            .fetch(RequestDescriptor::get("/users").with_query(query))
            .await
    }

    pub async fn get(&self, id: &str) -> Outcome<User> {
        self.gateway
            .fetch(RequestDescriptor::get("/users").with_segment(id))
            .await
    }

    pub async fn create(&self, user: &User) -> Outcome<RecordId> {
        if user.password.is_empty() {
            return self.gateway.reject(ApiError::validation("password is required"));
        }

        match prepare(&with_hashed_password(user)) {
            Ok(body) => self
                .gateway
                .fetch(RequestDescriptor::post("/users", body))
                .await,
            Err(e) => self.gateway.reject(e),
        }
    }

    pub async fn update(&self, user: &User) -> Outcome<StatusResult> {
        if user.record_id.is_empty() {
            return self.gateway.reject(ApiError::validation("user id is required"));
        }

        match prepare(&with_hashed_password(user)) {
            Ok(body) => self
                .gateway
                .fetch(RequestDescriptor::put("/users", body).with_segment(&user.record_id))
                .await,
            Err(e) => self.gateway.reject(e),
        }
    }

    pub async fn delete(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(RequestDescriptor::delete("/users").with_segment(id))
            .await
    }

    pub async fn enable(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(
                RequestDescriptor::patch("/users")
                    .with_segment(id)
                    .with_segment("enable"),
            )
            .await
    }

    pub async fn disable(&self, id: &str) -> Outcome<StatusResult> {
        self.gateway
            .fetch(
                RequestDescriptor::patch("/users")
                    .with_segment(id)
                    .with_segment("disable"),
            )
            .await
    }
}

fn with_hashed_password(user: &User) -> User {
    let mut user = user.clone();
    if !user.password.is_empty() {
        user.password = hash_password(&user.password);
    }
    user.roles.clear();
    user
}
