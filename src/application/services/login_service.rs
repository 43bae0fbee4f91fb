//! Login, captcha and current-user calls.

use std::sync::Arc;

use serde_json::json;
use validator::Validate;

use super::validation_error;
use crate::application::gateway::RequestGateway;
use crate::domain::entities::{
    CaptchaId, CurrentUser, ListResult, LoginForm, MenuTreeNode, PasswordForm, StatusResult,
};
use crate::domain::{Credential, Outcome, RequestDescriptor};

/// Session entry and exit plus the current user's own data.
pub struct LoginService {
    gateway: Arc<RequestGateway>,
}

impl LoginService {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Asks the backend for a new captcha id.
    pub async fn captcha_id(&self) -> Outcome<CaptchaId> {
        self.gateway
            .fetch(RequestDescriptor::get("/login/captchaid"))
            .await
    }

    /// URL of the captcha image for `captcha_id`.
    ///
    /// With `reload` the URL gets a cache-busting parameter so the backend
    /// renders a new image for the same id.
    pub fn captcha_url(&self, captcha_id: &str, reload: bool) -> Option<String> {
        let mut query = vec![("id".to_string(), captcha_id.to_string())];
        if reload {
            query.push((
                "reload".to_string(),
                chrono::Utc::now().timestamp_millis().to_string(),
            ));
        }

        self.gateway
            .url_for("/login/captcha", &[], &query)
            .ok()
            .map(|u| u.to_string())
    }

    /// Logs in. The issued token is stored by the gateway.
    ///
    /// A 401 answer yields an empty credential rather than a failure.
    ///
    /// # Errors
    ///
    /// An invalid form fails with a validation error and is not sent.
    pub async fn login(&self, form: &LoginForm) -> Outcome<Credential> {
        if let Err(e) = form.validate() {
            return self.gateway.reject(validation_error(&e));
        }

        self.gateway
            .fetch(RequestDescriptor::post("/login", form.to_payload()).issues_credential())
            .await
    }

    /// Ends the session on the backend and forgets the local credential.
    ///
    /// Backend failures are not notified; the local credential is cleared
    /// either way.
    pub async fn logout(&self) -> Outcome<StatusResult> {
        let outcome = self
            .gateway
            .fetch(RequestDescriptor::post("/login/exit", json!({})).not_notify())
            .await;
        self.gateway.clear_credential().await;
        outcome
    }

    pub async fn current_user(&self) -> Outcome<CurrentUser> {
        self.gateway
            .fetch(RequestDescriptor::get("/current/user"))
            .await
    }

    /// Menus the current user may navigate.
    pub async fn menu_tree(&self) -> Outcome<ListResult<MenuTreeNode>> {
        self.gateway
            .fetch(RequestDescriptor::get("/current/menutree"))
            .await
    }

    pub async fn update_password(&self, form: &PasswordForm) -> Outcome<StatusResult> {
        if let Err(e) = form.validate() {
            return self.gateway.reject(validation_error(&e));
        }

        self.gateway
            .fetch(RequestDescriptor::put("/current/password", form.to_payload()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{gateway, gateway_expecting};
    use crate::domain::HttpMethod;
    use crate::domain::entities::hash_password;
    use crate::error::ErrorKind;
    use crate::infrastructure::transport::{MockTransport, TransportResponse};
    use serde_json::Value;

    #[tokio::test]
    async fn test_login_stores_token_and_hashes_password() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| {
                let body: Value = serde_json::from_str(r.body.as_deref().unwrap_or("{}")).unwrap();
                r.method == HttpMethod::Post
                    && r.url.ends_with("/api/v1/login")
                    && body["password"] == hash_password("secret")
            })
            .times(1)
            .returning(|_| {
                Ok(TransportResponse::new(
                    200,
                    r#"{"access_token":"tok","token_type":"Bearer","expires_at":1900000000}"#,
                ))
            });
        let gw = gateway(transport);
        let service = LoginService::new(gw.clone());

        let form = LoginForm {
            user_name: "root".into(),
            password: "secret".into(),
            captcha_id: "cid".into(),
            captcha_code: "1234".into(),
        };
        let credential = service.login(&form).await.into_result().unwrap();

        assert_eq!(credential.access_token, "tok");
        assert_eq!(gw.get_credential().await, "Bearer tok");
    }

    #[tokio::test]
    async fn test_invalid_login_is_not_sent() {
        let transport = MockTransport::new();
        let service = LoginService::new(gateway_expecting(transport, 1));

        let err = service
            .login(&LoginForm::default())
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.status, 0);
    }

    #[tokio::test]
    async fn test_unauthorized_login_is_empty_credential() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(TransportResponse::new(401, "")));
        let gw = gateway_expecting(transport, 0);
        let service = LoginService::new(gw.clone());

        let form = LoginForm {
            user_name: "root".into(),
            password: "secret".into(),
            captcha_id: "cid".into(),
            captcha_code: "1234".into(),
        };
        let credential = service.login(&form).await.into_result().unwrap();

        assert_eq!(credential, Credential::default());
        assert!(gw.current_credential().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_credential_even_on_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/login/exit"))
            .returning(|_| Ok(TransportResponse::new(500, "")));
        let gw = gateway_expecting(transport, 0);
        gw.set_credential(Credential::new("tok", "Bearer", None)).await;

        let outcome = LoginService::new(gw.clone()).logout().await;

        assert!(outcome.is_failure());
        assert_eq!(gw.get_credential().await, "");
    }

    #[tokio::test]
    async fn test_menu_tree_decodes_nodes() {
        let mut transport = MockTransport::new();
        transport.expect_execute().returning(|_| {
            Ok(TransportResponse::new(
                200,
                r#"{"list":[{"record_id":"1","name":"System","router":"/system","children":[{"record_id":"2","name":"Menus"}]}]}"#,
            ))
        });
        let service = LoginService::new(gateway(transport));

        let tree = service.menu_tree().await.into_result().unwrap();

        assert_eq!(tree.list.len(), 1);
        assert_eq!(tree.list[0].children[0].name, "Menus");
    }

    #[test]
    fn test_captcha_url() {
        let service = LoginService::new(gateway(MockTransport::new()));

        assert_eq!(
            service.captcha_url("abc", false).as_deref(),
            Some("http://127.0.0.1:10088/api/v1/login/captcha?id=abc")
        );
        assert!(service.captcha_url("abc", true).unwrap().contains("&reload="));
    }
}
