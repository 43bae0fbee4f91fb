mod common;

use std::time::Duration;

use admin_console::application::{SessionTeardown, run_session_worker};
use admin_console::domain::{Credential, RequestDescriptor, SessionEvent};
use admin_console::infrastructure::store::CredentialStore;
use axum::http::Method;
use common::MockBackend;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_revoked_credential_ends_session_once() {
    let backend = MockBackend::start().await;
    let mut h = common::harness(backend.gateway_config());
    h.gateway
        .set_credential(Credential::new("revoked", "Bearer", None))
        .await;

    for _ in 0..2 {
        assert!(
            h.gateway
                .send(RequestDescriptor::get("/current/user"))
                .await
                .is_success()
        );
    }

    let teardown = SessionTeardown::new(h.gateway.clone());
    let first = h.events.try_recv().unwrap();
    let second = h.events.try_recv().unwrap();
    assert_eq!(
        first,
        SessionEvent::Expired {
            path: "/current/user".into()
        }
    );

    assert!(teardown.handle(first).await);
    assert!(!teardown.handle(second).await);

    let exits = backend.requests_to("/login/exit");
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].method, Method::POST);
    assert_eq!(exits[0].authorization.as_deref(), Some("Bearer revoked"));

    assert!(h.store.load().await.unwrap().is_none());
    assert_eq!(h.gateway.get_credential().await, "");
    // The logout call itself is never reported to the user.
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_worker_drains_until_senders_drop() {
    let backend = MockBackend::start().await;
    let h = common::harness(backend.gateway_config());
    h.gateway
        .set_credential(Credential::new("tok", "Bearer", None))
        .await;

    let (tx, rx) = mpsc::channel(8);
    let worker = tokio::spawn(run_session_worker(
        rx,
        SessionTeardown::new(h.gateway.clone()),
    ));

    for path in ["/menus", "/roles", "/users"] {
        tx.send(SessionEvent::Expired { path: path.into() })
            .await
            .unwrap();
    }
    drop(tx);

    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("worker did not stop")
        .unwrap();

    assert_eq!(backend.requests_to("/login/exit").len(), 1);
    assert!(h.gateway.current_credential().await.is_none());
}

#[tokio::test]
async fn test_event_without_credential_is_ignored() {
    let backend = MockBackend::start().await;
    let h = common::harness(backend.gateway_config());

    let handled = SessionTeardown::new(h.gateway.clone())
        .handle(SessionEvent::Expired {
            path: "/menus".into(),
        })
        .await;

    assert!(!handled);
    assert!(backend.requests().is_empty());
}
