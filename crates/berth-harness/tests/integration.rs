//! Integration tests for the test-hook harness.
//!
//! These follow the same conventions as berth's own integration tests:
//! requests travel over loopback, and tests needing a resolved deployment
//! host skip themselves on machines without a site-local interface.

use axum::routing::get;
use berth::{HandlerSpec, PortAllocator, RouteSpec, ServerError, TestServer, PORT_RANGE};
use berth_harness::{HarnessError, TestHarness, TestMetadata};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().try_init();
}

/// Runs `before`, or skips the calling test when no deployment host can be
/// resolved in this environment.
async fn before_or_skip(harness: &mut TestHarness, metadata: TestMetadata, test: &str) -> bool {
    match harness.before(metadata).await {
        Ok(()) => true,
        Err(HarnessError::Server(
            ServerError::NoSuitableAddress | ServerError::InterfaceEnumeration(_),
        )) => {
            eprintln!("Skipping {test}: no site-local interface available");
            false
        }
        Err(error) => panic!("before hook failed: {error}"),
    }
}

#[tokio::test]
async fn missing_declaration_fails_before_any_socket_is_opened() {
    init_tracing();
    let mut harness = TestHarness::new();

    let err = harness.before(TestMetadata::none()).await.unwrap_err();

    assert!(matches!(err, HarnessError::MissingHandlerDeclaration));
    assert!(!harness.server().is_deployed());
    assert!(!harness.server().is_running());
    assert_eq!(harness.server().port(), None);
}

#[tokio::test]
async fn conflicting_declarations_fail_before_any_server_action() {
    init_tracing();
    let mut harness = TestHarness::new();

    let metadata = TestMetadata {
        ui: Some(get(|| async { "ui" })),
        raw: Some(vec![RouteSpec::new("/raw", get(|| async { "raw" }))]),
    };
    let err = harness.before(metadata).await.unwrap_err();

    assert!(matches!(err, HarnessError::ConflictingHandlerDeclarations));
    assert!(!harness.server().is_deployed());
}

#[tokio::test]
async fn class_scope_reuses_one_deployment_across_methods() {
    init_tracing();
    let mut harness = TestHarness::new().with_allocator(PortAllocator::with_seed(0xbe27));

    // First "test method" of the scope declares the handler.
    if !before_or_skip(
        &mut harness,
        TestMetadata::ui(get(|| async { "shared app" })),
        "class_scope_reuses_one_deployment_across_methods",
    )
    .await
    {
        return;
    }

    let port = harness.server().port().expect("deployed port");
    assert!(PORT_RANGE.contains(&port));

    let body = reqwest::get(format!("http://127.0.0.1:{port}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "shared app");

    harness.after().await;
    assert!(!harness.server().is_running());

    // Second method: no declaration needed, the deployment (and port)
    // carry over.
    harness.before(TestMetadata::none()).await.unwrap();
    assert_eq!(harness.server().port(), Some(port));

    let body = reqwest::get(format!("http://127.0.0.1:{port}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "shared app");

    harness.after().await;
}

#[tokio::test]
async fn pre_deployed_server_ignores_metadata() {
    init_tracing();

    let port = PortAllocator::new().allocate();
    let server =
        TestServer::with_handler_on(HandlerSpec::ui(get(|| async { "pre-deployed" })), port)
            .unwrap();
    let mut harness = TestHarness::for_server(server);

    // Even empty metadata is fine: the deployment already exists.
    if !before_or_skip(
        &mut harness,
        TestMetadata::none(),
        "pre_deployed_server_ignores_metadata",
    )
    .await
    {
        return;
    }

    assert_eq!(harness.server().port(), Some(port));
    let body = reqwest::get(format!("http://127.0.0.1:{port}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "pre-deployed");

    harness.after().await;
}

#[tokio::test]
async fn raw_declaration_deploys_declared_mappings() {
    init_tracing();
    let mut harness = TestHarness::new();

    if !before_or_skip(
        &mut harness,
        TestMetadata::raw([
            RouteSpec::new("/", get(|| async { "root" })),
            RouteSpec::new("/status", get(|| async { "up" })),
        ]),
        "raw_declaration_deploys_declared_mappings",
    )
    .await
    {
        return;
    }

    let port = harness.server().port().expect("deployed port");
    let body = reqwest::get(format!("http://127.0.0.1:{port}/status"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "up");

    harness.after().await;

    // Teardown is unconditional and idempotent.
    harness.after().await;
    assert!(
        reqwest::get(format!("http://127.0.0.1:{port}/status"))
            .await
            .is_err(),
        "requests must fail to connect after teardown"
    );
}
