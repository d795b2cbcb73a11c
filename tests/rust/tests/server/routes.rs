//! Router tests (no socket)

use axum::http::StatusCode;
use morrigan_core::{AuthenticatedIdentity, ComponentDefinition, CoreError, ProviderDeclaration};
use morrigan_gateway::{
    create_identity_token, CoreApi, FactoryLoader, GatewayConfig, GatewayServer, IdentityVerifier,
    ProviderRouter,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::http::{get, get_as, get_with_bearer, send};
use tests::{test_server_env, MockFactory, MockProvider};

use super::{echo_server, SECRET};

fn token(functions: &[&str]) -> String {
    let identity = AuthenticatedIdentity::new("ops").with_functions(functions.iter().copied());
    create_identity_token(&identity, 3600, SECRET).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (server, lines, _) = echo_server(None).await;

    let (status, body) = send(server.build_router(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["name"], "Morrigan");
    assert_eq!(
        health["instance"],
        json!(server.core().env().server_info.id.to_string())
    );
    assert!(lines.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_openapi_fragments_are_public() {
    let (server, _, _) = echo_server(None).await;

    let (status, body) = send(server.build_router(), get("/openapi/fragments")).await;

    assert_eq!(status, StatusCode::OK);
    let fragments: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fragments, json!([{"paths": {"/echo/ping": {"get": {}}}}]));
}

#[tokio::test]
async fn test_bearer_token_with_api_reaches_provider() {
    let (server, _, _) = echo_server(None).await;

    let (status, body) = send(
        server.build_router(),
        get_with_bearer("/api/echo/ping", &token(&["api"])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"echo");
}

#[tokio::test]
async fn test_bearer_token_without_api_denied() {
    let (server, lines, _) = echo_server(None).await;

    let (status, body) = send(
        server.build_router(),
        get_with_bearer("/api/echo/ping", &token(&["chat"])),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());
    assert_eq!(lines.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_forged_token_denied() {
    let (server, _, _) = echo_server(None).await;
    let identity = AuthenticatedIdentity::new("ops").with_functions(["api"]);
    let forged = create_identity_token(&identity, 3600, b"wrong").unwrap();

    let (status, _) = send(
        server.build_router(),
        get_with_bearer("/api/echo/ping", &forged),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_path_under_mount_is_gated() {
    let (server, _, _) = echo_server(None).await;

    let (status, _) = send(server.build_router(), get("/api/echo/nothing")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        server.build_router(),
        get_with_bearer("/api/echo/nothing", &token(&["api"])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_endpoint_url() {
    let (server, _, _) = echo_server(Some("/v2/")).await;
    let identity = AuthenticatedIdentity::new("ops").with_functions(["api"]);

    let (status, _) = send(server.build_router(), get_as("/v2/echo/ping", identity)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(server.build_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_root_mount_keeps_public_routes() {
    let (server, _, _) = echo_server(Some("/")).await;

    let (status, _) = send(
        server.build_router(),
        get_with_bearer("/echo/ping", &token(&["api"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(server.build_router(), get("/echo/ping")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(server.build_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

async fn setup_openapi_provider(endpoint_url: &str) -> Result<CoreApi, CoreError> {
    let loader = FactoryLoader::new().register(
        "openapi",
        MockFactory::new(MockProvider::new()).with_route(),
    );
    let definition = ComponentDefinition::new()
        .with_endpoint_url(endpoint_url)
        .with_provider(ProviderDeclaration::new("openapi"));
    let (server_env, _) = test_server_env();
    CoreApi::setup("core", &definition, ProviderRouter::new(), server_env, &loader).await
}

#[tokio::test]
async fn test_root_mount_rejects_provider_shadowing_public_routes() {
    let result = setup_openapi_provider("/").await;

    match result {
        Err(CoreError::InvalidProviderName(name)) => assert_eq!(name, "openapi"),
        other => panic!("expected InvalidProviderName, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_public_segment_name_below_mount_is_served() {
    let core = setup_openapi_provider("/api").await.unwrap();
    let server = GatewayServer::new(
        GatewayConfig::default(),
        core,
        IdentityVerifier::new(Some(SECRET.to_vec())),
    );

    let (status, body) = send(server.build_router(), get("/openapi/fragments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");

    let (status, body) = send(
        server.build_router(),
        get_with_bearer("/api/openapi/ping", &token(&["api"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"openapi");
}
