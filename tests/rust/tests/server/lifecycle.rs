//! Serve/shutdown lifecycle over a real socket

use std::net::SocketAddr;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use super::echo_server;

async fn raw_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_serve_logs_peer_and_notifies_on_shutdown() {
    tests::init_test_logging();
    let (server, lines, hook) = echo_server(None).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<String>();

    let running = tokio::spawn(server.serve(listener, async move {
        stop_rx.await.unwrap_or_else(|_| "dropped".to_string())
    }));

    let health = raw_get(addr, "/health").await;
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");

    let denied = raw_get(addr, "/api/echo/ping").await;
    assert!(denied.starts_with("HTTP/1.1 403"), "{denied}");
    assert_eq!(
        *lines.lock().unwrap(),
        vec!["Unauthenticated connection attempt from 127.0.0.1.".to_string()]
    );
    assert!(hook.calls().is_empty());

    stop_tx.send("SIGTERM".to_string()).unwrap();
    running.await.unwrap().unwrap();

    assert_eq!(hook.calls(), vec!["SIGTERM"]);
}

#[tokio::test]
async fn test_failing_hook_surfaces_from_serve() {
    use morrigan_core::{ComponentDefinition, ProviderDeclaration};
    use morrigan_gateway::{
        CoreApi, FactoryLoader, GatewayConfig, GatewayServer, IdentityVerifier, ProviderRouter,
    };
    use tests::{test_server_env, MockFactory, MockProvider, RecordingHook};

    let hook = RecordingHook::new().failing("could not flush");
    let loader = FactoryLoader::new().register(
        "journal",
        MockFactory::new(MockProvider::new().with_hook(hook.clone())),
    );
    let definition =
        ComponentDefinition::new().with_provider(ProviderDeclaration::new("journal"));
    let (server_env, _) = test_server_env();
    let core = CoreApi::setup("core", &definition, ProviderRouter::new(), server_env, &loader)
        .await
        .unwrap();
    let server = GatewayServer::new(GatewayConfig::default(), core, IdentityVerifier::new(None));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let err = server
        .serve(listener, async { "SIGINT".to_string() })
        .await
        .unwrap_err();

    assert_eq!(hook.calls(), vec!["SIGINT"]);
    assert!(format!("{:#}", err).contains("1 provider shutdown hook(s) failed"));
}

#[tokio::test]
async fn test_unauthenticated_websocket_upgrade_reaches_provider() {
    let (server, lines, _) = echo_server(None).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<String>();

    let running = tokio::spawn(server.serve(listener, async move {
        stop_rx.await.unwrap_or_else(|_| "dropped".to_string())
    }));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"GET /api/echo/socket HTTP/1.1\r\n\
              Host: localhost\r\n\
              Upgrade: websocket\r\n\
              Connection: Upgrade\r\n\
              Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
              Sec-WebSocket-Version: 13\r\n\r\n",
        )
        .await
        .unwrap();

    let mut head = Vec::new();
    let mut buf = [0u8; 512];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before response head");
        head.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&head);
    assert!(head.starts_with("HTTP/1.1 101"), "{head}");
    assert!(head.contains("s3pPLMBiTxaQ9kYGzzhZRbK+xOo="), "{head}");
    assert!(lines.lock().unwrap().is_empty());
    drop(stream);

    stop_tx.send("SIGTERM".to_string()).unwrap();
    running.await.unwrap().unwrap();
}
