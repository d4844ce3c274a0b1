use std::net::SocketAddr;

use burrow::{Request, Response, Router, Server};
use http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Sends one `Connection: close` request and returns the raw response text.
async fn roundtrip(addr: SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

async fn echo(req: Request) -> Response {
    let name = req.param("name").unwrap_or_default().to_owned();
    let body = req.text().unwrap_or_default().to_owned();
    Response::text(StatusCode::CREATED, format!("{name}:{body}"))
}

#[tokio::test]
async fn serves_routes_over_tcp_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let router = Router::new().post("/echo/:name", echo);
    let server = tokio::spawn(
        Server::from_listener(listener).serve_with_shutdown(router, async {
            let _ = stopped.await;
        }),
    );

    let created = roundtrip(addr, "POST", "/echo/ada", "hello").await;
    assert!(created.starts_with("HTTP/1.1 201"), "{created}");
    assert!(created.contains("content-type: text/plain; charset=utf-8"), "{created}");
    assert!(created.ends_with("ada:hello"), "{created}");

    let missing = roundtrip(addr, "GET", "/echo/ada", "").await;
    assert!(missing.starts_with("HTTP/1.1 404"), "{missing}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
