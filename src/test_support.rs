//! Helpers shared by the async feed tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Serves a single HTTP response on a local port and returns its URL.
pub async fn serve_once(status: u16, body: &str) -> String {
    serve_once_with_type(status, "text/plain", body).await
}

pub async fn serve_once_with_type(status: u16, content_type: &str, body: &str) -> String {
    let (url, _request) = serve_once_inner(status, content_type, body).await;
    url
}

/// Like [`serve_once`] for JSON, also handing back the request line and
/// headers the server received.
pub async fn serve_once_recording(status: u16, body: &str) -> (String, oneshot::Receiver<String>) {
    serve_once_inner(status, "application/json", body).await
}

async fn serve_once_inner(
    status: u16,
    content_type: &str,
    body: &str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = http_response(status, content_type, body);
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let request = respond(&mut socket, &response).await;
            let _ = tx.send(request);
        }
    });

    (format!("http://{addr}/feed"), rx)
}

/// Answers every request with the same JSON body until the runtime ends.
pub async fn serve_json_forever(body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = http_response(200, "application/json", body);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            respond(&mut socket, &response).await;
        }
    });

    format!("http://{addr}")
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn http_response(status: u16, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason_phrase(status),
        body.len()
    )
}

async fn respond(socket: &mut TcpStream, response: &str) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    String::from_utf8_lossy(&request).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_matches_status() {
        assert!(http_response(503, "text/plain", "").starts_with("HTTP/1.1 503 Service Unavailable\r\n"));
        assert!(http_response(200, "text/plain", "ok").starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(http_response(418, "text/plain", "").starts_with("HTTP/1.1 418 Unknown\r\n"));
    }
}
