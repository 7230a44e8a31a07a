#![cfg(feature = "openai")]

use std::time::Duration;

use careermate_rag::{EmbeddingProvider, OpenAIEmbeddingProvider, RagError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Answer one request on a fresh port and hand back what the client sent.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{addr}/v1"), handle)
}

#[tokio::test]
async fn batch_is_returned_in_input_order() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"data":[{"index":1,"embedding":[0.0,1.0]},{"index":0,"embedding":[1.0,0.0]}]}"#,
    )
    .await;
    let provider = OpenAIEmbeddingProvider::new("test-key", base_url)
        .unwrap()
        .with_model("embed-small")
        .with_dimensions(2);

    let vectors = provider.embed_batch(&["Data Analyst", "Unity Developer"]).await.unwrap();
    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1/embeddings"));
    assert!(request.to_lowercase().contains("authorization: bearer test-key"));
    assert!(request.contains(r#""input":["Data Analyst","Unity Developer"]"#));
    assert!(request.contains(r#""dimensions":2"#));
}

#[tokio::test]
async fn api_error_is_an_embedding_error() {
    let (base_url, server) =
        serve_once("429 Too Many Requests", r#"{"error":{"message":"rate limited"}}"#).await;
    let provider = OpenAIEmbeddingProvider::new("test-key", base_url).unwrap();

    let err = provider.embed("SQL").await.unwrap_err();
    match &err {
        RagError::EmbeddingError { provider, message } => {
            assert_eq!(provider, "OpenAI");
            assert!(message.contains("429"));
            assert!(message.contains("rate limited"));
        }
        other => panic!("expected embedding error, got {other:?}"),
    }
    assert!(err.is_transport_failure());
    server.await.unwrap();
}

#[tokio::test]
async fn wrong_width_is_rejected() {
    let (base_url, server) =
        serve_once("200 OK", r#"{"data":[{"index":0,"embedding":[0.5,0.5,0.5]}]}"#).await;
    let provider = OpenAIEmbeddingProvider::new("test-key", base_url).unwrap().with_dimensions(2);

    let err = provider.embed("SQL").await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }));
    server.await.unwrap();
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });
    let provider = OpenAIEmbeddingProvider::new("test-key", format!("http://{addr}/v1"))
        .unwrap()
        .with_timeout(Duration::from_millis(200));

    let err = provider.embed("SQL").await.unwrap_err();
    assert!(matches!(err, RagError::Timeout { operation: "embedding", .. }));
}
