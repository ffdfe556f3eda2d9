use keyword_intent::services::{create_batches, normalize};
use keyword_intent::{
    AdvanceOutcome, Batch, BatchAnalyzer, BatchSize, ClientError, Config, HttpAnalysisClient,
    SessionController, SessionError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// 按顺序为每个连接返回一个响应，并收集请求体
async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut bodies = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            bodies.push(read_request_body(&mut stream).await);

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        bodies
    });

    (url, handle)
}

async fn read_request_body(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return String::from_utf8_lossy(&buf[header_end + 4..header_end + 4 + content_length])
                    .to_string();
            }
        }
    }
    String::new()
}

fn first_batch(raw: &str) -> Batch {
    let keywords = normalize(raw).unwrap().keywords;
    create_batches(&keywords, BatchSize::default()).remove(0)
}

fn client(url: &str) -> HttpAnalysisClient {
    let config = Config {
        analysis_endpoint: url.to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    HttpAnalysisClient::new(&config).unwrap()
}

#[tokio::test]
async fn posts_keywords_and_takes_first_record() {
    let body = r#"[{"inputs":["cat","dog"],"response":{"response":"| keyword | intent |","usage":{"prompt_tokens":12,"completion_tokens":8,"total_tokens":20}}},{"inputs":[],"response":{"response":"ignored"}}]"#;
    let (url, server) = serve(vec![(200, body.to_string())]).await;

    let result = client(&url).analyze(&first_batch("cat\ndog")).await.unwrap();

    assert_eq!(result.inputs, vec!["cat", "dog"]);
    assert_eq!(result.analysis, "| keyword | intent |");
    assert_eq!(result.usage.unwrap().total_tokens, 20);

    let requests = server.await.unwrap();
    let sent: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(sent, serde_json::json!({ "keywords": ["cat", "dog"] }));
}

#[tokio::test]
async fn empty_array_yields_degraded_result() {
    let (url, server) = serve(vec![(200, "[]".to_string())]).await;

    let result = client(&url).analyze(&first_batch("seo, sem")).await.unwrap();

    assert!(result.is_degraded());
    assert_eq!(result.analysis, "analysis failed");
    assert_eq!(result.inputs, vec!["seo", "sem"]);
    server.await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (url, server) = serve(vec![(500, r#"{"error":"boom"}"#.to_string())]).await;

    let err = client(&url).analyze(&first_batch("cat")).await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 500 }));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_body_is_a_decode_error() {
    let (url, server) = serve(vec![(200, "not json".to_string())]).await;

    let err = client(&url).analyze(&first_batch("cat")).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
    server.await.unwrap();
}

#[tokio::test]
async fn connection_failure_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).analyze(&first_batch("cat")).await.unwrap_err();

    assert!(matches!(err, ClientError::Request { .. }));
}

#[tokio::test]
async fn controller_retries_same_batch_after_http_failure() {
    let ok = |text: &str| {
        format!(
            r#"[{{"inputs":[],"response":{{"response":"{}"}}}}]"#,
            text
        )
    };
    let (url, server) = serve(vec![
        (200, ok("first")),
        (503, String::new()),
        (200, ok("second")),
    ])
    .await;

    let controller = SessionController::new(client(&url));
    controller
        .initialize("alpha, beta, gamma", BatchSize::new(2))
        .await
        .unwrap();

    controller.advance_batch().await.unwrap();
    let err = controller.advance_batch().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::BatchFailed {
            batch_number: 2,
            source: ClientError::Status { status: 503 }
        }
    ));
    assert_eq!(controller.snapshot().await.cursor(), 1);

    let outcome = controller.advance_batch().await.unwrap();
    assert_eq!(
        outcome,
        AdvanceOutcome::BatchCompleted {
            batch_number: 2,
            finished: true
        }
    );

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1], requests[2]);
    assert!(requests[1].contains("gamma"));
    assert!(controller
        .combined_report()
        .await
        .starts_with("## Batch 2 Analysis Results\n\nsecond"));
}
