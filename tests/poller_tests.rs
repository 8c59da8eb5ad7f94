// tests/poller_tests.rs
use std::io::Write;
use tokio::net::TcpListener;
use url_poller::config::PollerConfig;
use url_poller::endpoints::{self, Endpoint};
use url_poller::poller::{exit_code, CheckStatus, Poller};
use url_poller::report::{read_snapshot, write_snapshot, ConsoleReporter};

fn poller(timeout_secs: u64) -> Poller {
    let config = PollerConfig {
        timeout_secs,
        max_workers: 3,
        ..PollerConfig::default()
    };
    Poller::new(&config).unwrap()
}

/// Listener that accepts connections and never responds.
async fn silent_server() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    (format!("http://{}/", addr), handle)
}

#[tokio::test]
async fn test_mixed_run_exit_code() {
    let mut server = mockito::Server::new_async().await;
    let _up = server.mock("GET", "/up").with_status(200).create_async().await;
    let _missing = server.mock("GET", "/missing").with_status(404).create_async().await;
    let (slow_url, slow) = silent_server().await;

    let endpoints = vec![
        Endpoint::new("home", format!("{}/up", server.url())),
        Endpoint::new("docs", format!("{}/missing", server.url())),
        Endpoint::new("legacy", slow_url),
    ];

    let results = poller(1).poll_all(endpoints).await;
    slow.abort();

    assert_eq!(results.len(), 3);
    let statuses: Vec<_> = results.iter().map(|r| (r.name.as_str(), r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("docs", CheckStatus::ClientError),
            ("home", CheckStatus::Up),
            ("legacy", CheckStatus::Timeout),
        ]
    );
    assert_eq!(results[0].status_code, Some(404));
    assert!(results[2].error.as_deref().unwrap().contains("1 seconds"));
    assert_eq!(exit_code(&results), 2);
}

#[tokio::test]
async fn test_redirects_count_as_healthy() {
    let mut server = mockito::Server::new_async().await;
    let _up = server.mock("GET", "/up").with_status(200).create_async().await;
    let _moved = server.mock("GET", "/moved").with_status(308).create_async().await;

    let endpoints = vec![
        Endpoint::new("a", format!("{}/up", server.url())),
        Endpoint::new("b", format!("{}/moved", server.url())),
    ];

    let results = poller(5).poll_all(endpoints).await;

    assert_eq!(results[1].status, CheckStatus::Redirect);
    assert_eq!(exit_code(&results), 0);
}

#[tokio::test]
async fn test_file_to_snapshot_pipeline() {
    let mut server = mockito::Server::new_async().await;
    let _a = server.mock("GET", "/a").with_status(200).create_async().await;
    let _b = server.mock("GET", "/b").with_status(500).create_async().await;

    let mut input = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        input,
        r#"[{{"url": "{0}/b", "caption": "Beta"}}, {{"url": "{0}/a", "caption": "Alpha"}}]"#,
        server.url()
    )
    .unwrap();

    let endpoints = endpoints::load_endpoints(input.path()).await.unwrap();
    let results = poller(5).poll_all(endpoints).await;

    let mut report = Vec::new();
    ConsoleReporter::new(true)
        .render(&results, chrono::Local::now(), &mut report)
        .unwrap();
    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("Summary: 1/2 URLs are responding"));
    assert!(report.contains("Status Code: 500"));

    let out_dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(out_dir.path(), &results).await.unwrap();
    let saved = read_snapshot(&path).await.unwrap();

    assert_eq!(saved, results);
    assert_eq!(saved[0].name, "Alpha");
    assert_eq!(saved[0].status, CheckStatus::Up);
    assert_eq!(saved[1].status, CheckStatus::ServerError);
    assert_eq!(exit_code(&saved), 1);
}
