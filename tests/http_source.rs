use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use lol_terminal::error::FetchError;
use lol_terminal::selection::{OptionSet, Selector};
use lol_terminal::stats_fetch::{HttpStatsSource, StatsSource};

fn selector(name: &str) -> Selector {
    let options = OptionSet::new([name]).expect("valid option");
    options.get(0).cloned().expect("one option")
}

/// Serves exactly one canned response and hands back the request line.
fn one_shot_server(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
    raw_server(format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ))
}

fn raw_server(response: String) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut line = String::new();
            let n = reader.read_line(&mut line).expect("read header");
            if n == 0 || line == "\r\n" {
                break;
            }
        }
        stream.write_all(response.as_bytes()).expect("write response");
        request_line
    });
    (format!("http://{addr}"), handle)
}

fn source(base: &str) -> HttpStatsSource {
    HttpStatsSource::with_timeout(base, Duration::from_secs(5)).expect("valid source")
}

#[test]
fn fetches_and_parses_wins() {
    let (base, server) = one_shot_server("200 OK", r#"{"Azir": 12, "Ahri": 7}"#);
    let data = source(&base)
        .fetch_wins(&selector("Faker"))
        .expect("fetch should succeed");
    assert_eq!(data.labels(), vec!["Azir", "Ahri"]);

    let request_line = server.join().expect("server thread");
    assert!(request_line.starts_with("GET /api/wins-by-player?player=Faker "));
}

#[test]
fn query_value_is_encoded() {
    let src = source("http://localhost:5000");
    let url = src.wins_url(&selector("Kiin & Co")).expect("url");
    assert_eq!(
        url.as_str(),
        "http://localhost:5000/api/wins-by-player?player=Kiin+%26+Co"
    );
}

#[test]
fn base_path_prefix_is_kept() {
    for base in ["http://host:5000/stats/", "http://host:5000/stats"] {
        let url = source(base).wins_url(&selector("Faker")).expect("url");
        assert_eq!(
            url.as_str(),
            "http://host:5000/stats/api/wins-by-player?player=Faker"
        );
    }
}

#[test]
fn non_success_status_is_reported() {
    let (base, server) = one_shot_server("500 Internal Server Error", r#"{"error":"boom"}"#);
    let err = source(&base)
        .fetch_wins(&selector("Caps"))
        .expect_err("500 should fail");
    assert!(matches!(err, FetchError::Status { status: 500, ref body } if body.contains("boom")));
    server.join().expect("server thread");
}

#[test]
fn status_wins_over_unreadable_body() {
    let (base, server) = raw_server(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\ncut"
            .to_string(),
    );
    let err = source(&base)
        .fetch_wins(&selector("Caps"))
        .expect_err("503 should fail");
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    server.join().expect("server thread");
}

#[test]
fn malformed_body_is_reported() {
    let (base, server) = one_shot_server("200 OK", "<html>oops</html>");
    let err = source(&base)
        .fetch_wins(&selector("Caps"))
        .expect_err("html should fail");
    assert!(matches!(err, FetchError::Malformed(_)));
    server.join().expect("server thread");
}

#[test]
fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = source(&format!("http://{addr}"))
        .fetch_wins(&selector("Caps"))
        .expect_err("nothing is listening");
    assert!(matches!(err, FetchError::Network(_)));
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(HttpStatsSource::with_timeout("not a url", Duration::from_secs(1)).is_err());
}
