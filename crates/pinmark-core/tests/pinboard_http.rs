use assert_matches::assert_matches;
use pinmark_core::{
    BookmarkGateway, EngineSettings, FetchError, NewBookmark, PinboardClient, SessionEngine,
    TagCount,
};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// One-connection-per-request HTTP stub. Returns the base url and a handle
/// yielding the request lines it saw.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/v1/", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                let n = reader.read_line(&mut line).unwrap();
                if n == 0 || line == "\r\n" {
                    break;
                }
            }
            seen.push(request_line.trim_end().to_string());
            let reason = if status == 200 { "OK" } else { "Error" };
            write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (base, handle)
}

fn client(base: &str) -> PinboardClient {
    PinboardClient::with_timeout(base, "user:abc", Duration::from_secs(5)).unwrap()
}

#[test]
fn fetch_all_sends_token_and_parses_posts() {
    let (base, server) = serve(vec![(
        200,
        r#"[{"href":"https://a.example","description":"A","extended":"x","tags":"rust cli","time":"2024-05-01T10:00:00Z"}]"#,
    )]);
    let posts = client(&base).fetch_all().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "A");
    assert!(posts[0].tags.contains("cli"));
    let seen = server.join().unwrap();
    assert_eq!(
        seen[0],
        "GET /v1/posts/all?auth_token=user%3Aabc&format=json HTTP/1.1"
    );
}

#[test]
fn fetch_by_tag_encodes_the_tag() {
    let (base, server) = serve(vec![(200, "[]")]);
    assert!(client(&base).fetch_by_tag("c++").unwrap().is_empty());
    let seen = server.join().unwrap();
    assert!(seen[0].contains("&tag=c%2B%2B "), "{}", seen[0]);
}

#[test]
fn fetch_recent_reads_posts_envelope() {
    let (base, server) = serve(vec![(
        200,
        r#"{"date":"2024-05-01T10:00:00Z","user":"u","posts":[{"href":"https://r","description":"R"}]}"#,
    )]);
    let recent = client(&base).fetch_recent(20).unwrap();
    assert_eq!(recent[0].url, "https://r");
    assert!(server.join().unwrap()[0].contains("/v1/posts/recent?"));
}

#[test]
fn fetch_tags_accepts_mixed_count_types() {
    let (base, _server) = serve(vec![(200, r#"{"python":"10","java":5}"#)]);
    let mut tags = client(&base).fetch_tags().unwrap();
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(
        tags,
        vec![TagCount::new("java", 5), TagCount::new("python", 10)]
    );
}

#[test]
fn add_bookmark_sends_upsert_parameters() {
    let (base, server) = serve(vec![(200, r#"{"result_code":"done"}"#)]);
    client(&base)
        .add_bookmark(&NewBookmark {
            url: "https://n.example/?q=1".into(),
            title: "New one".into(),
            description: "notes".into(),
            tags: vec!["a".into(), "b".into()],
        })
        .unwrap();
    let seen = server.join().unwrap();
    let line = &seen[0];
    assert!(line.contains("url=https%3A%2F%2Fn.example%2F%3Fq%3D1"), "{line}");
    assert!(line.contains("description=New+one"));
    assert!(line.contains("extended=notes"));
    assert!(line.contains("tags=a%2Cb"));
    assert!(line.contains("replace=yes&shared=no"));
}

#[test]
fn add_bookmark_not_done_is_rejected() {
    let (base, _server) = serve(vec![(200, r#"{"result_code":"item already exists"}"#)]);
    let err = client(&base)
        .add_bookmark(&NewBookmark {
            url: "https://n.example".into(),
            ..NewBookmark::default()
        })
        .unwrap_err();
    assert_eq!(err, FetchError::WriteRejected("item already exists".into()));
}

#[test]
fn http_error_status_is_reported() {
    let (base, _server) = serve(vec![(500, "oops")]);
    assert_matches!(
        client(&base).fetch_all(),
        Err(FetchError::Http { status: 500 })
    );
}

#[test]
fn malformed_body_is_a_parse_error() {
    let (base, _server) = serve(vec![(200, "not json")]);
    assert_matches!(client(&base).fetch_tags(), Err(FetchError::Parse(_)));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let c = client(&format!("http://127.0.0.1:{port}/v1"));
    assert_matches!(c.fetch_all(), Err(FetchError::Transport(_)));
}

#[test]
fn slow_server_hits_the_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/v1/", listener.local_addr().unwrap());
    let _server = thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(2));
    });
    let c = PinboardClient::with_timeout(&base, "user:abc", Duration::from_millis(200)).unwrap();
    assert_matches!(c.fetch_all(), Err(FetchError::Transport(_)));
}

#[test]
fn engine_over_http_renders_matches() {
    let (base, server) = serve(vec![(
        200,
        r#"[{"href":"https://rust-lang.org","description":"Rust"},{"href":"https://python.org","description":"Python"}]"#,
    )]);
    let settings = EngineSettings {
        token: Some("user:abc".into()),
        ..EngineSettings::default()
    };
    let mut engine = SessionEngine::new(settings, Box::new(client(&base)));
    let r = engine.handle_query("rust");
    let titles: Vec<&str> = r.items().iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Search: all bookmarks", "← Back to Menu", "Rust"]);
    // second keystroke is served from cache; the stub only answers once
    let r = engine.handle_query("py");
    assert_eq!(r.items().last().unwrap().title, "Python");
    server.join().unwrap();
}
