// Pagination and batching behavior against a scripted local HTTP server.
//
// Each test binds a tiny_http server on an ephemeral port and points a
// HelixClient at it, so cursor handling, chunk sizes, and partial-result
// behavior are exercised over real HTTP.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tiny_http::{Header, Response, Server};
use url::Url;

use varta::twitch::channels::ChannelResolver;
use varta::twitch::client::HelixClient;
use varta::twitch::followers;

type RequestLog = Arc<Mutex<Vec<String>>>;

/// Spawn a mock server; `respond` maps a request URL (path + query) to a
/// JSON body and status code. Returns the base URL and the request log.
fn spawn_mock<F>(respond: F) -> (String, RequestLog)
where
    F: Fn(&Url) -> (u16, String) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let base = format!("http://{}", server.server_addr());
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let thread_log = log.clone();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            thread_log.lock().unwrap().push(request.url().to_string());
            let url = Url::parse(&format!("http://mock{}", request.url())).unwrap();
            let (status, body) = respond(&url);
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    (base, log)
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn followers_page(count: usize, offset: usize, cursor: Option<&str>) -> String {
    let data: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "user_name": format!("user{}", offset + i),
                "user_id": format!("{}", offset + i),
            })
        })
        .collect();
    let pagination = match cursor {
        Some(c) => json!({ "cursor": c }),
        None => json!({}),
    };
    json!({ "data": data, "pagination": pagination }).to_string()
}

// ============================================================
// Follower pagination
// ============================================================

#[tokio::test]
async fn pagination_walks_three_pages_with_cursors() {
    let (base, log) = spawn_mock(|url| {
        match query_param(url, "after").as_deref() {
            None => (200, followers_page(100, 0, Some("c1"))),
            Some("c1") => (200, followers_page(100, 100, Some("c2"))),
            Some("c2") => (200, followers_page(40, 200, None)),
            Some(other) => panic!("unexpected cursor {other}"),
        }
    });

    let client = HelixClient::new(&base, "client-id", "token").unwrap();
    let result = followers::fetch_all(&client, "1234").await;

    assert_eq!(result.len(), 240);
    assert_eq!(result[0].user_name, "user0");
    assert_eq!(result[239].user_id, "239");

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 3, "exactly one request per page");
    assert!(requests.iter().all(|r| r.contains("first=100")));
    assert!(requests.iter().all(|r| r.contains("broadcaster_id=1234")));
    assert!(!requests[0].contains("after="));
    assert!(requests[1].contains("after=c1"));
    assert!(requests[2].contains("after=c2"));
}

#[tokio::test]
async fn pagination_stops_on_empty_page() {
    let (base, log) = spawn_mock(|url| match query_param(url, "after").as_deref() {
        None => (200, followers_page(100, 0, Some("c1"))),
        _ => (200, followers_page(0, 0, Some("c2"))),
    });

    let client = HelixClient::new(&base, "client-id", "token").unwrap();
    let result = followers::fetch_all(&client, "1234").await;

    assert_eq!(result.len(), 100);
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn pagination_fault_keeps_the_partial_accumulation() {
    let (base, log) = spawn_mock(|url| match query_param(url, "after").as_deref() {
        None => (200, followers_page(100, 0, Some("c1"))),
        _ => (500, json!({"error": "boom"}).to_string()),
    });

    let client = HelixClient::new(&base, "client-id", "token").unwrap();
    let result = followers::fetch_all(&client, "1234").await;

    // The failed second page aborts the walk but not the first page.
    assert_eq!(result.len(), 100);
    assert_eq!(log.lock().unwrap().len(), 2);
}

// ============================================================
// Channel batching
// ============================================================

fn channels_body(ids: &[String]) -> String {
    let data: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "broadcaster_id": id,
                "broadcaster_name": format!("chan{id}"),
                "broadcaster_language": "en",
                "title": "a stream",
                "tags": [],
            })
        })
        .collect();
    json!({ "data": data }).to_string()
}

#[tokio::test]
async fn batching_chunks_250_ids_into_100_100_50() {
    let sizes: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_sizes = sizes.clone();

    let (base, log) = spawn_mock(move |url| {
        let ids: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "broadcaster_id")
            .map(|(_, v)| v.into_owned())
            .collect();
        seen_sizes.lock().unwrap().push(ids.len());
        (200, channels_body(&ids))
    });

    let ids: Vec<String> = (0..250).map(|i| i.to_string()).collect();
    let client = HelixClient::new(&base, "client-id", "token").unwrap();
    let lookup = client.fetch_many(&ids).await.unwrap();

    assert_eq!(lookup.channels.len(), 250);
    assert_eq!(lookup.unresolved, 0);
    assert_eq!(log.lock().unwrap().len(), 3);
    assert_eq!(*sizes.lock().unwrap(), vec![100, 100, 50]);
}

#[tokio::test]
async fn rejected_batch_is_skipped_and_counted_as_unresolved() {
    let (base, log) = spawn_mock(|url| {
        let ids: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "broadcaster_id")
            .map(|(_, v)| v.into_owned())
            .collect();
        // The middle batch starts at id 100.
        if ids.first().map(String::as_str) == Some("100") {
            (500, json!({"error": "boom"}).to_string())
        } else {
            (200, channels_body(&ids))
        }
    });

    let ids: Vec<String> = (0..250).map(|i| i.to_string()).collect();
    let client = HelixClient::new(&base, "client-id", "token").unwrap();
    let lookup = client.fetch_many(&ids).await.unwrap();

    // All three batches are attempted; only the rejected one is missing.
    assert_eq!(log.lock().unwrap().len(), 3);
    assert_eq!(lookup.channels.len(), 150);
    assert_eq!(lookup.unresolved, 100);
}
