//! Client behavior against a mock RapidAPI gateway.

use std::collections::BTreeSet;

use filmot_client::{Credentials, Filmot, FilmotError, SEARCH_COMMAND};
use filmot_config::{API_KEY_ENV, FilmotConfig};
use filmot_runner::{BackoffRange, RunnerConfig};
use filmot_types::{Language, QueryParams, SearchRequest};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

fn payload(id: &str, more: &[&str]) -> Value {
    let more: Vec<Value> = more.iter().map(|id| json!({ "id": id })).collect();
    json!({
        "result": { "id": id, "title": format!("Video {id}") },
        "hits": [{ "start": "5.0" }],
        "subtitles": [
            { "s": "0", "txt": "hello" },
            { "s": "4", "txt": "rust" },
            { "s": "8", "txt": "bye" }
        ],
        "more_results": more
    })
}

fn client(server: &MockServer) -> Filmot {
    Filmot::new(Credentials::new(KEY).unwrap())
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap()
        .with_fan_out(
            RunnerConfig::default()
                .with_max_concurrency(2)
                .with_max_attempts(2)
                .with_backoff(BackoffRange::from_millis(1, 2)),
        )
}

async fn mount_first_page(server: &MockServer, more: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/{SEARCH_COMMAND}")))
        .and(query_param_is_missing("queryVideoID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(more[0], more)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_video(server: &MockServer, id: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{SEARCH_COMMAND}")))
        .and(query_param("queryVideoID", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(id, &[id])))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn search_one_sends_rapidapi_headers_and_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getsubtitlesearch"))
        .and(header("X-RapidAPI-Key", KEY))
        .and(header(
            "X-RapidAPI-Host",
            "filmot-tube-metadata-archive.p.rapidapi.com",
        ))
        .and(query_param("query", "\"hello rust\""))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload("v1", &["v1", "v2"])))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchRequest::new("hello rust")
        .unwrap()
        .language(Language::English)
        .to_params()
        .unwrap();
    let response = client(&server).search_one(&params).await.unwrap();

    assert_eq!(response.key(), "\"hello rust\"-v1");
    assert_eq!(response.hit_count(), 1);
    assert_eq!(response.more_video_ids(10), vec!["v2"]);
    assert_eq!(response.hit_data(0).unwrap().text, "hello rust bye");
}

#[tokio::test]
async fn http_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let params = QueryParams::new().with("query", "rust");
    let err = client(&server).search_one(&params).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(429));
    match err {
        FilmotError::Http { cmd, body, .. } => {
            assert_eq!(cmd, SEARCH_COMMAND);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected Http, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let params = QueryParams::new().with("query", "rust");
    let err = client(&server).search_one(&params).await.unwrap_err();
    assert!(matches!(err, FilmotError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn send_api_decodes_arbitrary_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let value: Value = client(&server)
        .send_api("status", &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(value["ok"], true);
}

#[tokio::test]
async fn search_fans_out_up_to_limit() {
    let server = MockServer::start().await;
    mount_first_page(&server, &["v1", "v2", "v3", "v4"]).await;
    mount_video(&server, "v2", 1).await;
    mount_video(&server, "v3", 1).await;
    mount_video(&server, "v4", 0).await;

    let request = SearchRequest::new("rust").unwrap().limit(3);
    let results = client(&server).search(&request).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].video_id(), "v1");
    let rest: BTreeSet<&str> = results[1..].iter().map(|r| r.video_id()).collect();
    assert_eq!(rest, BTreeSet::from(["v2", "v3"]));
    assert!(results.iter().all(|r| r.query() == "rust"));
}

#[tokio::test]
async fn limit_of_one_skips_fan_out() {
    let server = MockServer::start().await;
    mount_first_page(&server, &["v1", "v2"]).await;
    mount_video(&server, "v2", 0).await;

    let request = SearchRequest::new("rust").unwrap().limit(1);
    let results = client(&server).search(&request).await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn failing_follow_up_is_retried_then_left_out() {
    let server = MockServer::start().await;
    mount_first_page(&server, &["v1", "v2", "v3"]).await;
    Mock::given(method("GET"))
        .and(query_param("queryVideoID", "v2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;
    mount_video(&server, "v3", 1).await;

    let request = SearchRequest::new("rust").unwrap();
    let results = client(&server).search(&request).await.unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.video_id()).collect();
    assert_eq!(ids, vec!["v1", "v3"]);
}

#[tokio::test]
async fn first_page_failure_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid key"))
        .expect(1)
        .mount(&server)
        .await;

    let request = SearchRequest::new("rust").unwrap();
    let err = client(&server).search(&request).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn zero_limit_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = SearchRequest::new("rust").unwrap().limit(0);
    let err = client(&server).search(&request).await.unwrap_err();
    assert!(matches!(err, FilmotError::Params(_)));
}

#[test]
fn blank_key_is_missing() {
    assert!(matches!(Credentials::new("  "), Err(FilmotError::MissingKey)));
}

#[test]
fn debug_output_redacts_key() {
    let credentials = Credentials::new("super-secret").unwrap();
    let rendered = format!("{credentials:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("filmot-tube-metadata-archive.p.rapidapi.com"));
}

#[test]
fn from_config_uses_key_override_and_host() {
    let mut config = FilmotConfig::default();
    config.rapidapi_host = "example.p.rapidapi.com".to_string();

    let client = Filmot::from_config(&config, Some("explicit")).unwrap();
    assert_eq!(client.base_url(), "https://example.p.rapidapi.com");

    if std::env::var(API_KEY_ENV).is_err() {
        assert!(matches!(
            Filmot::from_config(&config, None),
            Err(FilmotError::MissingKey)
        ));
    }
}

#[test]
fn with_base_url_rejects_garbage() {
    let client = Filmot::new(Credentials::new(KEY).unwrap()).unwrap();
    assert!(matches!(
        client.with_base_url("not a url"),
        Err(FilmotError::InvalidUrl { .. })
    ));
}
