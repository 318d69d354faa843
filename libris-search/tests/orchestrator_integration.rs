//! Integration tests for the search orchestrator.
//!
//! Both call paths run against a local wiremock server. The orchestrator
//! owns its own runtimes, so these are plain `#[test]` functions; a separate
//! multi-threaded runtime only hosts the mock server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use libris_search::{
    channel_context, ClientConfig, Completion, ProtocolError, SearchError, SearchOrchestrator,
    SearchOutcome,
};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_runtime() -> Runtime {
    Runtime::new().expect("mock server runtime")
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        endpoint: format!("{}/search.json", server.uri()),
        timeout_seconds: 5,
        user_agent: Some("TestBot/1.0".into()),
    }
}

fn docs(count: usize) -> serde_json::Value {
    let docs: Vec<_> = (1..=count)
        .map(|i| json!({"title": format!("Book {i}"), "author_name": ["Writer"], "first_publish_year": 1900 + i}))
        .collect();
    json!({ "numFound": count, "docs": docs })
}

fn mount(rt: &Runtime, server: &MockServer, q: &str, response: ResponseTemplate) {
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", q))
            .respond_with(response)
            .mount(server),
    );
}

type Recorded = Arc<Mutex<Vec<(String, SearchOutcome)>>>;

fn recorder(
    context: &Arc<libris_search::ChannelContext>,
    log: &Recorded,
    label: &str,
) -> Completion {
    let log = Arc::clone(log);
    let label = label.to_owned();
    Completion::new(context.clone(), move |outcome| {
        log.lock().expect("lock").push((label, outcome));
    })
}

#[test]
fn blocking_search_caps_and_preserves_order() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "seven",
        ResponseTemplate::new(200).set_body_json(docs(7)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let lines = orchestrator.search_blocking("seven", 5).expect("search");

    assert_eq!(
        lines,
        vec![
            "Book 1 — Writer (1901)",
            "Book 2 — Writer (1902)",
            "Book 3 — Writer (1903)",
            "Book 4 — Writer (1904)",
            "Book 5 — Writer (1905)",
        ]
    );
}

#[test]
fn blocking_search_skips_null_entries_and_formats_fallbacks() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "mixed",
        ResponseTemplate::new(200).set_body_json(json!({
            "docs": [
                null,
                {"title": "Test Title", "author_name": ["Автор"], "first_publish_year": 2020, "key": "/works/OL1W"},
                {"title": "Another Book"},
                {"author_name": []}
            ],
            "extra": {"nested": true}
        })),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let lines = orchestrator.search_blocking("mixed", 10).expect("search");

    assert_eq!(
        lines,
        vec![
            "Test Title — Автор (2020)",
            "Another Book — Автор не указан (?)",
            " — Автор не указан (?)",
        ]
    );
}

#[test]
fn blocking_search_encodes_query_text() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "Толкин & co",
        ResponseTemplate::new(200).set_body_json(docs(1)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let lines = orchestrator.search_blocking("Толкин & co", 5).expect("search");
    assert_eq!(lines.len(), 1);
}

#[test]
fn blocking_empty_result_is_ok_not_error() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "nothing",
        ResponseTemplate::new(200).set_body_json(json!({"numFound": 0})),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let lines = orchestrator.search_blocking("nothing", 5).expect("search");
    assert!(lines.is_empty());
}

#[test]
fn blocking_bad_status_keeps_code() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(&rt, &server, "gone", ResponseTemplate::new(404));

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let err = orchestrator.search_blocking("gone", 5).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Protocol(ProtocolError::BadStatus(404))
    ));
}

#[test]
fn blocking_malformed_payload_is_distinct_from_bad_status() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "lies",
        ResponseTemplate::new(200).set_body_string(r#"{"docs": "not a list"}"#),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let err = orchestrator.search_blocking("lies", 5).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Protocol(ProtocolError::MalformedPayload(_))
    ));
    assert_eq!(err.status(), None);
}

#[test]
fn blocking_timeout_is_network_error() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "slow",
        ResponseTemplate::new(200)
            .set_body_json(docs(1))
            .set_delay(Duration::from_secs(3)),
    );

    let config = ClientConfig {
        timeout_seconds: 1,
        ..config_for(&server)
    };
    let orchestrator = SearchOrchestrator::new(&config).expect("orchestrator");
    let err = orchestrator.search_blocking("slow", 5).unwrap_err();
    assert!(matches!(err, SearchError::Network(_)));
}

#[test]
fn async_search_delivers_on_the_pumping_thread() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "hobbit",
        ResponseTemplate::new(200).set_body_json(docs(3)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let (context, pump) = channel_context();
    let delivered_on = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&delivered_on);

    orchestrator
        .search_async(
            "hobbit",
            2,
            Completion::new(Arc::new(context), move |outcome| {
                let lines = outcome.expect("search succeeds");
                assert_eq!(lines.len(), 2);
                *slot.lock().expect("lock") = Some(std::thread::current().id());
            }),
        )
        .expect("queued");

    assert!(pump.run_next_timeout(Duration::from_secs(5)));
    let delivered_on = delivered_on.lock().expect("lock").expect("delivered");
    assert_eq!(delivered_on, std::thread::current().id());
}

#[test]
fn async_searches_complete_in_submission_order() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "first",
        ResponseTemplate::new(200)
            .set_body_json(docs(1))
            .set_delay(Duration::from_millis(400)),
    );
    mount(
        &rt,
        &server,
        "second",
        ResponseTemplate::new(200).set_body_json(docs(2)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let (context, pump) = channel_context();
    let context = Arc::new(context);
    let log: Recorded = Arc::new(Mutex::new(Vec::new()));

    orchestrator
        .search_async("first", 10, recorder(&context, &log, "first"))
        .expect("queued");
    orchestrator
        .search_async("second", 10, recorder(&context, &log, "second"))
        .expect("queued");

    assert!(pump.run_next_timeout(Duration::from_secs(5)));
    assert!(pump.run_next_timeout(Duration::from_secs(5)));

    let log = log.lock().expect("lock");
    let labels: Vec<&str> = log.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["first", "second"]);
    assert_eq!(log[0].1.as_ref().map(Vec::len).ok(), Some(1));
    assert_eq!(log[1].1.as_ref().map(Vec::len).ok(), Some(2));
}

#[test]
fn async_error_travels_through_the_same_hand_off() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(&rt, &server, "teapot", ResponseTemplate::new(418));

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let (context, pump) = channel_context();
    let context = Arc::new(context);
    let log: Recorded = Arc::new(Mutex::new(Vec::new()));

    orchestrator
        .search_async("teapot", 5, recorder(&context, &log, "teapot"))
        .expect("queued");
    assert!(pump.run_next_timeout(Duration::from_secs(5)));

    let log = log.lock().expect("lock");
    assert_eq!(log.len(), 1);
    match &log[0].1 {
        Err(err) => assert_eq!(err.status(), Some(418)),
        Ok(lines) => panic!("expected failure, got {lines:?}"),
    }
}

#[test]
fn cancelled_queued_search_never_runs() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "first",
        ResponseTemplate::new(200)
            .set_body_json(docs(1))
            .set_delay(Duration::from_millis(300)),
    );
    mount(
        &rt,
        &server,
        "second",
        ResponseTemplate::new(200).set_body_json(docs(1)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let (context, pump) = channel_context();
    let context = Arc::new(context);
    let log: Recorded = Arc::new(Mutex::new(Vec::new()));

    orchestrator
        .search_async("first", 5, recorder(&context, &log, "first"))
        .expect("queued");
    let second = orchestrator
        .search_async("second", 5, recorder(&context, &log, "second"))
        .expect("queued");
    second.cancel();

    assert!(pump.run_next_timeout(Duration::from_secs(5)));
    assert!(!pump.run_next_timeout(Duration::from_millis(300)));

    let labels: Vec<String> = log
        .lock()
        .expect("lock")
        .iter()
        .map(|(label, _)| label.clone())
        .collect();
    assert_eq!(labels, vec!["first".to_owned()]);

    let requests = rt
        .block_on(server.received_requests())
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1);
}

#[test]
fn shutdown_discards_pending_completions() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "slow",
        ResponseTemplate::new(200)
            .set_body_json(docs(1))
            .set_delay(Duration::from_millis(500)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let (context, pump) = channel_context();
    let context = Arc::new(context);
    let log: Recorded = Arc::new(Mutex::new(Vec::new()));

    let handle = orchestrator
        .search_async("slow", 5, recorder(&context, &log, "slow"))
        .expect("queued");
    orchestrator
        .search_async("slow", 5, recorder(&context, &log, "queued"))
        .expect("queued");
    orchestrator.shutdown();

    assert!(handle.is_cancelled());
    pump.run_next_timeout(Duration::from_secs(1));
    pump.run_pending();
    assert!(log.lock().expect("lock").is_empty());

    let err = orchestrator
        .search_async("slow", 5, recorder(&context, &log, "late"))
        .unwrap_err();
    assert!(matches!(err, SearchError::Shutdown));
}

#[test]
fn completion_posted_before_shutdown_is_discarded() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "fast",
        ResponseTemplate::new(200).set_body_json(docs(1)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let (context, pump) = channel_context();
    let context = Arc::new(context);
    let log: Recorded = Arc::new(Mutex::new(Vec::new()));

    orchestrator
        .search_async("fast", 5, recorder(&context, &log, "fast"))
        .expect("queued");

    // Wait until the worker has posted the completion, without running it.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while pump.receiver().is_empty() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(!pump.receiver().is_empty());

    orchestrator.shutdown();
    assert_eq!(pump.run_pending(), 1);
    assert!(log.lock().expect("lock").is_empty());
}

#[test]
fn blocking_and_async_share_formatting() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    mount(
        &rt,
        &server,
        "same",
        ResponseTemplate::new(200).set_body_json(docs(4)),
    );

    let orchestrator = SearchOrchestrator::new(&config_for(&server)).expect("orchestrator");
    let blocking = orchestrator.search_blocking("same", 3).expect("blocking");

    let (context, pump) = channel_context();
    let context = Arc::new(context);
    let log: Recorded = Arc::new(Mutex::new(Vec::new()));
    orchestrator
        .search_async("same", 3, recorder(&context, &log, "async"))
        .expect("queued");
    assert!(pump.run_next_timeout(Duration::from_secs(5)));

    let log = log.lock().expect("lock");
    assert_eq!(log[0].1.as_ref().ok(), Some(&blocking));
}
