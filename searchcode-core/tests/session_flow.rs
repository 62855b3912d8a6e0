//! End-to-end behaviour of a `Session` against a scripted service.
//!
//! Time is paused in every test; the debounce timer only fires when the
//! runtime auto-advances the clock.

mod common;

use std::time::Duration;

use serde_json::json;

use common::{assert_quiet, envelope, hit, pump, session, ScriptedTransport};
use searchcode_core::api::{FILE_CONTENT_PATH, HEALTH_PATH, REPOS_PATH, SEARCH_PATH};
use searchcode_core::{ItemKey, ServiceHealth, Stream, TransportError};

fn math_hits() -> serde_json::Value {
    json!([
        hit("core", "src/Math.java", 0.9),
        hit("core", "src/MathUtil.java", 0.7),
        hit("web", "lib/math.ts", 0.5),
    ])
}

/// Runs "Math" to completion and loads the first hit's content.
async fn seeded() -> (std::sync::Arc<ScriptedTransport>, searchcode_core::Session) {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    session.submit_query("Math");
    session.commit_query();
    transport.wait_for_calls(1).await;
    transport.respond(transport.search_for("Math"), envelope(math_hits()));
    assert_eq!(pump(&mut session).await, None);

    transport.wait_for_calls(2).await;
    transport.respond(
        transport.content_for("core", "src/Math.java"),
        envelope(json!("class Math {}")),
    );
    assert_eq!(pump(&mut session).await, None);
    (transport, session)
}

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_sends_one_search() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    for text in ["f", "fo", "foo"] {
        session.submit_query(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(transport.count(SEARCH_PATH), 0, "nothing before the quiet period");
    assert!(session.query_pending());

    pump(&mut session).await;
    transport.wait_for_calls(1).await;
    assert!(session.search_loading());
    assert_eq!(session.active_query(), "foo");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.count(SEARCH_PATH), 1);
    assert_eq!(transport.requests()[0].body, Some(json!({ "query": "foo", "limit": 200 })));
}

#[tokio::test(start_paused = true)]
async fn late_response_for_older_query_is_discarded() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    session.submit_query("foo");
    session.commit_query();
    session.submit_query("bar");
    session.commit_query();
    transport.wait_for_calls(2).await;

    transport.respond(transport.search_for("bar"), envelope(json!([hit("r", "bar.rs", 1.0)])));
    pump(&mut session).await;
    assert!(!session.search_loading());

    transport.respond(transport.search_for("foo"), envelope(json!([hit("r", "foo.rs", 1.0)])));
    pump(&mut session).await;

    let paths: Vec<_> = session.results().iter().map(|i| i.file_path.as_str()).collect();
    assert_eq!(paths, ["bar.rs"]);
    assert_eq!(session.active_query(), "bar");
}

#[tokio::test(start_paused = true)]
async fn results_replace_selects_first_hit_and_fetches_it() {
    let (transport, session) = seeded().await;

    assert_eq!(session.results().len(), 3);
    assert_eq!(session.selected_index(), Some(0));
    assert_eq!(session.selection().map(|i| i.key()), Some(ItemKey::new("core", "src/Math.java")));
    assert_eq!(session.content(), "class Math {}");
    assert!(!session.content_loading());
    assert_eq!(transport.count(FILE_CONTENT_PATH), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_result_set_nulls_selection_without_content_call() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    session.submit_query("zzz");
    session.commit_query();
    transport.wait_for_calls(1).await;
    transport.respond(0, envelope(json!([])));
    pump(&mut session).await;

    assert!(session.results().is_empty());
    assert!(session.selection().is_none());
    assert_eq!(session.content(), "");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.count(FILE_CONTENT_PATH), 0);
}

#[tokio::test(start_paused = true)]
async fn selecting_non_member_changes_nothing() {
    let (transport, mut session) = seeded().await;
    let outsider: searchcode_core::ResultItem =
        serde_json::from_value(hit("other", "README.md", 1.0)).unwrap();

    assert!(!session.select_item(&outsider));
    assert_eq!(session.selected_index(), Some(0));
    assert_eq!(session.content(), "class Math {}");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.count(FILE_CONTENT_PATH), 1);
}

#[tokio::test(start_paused = true)]
async fn selecting_member_fetches_its_content_once() {
    let (transport, mut session) = seeded().await;
    let target = session.results()[2].clone();

    assert!(session.select_item(&target));
    assert!(session.content_loading());
    assert_eq!(session.content(), "", "old content is dropped while loading");
    assert!(!session.select_item(&target), "reselecting is a no-op");

    transport.wait_for_calls(3).await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.count(FILE_CONTENT_PATH), 2);

    transport.respond(transport.content_for("web", "lib/math.ts"), envelope(json!("export {}")));
    pump(&mut session).await;
    assert_eq!(session.content(), "export {}");
}

#[tokio::test(start_paused = true)]
async fn rapid_selection_keeps_only_latest_content() {
    let (transport, mut session) = seeded().await;

    session.select_next();
    session.select_next();
    transport.wait_for_calls(4).await;

    transport.respond(transport.content_for("web", "lib/math.ts"), envelope(json!("latest")));
    pump(&mut session).await;
    transport.respond(transport.content_for("core", "src/MathUtil.java"), envelope(json!("older")));
    pump(&mut session).await;

    assert_eq!(session.selected_index(), Some(2));
    assert_eq!(session.content(), "latest");
}

#[tokio::test(start_paused = true)]
async fn clearing_query_empties_everything_in_one_step() {
    let (transport, mut session) = seeded().await;

    session.submit_query("");
    let event = common::next_event(&mut session).await;
    session.handle_event(event);

    assert!(session.results().is_empty());
    assert!(session.selection().is_none());
    assert_eq!(session.content(), "");
    assert!(!session.search_loading());
    assert_eq!(session.active_query(), "");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.count(SEARCH_PATH), 1, "an empty query never reaches the service");
}

#[tokio::test(start_paused = true)]
async fn clearing_after_selecting_third_hit_drops_its_late_content() {
    let (transport, mut session) = seeded().await;

    assert!(session.select_index(2));
    transport.wait_for_calls(3).await;
    assert!(session.content_loading());

    session.submit_query("");
    assert_eq!(pump(&mut session).await, None);

    assert!(session.results().is_empty());
    assert!(session.selection().is_none());
    assert_eq!(session.content(), "");
    assert!(!session.content_loading());

    transport.respond(transport.content_for("web", "lib/math.ts"), envelope(json!("late")));
    assert_eq!(pump(&mut session).await, None);
    assert_eq!(session.content(), "");
    assert!(session.selection().is_none());
}

#[tokio::test(start_paused = true)]
async fn new_search_does_not_cancel_content_in_flight() {
    let (transport, mut session) = seeded().await;

    session.select_last();
    transport.wait_for_calls(3).await;

    session.submit_query("Mathx");
    session.commit_query();
    transport.wait_for_calls(4).await;
    assert!(session.search_loading());
    assert!(session.content_loading());

    transport.respond(transport.content_for("web", "lib/math.ts"), envelope(json!("third")));
    assert_eq!(pump(&mut session).await, None);

    assert_eq!(session.content(), "third");
    assert!(!session.content_loading());
    assert_eq!(session.selected_index(), Some(2));
    assert!(session.search_loading(), "the new search is still outstanding");
}

#[tokio::test(start_paused = true)]
async fn search_sends_trimmed_query() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    session.submit_query("  foo ");
    session.commit_query();
    transport.wait_for_calls(1).await;

    assert_eq!(transport.requests()[0].body, Some(json!({ "query": "foo", "limit": 200 })));
    assert_eq!(session.active_query(), "foo");
}

#[tokio::test(start_paused = true)]
async fn clearing_query_discards_in_flight_search() {
    let (transport, mut session) = seeded().await;

    session.submit_query("Mat");
    session.commit_query();
    session.submit_query("   ");
    session.commit_query();
    assert!(session.results().is_empty());

    transport.wait_for_calls(3).await;
    transport.respond(transport.search_for("Mat"), envelope(math_hits()));
    pump(&mut session).await;
    assert!(session.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_failure_keeps_previous_results() {
    let (transport, mut session) = seeded().await;

    session.submit_query("Mathx");
    session.commit_query();
    transport.wait_for_calls(3).await;
    transport.respond(transport.search_for("Mathx"), Err(TransportError::Timeout));

    let failure = pump(&mut session).await.expect("failure is surfaced");
    assert_eq!(failure.stream, Stream::Search);
    assert_eq!(failure.error, TransportError::Timeout);
    assert_eq!(session.results().len(), 3);
    assert_eq!(session.content(), "class Math {}");
    assert!(!session.search_loading());
    assert_eq!(session.last_failure(), Some(&failure));
}

#[tokio::test(start_paused = true)]
async fn content_failure_empties_buffer() {
    let (transport, mut session) = seeded().await;

    session.select_last();
    transport.wait_for_calls(3).await;
    transport.respond(
        transport.content_for("web", "lib/math.ts"),
        Err(TransportError::Status { status: 500, body: "boom".to_owned() }),
    );

    let failure = pump(&mut session).await.expect("failure is surfaced");
    assert_eq!(failure.stream, Stream::Content);
    assert_eq!(session.content(), "");
    assert!(!session.content_loading());
    assert_eq!(session.selected_index(), Some(2));

    assert!(session.reload_content());
    transport.wait_for_calls(4).await;
    transport.respond(3, envelope(json!("export {}")));
    assert_eq!(pump(&mut session).await, None);
    assert_eq!(session.content(), "export {}");
    assert!(session.last_failure().is_none());
}

#[tokio::test(start_paused = true)]
async fn empty_results_leave_no_follow_up_work() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    session.submit_query("a");
    session.commit_query();
    transport.wait_for_calls(1).await;
    transport.respond(0, envelope(json!([])));
    pump(&mut session).await;

    assert_quiet(&mut session).await;
}

#[tokio::test(start_paused = true)]
async fn health_and_repos_are_reported() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);
    assert_eq!(session.health(), &ServiceHealth::Unknown);

    session.probe_health();
    session.list_repos();
    transport.wait_for_calls(2).await;

    transport.respond(
        transport.position(|r| r.path == HEALTH_PATH),
        envelope(json!({ "status": "ok" })),
    );
    transport.respond(
        transport.position(|r| r.path == REPOS_PATH),
        envelope(json!([{ "name": "core", "path": "/src/core", "type": "fs" }])),
    );
    pump(&mut session).await;
    pump(&mut session).await;

    assert_eq!(session.health(), &ServiceHealth::Up("ok".to_owned()));
    let repos = session.repos().expect("repos listed");
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "core");
}

#[tokio::test(start_paused = true)]
async fn unreachable_service_marks_health_down() {
    let transport = ScriptedTransport::new();
    let mut session = session(&transport);

    session.probe_health();
    transport.wait_for_calls(1).await;
    transport.respond(0, Err(TransportError::Network("connection refused".to_owned())));

    let failure = pump(&mut session).await.expect("failure is surfaced");
    assert_eq!(failure.stream, Stream::Health);
    assert_eq!(session.health(), &ServiceHealth::Down);
}
