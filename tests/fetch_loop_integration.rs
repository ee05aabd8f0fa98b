//! Integration tests for the fetch loop.
//!
//! These tests run complete runs against wiremock servers. Pacing is either
//! disabled or recorded through a sleep that returns immediately, so no
//! real waiting happens.

use std::collections::HashSet;
use std::time::Duration;

use apigrab_core::{
    AttemptOutcome, FailureKind, FetchEngine, NoopObserver, RunConfig, RunObserver, Throttle,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR-test-image";

fn engine() -> FetchEngine {
    FetchEngine::new(Duration::from_secs(5), Throttle::disabled())
}

/// Engine with the real pacing schedule whose sleeps finish at once.
fn paced_engine() -> FetchEngine {
    FetchEngine::new(Duration::from_secs(5), Throttle::default())
        .with_sleep(|_| tokio::time::sleep(Duration::ZERO))
}

/// Records every callback for later assertions.
#[derive(Default)]
struct Recorder {
    started: usize,
    attempts: Vec<(usize, usize)>,
    outcomes: Vec<AttemptOutcome>,
    pauses: Vec<(usize, Duration)>,
}

impl RunObserver for Recorder {
    fn on_run_start(&mut self, _config: &RunConfig) {
        self.started += 1;
    }

    fn on_attempt_start(&mut self, index: usize, total: usize) {
        self.attempts.push((index, total));
    }

    fn on_attempt_finish(&mut self, _index: usize, _total: usize, outcome: &AttemptOutcome) {
        self.outcomes.push(outcome.clone());
    }

    fn on_pause(&mut self, index: usize, delay: Duration) {
        self.pauses.push((index, delay));
    }
}

#[tokio::test]
async fn test_run_always_500_counts_every_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let url = format!("{}/api", server.uri());
    let config = RunConfig::new(&url, 5, "jpg", temp.path()).expect("valid config");

    let mut recorder = Recorder::default();
    let report = engine().run(&config, &mut recorder).await.expect("run starts");

    assert_eq!(report.successes(), 0);
    assert_eq!(report.failures(), 5);
    assert!(report.files().is_empty());
    assert_eq!(recorder.started, 1);
    assert_eq!(recorder.attempts.len(), 5);
    assert!(
        recorder
            .outcomes
            .iter()
            .all(|o| *o == AttemptOutcome::HttpStatus { status: 500 })
    );
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_run_png_endpoint_saves_every_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/random.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(PNG_BYTES.to_vec()),
        )
        .expect(3)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let url = format!("{}/random.png", server.uri());
    let config = RunConfig::new(&url, 3, "png", temp.path()).expect("valid config");

    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");

    assert_eq!(report.successes(), 3);
    assert_eq!(report.failures(), 0);
    let names: HashSet<&String> = report.files().iter().collect();
    assert_eq!(names.len(), 3, "filenames must be distinct: {:?}", report.files());
    for name in report.files() {
        assert!(name.starts_with("image_"), "unexpected prefix: {name}");
        assert!(name.ends_with(".png"), "unexpected extension: {name}");
        let saved = std::fs::read(temp.path().join(name)).expect("file on disk");
        assert_eq!(saved, PNG_BYTES);
    }
}

#[tokio::test]
async fn test_run_unrecognized_hint_uses_category_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(PNG_BYTES.to_vec()),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 1, "mp3", temp.path()).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");

    assert_eq!(report.files().len(), 1);
    assert!(report.files()[0].ends_with(".jpg"), "{:?}", report.files());
}

#[tokio::test]
async fn test_run_json_saved_as_text_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json; charset=utf-8")
                .set_body_string("{\"quote\":\"héllo\"}"),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 1, "json", temp.path()).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");

    let name = &report.files()[0];
    assert!(name.starts_with("data_") && name.ends_with(".json"), "{name}");
    let saved = std::fs::read_to_string(temp.path().join(name)).expect("file on disk");
    assert_eq!(saved, "{\"quote\":\"héllo\"}");
}

#[tokio::test]
async fn test_run_sniffs_untyped_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(b"\x00\x00\x00\x20ftypisom".to_vec()),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 1, "mkv", temp.path()).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");

    assert!(report.files()[0].starts_with("video_"), "{:?}", report.files());
    assert!(report.files()[0].ends_with(".mkv"), "{:?}", report.files());
}

#[tokio::test]
async fn test_run_binary_keeps_raw_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/octet-stream")
                .set_body_bytes(b"PK\x03\x04zip".to_vec()),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 1, "zip", temp.path()).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");

    assert!(report.files()[0].starts_with("file_"), "{:?}", report.files());
    assert!(report.files()[0].ends_with(".zip"), "{:?}", report.files());
}

#[tokio::test]
async fn test_run_mixed_outcomes_keeps_going() {
    let server = MockServer::start().await;
    // First two requests fail, the rest succeed.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[1,2,3]"))
        .with_priority(2)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 4, "txt", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    let report = engine().run(&config, &mut recorder).await.expect("run starts");

    assert_eq!(report.failures(), 2);
    assert_eq!(report.successes(), 2);
    assert_eq!(report.files().len(), 2);
    assert_eq!(
        recorder.outcomes[0],
        AttemptOutcome::HttpStatus { status: 503 }
    );
    assert!(recorder.outcomes[3].is_success());
}

#[tokio::test]
async fn test_run_timeouts_are_counted_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 2, "txt", temp.path()).expect("valid config");
    let engine = FetchEngine::new(Duration::from_millis(100), Throttle::disabled());
    let mut recorder = Recorder::default();
    let report = engine.run(&config, &mut recorder).await.expect("run starts");

    assert_eq!(report.failures(), 2);
    assert!(recorder.outcomes.iter().all(|o| matches!(
        o,
        AttemptOutcome::Failed {
            kind: FailureKind::Timeout,
            ..
        }
    )));
}

#[tokio::test]
async fn test_run_connection_refused_is_counted() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let temp = TempDir::new().expect("temp dir");
    let url = format!("http://127.0.0.1:{port}/api");
    let config = RunConfig::new(&url, 3, "txt", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    let report = engine().run(&config, &mut recorder).await.expect("run starts");

    assert_eq!(report.failures(), 3);
    assert_eq!(report.successes(), 0);
    assert!(recorder.outcomes.iter().all(|o| matches!(
        o,
        AttemptOutcome::Failed {
            kind: FailureKind::Connect,
            ..
        }
    )));
}

#[tokio::test]
async fn test_run_creates_missing_save_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let nested = temp.path().join("a").join("b").join("c");
    let config = RunConfig::new(&server.uri(), 1, "txt", &nested).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");

    assert!(nested.is_dir());
    assert_eq!(report.successes(), 1);
    assert!(nested.join(&report.files()[0]).exists());
}

#[tokio::test]
async fn test_run_text_decoded_by_declared_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/plain; charset=iso-8859-1")
                .set_body_bytes(b"caf\xe9".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sjis"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json; charset=Shift_JIS")
                .set_body_bytes(b"[\"\x93\xfa\x96\x7b\"]".to_vec()),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");

    let url = format!("{}/latin1", server.uri());
    let config = RunConfig::new(&url, 1, "txt", temp.path()).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");
    let saved = std::fs::read_to_string(temp.path().join(&report.files()[0])).expect("file");
    assert_eq!(saved, "café");

    let url = format!("{}/sjis", server.uri());
    let config = RunConfig::new(&url, 1, "json", temp.path()).expect("valid config");
    let report = engine().run(&config, &mut NoopObserver).await.expect("run starts");
    let saved = std::fs::read_to_string(temp.path().join(&report.files()[0])).expect("file");
    assert_eq!(saved, "[\"日本\"]");
}

#[tokio::test]
async fn test_run_status_failures_back_off_between_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 2, "txt", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    paced_engine().run(&config, &mut recorder).await.expect("run starts");

    // One wait between the two attempts, none after the last.
    assert_eq!(recorder.pauses, vec![(1, Duration::from_secs(2))]);
}

#[tokio::test]
async fn test_run_batch_delay_follows_tenth_success_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(11)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 11, "json", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    let report = paced_engine()
        .run(&config, &mut recorder)
        .await
        .expect("run starts");

    assert_eq!(report.successes(), 11);
    let expected: Vec<(usize, Duration)> = (1..=10)
        .map(|index| {
            let delay = if index == 10 {
                Duration::from_millis(600)
            } else {
                Duration::from_millis(300)
            };
            (index, delay)
        })
        .collect();
    assert_eq!(recorder.pauses, expected);
}

#[tokio::test]
async fn test_run_batch_delay_counts_successes_not_iterations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .with_priority(2)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 12, "txt", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    paced_engine()
        .run(&config, &mut recorder)
        .await
        .expect("run starts");

    // The 10th success lands on iteration 11.
    assert_eq!(recorder.pauses.len(), 11);
    assert_eq!(recorder.pauses[0], (1, Duration::from_secs(2)));
    assert_eq!(recorder.pauses[9], (10, Duration::from_millis(300)));
    assert_eq!(recorder.pauses[10], (11, Duration::from_millis(600)));
}

#[tokio::test]
async fn test_run_connection_failures_back_off_five_seconds() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let temp = TempDir::new().expect("temp dir");
    let url = format!("http://127.0.0.1:{port}/api");
    let config = RunConfig::new(&url, 3, "txt", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    paced_engine()
        .run(&config, &mut recorder)
        .await
        .expect("run starts");

    assert_eq!(
        recorder.pauses,
        vec![(1, Duration::from_secs(5)), (2, Duration::from_secs(5))]
    );
}

#[tokio::test]
async fn test_run_single_request_never_pauses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let config = RunConfig::new(&server.uri(), 1, "txt", temp.path()).expect("valid config");
    let mut recorder = Recorder::default();
    paced_engine()
        .run(&config, &mut recorder)
        .await
        .expect("run starts");

    assert!(recorder.pauses.is_empty());
}
