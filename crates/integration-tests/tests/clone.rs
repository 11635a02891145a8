mod harness;

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use harness::audio::{wav_bytes, wav_payload};
use harness::config::ConfigBuilder;
use harness::server::TestServer;
use harness::stub::{STUB_SAMPLE_RATE, StubBehavior, ready_manager};
use serde_json::{Value, json};
use timbre_engine::ModelManager;

fn clone_body() -> Value {
    json!({
        "ref_audio_base64": wav_payload(),
        "ref_text": "the reference transcript",
        "syn_text": "say something new",
        "syn_lang": "Auto",
    })
}

async fn post_clone(server: &TestServer, body: &Value) -> reqwest::Response {
    server
        .client()
        .post(server.url("/clone"))
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn detail(resp: reqwest::Response) -> String {
    let body: Value = resp.json().await.unwrap();
    body["detail"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn clone_before_model_ready_returns_503() {
    let manager = Arc::new(ModelManager::new());
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let resp = post_clone(&server, &clone_body()).await;

    assert_eq!(resp.status(), 503);
    assert_eq!(detail(resp).await, "Model is not loaded yet.");
}

#[tokio::test]
async fn clone_returns_decodable_wav() {
    let (manager, counters) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let resp = post_clone(&server, &clone_body()).await;

    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    let audio = STANDARD.decode(body["audio_base64"].as_str().unwrap()).unwrap();
    let info = timbre_audio::probe_wav(&audio).unwrap();
    assert_eq!(info.sample_rate, STUB_SAMPLE_RATE);
    assert_eq!(info.channels, 1);
    assert_eq!(counters.synth_calls(), 1);
}

#[tokio::test]
async fn clone_without_syn_lang_defaults_to_auto() {
    let (manager, _) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let mut body = clone_body();
    body.as_object_mut().unwrap().remove("syn_lang");

    let resp = post_clone(&server, &body).await;

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn malformed_base64_is_rejected() {
    let (manager, counters) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let mut body = clone_body();
    body["ref_audio_base64"] = json!("@@not-base64@@");

    let resp = post_clone(&server, &body).await;

    assert_eq!(resp.status(), 400);
    assert_eq!(detail(resp).await, "Invalid base64 audio data.");
    assert_eq!(counters.synth_calls(), 0);
}

#[tokio::test]
async fn non_wav_reference_is_rejected() {
    let (manager, counters) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let mut body = clone_body();
    body["ref_audio_base64"] = json!(STANDARD.encode(b"these bytes are not audio"));

    let resp = post_clone(&server, &body).await;

    assert_eq!(resp.status(), 400);
    assert_eq!(detail(resp).await, "Reference audio is not valid WAV data.");
    assert_eq!(counters.synth_calls(), 0);
}

#[tokio::test]
async fn blank_text_fields_are_rejected() {
    let (manager, _) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let mut body = clone_body();
    body["syn_text"] = json!("   \n");
    let resp = post_clone(&server, &body).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(detail(resp).await, "syn_text must not be empty.");

    let mut body = clone_body();
    body["ref_text"] = json!("");
    let resp = post_clone(&server, &body).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(detail(resp).await, "ref_text must not be empty.");
}

#[tokio::test]
async fn missing_request_field_is_a_parse_error() {
    let (manager, _) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let body = json!({ "ref_text": "only one field" });
    let resp = post_clone(&server, &body).await;

    assert_eq!(resp.status(), 400);
    assert!(detail(resp).await.starts_with("Failed to parse request body"));
}

#[tokio::test]
async fn wrong_content_type_is_rejected() {
    let (manager, _) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/clone"))
        .header("content-type", "text/plain")
        .body(clone_body().to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 415);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (manager, _) = ready_manager(StubBehavior::Succeed).await;
    let config = ConfigBuilder::new().with_body_limit(64).build();
    let server = TestServer::start(manager, config).await.unwrap();

    let resp = post_clone(&server, &clone_body()).await;

    assert_eq!(resp.status(), 413);
    assert_eq!(detail(resp).await, "Request body is too large, limit is 64 bytes");
}

#[tokio::test]
async fn engine_failure_maps_to_bad_request() {
    let (manager, counters) = ready_manager(StubBehavior::Fail).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let resp = post_clone(&server, &clone_body()).await;

    assert_eq!(resp.status(), 400);
    assert_eq!(detail(resp).await, "synthesis failed: stub refuses to sing");
    assert_eq!(counters.synth_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_synthesis_times_out() {
    let (manager, _) = ready_manager(StubBehavior::Delay(Duration::from_millis(1500))).await;
    let config = ConfigBuilder::new().with_synthesis_timeout(1).build();
    let server = TestServer::start(manager, config).await.unwrap();

    let resp = post_clone(&server, &clone_body()).await;

    assert_eq!(resp.status(), 400);
    assert_eq!(detail(resp).await, "Synthesis timed out after 1 seconds.");
}

#[tokio::test]
async fn round_trip_preserves_reference_independence() {
    // Two requests with different reference payloads both succeed; the
    // stub sees each call exactly once.
    let (manager, counters) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let first = post_clone(&server, &clone_body()).await;
    assert_eq!(first.status(), 200);

    let mut second_body = clone_body();
    second_body["ref_audio_base64"] = json!(STANDARD.encode(wav_bytes()));
    second_body["syn_text"] = json!("a different line");
    let second = post_clone(&server, &second_body).await;
    assert_eq!(second.status(), 200);

    assert_eq!(counters.synth_calls(), 2);
}
