mod harness;

use std::sync::Arc;
use std::time::Duration;

use harness::audio::wav_payload;
use harness::config::ConfigBuilder;
use harness::server::TestServer;
use harness::stub::{FailingLoader, StubBehavior, ready_manager};
use serde_json::{Value, json};
use timbre_core::GenerationParams;
use timbre_engine::{Device, EngineError, ModelManager};

fn clone_body() -> Value {
    json!({
        "ref_audio_base64": wav_payload(),
        "ref_text": "the reference transcript",
        "syn_text": "say something new",
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

#[tokio::test]
async fn failed_load_leaves_endpoints_unavailable() {
    let manager = Arc::new(ModelManager::new());

    let err = Arc::clone(&manager)
        .load(Arc::new(FailingLoader), Device::Cpu)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::LoadFailed { .. }));

    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let resp = post_clone(&server, &clone_body()).await;
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn unload_returns_endpoints_to_unavailable() {
    let (manager, _) = ready_manager(StubBehavior::Succeed).await;
    let server = TestServer::start(Arc::clone(&manager), ConfigBuilder::new().build())
        .await
        .unwrap();

    let resp = post_clone(&server, &clone_body()).await;
    assert_eq!(resp.status(), 200);

    manager.unload();

    let resp = post_clone(&server, &clone_body()).await;
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn prompt_is_derived_once_for_many_lines() {
    let (manager, counters) = ready_manager(StubBehavior::Succeed).await;

    let prompt = manager
        .derive_prompt("ref.wav".into(), "the reference transcript".to_string(), false)
        .await
        .unwrap();

    for line in ["first line", "second line", "third line"] {
        manager
            .synthesize_with_prompt(
                prompt.clone(),
                line.to_string(),
                "Auto".to_string(),
                GenerationParams::default(),
            )
            .await
            .unwrap();
    }

    assert_eq!(counters.prompt_derivations(), 1);
    assert_eq!(counters.synth_calls(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clones_are_serialized_not_rejected() {
    // The stub engine asserts that no two calls overlap; three requests
    // landing together must all succeed anyway.
    let (manager, counters) = ready_manager(StubBehavior::Delay(Duration::from_millis(100))).await;
    let server = TestServer::start(manager, ConfigBuilder::new().build()).await.unwrap();

    let body = clone_body();
    let (a, b, c) = tokio::join!(
        post_clone(&server, &body),
        post_clone(&server, &body),
        post_clone(&server, &body),
    );

    assert_eq!(a.status(), 200);
    assert_eq!(b.status(), 200);
    assert_eq!(c.status(), 200);
    assert_eq!(counters.synth_calls(), 3);
}
