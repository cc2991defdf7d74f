// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the emotion client against mocked HTTP services.

use std::sync::Arc;
use std::time::Duration;

use spiritbytes_config::SpiritConfig;
use spiritbytes_config::model::{BlobStoreConfig, TransportKind};
use spiritbytes_core::{AdapterType, ImageHandle, PluginAdapter, SpiritError};
use spiritbytes_emotion::{
    BlobReferenceTransport, EmotionClient, HttpBlobStore, build_transport, top_three_emotions,
};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn blob_store(server: &MockServer) -> Arc<HttpBlobStore> {
    Arc::new(
        HttpBlobStore::new(&BlobStoreConfig {
            bucket: "photos".into(),
            region: "us-east-2".into(),
            url_template: format!("{}/blob/{{bucket}}/{{key}}", server.uri()),
        })
        .unwrap(),
    )
}

fn client(server: &MockServer, inference_timeout: Duration) -> EmotionClient {
    let transport = BlobReferenceTransport::new(
        blob_store(server),
        format!("{}/analyze", server.uri()),
        Duration::from_secs(5),
        inference_timeout,
    )
    .unwrap();
    EmotionClient::new(Arc::new(transport))
}

#[tokio::test]
async fn uploads_then_sends_reference() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/blob/photos/emotion-\d+-[0-9a-z]{13}\.jpg$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("^/analyze$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Emotions detected",
            "emotions": [
                {"type": "CALM", "confidence": 55.2},
                {"type": "HAPPY", "confidence": 91.7},
                {"type": "SAD", "confidence": 2.0},
                {"type": "FEAR", "confidence": 0.4}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analysis = client(&server, Duration::from_secs(5))
        .analyze_emotion(ImageHandle::Bytes(vec![0xFF, 0xD8, 0xFF]))
        .await
        .unwrap();
    assert!(analysis.success);

    let top = top_three_emotions(&analysis.emotions);
    let moods: Vec<&str> = top.iter().map(|m| m.mood.as_str()).collect();
    assert_eq!(moods, ["Happy", "Relaxed", "Sad"]);
    assert_eq!(top[0].percentage, 92);

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let put_key = requests[0].url.path().rsplit('/').next().unwrap().to_string();
    let body: serde_json::Value = requests[1].body_json().unwrap();
    assert_eq!(body["imageKey"], put_key);
    assert_eq!(body["bucketName"], "photos");
}

#[tokio::test]
async fn forbidden_upload_aborts_before_inference() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .analyze_emotion(ImageHandle::Bytes(vec![1, 2, 3]))
        .await
        .unwrap_err();
    match err {
        SpiritError::Transport {
            service, status, ..
        } => {
            assert_eq!(service, AdapterType::BlobStore);
            assert_eq!(status, Some(403));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn no_face_is_a_successful_empty_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true, "emotions": []})),
        )
        .mount(&server)
        .await;

    let analysis = client(&server, Duration::from_secs(5))
        .analyze_emotion(ImageHandle::Bytes(vec![1]))
        .await
        .unwrap();
    assert!(analysis.success);
    assert!(analysis.is_empty());
}

#[tokio::test]
async fn slow_inference_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_millis(200))
        .analyze_emotion(ImageHandle::Bytes(vec![1]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SpiritError::Timeout {
            service: AdapterType::Inference,
            ..
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_upload_times_out_before_inference() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let transport = BlobReferenceTransport::new(
        blob_store(&server),
        format!("{}/analyze", server.uri()),
        Duration::from_millis(200),
        Duration::from_secs(5),
    )
    .unwrap();
    let err = EmotionClient::new(Arc::new(transport))
        .analyze_emotion(ImageHandle::Bytes(vec![1]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SpiritError::Timeout {
            service: AdapterType::BlobStore,
            ..
        }
    ));
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() == "PUT"));
}

#[tokio::test]
async fn empty_image_is_rejected_without_network() {
    let server = MockServer::start().await;
    let err = client(&server, Duration::from_secs(5))
        .analyze_emotion(ImageHandle::Bytes(Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, SpiritError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn inline_transport_is_selected_by_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex("^/analyze$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "emotions": [{"type": "SURPRISED", "confidence": 64.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = SpiritConfig::default();
    config.inference.endpoint = Some(format!("{}/analyze", server.uri()));
    config.inference.transport = TransportKind::Inline;
    let transport = build_transport(&config).unwrap().unwrap();
    assert_eq!(transport.name(), "inference-inline");

    let analysis = EmotionClient::new(transport)
        .analyze_emotion(ImageHandle::Bytes(vec![0xFF]))
        .await
        .unwrap();
    assert_eq!(analysis.emotions[0].label, "SURPRISED");
}
