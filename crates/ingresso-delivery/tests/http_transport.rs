#![cfg(feature = "http")]

use ingresso_delivery::http::{HttpBeacon, HttpTransport};
use ingresso_delivery::{Beacon, Transport};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer) -> Url {
    Url::parse(&format!("{}/hook", server.uri())).expect("endpoint url")
}

#[tokio::test]
async fn posts_json_and_returns_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "tipo": "pista-individual" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"init_point":"https://mp.example/1"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).expect("transport");
    let response = transport
        .post_json(&endpoint(&server), br#"{"tipo":"pista-individual"}"#.to_vec())
        .await
        .expect("response");

    assert!(response.is_success());
    assert_eq!(response.body, r#"{"init_point":"https://mp.example/1"}"#);
}

#[tokio::test]
async fn non_success_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(410).set_body_string("gone"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Some("ingresso-test")).expect("transport");
    let response = transport
        .post_json(&endpoint(&server), b"{}".to_vec())
        .await
        .expect("response");

    assert_eq!(response.status, 410);
    assert!(!response.is_success());
}

#[tokio::test]
async fn beacon_delivers_in_the_background() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let beacon = HttpBeacon::new(None).expect("beacon");
    assert!(beacon.send(&endpoint(&server), br#"{"tipo":"pista-individual"}"#.to_vec()));

    let mut received = Vec::new();
    for _ in 0..50 {
        received = server.received_requests().await.unwrap_or_default();
        if !received.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, br#"{"tipo":"pista-individual"}"#.to_vec());
}

#[tokio::test]
async fn drain_waits_for_queued_beacons() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
        .expect(2)
        .mount(&server)
        .await;

    let beacon = HttpBeacon::new(None).expect("beacon");
    let queued = beacon.clone();
    assert!(queued.send(&endpoint(&server), b"{}".to_vec()));
    assert!(queued.send(&endpoint(&server), b"{}".to_vec()));
    beacon.drain().await;

    let received = server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn finished_beacons_are_reaped_on_next_send() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let beacon = HttpBeacon::new(None).expect("beacon");
    assert!(beacon.send(&endpoint(&server), b"{}".to_vec()));
    for _ in 0..50 {
        if !server.received_requests().await.unwrap_or_default().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(beacon.send(&endpoint(&server), b"{}".to_vec()));
    assert_eq!(beacon.in_flight(), 1);
    beacon.drain().await;
    assert_eq!(beacon.in_flight(), 0);
}

#[test]
fn beacon_without_runtime_is_not_queued() {
    let beacon = HttpBeacon::new(None).expect("beacon");
    let url = Url::parse("https://hook.example.com/hook").expect("url");
    assert!(!beacon.send(&url, b"{}".to_vec()));
}
