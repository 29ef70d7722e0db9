//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 请求级行为 (握手 / 单条 / 批量 / 拒绝 / 部分失败)
//! - 并发发布的时延特性
//! - 配置 → 发布者 → HTTP 路由的完整链路

#[cfg(test)]
mod contract_tests {
    use config_loader::ConfigLoader;
    use contracts::{BrokerKind, ConfigVersion, PublishPolicy};

    /// Environment-only configuration resolves to the documented defaults
    #[test]
    fn test_env_only_config_defaults() {
        let config = ConfigLoader::load_with_env(None, |key| match key {
            "GOOGLE_CLOUD_PROJECT" => Some("demo".to_string()),
            "PUBSUB_TOPIC" => Some("records".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.version, ConfigVersion::V1);
        assert_eq!(config.broker.kind, BrokerKind::Pubsub);
        assert_eq!(config.publish.mode, PublishPolicy::BestEffort);
        assert_eq!(config.topic_path().as_str(), "projects/demo/topics/records");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;
    use contracts::{PublishPolicy, TopicPath};
    use dispatcher::{MockPublisher, PublishCoordinator};
    use gateway::{create_router, Gateway};
    use serde_json::Value;
    use tower::ServiceExt;

    const MAX_BODY: usize = 1024 * 1024;

    fn gateway_with(publisher: MockPublisher, policy: PublishPolicy) -> Arc<Gateway<MockPublisher>> {
        Arc::new(Gateway::new(
            PublishCoordinator::new(publisher),
            TopicPath::new("test-project", "registros-produccion"),
            policy,
        ))
    }

    async fn post(
        gateway: Arc<Gateway<MockPublisher>>,
        body: impl Into<Body>,
        content_type: Option<&str>,
    ) -> (StatusCode, Bytes) {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let response = create_router(gateway, MAX_BODY)
            .oneshot(builder.body(body.into()).unwrap())
            .await
            .expect("failed to make request");

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, body)
    }

    fn json(body: &Bytes) -> Value {
        serde_json::from_slice(body).expect("response should be valid JSON")
    }

    fn batch(n: usize) -> String {
        let records: Vec<String> = (0..n).map(|i| format!(r#"{{"i":{i}}}"#)).collect();
        format!("[{}]", records.join(","))
    }

    /// Empty input is a handshake whatever the headers say
    #[tokio::test]
    async fn test_empty_body_is_handshake() {
        for content_type in [None, Some("application/json"), Some("text/plain")] {
            let publisher = MockPublisher::new();
            let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

            let (status, body) = post(gateway, Body::empty(), content_type).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(&body[..], b"Endpoint verified");
            assert_eq!(publisher.call_count(), 0);
        }
    }

    /// A single object is published byte-for-byte
    #[tokio::test]
    async fn test_single_object_published_verbatim() {
        let publisher = MockPublisher::new();
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let (status, body) = post(gateway, r#"{"a":1}"#, Some("application/json")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["published"], 1);

        let recorded = publisher.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "projects/test-project/topics/registros-produccion");
        assert_eq!(&recorded[0].1[..], br#"{"a":1}"#);
    }

    /// Field order survives the round trip through the gateway
    #[tokio::test]
    async fn test_field_order_preserved() {
        let publisher = MockPublisher::new();
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        post(gateway, r#"{"z":1,"a":{"y":2,"b":3}}"#, None).await;

        assert_eq!(&publisher.payloads()[0][..], br#"{"z":1,"a":{"y":2,"b":3}}"#);
    }

    /// Numbers beyond i64/u64/f64 range reach the broker with every digit
    #[tokio::test]
    async fn test_large_numbers_published_exactly() {
        let publisher = MockPublisher::new();
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);
        let record = r#"{"id":123456789012345678901234567890,"price":0.10000000000000000555,"neg":-98765432109876543210}"#;

        let (status, _) = post(gateway, format!("[{record}]"), Some("application/json")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&publisher.payloads()[0][..], record.as_bytes());
    }

    /// N records, N publishes, count N
    #[tokio::test]
    async fn test_batch_publishes_every_record() {
        let publisher = MockPublisher::new();
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let (status, body) = post(gateway, batch(25), Some("application/json")).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "published");
        assert_eq!(body["total"], 25);
        assert_eq!(body["published"], 25);
        assert_eq!(body["message_ids"].as_array().unwrap().len(), 25);
        assert_eq!(publisher.call_count(), 25);

        let mut payloads: Vec<Vec<u8>> = publisher.payloads().iter().map(|p| p.to_vec()).collect();
        payloads.sort();
        let mut expected: Vec<Vec<u8>> = (0..25)
            .map(|i| format!(r#"{{"i":{i}}}"#).into_bytes())
            .collect();
        expected.sort();
        assert_eq!(payloads, expected);
    }

    /// Malformed JSON is rejected with nothing published
    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let publisher = MockPublisher::new();
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let (status, body) = post(gateway, "{bad", Some("application/json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"]["kind"], "decode");
        assert_eq!(publisher.call_count(), 0);
    }

    /// One misshaped element rejects the whole batch
    #[tokio::test]
    async fn test_misshaped_batch_rejected() {
        let publisher = MockPublisher::new();
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let (status, body) = post(
            gateway,
            r#"[{"i":0},{"i":1},"two",{"i":3},{"i":4}]"#,
            Some("application/json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = json(&body);
        assert_eq!(body["error"]["kind"], "validation");
        assert_eq!(body["error"]["index"], 2);
        assert_eq!(publisher.call_count(), 0);
    }

    /// Top-level scalars are rejected
    #[tokio::test]
    async fn test_scalar_rejected() {
        for payload in ["42", r#""text""#, "null", "true"] {
            let publisher = MockPublisher::new();
            let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

            let (status, _) = post(gateway, payload, None).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(publisher.call_count(), 0);
        }
    }

    /// A failing record is isolated from its siblings
    #[tokio::test]
    async fn test_partial_failure_isolated() {
        let publisher = MockPublisher::new().fail_when(|payload| payload == br#"{"i":3}"#);
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let (status, body) = post(gateway, batch(5), Some("application/json")).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "partial");
        assert_eq!(body["published"], 4);
        assert_eq!(body["failed"], 1);
        assert_eq!(body["failures"].as_array().unwrap().len(), 1);
        assert_eq!(body["failures"][0]["index"], 3);
        assert_eq!(publisher.call_count(), 5);
    }

    /// Atomic mode still attempts every record but fails the request
    #[tokio::test]
    async fn test_atomic_mode_fails_request() {
        let publisher = MockPublisher::new().fail_when(|payload| payload == br#"{"i":3}"#);
        let gateway = gateway_with(publisher.clone(), PublishPolicy::Atomic);

        let (status, body) = post(gateway, batch(5), Some("application/json")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = json(&body);
        assert_eq!(body["status"], "failed");
        assert_eq!(body["failures"][0]["index"], 3);
        assert_eq!(publisher.call_count(), 5);
    }

    /// A panicking publish becomes a failed outcome, not a lost response
    #[tokio::test]
    async fn test_panicking_publish_reported() {
        let publisher = MockPublisher::new().panic_when(|payload| payload == br#"{"i":1}"#);
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let (status, body) = post(gateway, batch(3), Some("application/json")).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["published"], 2);
        assert_eq!(body["failures"][0]["index"], 1);
    }

    /// Publishes run concurrently: latency ≈ one call, not N calls
    #[tokio::test]
    async fn test_batch_latency_bounded_by_slowest_publish() {
        let delay = Duration::from_millis(200);
        let publisher = MockPublisher::new().with_delay(delay);
        let gateway = gateway_with(publisher.clone(), PublishPolicy::BestEffort);

        let started = Instant::now();
        let (status, _) = post(gateway, batch(20), Some("application/json")).await;
        let elapsed = started.elapsed();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(publisher.call_count(), 20);
        assert!(elapsed >= delay);
        assert!(
            elapsed < delay * 4,
            "batch took {elapsed:?}, expected close to {delay:?}"
        );
    }

    /// Health reflects the shared publish counters
    #[tokio::test]
    async fn test_health_counts_publishes() {
        let publisher = MockPublisher::new().fail_when(|payload| payload == br#"{"i":0}"#);
        let gateway = gateway_with(publisher, PublishPolicy::BestEffort);

        post(Arc::clone(&gateway), batch(3), None).await;

        let response = create_router(gateway, MAX_BODY)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = json(&body);
        assert_eq!(body["published"], 2);
        assert_eq!(body["failed"], 1);
        assert_eq!(body["in_flight"], 0);
    }
}

#[cfg(test)]
mod pubsub_e2e_tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use config_loader::ConfigLoader;
    use dispatcher::{create_publisher, PublishCoordinator};
    use gateway::{create_router, Gateway};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Environment → config → Pub/Sub publisher → HTTP router
    #[tokio::test]
    async fn test_full_stack_against_emulator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/topics/registros-produccion:publish"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messageIds": ["42"]})))
            .expect(3)
            .mount(&server)
            .await;

        let emulator_host = server.address().to_string();
        let config = ConfigLoader::load_with_env(None, |key| match key {
            "GCP_PROJECT" => Some("demo".to_string()),
            "PUBSUB_TOPIC" => Some("registros-produccion".to_string()),
            "PUBSUB_EMULATOR_HOST" => Some(emulator_host.clone()),
            _ => None,
        })
        .unwrap();

        let publisher = create_publisher(&config.broker).unwrap();
        let gateway = Arc::new(Gateway::new(
            PublishCoordinator::new(publisher),
            config.topic_path(),
            config.publish.mode,
        ));

        let response = create_router(gateway, config.server.max_body_bytes)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(r#"[{"a":1},{"a":2},{"a":3}]"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["published"], 3);
        assert_eq!(body["message_ids"], json!(["42", "42", "42"]));
    }

    /// Broker errors surface per record
    #[tokio::test]
    async fn test_broker_rejection_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let emulator_host = server.address().to_string();
        let config = ConfigLoader::load_with_env(None, |key| match key {
            "GCP_PROJECT" => Some("demo".to_string()),
            "PUBSUB_TOPIC" => Some("records".to_string()),
            "PUBSUB_EMULATOR_HOST" => Some(emulator_host.clone()),
            _ => None,
        })
        .unwrap();

        let gateway = Gateway::new(
            PublishCoordinator::new(create_publisher(&config.broker).unwrap()),
            config.topic_path(),
            config.publish.mode,
        );

        let reply = gateway.ingest(br#"{"a":1}"#).await;

        assert_eq!(reply.status, 500);
        assert!(reply.body_text().contains("503"));
    }

    /// An unreachable broker fails the request with 500
    #[tokio::test]
    async fn test_unreachable_broker_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let emulator_host = listener.local_addr().unwrap().to_string();
        drop(listener);

        let config = ConfigLoader::load_with_env(None, |key| match key {
            "GCP_PROJECT" => Some("demo".to_string()),
            "PUBSUB_TOPIC" => Some("records".to_string()),
            "PUBSUB_EMULATOR_HOST" => Some(emulator_host.clone()),
            _ => None,
        })
        .unwrap();

        let gateway = Gateway::new(
            PublishCoordinator::new(create_publisher(&config.broker).unwrap()),
            config.topic_path(),
            config.publish.mode,
        );

        let reply = gateway.ingest(br#"[{"a":1},{"a":2}]"#).await;

        assert_eq!(reply.status, 500);
        assert!(reply.body_text().contains("broker unavailable"), "{}", reply.body_text());
    }
}
