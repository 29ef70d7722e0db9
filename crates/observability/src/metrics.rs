//! Gateway 指标收集模块
//!
//! 请求、批量大小与单条发布的 Prometheus 指标。

use metrics::{counter, histogram};

/// Longest payload excerpt written to logs
pub const PAYLOAD_PREVIEW_BYTES: usize = 512;

/// 记录请求结果
///
/// `outcome` is one of `handshake`, `published`, `partial`, `failed`,
/// `rejected`, `internal`.
pub fn record_request(outcome: &'static str) {
    counter!("webhook_gateway_requests_total", "outcome" => outcome).increment(1);
}

/// 记录请求耗时 (毫秒)
pub fn record_request_latency_ms(latency_ms: f64) {
    histogram!("webhook_gateway_request_latency_ms").record(latency_ms);
}

/// 记录批量大小
pub fn record_batch_size(records: usize) {
    histogram!("webhook_gateway_batch_size").record(records as f64);
}

/// 记录单条发布结果与耗时
pub fn record_publish(success: bool, latency_ms: f64) {
    let status = if success { "success" } else { "failure" };
    counter!("webhook_gateway_publish_total", "status" => status).increment(1);
    histogram!("webhook_gateway_publish_latency_ms", "status" => status).record(latency_ms);
}

/// Lossy UTF-8 excerpt of a payload for diagnostics.
///
/// ```
/// use observability::payload_preview;
///
/// assert_eq!(payload_preview(b"{\"a\":1}"), "{\"a\":1}");
/// assert!(payload_preview(&[b'x'; 2000]).ends_with("... (2000 bytes)"));
/// ```
pub fn payload_preview(payload: &[u8]) -> String {
    if payload.len() <= PAYLOAD_PREVIEW_BYTES {
        return String::from_utf8_lossy(payload).into_owned();
    }
    format!(
        "{}... ({} bytes)",
        String::from_utf8_lossy(&payload[..PAYLOAD_PREVIEW_BYTES]),
        payload.len()
    )
}
