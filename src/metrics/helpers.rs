//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::notification::TargetType;

use super::{BATCH_RECIPIENTS_TOTAL, DISPATCHES_TOTAL, DISPATCH_LATENCY, REQUESTS_REJECTED_TOTAL};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a completed dispatch
    pub fn record_dispatch(target: TargetType, succeeded: bool) {
        let outcome = if succeeded { "success" } else { "failure" };
        DISPATCHES_TOTAL
            .with_label_values(&[target.as_str(), outcome])
            .inc();
    }

    /// Record a dispatch skipped because the provider is not initialized
    pub fn record_unavailable(target: TargetType) {
        DISPATCHES_TOTAL
            .with_label_values(&[target.as_str(), "unavailable"])
            .inc();
    }

    /// Record provider call latency
    pub fn observe_latency(target: TargetType, elapsed: Duration) {
        DISPATCH_LATENCY
            .with_label_values(&[target.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Record per-recipient batch outcomes
    pub fn record_batch(delivered: usize, failed: usize) {
        BATCH_RECIPIENTS_TOTAL
            .with_label_values(&["delivered"])
            .inc_by(delivered as u64);
        BATCH_RECIPIENTS_TOTAL
            .with_label_values(&["failed"])
            .inc_by(failed as u64);
    }
}

/// Helper struct for recording request metrics
pub struct RequestMetrics;

impl RequestMetrics {
    /// Record a request rejected before dispatch
    pub fn record_rejected() {
        REQUESTS_REJECTED_TOTAL.inc();
    }
}
