//! Prometheus metrics for the push dispatch service.
//!
//! - Dispatch counts by target type and outcome
//! - Dispatch latency by target type
//! - Batch recipient outcomes
//! - Request validation rejections

mod helpers;

pub use helpers::{encode_metrics, DispatchMetrics, RequestMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "push";

lazy_static! {
    /// Total dispatches by target type and outcome
    pub static ref DISPATCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatches_total", METRIC_PREFIX),
        "Total push dispatches",
        &["target", "outcome"]
    ).unwrap();

    /// Time spent in the provider call
    pub static ref DISPATCH_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_dispatch_latency_seconds", METRIC_PREFIX),
        "Push provider call latency in seconds",
        &["target"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    /// Batch recipients by outcome
    pub static ref BATCH_RECIPIENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_batch_recipients_total", METRIC_PREFIX),
        "Batch push recipients by delivery outcome",
        &["outcome"]
    ).unwrap();

    /// Requests rejected before dispatch
    pub static ref REQUESTS_REJECTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_requests_rejected_total", METRIC_PREFIX),
        "Push requests rejected by parsing or validation"
    ).unwrap();
}
