use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref ANSWERS_GRADED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_graded_total",
        "Total number of answers graded by the rule engine",
        &["outcome"]
    )
    .unwrap();

    pub static ref PROBLEMS_LISTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "problems_listed_total",
        "Total number of chapter listings served",
        &["status"]
    )
    .unwrap();
}

pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

pub fn record_graded(outcome: &str) {
    ANSWERS_GRADED_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_listing(status: &str) {
    PROBLEMS_LISTED_TOTAL.with_label_values(&[status]).inc();
}
