//! Prometheus metrics for the service.
//!
//! One [`Metrics`] is built at startup and handed to whatever records into
//! it; nothing here is a global.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

const HTTP_LABELS: &[&str] = &["method", "path", "status"];

pub struct Metrics {
    registry: Registry,

    // ===== HTTP metrics =====
    /// Requests by method, route pattern and status
    pub http_requests_total: IntCounterVec,
    /// Responses with status >= 400
    pub http_errors_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub http_requests_in_flight: IntGauge,

    // ===== Analytics metrics =====
    /// Background click updates that failed and were dropped
    pub analytics_update_failures_total: IntCounter,
    /// Background click updates spawned but not yet finished
    pub analytics_updates_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            HTTP_LABELS,
        )?;
        let http_errors_total = IntCounterVec::new(
            Opts::new("http_errors_total", "Total number of HTTP error responses"),
            HTTP_LABELS,
        )?;
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            ),
            HTTP_LABELS,
        )?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Current number of HTTP requests being processed",
        )?;
        let analytics_update_failures_total = IntCounter::new(
            "analytics_update_failures_total",
            "Click updates that failed in the background and were dropped",
        )?;
        let analytics_updates_in_flight = IntGauge::new(
            "analytics_updates_in_flight",
            "Click updates spawned and not yet finished",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(analytics_update_failures_total.clone()))?;
        registry.register(Box::new(analytics_updates_in_flight.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_errors_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            analytics_update_failures_total,
            analytics_updates_in_flight,
        })
    }

    /// Record a finished HTTP request
    pub fn observe_request(&self, method: &str, path: &str, status: u16, seconds: f64) {
        let code = status.to_string();
        let labels = [method, path, code.as_str()];

        self.http_requests_total.with_label_values(&labels).inc();
        self.http_request_duration_seconds
            .with_label_values(&labels)
            .observe(seconds);
        if status >= 400 {
            self.http_errors_total.with_label_values(&labels).inc();
        }
    }

    /// Render every metric in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
