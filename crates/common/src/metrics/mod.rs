//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ReelShare metrics
pub const METRICS_PREFIX: &str = "reelshare";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 50ms, P99 < 150ms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms - P50 target
    0.075,  // 75ms
    0.100,  // 100ms
    0.150,  // 150ms - P99 target
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Listing metrics
    describe_counter!(
        format!("{}_movie_listings_total", METRICS_PREFIX),
        Unit::Count,
        "Total movie listing queries"
    );

    describe_histogram!(
        format!("{}_movie_listing_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Movie listing query latency in seconds"
    );

    // Mutation metrics
    describe_counter!(
        format!("{}_movies_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total movies created"
    );

    describe_counter!(
        format!("{}_movie_actions_total", METRICS_PREFIX),
        Unit::Count,
        "Total like/hate actions recorded or removed"
    );

    // Auth metrics
    describe_counter!(
        format!("{}_users_registered_total", METRICS_PREFIX),
        Unit::Count,
        "Total user registrations"
    );

    describe_counter!(
        format!("{}_logins_total", METRICS_PREFIX),
        Unit::Count,
        "Total login attempts"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record a movie listing query
pub fn record_movie_listing(duration_secs: f64, scope: &str, authenticated: bool) {
    let auth = if authenticated { "viewer" } else { "public" };

    counter!(
        format!("{}_movie_listings_total", METRICS_PREFIX),
        "scope" => scope.to_string(),
        "auth" => auth
    )
    .increment(1);

    histogram!(
        format!("{}_movie_listing_duration_seconds", METRICS_PREFIX),
        "scope" => scope.to_string(),
        "auth" => auth
    )
    .record(duration_secs);
}

/// Helper to record a like/hate mutation
pub fn record_movie_action(kind: &str, op: &str) {
    counter!(
        format!("{}_movie_actions_total", METRICS_PREFIX),
        "kind" => kind.to_string(),
        "op" => op.to_string()
    )
    .increment(1);
}

/// Helper to record a movie creation
pub fn record_movie_created() {
    counter!(format!("{}_movies_created_total", METRICS_PREFIX)).increment(1);
}

/// Helper to record auth events
pub fn record_login(success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        format!("{}_logins_total", METRICS_PREFIX),
        "status" => status
    )
    .increment(1);
}

/// Helper to record a registration
pub fn record_registration() {
    counter!(format!("{}_users_registered_total", METRICS_PREFIX)).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets() {
        // Verify buckets are sorted and contain SLO targets
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }

        // P50 target (50ms) should be in buckets
        assert!(LATENCY_BUCKETS.contains(&0.050));
        // P99 target (150ms) should be in buckets
        assert!(LATENCY_BUCKETS.contains(&0.150));
    }

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("GET", "/movies");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(200);
        // Just verify it runs without panic
    }
}
