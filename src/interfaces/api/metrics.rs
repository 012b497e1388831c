use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::Registry;

use slog::Logger;

lazy_static! {
    pub static ref REQUESTS_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "sojobo_api_requests_duration",
            "Duration (in seconds) of API requests"
        ),
        &["method", "status"]
    )
    .expect("Failed to create REQUESTS_DURATION histogram");
}

/// Attemps to register metrics with the Registry.
///
/// Metrics that fail to register are logged and ignored.
pub fn register_metrics(logger: &Logger, registry: &Registry) {
    if let Err(error) = registry.register(Box::new(REQUESTS_DURATION.clone())) {
        debug!(logger, "Failed to register REQUESTS_DURATION"; "error" => ?error);
    }
}
