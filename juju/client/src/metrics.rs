use prometheus::CounterVec;
use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::Opts;
use prometheus::Registry;

use slog::Logger;

lazy_static! {
    pub static ref JUJU_OP_ERRORS_COUNT: CounterVec = CounterVec::new(
        Opts::new(
            "sojobo_juju_operation_errors",
            "Number of juju commands that failed"
        ),
        &["command"]
    )
    .expect("Failed to create JUJU_OP_ERRORS_COUNT counter");
    pub static ref JUJU_OPS_COUNT: CounterVec = CounterVec::new(
        Opts::new(
            "sojobo_juju_operations",
            "Number of juju commands issued"
        ),
        &["command"]
    )
    .expect("Failed to create JUJU_OPS_COUNT counter");
    pub static ref JUJU_OPS_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "sojobo_juju_operations_duration",
            "Duration (in seconds) of juju commands"
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["command"]
    )
    .expect("Failed to create JUJU_OPS_DURATION histogram");
    pub static ref JUJU_TIMEOUT: CounterVec = CounterVec::new(
        Opts::new(
            "sojobo_juju_timeout",
            "Number of juju commands that timed out"
        ),
        &["command"]
    )
    .expect("Failed to create JUJU_TIMEOUT counter");
}

/// Attemps to register metrics with the Registry.
///
/// Metrics that fail to register are logged and ignored.
///
/// **This method should be called before using any client**.
pub fn register_metrics(logger: &Logger, registry: &Registry) {
    if let Err(error) = registry.register(Box::new(JUJU_OP_ERRORS_COUNT.clone())) {
        debug!(logger, "Failed to register JUJU_OP_ERRORS_COUNT"; "error" => ?error);
    }
    if let Err(error) = registry.register(Box::new(JUJU_OPS_COUNT.clone())) {
        debug!(logger, "Failed to register JUJU_OPS_COUNT"; "error" => ?error);
    }
    if let Err(error) = registry.register(Box::new(JUJU_OPS_DURATION.clone())) {
        debug!(logger, "Failed to register JUJU_OPS_DURATION"; "error" => ?error);
    }
    if let Err(error) = registry.register(Box::new(JUJU_TIMEOUT.clone())) {
        debug!(logger, "Failed to register JUJU_TIMEOUT"; "error" => ?error);
    }
}
