use prometheus::CounterVec;
use prometheus::Opts;
use prometheus::Registry;

use slog::Logger;

lazy_static! {
    pub static ref RESOLVE_DENIED_COUNT: CounterVec = CounterVec::new(
        Opts::new(
            "sojobo_access_resolve_denied",
            "Number of requests denied while resolving access"
        ),
        &["reason"]
    )
    .expect("Failed to create RESOLVE_DENIED_COUNT counter");
    pub static ref TRANSITION_STEPS_COUNT: CounterVec = CounterVec::new(
        Opts::new(
            "sojobo_access_transition_steps",
            "Number of grant and revoke steps applied"
        ),
        &["op"]
    )
    .expect("Failed to create TRANSITION_STEPS_COUNT counter");
    pub static ref TRANSITION_STEP_ERRORS_COUNT: CounterVec = CounterVec::new(
        Opts::new(
            "sojobo_access_transition_step_errors",
            "Number of grant and revoke steps that failed"
        ),
        &["op"]
    )
    .expect("Failed to create TRANSITION_STEP_ERRORS_COUNT counter");
}

/// Attemps to register metrics with the Registry.
///
/// Metrics that fail to register are logged and ignored.
pub fn register_metrics(logger: &Logger, registry: &Registry) {
    if let Err(error) = registry.register(Box::new(RESOLVE_DENIED_COUNT.clone())) {
        debug!(logger, "Failed to register RESOLVE_DENIED_COUNT"; "error" => ?error);
    }
    if let Err(error) = registry.register(Box::new(TRANSITION_STEPS_COUNT.clone())) {
        debug!(logger, "Failed to register TRANSITION_STEPS_COUNT"; "error" => ?error);
    }
    if let Err(error) = registry.register(Box::new(TRANSITION_STEP_ERRORS_COUNT.clone())) {
        debug!(logger, "Failed to register TRANSITION_STEP_ERRORS_COUNT"; "error" => ?error);
    }
}
