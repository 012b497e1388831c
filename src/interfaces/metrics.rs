use prometheus::Registry;
use prometheus::process_collector::ProcessCollector;

use slog::Logger;

use sojobo_juju_client;

use super::super::Result;
use super::super::ResultExt;
use super::super::access;
use super::api;


/// Holds the prometheus [`Registry`] exported by the API.
///
/// Process metrics and the metrics of every sojobo subsystem are registered
/// when the interface is created so components do not need to.
pub struct Metrics {
    registry: Registry,
}

impl Metrics {
    /// Creates the registry and registers all known metrics with it.
    pub fn new(logger: &Logger) -> Result<Metrics> {
        let registry = Registry::new();
        let process = ProcessCollector::for_self();
        registry.register(Box::new(process))
            .chain_err(|| "Unable to register process metrics")?;
        api::register_metrics(logger, &registry);
        access::register_metrics(logger, &registry);
        sojobo_juju_client::register_metrics(logger, &registry);
        Ok(Metrics { registry })
    }

    /// Access the metrics registery.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
