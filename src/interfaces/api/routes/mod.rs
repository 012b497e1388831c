//! Module that defines a set of core handlers for the API interface.
use prometheus::Registry;

use super::APIVersion;
use super::RouterBuilder;

mod index;
mod metrics;

pub use self::index::root_index;
pub use self::metrics::MetricsHandler;


/// Mount the core endpoints on the router.
pub fn mount(router: &mut RouterBuilder, registry: Registry) {
    router.get("/", root_index, "index");
    let mut v1 = router.for_version(APIVersion::V1);
    v1.get("/metrics", MetricsHandler::new(registry), "/metrics");
}
