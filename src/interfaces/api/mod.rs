//! HTTP API interface to interact with sojobo.
//!
//! This interface is a wrapper around the [`iron`] framework.
//! This module does not implement all of the APIs but rather provides
//! tools for other interfaces and components to add their own endpoints.
use std::thread::Builder as ThreadBuilder;
use std::thread::JoinHandle;

use iron::Chain;
use iron::Iron;
use iron_json_response::JsonResponseMiddleware;
use slog::Logger;

use super::super::Result;
use super::super::ResultExt;
use super::metrics::Metrics;


mod config;
mod metrics;
mod middleware;
mod router;
mod routes;

pub use self::config::Config;
pub use self::metrics::register_metrics;
pub use self::router::APIVersion;
pub use self::router::VersionedRouter;

use self::middleware::RequestLogger;
use self::router::RouterBuilder;


/// The sojobo HTTP API interface.
pub struct API {
    config: Config,
    handle: Option<JoinHandle<()>>,
    logger: Logger,
    router: Option<RouterBuilder>,
}

impl API {
    /// Creates a new API interface.
    pub fn new(config: Config, logger: Logger, metrics: &Metrics) -> API {
        let registry = metrics.registry().clone();
        let mut router = RouterBuilder::new();
        routes::mount(&mut router, registry);
        API {
            config,
            handle: None,
            logger,
            router: Some(router),
        }
    }

    /// Register routes for a specific API version.
    pub fn router_for(&mut self, version: APIVersion) -> VersionedRouter {
        self.router.as_mut()
            .expect("Unable to access router. Was API::run called already?")
            .for_version(version)
    }

    /// Wrap the router into the middleware chain served to clients.
    fn chain(&mut self) -> Chain {
        let router = self.router.take()
            .expect("Unable to access router. Was API::run called already?");
        let logger = RequestLogger::new(self.logger.clone());
        let mut chain = router.build();
        chain.link_before(logger.clone());
        chain.link_after(JsonResponseMiddleware::new());
        chain.link_after(logger);
        chain
    }

    /// Creates an Iron server and spawns a thread to serve it.
    pub fn run(&mut self) -> Result<()> {
        let config = self.config.clone();
        let chain = self.chain();
        let logger = self.logger.clone();
        let handle = ThreadBuilder::new()
            .name(String::from("sojobo:api"))
            .spawn(move || {
                let mut server = Iron::new(chain);
                if let Some(threads) = config.threads {
                    server.threads = threads;
                }
                info!(logger, "Starting API server"; "bind" => &config.bind);
                // The listening guard joins the server when dropped.
                match server.http(config.bind.as_str()) {
                    Ok(_listening) => (),
                    Err(error) => {
                        error!(logger, "Unable to start API server"; "error" => %error);
                    }
                };
            })
            .chain_err(|| "Failed to spawn API server thread")?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Wait for the server thread to stop.
    pub fn wait(&mut self) -> Result<()> {
        info!(self.logger, "Waiting for API server to stop");
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                return Err("API server thread panicked".into());
            }
        }
        Ok(())
    }

    /// Returns the middleware chain that `run` would serve.
    #[cfg(test)]
    pub fn into_chain(mut self) -> Chain {
        self.chain()
    }

    /// Returns an `API` instance usable as a mock.
    #[cfg(test)]
    pub fn mock(logger: Logger, metrics: &Metrics) -> API {
        API::new(Config::default(), logger, metrics)
    }
}


#[cfg(test)]
mod tests {
    use iron::Headers;
    use iron::status;
    use iron_test::request;
    use iron_test::response;

    use slog::Discard;
    use slog::Logger;

    use super::super::metrics::Metrics;
    use super::API;

    #[test]
    fn serves_index_and_metrics() {
        let logger = Logger::root(Discard, o!());
        let metrics = Metrics::new(&logger).unwrap();
        let chain = API::mock(logger, &metrics).into_chain();

        let response = request::get("http://host:16016/", Headers::new(), &chain).unwrap();
        assert_eq!(response::extract_body_to_string(response), "Sojobo API server");

        let response = request::get("http://host:16016/api/v1/metrics", Headers::new(), &chain)
            .unwrap();
        assert_eq!(response.status, Some(status::Ok));
        let body = response::extract_body_to_string(response);
        assert!(body.contains("sojobo_api_requests_duration"));
    }
}
