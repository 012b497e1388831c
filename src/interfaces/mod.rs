use slog::Logger;

#[cfg(test)]
use std::sync::Arc;

use sojobo_juju_client::Authority;
#[cfg(test)]
use sojobo_juju_client::mock::MockAuthority;

use super::Result;
use super::config::Config;


pub mod api;
pub mod metrics;

use self::api::API;
use self::metrics::Metrics;


/// A container for sojobo interfaces.
///
/// This container is useful to:
///
///   1. Have one argument passed arround for injection instead of many.
///   2. Store thread [`JoinHandle`]s to join on [`Drop`].
///
/// The external authority is exposed here as well so that all components
/// share a single admin session.
///
/// [`Drop`]: std/ops/trait.Drop.html
/// [`JoinHandle`]: std/thread/struct.JoinHandle.html
pub struct Interfaces {
    pub api: API,
    pub authority: Authority,
    pub metrics: Metrics,
}

impl Interfaces {
    /// Creates and configures interfaces.
    pub fn new(config: &Config, logger: Logger) -> Result<Interfaces> {
        let metrics = Metrics::new(&logger)?;
        let api = API::new(config.api.clone(), logger.clone(), &metrics);
        let authority = Authority::new(
            config.juju.clone(), config.auth.admin.clone(), logger
        );
        Ok(Interfaces {
            api,
            authority,
            metrics,
        })
    }

    /// Performs any final configuration and starts background threads.
    ///
    /// For example, the [`API`] uses it to wrap the router into a server.
    pub fn run(&mut self) -> Result<()> {
        self.api.run()?;
        Ok(())
    }

    /// Waits for all interfaces to terminate.
    pub fn wait_all(&mut self) -> Result<()> {
        self.api.wait()?;
        Ok(())
    }

    /// Returns an `Interfaces` instance backed by a mock authority.
    #[cfg(test)]
    pub fn mock(logger: Logger) -> (Interfaces, Arc<MockAuthority>) {
        let mock = Arc::new(MockAuthority::new());
        let metrics = Metrics::new(&logger).unwrap();
        let api = API::mock(logger, &metrics);
        let authority = Authority::mock(Arc::clone(&mock));
        let interfaces = Interfaces {
            api,
            authority,
            metrics,
        };
        (interfaces, mock)
    }
}
