use slog::Logger;

use super::Config;
use super::Interfaces;
use super::Result;

use super::access::AccessResolver;
use super::access::IdentityVerifier;
use super::access::TransitionEngine;
use super::clouds::CloudRegistry;


mod access;
mod controllers;
mod models;
mod request;

use self::access::Access;
use self::controllers::Controllers;
use self::models::Models;


/// A container for sojobo components.
///
/// This container is useful to:
///
///   1. Have one argument passed arround for injection instead of many.
///   2. Store thread [`JoinHandle`]s to join on [`Drop`].
///
/// [`Drop`]: std/ops/trait.Drop.html
/// [`JoinHandle`]: std/thread/struct.JoinHandle.html
pub struct Components {
    access: Access,
    controllers: Controllers,
    models: Models,
}

impl Components {
    /// Creates and configures components.
    pub fn new(config: &Config, logger: Logger, interfaces: &mut Interfaces) -> Result<Components> {
        let authority = interfaces.authority.clone();
        let verifier = IdentityVerifier::new(
            config.auth.api_key.clone(), config.auth.admin.clone(), authority.clone(), logger.clone()
        );
        let resolver = AccessResolver::new(authority.clone(), verifier, logger.clone());
        let engine = TransitionEngine::new(authority, logger.clone());
        let access = Access::new(resolver.clone(), engine.clone(), logger.clone(), interfaces);
        let controllers = Controllers::new(
            resolver.clone(), CloudRegistry::with_builtins(), logger.clone(), interfaces
        );
        let models = Models::new(resolver, engine, logger, interfaces);
        Ok(Components {
            access,
            controllers,
            models,
        })
    }

    /// Performs any final configuration and starts background threads.
    pub fn run(&mut self) -> Result<()> {
        self.access.run()?;
        self.controllers.run()?;
        self.models.run()?;
        Ok(())
    }

    /// Waits for all components to terminate.
    pub fn wait_all(&mut self) -> Result<()> {
        self.access.wait()?;
        self.controllers.wait()?;
        self.models.wait()?;
        Ok(())
    }
}


#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use iron::Chain;
    use iron::Headers;
    use iron::headers::Authorization;
    use iron::headers::Basic;
    use iron::headers::ContentType;

    use slog::Discard;
    use slog::Logger;

    use sojobo_juju_client::Credentials;
    use sojobo_juju_client::mock::MockAuthority;

    use super::super::Config;
    use super::super::Interfaces;
    use super::super::access::Config as AccessConfig;
    use super::Components;

    pub const API_KEY: &str = "k3y";

    /// Serving chain with all components mounted on a mock authority.
    pub fn mock_chain() -> (Chain, Arc<MockAuthority>) {
        let logger = Logger::root(Discard, o!());
        let config = Config {
            api: Default::default(),
            auth: AccessConfig {
                api_key: String::from(API_KEY),
                admin: Credentials::new("admin", "adm1n"),
            },
            juju: Default::default(),
            logging: Default::default(),
        };
        let (mut interfaces, mock) = Interfaces::mock(logger.clone());
        Components::new(&config, logger, &mut interfaces).unwrap();
        let Interfaces { api, .. } = interfaces;
        (api.into_chain(), mock)
    }

    /// Request headers for the given credentials and the valid application key.
    pub fn headers(user: &str, password: &str) -> Headers {
        let mut headers = Headers::new();
        headers.set(Authorization(Basic {
            username: String::from(user),
            password: Some(String::from(password)),
        }));
        headers.set(ContentType::json());
        headers.set_raw("X-Api-Key", vec![API_KEY.as_bytes().to_vec()]);
        headers
    }
}
