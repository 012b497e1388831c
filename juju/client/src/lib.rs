//! Client for the external authority that owns controllers, models and user access.
//!
//! The authority is the `juju` tool: it is the only system of record for who can
//! access what and it only exposes primitive grant and revoke operations.
//! Nothing is cached by this crate, every call reaches the authority.
#![recursion_limit = "1024"]
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
extern crate prometheus;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
#[macro_use]
extern crate slog;
extern crate subprocess;

extern crate sojobo_models;

use std::sync::Arc;
use std::time::Duration;

use slog::Logger;

use sojobo_models::AccessLevel;
use sojobo_models::Scope;


mod cli;
mod config;
mod errors;
mod metrics;
mod runner;

#[cfg(any(test, feature = "with_test_support"))]
pub mod mock;

pub use self::cli::JujuCli;
pub use self::config::Config;
pub use self::config::Credentials;
pub use self::errors::*;
pub use self::metrics::register_metrics;
pub use self::runner::CommandOutput;
pub use self::runner::CommandRunner;
pub use self::runner::SubprocessRunner;


/// Private interface to the external authority.
///
/// Allows the `juju` command line as well as mocks for testing.
pub trait InnerAuthority: Send + Sync {
    /// See `Authority::bootstrap` for details.
    fn bootstrap(&self, args: Vec<String>) -> Result<()>;

    /// See `Authority::create_model` for details.
    fn create_model(&self, controller: &str, model: &str) -> Result<()>;

    /// See `Authority::destroy_controller` for details.
    fn destroy_controller(&self, controller: &str) -> Result<()>;

    /// See `Authority::destroy_model` for details.
    fn destroy_model(&self, controller: &str, model: &str) -> Result<()>;

    /// See `Authority::grant` for details.
    fn grant(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()>;

    /// See `Authority::query_access` for details.
    fn query_access(&self, user: &str, scope: &Scope) -> Result<Option<AccessLevel>>;

    /// See `Authority::revoke` for details.
    fn revoke(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()>;

    /// See `Authority::scope_exists` for details.
    fn scope_exists(&self, scope: &Scope) -> Result<bool>;

    /// See `Authority::verify_login` for details.
    fn verify_login(&self, user: &str, secret: &str) -> Result<bool>;
}


/// Public interface to the external authority.
///
/// Cheap to clone and safe to share across request handling threads.
#[derive(Clone)]
pub struct Authority(Arc<dyn InnerAuthority>);

impl Authority {
    /// Instantiate an authority backed by the `juju` command line.
    ///
    /// Commands run with the `admin` session; `admin` credentials are used
    /// to log back in when the session expires.
    pub fn new(config: Config, admin: Credentials, logger: Logger) -> Authority {
        let timeout = Duration::from_secs(config.timeout);
        let runner = SubprocessRunner::new(config.command, timeout);
        let cli = JujuCli::new(Box::new(runner), admin, logger);
        Authority(Arc::new(cli))
    }

    /// Wrap a custom authority implementation.
    pub fn with_inner<I>(inner: I) -> Authority
        where I: InnerAuthority + 'static,
    {
        Authority(Arc::new(inner))
    }

    /// Create a new controller with the cloud specific `juju bootstrap` arguments.
    pub fn bootstrap(&self, args: Vec<String>) -> Result<()> {
        self.0.bootstrap(args)
    }

    /// Add a model to a controller.
    ///
    /// The model is owned by the admin user until access is granted to others.
    pub fn create_model(&self, controller: &str, model: &str) -> Result<()> {
        self.0.create_model(controller, model)
    }

    /// Destroy a controller along with all of its models.
    pub fn destroy_controller(&self, controller: &str) -> Result<()> {
        self.0.destroy_controller(controller)
    }

    /// Destroy a model and the workloads running in it.
    pub fn destroy_model(&self, controller: &str, model: &str) -> Result<()> {
        self.0.destroy_model(controller, model)
    }

    /// Grant `level` to `user` on `scope`.
    ///
    /// Granting a level implies all lower levels of the same scope kind.
    pub fn grant(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        self.0.grant(user, scope, level)
    }

    /// Look up the current access level of `user` on `scope`.
    ///
    /// Returns `None` if the authority has no record of the user on the scope.
    pub fn query_access(&self, user: &str, scope: &Scope) -> Result<Option<AccessLevel>> {
        self.0.query_access(user, scope)
    }

    /// Revoke `level` from `user` on `scope`.
    ///
    /// Revoking a level never cascades to lower levels and revoking
    /// a level that is not held is a no-op.
    pub fn revoke(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        self.0.revoke(user, scope, level)
    }

    /// Check if a controller or model exists.
    pub fn scope_exists(&self, scope: &Scope) -> Result<bool> {
        self.0.scope_exists(scope)
    }

    /// Check a user's credentials with the authority's own login mechanism.
    pub fn verify_login(&self, user: &str, secret: &str) -> Result<bool> {
        self.0.verify_login(user, secret)
    }

    /// Returns an `Authority` wrapping a mock implementation.
    #[cfg(any(test, feature = "with_test_support"))]
    pub fn mock(inner: Arc<mock::MockAuthority>) -> Authority {
        Authority(inner)
    }
}
