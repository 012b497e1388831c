//! Access gateway for juju controllers and models.
//!
//! Requests are authenticated with an application key and user credentials,
//! resolved into an access context against the `juju` authority and allowed
//! or denied before any change is made.
#![recursion_limit = "1024"]
extern crate bodyparser;
extern crate clap;

#[macro_use]
extern crate error_chain;

extern crate iron;
extern crate iron_json_response;
extern crate router;
#[cfg(test)]
extern crate iron_test;

#[macro_use]
extern crate lazy_static;
extern crate prometheus;

extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate serde_yaml;

#[macro_use]
extern crate slog;
extern crate slog_async;
#[cfg(feature = "journald")]
extern crate slog_journald;
extern crate slog_json;
extern crate subtle;

extern crate sojobo_juju_client;
extern crate sojobo_models;

use clap::App;
use clap::Arg;
use slog::Logger;


pub mod access;
pub mod clouds;
mod components;
mod config;
mod errors;
mod interfaces;
mod logging;

use self::components::Components;
use self::config::Config;
use self::interfaces::Interfaces;

pub use self::errors::Error;
pub use self::errors::ErrorKind;
pub use self::errors::ResultExt;
pub use self::errors::Result;


/// Default location of the configuration file.
const DEFAULT_CONFIG: &str = "sojobo.yaml";


/// Initialised interfaces and components and waits for the system to exit.
///
/// Sojobo is built on top of two kinds of units:
///
///   * Interfaces: units used to inspect the system or interact with it.
///   * Components: units that perfom actions and implement logic.
///
/// Interfaces that need threads join them in `wait_all`.
fn initialise_and_run(config: Config, logger: Logger) -> Result<()> {
    info!(logger, "Initialising sub-systems ...");
    let mut interfaces = Interfaces::new(&config, logger.clone())?;
    let mut components = Components::new(&config, logger.clone(), &mut interfaces)?;

    // Initialisation done, run all interfaces and components.
    info!(logger, "Starting sub-systems ...");
    interfaces.run()?;
    components.run()?;

    // Wait for interfaces and components to terminate.
    info!(logger, "Sojobo ready");
    interfaces.wait_all()?;
    components.wait_all()?;

    info!(logger, "Sojobo stopped gracefully");
    Ok(())
}


/// Command line interface definition.
fn cli<'a, 'b>() -> App<'a, 'b> {
    App::new("Sojobo")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("config")
             .short("c")
             .long("config")
             .value_name("FILE")
             .default_value(DEFAULT_CONFIG)
             .help("Path to the YAML configuration file")
             .takes_value(true)
        )
}


/// Parse command line, load configuration, initialise logger.
///
/// Once the configuration is loaded control is passed to `initialise_and_run`.
pub fn run() -> Result<()> {
    let matches = cli().get_matches();
    let logger = logging::starter();
    info!(logger, "Starting sojobo");

    let config_location = matches.value_of("config").unwrap_or(DEFAULT_CONFIG);
    info!(logger, "Loading configuration ..."; "config" => config_location);
    let config = Config::from_file(config_location)
        .chain_err(|| format!("Failed to load configuration: {}", config_location))?;

    // Switch to the configured logger before anything else is started.
    let logger = logging::configure(config.logging.clone());
    debug!(logger, "Logging configured");

    let result = initialise_and_run(config, logger.clone());
    warn!(logger, "Shutdown: system exiting now"; "error" => result.is_err());
    result
}
