use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_yaml;

use sojobo_juju_client::Config as JujuConfig;

use super::Result;
use super::access::Config as AccessConfig;
use super::interfaces::api::Config as APIConfig;
use super::logging::Config as LoggingConfig;


/// Sojobo configuration options.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// API server configuration.
    #[serde(default)]
    pub api: APIConfig,

    /// Application key and platform service identity.
    pub auth: AccessConfig,

    /// Options for the `juju` command line client.
    #[serde(default)]
    pub juju: JujuConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads the configuration from the given [`std::fs::File`].
    ///
    /// [`std::fs::File`]: https://doc.rust-lang.org/std/fs/struct.File.html
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let config = File::open(path)?;
        let config = Config::from_reader(config)?;
        Ok(config)
    }

    /// Loads the configuration from the given [`std::io::Read`].
    ///
    /// [`std::io::Read`]: https://doc.rust-lang.org/std/io/trait.Read.html
    pub fn from_reader<R: Read>(reader: R) -> Result<Config> {
        let conf = serde_yaml::from_reader(reader)?;
        Ok(conf)
    }
}
