use std::io::stdout;
use std::sync::Mutex;

use slog::Drain;
use slog::IgnoreResult;
use slog::Level;
use slog::Logger;

use slog::Never;
use slog::SendSyncRefUnwindSafeDrain;
use slog::SendSyncUnwindSafeDrain;

use slog_async::Async;
#[cfg(feature = "journald")]
use slog_journald::JournaldDrain;
use slog_json::Json;


/// List of supported logging drains.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingDrain {
    /// Log JSON objects to standard output.
    Json,

    /// Log to systemd journal.
    #[cfg(feature = "journald")]
    Journald,
}

impl Default for LoggingDrain {
    fn default() -> LoggingDrain {
        LoggingDrain::Json
    }
}


/// Minimum level of events that are emitted.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl Default for LoggingLevel {
    fn default() -> LoggingLevel {
        LoggingLevel::Info
    }
}

impl From<LoggingLevel> for Level {
    fn from(level: LoggingLevel) -> Level {
        match level {
            LoggingLevel::Critical => Level::Critical,
            LoggingLevel::Error => Level::Error,
            LoggingLevel::Warning => Level::Warning,
            LoggingLevel::Info => Level::Info,
            LoggingLevel::Debug => Level::Debug,
        }
    }
}


/// Logging configuration options.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Flush logs asynchronously.
    #[serde(default = "Config::default_async", rename = "async")]
    pub asynchronous: bool,

    /// The drain to send logs to.
    #[serde(default)]
    pub drain: LoggingDrain,

    /// The minimum logging level.
    #[serde(default)]
    pub level: LoggingLevel,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            asynchronous: Config::default_async(),
            drain: LoggingDrain::default(),
            level: LoggingLevel::default(),
        }
    }
}

impl Config {
    /// Default value for `async` used by serde.
    fn default_async() -> bool { true }
}


/// Converts a [`Drain`] into a [`Logger`] setting global tags.
///
/// [`Drain`]: slog/trait.Drain.html
/// [`Logger`]: slog/struct.Logger.html
fn into_logger<D>(drain: D) -> Logger
    where D: SendSyncUnwindSafeDrain<Ok = (), Err = Never>,
          D: 'static + SendSyncRefUnwindSafeDrain<Err = Never, Ok = ()>
{
    Logger::root(drain, o!(
        "version" => env!("CARGO_PKG_VERSION")
    ))
}

/// Filter events below the configured level and optionally wrap the drain into an [`Async`] drain.
///
/// [`Async`]: slog_async/struct.Async.html
fn config_async<D>(config: Config, drain: D) -> Logger
    where D: SendSyncUnwindSafeDrain<Ok = (), Err = Never>,
          D: 'static + SendSyncRefUnwindSafeDrain<Err = Never, Ok = ()>
{
    let drain = drain.filter_level(config.level.into()).ignore_res();
    match config.asynchronous {
        true => into_logger(Async::new(drain).build().ignore_res()),
        false => into_logger(drain),
    }
}


/// Creates a [`Logger`] based on the given configuration.
///
/// [`Logger`]: slog/struct.Logger.html
pub fn configure(config: Config) -> Logger {
    match config.drain {
        LoggingDrain::Json => {
            let drain = Mutex::new(Json::default(stdout())).map(IgnoreResult::new);
            config_async(config, drain)
        },

        #[cfg(feature = "journald")]
        LoggingDrain::Journald => {
            let drain = JournaldDrain.ignore_res();
            config_async(config, drain)
        },
    }
}

/// Creates a fixed [`Logger`] to be used until configuration is loaded.
///
/// [`Logger`]: slog/struct.Logger.html
pub fn starter() -> Logger {
    let drain = Mutex::new(Json::default(stdout())).map(IgnoreResult::new);
    into_logger(drain)
}
