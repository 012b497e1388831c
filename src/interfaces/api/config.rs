/// API server configuration options.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address (`host:port`) the API server listens on.
    #[serde(default = "Config::default_bind")]
    pub bind: String,

    /// Number of threads handling requests, defaults to the iron default.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind: Config::default_bind(),
            threads: None,
        }
    }
}

impl Config {
    /// Default value for `bind` used by serde.
    fn default_bind() -> String { String::from("127.0.0.1:16016") }
}
