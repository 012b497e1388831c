/// Options for the `juju` command line client.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The `juju` executable to run.
    #[serde(default = "Config::default_command")]
    pub command: String,

    /// Seconds to wait for every `juju` command before giving up.
    #[serde(default = "Config::default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            command: Config::default_command(),
            timeout: Config::default_timeout(),
        }
    }
}

impl Config {
    /// Default value for `command` used by serde.
    fn default_command() -> String { String::from("juju") }

    /// Default value for `timeout` used by serde.
    fn default_timeout() -> u64 { 30 }
}


/// Username and password pair.
///
/// The password is omitted from the `Debug` representation.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<S1, S2>(username: S1, password: S2) -> Credentials
        where S1: Into<String>,
              S2: Into<String>,
    {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl ::std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::Config;
    use super::Credentials;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.command, "juju");
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn debug_hides_password() {
        let credentials = Credentials::new("admin", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin"));
    }
}
