use sojobo_juju_client::Credentials;


/// Access control configuration options.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Application key every request must present in the `X-Api-Key` header.
    pub api_key: String,

    /// Platform service identity.
    ///
    /// This user has full access to every controller and model without any lookup.
    /// The same credentials are used to run `juju` commands.
    pub admin: Credentials,
}
