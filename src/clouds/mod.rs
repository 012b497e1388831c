//! Cloud types controllers can be created on.
use std::collections::BTreeMap;
use std::sync::Arc;

use super::ErrorKind;
use super::Result;

mod builtin;

pub use self::builtin::Aws;
pub use self::builtin::Google;
pub use self::builtin::Lxd;


/// Capabilities of a cloud type.
pub trait CloudType: Send + Sync {
    /// Name of the cloud type as used in API requests.
    fn name(&self) -> &'static str;

    /// Ubuntu series machines can run on this cloud.
    fn supported_series(&self) -> &'static [&'static str];

    /// Workloads can be placed in LXD containers on this cloud's machines.
    fn supports_lxd(&self) -> bool;

    /// Arguments to `juju bootstrap` to create `controller` in `region`.
    fn bootstrap_args(&self, controller: &str, region: &str) -> Vec<String>;

    fn supports_series(&self, series: &str) -> bool {
        self.supported_series().iter().any(|supported| *supported == series)
    }
}


/// Explicit lookup table of known cloud types, populated at startup.
#[derive(Clone, Default)]
pub struct CloudRegistry {
    clouds: BTreeMap<&'static str, Arc<dyn CloudType>>,
}

impl CloudRegistry {
    /// Registry with no cloud types.
    pub fn new() -> CloudRegistry {
        CloudRegistry::default()
    }

    /// Registry with all built-in cloud types.
    pub fn with_builtins() -> CloudRegistry {
        let mut registry = CloudRegistry::new();
        registry.register(Aws);
        registry.register(Google);
        registry.register(Lxd);
        registry
    }

    /// Look up a cloud type by name.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn CloudType>> {
        match self.clouds.get(name) {
            Some(cloud) => Ok(Arc::clone(cloud)),
            None => Err(ErrorKind::UnsupportedCloud(String::from(name), self.supported()).into()),
        }
    }

    /// Add a cloud type, replacing any cloud type with the same name.
    pub fn register<C>(&mut self, cloud: C)
        where C: CloudType + 'static,
    {
        self.clouds.insert(cloud.name(), Arc::new(cloud));
    }

    /// Sorted names of the registered cloud types.
    pub fn supported(&self) -> Vec<String> {
        self.clouds.keys().map(|name| String::from(*name)).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::super::Error;
    use super::super::ErrorKind;
    use super::CloudRegistry;
    use super::CloudType;

    struct Maas;

    impl CloudType for Maas {
        fn name(&self) -> &'static str { "maas" }
        fn supported_series(&self) -> &'static [&'static str] { &["xenial"] }
        fn supports_lxd(&self) -> bool { true }
        fn bootstrap_args(&self, controller: &str, _: &str) -> Vec<String> {
            vec![String::from("maas"), String::from(controller)]
        }
    }

    #[test]
    fn builtins() {
        let registry = CloudRegistry::with_builtins();
        assert_eq!(registry.supported(), vec!["aws", "google", "lxd"]);
        let aws = registry.lookup("aws").unwrap();
        assert_eq!(aws.bootstrap_args("lab", "eu-west-1"), vec!["aws/eu-west-1", "lab"]);
        assert!(aws.supports_series("xenial"));
        assert!(!aws.supports_series("precise"));
        assert!(!registry.lookup("google").unwrap().supports_lxd());
        let lxd = registry.lookup("lxd").unwrap();
        assert_eq!(lxd.bootstrap_args("local", "anything"), vec!["localhost", "local"]);
    }

    #[test]
    fn unknown_cloud_lists_supported() {
        let registry = CloudRegistry::with_builtins();
        match registry.lookup("azure") {
            Err(Error(ErrorKind::UnsupportedCloud(cloud, supported), _)) => {
                assert_eq!(cloud, "azure");
                assert_eq!(supported, vec!["aws", "google", "lxd"]);
            }
            Err(error) => panic!("Unexpected error: {:?}", error),
            Ok(_) => panic!("Unexpected success!"),
        };
    }

    #[test]
    fn register_custom() {
        let mut registry = CloudRegistry::new();
        assert!(registry.lookup("maas").is_err());
        registry.register(Maas);
        assert_eq!(registry.lookup("maas").unwrap().name(), "maas");
    }
}
