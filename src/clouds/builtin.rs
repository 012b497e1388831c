use super::CloudType;


/// Amazon Web Services.
pub struct Aws;

impl CloudType for Aws {
    fn name(&self) -> &'static str { "aws" }

    fn supported_series(&self) -> &'static [&'static str] {
        &["trusty", "xenial"]
    }

    fn supports_lxd(&self) -> bool { true }

    fn bootstrap_args(&self, controller: &str, region: &str) -> Vec<String> {
        vec![format!("aws/{}", region), String::from(controller)]
    }
}


/// Google Compute Engine.
///
/// LXD containers on GCE machines are not reachable from outside their host.
pub struct Google;

impl CloudType for Google {
    fn name(&self) -> &'static str { "google" }

    fn supported_series(&self) -> &'static [&'static str] {
        &["trusty", "xenial"]
    }

    fn supports_lxd(&self) -> bool { false }

    fn bootstrap_args(&self, controller: &str, region: &str) -> Vec<String> {
        vec![format!("google/{}", region), String::from(controller)]
    }
}


/// Local LXD host.
pub struct Lxd;

impl CloudType for Lxd {
    fn name(&self) -> &'static str { "lxd" }

    fn supported_series(&self) -> &'static [&'static str] {
        &["trusty", "xenial", "yakkety"]
    }

    fn supports_lxd(&self) -> bool { true }

    /// The local cloud has a single region so `region` is ignored.
    fn bootstrap_args(&self, controller: &str, _region: &str) -> Vec<String> {
        vec![String::from("localhost"), String::from(controller)]
    }
}
