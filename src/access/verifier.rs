use slog::Logger;
use subtle::ConstantTimeEq;

use sojobo_juju_client::Authority;
use sojobo_juju_client::Credentials;

use super::super::ErrorKind;
use super::super::Result;
use super::super::ResultExt;

use super::Identity;


/// Checks the application key and user credentials of requests.
///
/// The platform service identity is verified locally, every other user
/// is verified with the authority's own login mechanism.
#[derive(Clone)]
pub struct IdentityVerifier {
    admin: Credentials,
    api_key: String,
    authority: Authority,
    logger: Logger,
}

impl IdentityVerifier {
    pub fn new(api_key: String, admin: Credentials, authority: Authority, logger: Logger) -> IdentityVerifier {
        IdentityVerifier {
            admin,
            api_key,
            authority,
            logger,
        }
    }

    /// Verify a request's application key and identity.
    ///
    /// Returns `true` if the identity is the platform service identity.
    pub fn verify(&self, api_key: &str, identity: &Identity) -> Result<bool> {
        if !secrets_match(api_key, &self.api_key) {
            debug!(self.logger, "Rejected invalid application key"; "user" => identity.username());
            return Err(ErrorKind::Authentication.into());
        }
        if identity.username() == self.admin.username {
            if secrets_match(identity.secret(), &self.admin.password) {
                return Ok(true);
            }
            debug!(self.logger, "Rejected platform admin credentials"; "user" => identity.username());
            return Err(ErrorKind::Authentication.into());
        }

        let valid = self.authority.verify_login(identity.username(), identity.secret())
            .chain_err(|| ErrorKind::ExternalCommand(String::from("verify_login")))?;
        if !valid {
            debug!(self.logger, "Rejected user credentials"; "user" => identity.username());
            return Err(ErrorKind::Authentication.into());
        }
        Ok(false)
    }
}

/// Compare secrets without exiting on the first mismatched byte.
fn secrets_match(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use slog::Discard;
    use slog::Logger;
use subtle::ConstantTimeEq;

    use sojobo_juju_client::mock::MockAuthority;
    use sojobo_juju_client::mock::MockCall;
    use sojobo_juju_client::Authority;
    use sojobo_juju_client::Credentials;

    use super::super::super::Error;
    use super::super::super::ErrorKind;
    use super::super::Identity;
    use super::IdentityVerifier;
    use super::secrets_match;

    fn verifier() -> (IdentityVerifier, Arc<MockAuthority>) {
        let mock = Arc::new(MockAuthority::new());
        mock.add_login("bob", "pa55");
        let authority = Authority::mock(Arc::clone(&mock));
        let logger = Logger::root(Discard, o!());
        let admin = Credentials::new("admin", "s3cret");
        let verifier = IdentityVerifier::new(String::from("app-key"), admin, authority, logger);
        (verifier, mock)
    }

    fn assert_unauthenticated(result: super::super::super::Result<bool>) {
        match result {
            Err(Error(ErrorKind::Authentication, _)) => (),
            Err(error) => panic!("Unexpected error: {:?}", error),
            Ok(_) => panic!("Unexpected success!"),
        };
    }

    #[test]
    fn wrong_api_key_skips_authority() {
        let (verifier, mock) = verifier();
        assert_unauthenticated(verifier.verify("nope", &Identity::new("bob", "pa55")));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn secrets_match_exact_values_only() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3cres", "s3cret"));
        assert!(!secrets_match("s3cre", "s3cret"));
        assert!(!secrets_match("s3cret!", "s3cret"));
        assert!(!secrets_match("", "s3cret"));
        assert!(secrets_match("", ""));
    }

    #[test]
    fn api_key_prefix_is_rejected() {
        let (verifier, mock) = verifier();
        assert_unauthenticated(verifier.verify("app-ke", &Identity::new("bob", "pa55")));
        assert_unauthenticated(verifier.verify("app-key2", &Identity::new("bob", "pa55")));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn platform_admin_is_checked_locally() {
        let (verifier, mock) = verifier();
        assert!(verifier.verify("app-key", &Identity::new("admin", "s3cret")).unwrap());
        assert_unauthenticated(verifier.verify("app-key", &Identity::new("admin", "wrong")));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn users_are_checked_by_authority() {
        let (verifier, mock) = verifier();
        assert!(!verifier.verify("app-key", &Identity::new("bob", "pa55")).unwrap());
        assert_unauthenticated(verifier.verify("app-key", &Identity::new("bob", "wrong")));
        assert_eq!(mock.calls(), vec![
            MockCall::VerifyLogin(String::from("bob")),
            MockCall::VerifyLogin(String::from("bob")),
        ]);
    }
}
