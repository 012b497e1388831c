use std::fmt;


/// A username and secret pair presented with a request.
///
/// Identities only live for the duration of one request and the secret
/// is never included in `Debug` output.
#[derive(Clone, Eq, PartialEq)]
pub struct Identity {
    username: String,
    secret: String,
}

impl Identity {
    pub fn new<S1, S2>(username: S1, secret: S2) -> Identity
        where S1: Into<String>,
              S2: Into<String>,
    {
        Identity {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::Identity;

    #[test]
    fn debug_hides_secret() {
        let identity = Identity::new("bob", "pa55w0rd");
        let debug = format!("{:?}", identity);
        assert_eq!(debug, r#"Identity { username: "bob", secret: "<redacted>" }"#);
    }
}
