/// Checks administrator credentials presented at login.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, user_name: &str, password: &str) -> bool;
}

/// A single administrator account taken from configuration.
pub struct StaticCredentials {
    user_name: String,
    password: String,
}

impl StaticCredentials {
    pub fn new<S: Into<String>>(user_name: S, password: S) -> Self {
        StaticCredentials {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, user_name: &str, password: &str) -> bool {
        !self.user_name.is_empty()
            && self.user_name.as_str() == user_name
            && self.password.as_str() == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_configured_pair() {
        let credentials = StaticCredentials::new("admin", "secret");
        assert!(credentials.verify("admin", "secret"));
        assert!(!credentials.verify("admin", "wrong"));
        assert!(!credentials.verify("someone", "secret"));
    }

    #[test]
    fn empty_account_never_verifies() {
        let credentials = StaticCredentials::new("", "");
        assert!(!credentials.verify("", ""));
    }
}
