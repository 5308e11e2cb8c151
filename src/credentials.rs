/// Server address and authentication token pair identifying a deployment
/// server session. Used as the identity key for cached lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    pub server_url: String,
    pub token: String,
}

impl Credentials {
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: token.into(),
        }
    }

    /// Both fields present. Remote lookups are pointless otherwise.
    pub fn is_complete(&self) -> bool {
        !self.server_url.is_empty() && !self.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_credentials() {
        let credentials = Credentials::new("https://deploy.example.com", "secret");
        assert!(credentials.is_complete());
    }

    #[test]
    fn test_missing_url_is_incomplete() {
        let credentials = Credentials::new("", "secret");
        assert!(!credentials.is_complete());
    }

    #[test]
    fn test_missing_token_is_incomplete() {
        let credentials = Credentials::new("https://deploy.example.com", "");
        assert!(!credentials.is_complete());
    }
}
