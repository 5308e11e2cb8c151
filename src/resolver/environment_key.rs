use std::fmt;

/// Structural parts of a compound environment identifier.
///
/// Environments are addressed as `server.cluster.domain.instance`, or as
/// `server.cluster.domain` on newer servers that removed the instance level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentKey {
    pub server: String,
    pub cluster: String,
    pub domain: String,
    pub instance: Option<String>,
}

/// Returned when an environment string does not split into exactly 3 or 4
/// non-empty dot-separated parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnvironmentKey {
    pub raw: String,
}

impl fmt::Display for InvalidEnvironmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid environment identifier: '{}'", self.raw)
    }
}

impl std::error::Error for InvalidEnvironmentKey {}

impl EnvironmentKey {
    /// Parse a dot-delimited environment identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidEnvironmentKey> {
        let parts: Vec<&str> = raw.split('.').collect();

        if parts.iter().any(|part| part.is_empty()) {
            return Err(InvalidEnvironmentKey {
                raw: raw.to_string(),
            });
        }

        match parts.as_slice() {
            [server, cluster, domain, instance] => Ok(Self {
                server: (*server).to_string(),
                cluster: (*cluster).to_string(),
                domain: (*domain).to_string(),
                instance: Some((*instance).to_string()),
            }),
            [server, cluster, domain] => Ok(Self {
                server: (*server).to_string(),
                cluster: (*cluster).to_string(),
                domain: (*domain).to_string(),
                instance: None,
            }),
            _ => Err(InvalidEnvironmentKey {
                raw: raw.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_parts() {
        let key = EnvironmentKey::parse("PROD.cluster1.domainA.inst1").unwrap();

        assert_eq!(key.server, "PROD");
        assert_eq!(key.cluster, "cluster1");
        assert_eq!(key.domain, "domainA");
        assert_eq!(key.instance, Some("inst1".to_string()));
    }

    #[test]
    fn test_parse_three_parts_has_no_instance() {
        let key = EnvironmentKey::parse("PROD.cluster1.domainA").unwrap();

        assert_eq!(key.server, "PROD");
        assert_eq!(key.cluster, "cluster1");
        assert_eq!(key.domain, "domainA");
        assert_eq!(key.instance, None);
    }

    #[test]
    fn test_parse_rejects_two_parts() {
        assert!(EnvironmentKey::parse("PROD.cluster1").is_err());
    }

    #[test]
    fn test_parse_rejects_five_parts() {
        assert!(EnvironmentKey::parse("a.b.c.d.e").is_err());
    }

    #[test]
    fn test_parse_rejects_string_without_dots() {
        assert!(EnvironmentKey::parse("PROD").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_string() {
        assert!(EnvironmentKey::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_component() {
        assert!(EnvironmentKey::parse("PROD..domainA.inst1").is_err());
        assert!(EnvironmentKey::parse("PROD.cluster1.domainA.").is_err());
        assert!(EnvironmentKey::parse(".cluster1.domainA").is_err());
    }

    #[test]
    fn test_error_mentions_the_raw_string() {
        let err = EnvironmentKey::parse("bogus").unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }
}
