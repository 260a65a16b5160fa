use crate::*;
use std::fmt::Display;
use std::fmt::Formatter;

/// A `host:port` address of one task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = ConfigError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let (host, port) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::Endpoint(s.to_string()))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::Endpoint(s.to_string()))?;
        match host {
            "" => Err(ConfigError::Endpoint(s.to_string())),
            host => Ok(Self {
                host: host.to_string(),
                port,
            }),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let endpoint = Endpoint::try_from("ps-0.train.svc:2222").unwrap();
        assert_eq!(endpoint.host(), "ps-0.train.svc");
        assert_eq!(endpoint.port(), 2222);
        assert_eq!(endpoint.to_string(), "ps-0.train.svc:2222");
    }
    #[test]
    fn bracketed_ipv6_keeps_its_colons() {
        let endpoint = Endpoint::try_from("[::1]:8470").unwrap();
        assert_eq!(endpoint.host(), "[::1]");
        assert_eq!(endpoint.port(), 8470);
    }
    #[test]
    fn rejects_missing_or_bad_parts() {
        assert!(Endpoint::try_from("localhost").is_err());
        assert!(Endpoint::try_from(":2222").is_err());
        assert!(Endpoint::try_from("localhost:http").is_err());
        assert!(Endpoint::try_from("localhost:70000").is_err());
    }
}
