use std::fmt;

use url::Url;

use crate::{RestClientError, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    pub fn is_tls(self) -> bool {
        self == Self::Https
    }
}

/// Fixed scheme/host/port a client is bound to.
///
/// Path, query, fragment and userinfo of the configured URI are dropped at
/// parse time; requests always supply their own path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn parse(endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint.trim()).map_err(|err| {
            RestClientError::Configuration(format!("invalid endpoint '{endpoint}': {err}"))
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(RestClientError::Configuration(format!(
                    "unsupported endpoint scheme '{other}' in '{endpoint}'"
                )))
            }
        };

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| {
                RestClientError::Configuration(format!("endpoint '{endpoint}' has no host"))
            })?
            .to_owned();

        // http/https always have a known default.
        let port = url.port_or_known_default().ok_or_else(|| {
            RestClientError::Configuration(format!("endpoint '{endpoint}' has no port"))
        })?;

        Ok(Self { scheme, host, port })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `scheme://host:port`, with the port always spelled out.
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }

    /// Appends a request path to the origin without re-parsing it.
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.origin())
        } else {
            format!("{}/{path}", self.origin())
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin())
    }
}
