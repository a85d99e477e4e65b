use crate::{RestClientError, Result};

/// How POST and PUT turn [`crate::Params`] into a request body.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BodyEncoding {
    /// The params' `Display` form (`{name: "b"}`), sent under the JSON
    /// content type as-is.
    #[default]
    Display,
    /// A JSON object with keys in insertion order.
    Json,
}

/// Configures retries, timeout, TLS verification and body encoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Total attempts per call, including the first. Must be at least 1.
    pub tries: u32,
    /// Per-request timeout in milliseconds. `None` keeps the transport default.
    pub timeout_ms: Option<u64>,
    /// Skip TLS certificate and hostname verification.
    pub accept_invalid_certs: bool,
    pub body_encoding: BodyEncoding,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            tries: 1,
            timeout_ms: None,
            accept_invalid_certs: false,
            body_encoding: BodyEncoding::Display,
        }
    }
}

impl ClientOptions {
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.tries == 0 {
            return Err(RestClientError::Configuration(
                "tries must be a positive integer".to_owned(),
            ));
        }
        Ok(())
    }

    /// Reads options from the environment, keeping defaults for unset keys.
    ///
    /// - `JSON_REST_TRIES` — positive integer
    /// - `JSON_REST_TIMEOUT_MS` — milliseconds
    /// - `JSON_REST_ACCEPT_INVALID_CERTS` — `true`/`false`/`1`/`0`
    /// - `JSON_REST_BODY_ENCODING` — `display` or `json`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read("JSON_REST_TRIES") {
            options.tries = value.parse().map_err(|_| {
                RestClientError::Configuration(format!("JSON_REST_TRIES is not an integer: '{value}'"))
            })?;
        }
        if let Some(value) = read("JSON_REST_TIMEOUT_MS") {
            options.timeout_ms = Some(value.parse().map_err(|_| {
                RestClientError::Configuration(format!(
                    "JSON_REST_TIMEOUT_MS is not an integer: '{value}'"
                ))
            })?);
        }
        if let Some(value) = read("JSON_REST_ACCEPT_INVALID_CERTS") {
            options.accept_invalid_certs = parse_flag(&value).ok_or_else(|| {
                RestClientError::Configuration(format!(
                    "JSON_REST_ACCEPT_INVALID_CERTS is not a boolean: '{value}'"
                ))
            })?;
        }
        if let Some(value) = read("JSON_REST_BODY_ENCODING") {
            options.body_encoding = match value.to_ascii_lowercase().as_str() {
                "display" => BodyEncoding::Display,
                "json" => BodyEncoding::Json,
                _ => {
                    return Err(RestClientError::Configuration(format!(
                        "JSON_REST_BODY_ENCODING must be 'display' or 'json', got '{value}'"
                    )))
                }
            };
        }

        options.validate()?;
        Ok(options)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{BodyEncoding, ClientOptions};
    use crate::RestClientError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_single_try_and_verified_tls() {
        let options = ClientOptions::default();
        assert_eq!(options.tries, 1);
        assert_eq!(options.timeout_ms, None);
        assert!(!options.accept_invalid_certs);
        assert_eq!(options.body_encoding, BodyEncoding::Display);
    }

    #[test]
    fn zero_tries_is_rejected() {
        let err = ClientOptions::default().with_tries(0).validate().unwrap_err();
        assert!(matches!(err, RestClientError::Configuration(_)));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let options = ClientOptions::from_lookup(lookup(&[
            ("JSON_REST_TRIES", "3"),
            ("JSON_REST_TIMEOUT_MS", " 250 "),
            ("JSON_REST_ACCEPT_INVALID_CERTS", "true"),
            ("JSON_REST_BODY_ENCODING", "JSON"),
        ]))
        .unwrap();
        assert_eq!(
            options,
            ClientOptions {
                tries: 3,
                timeout_ms: Some(250),
                accept_invalid_certs: true,
                body_encoding: BodyEncoding::Json,
            }
        );
    }

    #[test]
    fn empty_values_keep_defaults() {
        let options = ClientOptions::from_lookup(lookup(&[("JSON_REST_TRIES", "  ")])).unwrap();
        assert_eq!(options, ClientOptions::default());
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        for pairs in [
            [("JSON_REST_TRIES", "many")],
            [("JSON_REST_TRIES", "0")],
            [("JSON_REST_TIMEOUT_MS", "-1")],
            [("JSON_REST_ACCEPT_INVALID_CERTS", "maybe")],
            [("JSON_REST_BODY_ENCODING", "xml")],
        ] {
            let err = ClientOptions::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, RestClientError::Configuration(_)), "{pairs:?}");
        }
    }
}
