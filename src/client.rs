use std::{fmt, sync::Arc};

use tracing::Level;

use crate::{
    decode::{decode_json_result, Undecodable},
    BodyEncoding, ClientOptions, Disposition, Endpoint, Headers, Logger, Method, Outcome, Params,
    PreparedRequest, RawResponse, ReqwestTransport, RestClientError, Result, TracingLogger,
    Transport,
};

/// Header names whose values are hidden from `Debug` output.
const REDACTED_HEADERS: [&str; 4] = ["authorization", "proxy-authorization", "cookie", "x-api-key"];

#[derive(Clone)]
/// Blocking JSON REST client bound to a single endpoint.
pub struct RestClient {
    endpoint: Endpoint,
    tries: u32,
    default_headers: Headers,
    body_encoding: BodyEncoding,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .default_headers
            .iter()
            .map(|(key, value)| {
                if REDACTED_HEADERS
                    .iter()
                    .any(|name| key.eq_ignore_ascii_case(name))
                {
                    (key, "<redacted>")
                } else {
                    (key, value)
                }
            })
            .collect();

        f.debug_struct("RestClient")
            .field("endpoint", &self.endpoint.origin())
            .field("tries", &self.tries)
            .field("default_headers", &headers)
            .field("body_encoding", &self.body_encoding)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Creates a client for `endpoint` making up to `tries` attempts per call.
    ///
    /// `headers` are merged over the JSON defaults (`accept` and
    /// `Content-Type`); caller values win.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use json_rest_client::RestClient;
    ///
    /// let client = RestClient::new("https://api.example.com", 3, [("X-Team", "core")])?;
    /// let outcome = client.get("/users", [("id", 5)], ())?;
    /// # Ok::<(), json_rest_client::RestClientError>(())
    /// ```
    pub fn new(endpoint: &str, tries: u32, headers: impl Into<Headers>) -> Result<Self> {
        Self::with_options(endpoint, headers, ClientOptions::default().with_tries(tries))
    }

    /// Creates a client with explicit [`ClientOptions`].
    pub fn with_options(
        endpoint: &str,
        headers: impl Into<Headers>,
        options: ClientOptions,
    ) -> Result<Self> {
        options.validate()?;
        let endpoint = Endpoint::parse(endpoint)?;
        let transport = ReqwestTransport::new(&endpoint, &options)?;

        Ok(Self {
            default_headers: Headers::json_defaults().merged(&headers.into()),
            tries: options.tries,
            body_encoding: options.body_encoding,
            transport: Arc::new(transport),
            logger: Arc::new(TracingLogger),
            endpoint,
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `JSON_REST_ENDPOINT` (required) plus the optional keys listed on
    /// [`ClientOptions::from_env`].
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("JSON_REST_ENDPOINT").map_err(|_| {
            RestClientError::Configuration(
                "missing JSON_REST_ENDPOINT environment variable".to_owned(),
            )
        })?;
        if endpoint.trim().is_empty() {
            return Err(RestClientError::Configuration(
                "JSON_REST_ENDPOINT is set but empty".to_owned(),
            ));
        }
        Self::with_options(&endpoint, (), ClientOptions::from_env()?)
    }

    /// Replaces the logging sink.
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Replaces the network layer, keeping endpoint, tries and headers.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn tries(&self) -> u32 {
        self.tries
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Sends a GET with `params` as the query string.
    pub fn get(
        &self,
        path: &str,
        params: impl Into<Params>,
        headers: impl Into<Headers>,
    ) -> Result<Outcome> {
        self.request(Method::Get, path, &params.into(), &headers.into())
    }

    /// Sends a POST with `params` as the body.
    pub fn post(
        &self,
        path: &str,
        params: impl Into<Params>,
        headers: impl Into<Headers>,
    ) -> Result<Outcome> {
        self.request(Method::Post, path, &params.into(), &headers.into())
    }

    /// Sends a PUT with `params` as the body.
    pub fn put(
        &self,
        path: &str,
        params: impl Into<Params>,
        headers: impl Into<Headers>,
    ) -> Result<Outcome> {
        self.request(Method::Put, path, &params.into(), &headers.into())
    }

    /// Sends a DELETE with `params` as the query string.
    pub fn delete(
        &self,
        path: &str,
        params: impl Into<Params>,
        headers: impl Into<Headers>,
    ) -> Result<Outcome> {
        self.request(Method::Delete, path, &params.into(), &headers.into())
    }

    /// Form-encoded POST. Not supported; always fails without sending.
    pub fn post_form(
        &self,
        _path: &str,
        _params: impl Into<Params>,
        _headers: impl Into<Headers>,
    ) -> Result<Outcome> {
        Err(RestClientError::NotSupported {
            operation: "post_form",
        })
    }

    /// Form-encoded PUT. Not supported; always fails without sending.
    pub fn put_form(
        &self,
        _path: &str,
        _params: impl Into<Params>,
        _headers: impl Into<Headers>,
    ) -> Result<Outcome> {
        Err(RestClientError::NotSupported {
            operation: "put_form",
        })
    }

    /// Builds the request a verb call would send, without sending it.
    pub fn prepare(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<PreparedRequest> {
        let (target, body) = if method.sends_body() {
            let body = match self.body_encoding {
                BodyEncoding::Display => params.to_string(),
                BodyEncoding::Json => params.to_json_string(),
            };
            (path.to_owned(), Some(body))
        } else {
            (params.append_to_path(path), None)
        };

        Ok(PreparedRequest {
            method,
            url: self.endpoint.join(&target),
            headers: self.default_headers.merged(headers),
            body,
        })
    }

    /// Sends `method` to `path` and decodes the response.
    ///
    /// A non-2xx status is logged and returned. A body that is not JSON is
    /// logged and returned as [`Outcome::Raw`].
    pub fn request(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<Outcome> {
        let request = self.prepare(method, path, params, headers)?;
        let response = self.send_with_retry(&request)?;

        if !response.is_success() {
            self.logger.log(
                Level::ERROR,
                &format!("{method} {path} returned status {}", response.status),
            );
        }

        match decode_json_result(response) {
            Ok(result) => Ok(Outcome::Parsed(result)),
            Err(Undecodable { response, error }) => {
                self.logger.log(
                    Level::ERROR,
                    &format!("{method} {path} response is not valid JSON: {error}"),
                );
                Ok(Outcome::Raw(response))
            }
        }
    }

    fn send_with_retry(&self, request: &PreparedRequest) -> Result<RawResponse> {
        let mut remaining = self.tries;
        loop {
            self.logger.log(
                Level::DEBUG,
                &format!(
                    "{} {} (attempt {} of {})",
                    request.method,
                    request.url,
                    self.tries - remaining + 1,
                    self.tries
                ),
            );

            let err = match self.transport.send(request) {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if err.kind().disposition() == Disposition::Propagate {
                return Err(err.into());
            }

            remaining = remaining.saturating_sub(1);
            self.logger.log(
                Level::WARN,
                &format!(
                    "{} {} failed: {err} ({remaining} tries left)",
                    request.method, request.url
                ),
            );
            if remaining == 0 {
                return Err(err.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::RestClient;
    use crate::{BodyEncoding, ClientOptions, Headers, Method, Params, RestClientError};

    fn client() -> RestClient {
        RestClient::new("https://api.example.com/ignored/path?x=1", 1, ()).unwrap()
    }

    #[test]
    fn construction_keeps_only_origin() {
        let client = client();
        assert_eq!(client.endpoint().origin(), "https://api.example.com:443");
        assert_eq!(client.tries(), 1);
    }

    #[test]
    fn construction_rejects_bad_endpoint_and_zero_tries() {
        assert!(matches!(
            RestClient::new("::nope::", 1, ()),
            Err(RestClientError::Configuration(_))
        ));
        assert!(matches!(
            RestClient::new("http://localhost", 0, ()),
            Err(RestClientError::Configuration(_))
        ));
    }

    #[test]
    fn caller_headers_override_defaults() {
        let client = RestClient::new(
            "http://localhost:8080",
            2,
            [("Content-Type", "application/vnd.api+json"), ("X-Id", "7")],
        )
        .unwrap();
        let headers = client.default_headers();
        assert_eq!(headers.get("accept"), Some("application/json"));
        assert_eq!(headers.get("Content-Type"), Some("application/vnd.api+json"));
        assert_eq!(headers.get("X-Id"), Some("7"));
    }

    #[test]
    fn get_appends_query_only_when_params_present() {
        let client = client();
        let bare = client
            .prepare(Method::Get, "/users", &Params::new(), &Headers::new())
            .unwrap();
        assert_eq!(bare.url, "https://api.example.com:443/users");
        assert!(bare.body.is_none());

        let with_query = client
            .prepare(
                Method::Delete,
                "/users",
                &Params::from([("id", json!(5)), ("q", json!("a b"))]),
                &Headers::new(),
            )
            .unwrap();
        assert_eq!(with_query.url, "https://api.example.com:443/users?id=5&q=a+b");
    }

    #[test]
    fn post_uses_display_form_by_default() {
        let request = client()
            .prepare(
                Method::Post,
                "/users",
                &Params::from([("name", "b")]),
                &Headers::new(),
            )
            .unwrap();
        assert_eq!(request.url, "https://api.example.com:443/users");
        assert_eq!(request.body.as_deref(), Some(r#"{name: "b"}"#));
        assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
    }

    #[test]
    fn put_can_send_json() {
        let client = RestClient::with_options(
            "http://localhost",
            (),
            ClientOptions::default().with_body_encoding(BodyEncoding::Json),
        )
        .unwrap();
        let request = client
            .prepare(
                Method::Put,
                "/users/1",
                &Params::from([("name", json!("b")), ("age", json!(3))]),
                &Headers::from([("X-Call", "1")]),
            )
            .unwrap();
        assert_eq!(request.body.as_deref(), Some(r#"{"name":"b","age":3}"#));
        assert_eq!(request.headers.get("X-Call"), Some("1"));
        assert_eq!(client.default_headers().get("X-Call"), None);
    }

    #[test]
    fn form_operations_are_not_supported() {
        let client = client();
        assert!(matches!(
            client.post_form("/x", [("a", 1)], ()),
            Err(RestClientError::NotSupported {
                operation: "post_form"
            })
        ));
        assert!(matches!(
            client.put_form("/x", (), [("h", "v")]),
            Err(RestClientError::NotSupported {
                operation: "put_form"
            })
        ));
    }

    #[test]
    fn debug_redacts_authorization_value() {
        let client = RestClient::new(
            "http://localhost",
            1,
            [("Authorization", "Bearer secret-token")],
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestClient>();
    }
}
