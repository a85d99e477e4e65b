use std::{error::Error as StdError, io, time::Duration};

use reqwest::redirect;

use crate::{
    ClientOptions, Endpoint, Method, PreparedRequest, RawResponse, RestClientError, Result,
    TransportError, TransportErrorKind,
};

/// Performs a single HTTP exchange.
///
/// Implementations report every completed exchange as a [`RawResponse`],
/// whatever its status, and classify failures into a [`TransportErrorKind`].
/// The client's retry loop relies only on that classification.
pub trait Transport: Send + Sync {
    fn send(&self, request: &PreparedRequest) -> std::result::Result<RawResponse, TransportError>;
}

/// Blocking `reqwest` transport.
///
/// Redirects are not followed: a 3xx is returned like any other status.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
    tls: bool,
}

impl ReqwestTransport {
    pub fn new(endpoint: &Endpoint, options: &ClientOptions) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .redirect(redirect::Policy::none());

        if let Some(timeout_ms) = options.timeout_ms {
            let timeout = Duration::from_millis(timeout_ms);
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }
        if endpoint.scheme().is_tls() && options.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            RestClientError::Configuration(format!(
                "could not build HTTP transport for {endpoint}: {}",
                describe(&err)
            ))
        })?;
        Ok(Self {
            http,
            tls: endpoint.scheme().is_tls(),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        TransportError::new(classify(&err, self.tls), describe(&err))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &PreparedRequest) -> std::result::Result<RawResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &request.url);
        for (key, value) in request.headers.iter() {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|err| self.transport_error(err))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .map_err(|err| self.transport_error(err))?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// What a `reqwest` failure looked like, reduced to the facts classification needs.
#[derive(Clone, Copy, Debug, Default)]
struct Symptoms {
    /// Builder, redirect or status error: the request never made it out.
    setup: bool,
    timeout: bool,
    connect: bool,
    /// Failure while writing the request or reading the response.
    exchange: bool,
    /// Kind of the first `io::Error` in the cause chain.
    io_kind: Option<io::ErrorKind>,
    /// The connection was meant to be TLS.
    tls_channel: bool,
}

impl Symptoms {
    fn of(err: &reqwest::Error, tls_channel: bool) -> Self {
        Self {
            setup: err.is_builder() || err.is_redirect() || err.is_status(),
            timeout: err.is_timeout(),
            connect: err.is_connect(),
            exchange: err.is_request() || err.is_body() || err.is_decode(),
            io_kind: error_chain(err)
                .find_map(|cause| cause.downcast_ref::<io::Error>())
                .map(io::Error::kind),
            tls_channel,
        }
    }

    fn kind(self) -> TransportErrorKind {
        if self.setup {
            return TransportErrorKind::Other;
        }

        if self.timeout {
            return if self.connect {
                TransportErrorKind::ConnectTimeout
            } else {
                TransportErrorKind::ReadTimeout
            };
        }

        if self.connect {
            return match self.io_kind {
                Some(io::ErrorKind::ConnectionRefused) => TransportErrorKind::ConnectionRefused,
                Some(io::ErrorKind::TimedOut) => TransportErrorKind::ConnectTimeout,
                // rustls surfaces handshake and certificate failures as
                // InvalidData, and a peer hanging up mid-handshake as UnexpectedEof.
                Some(io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof)
                    if self.tls_channel =>
                {
                    TransportErrorKind::Tls
                }
                _ => TransportErrorKind::Socket,
            };
        }

        if self.exchange {
            return match self.io_kind {
                Some(io::ErrorKind::TimedOut) => TransportErrorKind::ReadTimeout,
                _ => TransportErrorKind::Protocol,
            };
        }

        TransportErrorKind::Other
    }
}

/// Maps a `reqwest` failure onto the closed kind set.
pub(crate) fn classify(err: &reqwest::Error, tls_channel: bool) -> TransportErrorKind {
    Symptoms::of(err, tls_channel).kind()
}

fn error_chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&cause| cause.source())
}

/// The error and all of its causes, joined with `": "`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = String::new();
    for cause in error_chain(err) {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}
