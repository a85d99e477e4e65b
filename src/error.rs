use std::fmt;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RestClientError {
    /// Endpoint or option values that cannot configure a client.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Operation is declared on the client but has no implementation.
    #[error("{operation} is not supported")]
    NotSupported { operation: &'static str },
    /// Transport failure, as raised by the transport on the final attempt.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RestClientError {
    /// Returns the transport error kind when this is a transport failure.
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::Transport(err) => Some(err.kind()),
            _ => None,
        }
    }
}

/// What the retry loop does with a failed attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Disposition {
    Retry,
    Propagate,
}

/// Closed classification of transport failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TransportErrorKind {
    ConnectionRefused,
    /// The transport itself reported the service as unavailable.
    ServiceUnavailable,
    Protocol,
    ReadTimeout,
    ConnectTimeout,
    Tls,
    /// Name resolution or socket-level failure.
    Socket,
    /// Anything outside the retryable set.
    Other,
}

impl TransportErrorKind {
    pub fn disposition(self) -> Disposition {
        match self {
            Self::ConnectionRefused
            | Self::ServiceUnavailable
            | Self::Protocol
            | Self::ReadTimeout
            | Self::ConnectTimeout
            | Self::Tls
            | Self::Socket => Disposition::Retry,
            Self::Other => Disposition::Propagate,
        }
    }

    pub fn is_retryable(self) -> bool {
        self.disposition() == Disposition::Retry
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionRefused => "connection refused",
            Self::ServiceUnavailable => "service unavailable",
            Self::Protocol => "protocol error",
            Self::ReadTimeout => "read timeout",
            Self::ConnectTimeout => "connect timeout",
            Self::Tls => "tls error",
            Self::Socket => "socket error",
            Self::Other => "transport error",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure raised by a [`crate::Transport`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::{Disposition, RestClientError, TransportError, TransportErrorKind};

    #[test]
    fn only_other_propagates() {
        let retryable = [
            TransportErrorKind::ConnectionRefused,
            TransportErrorKind::ServiceUnavailable,
            TransportErrorKind::Protocol,
            TransportErrorKind::ReadTimeout,
            TransportErrorKind::ConnectTimeout,
            TransportErrorKind::Tls,
            TransportErrorKind::Socket,
        ];
        for kind in retryable {
            assert_eq!(kind.disposition(), Disposition::Retry, "{kind}");
        }
        assert_eq!(
            TransportErrorKind::Other.disposition(),
            Disposition::Propagate
        );
    }

    #[test]
    fn transport_error_displays_kind_and_message() {
        let err = TransportError::new(TransportErrorKind::ConnectTimeout, "after 5s");
        assert_eq!(err.to_string(), "connect timeout: after 5s");
    }

    #[test]
    fn transport_variant_is_not_wrapped_in_display() {
        let err: RestClientError =
            TransportError::new(TransportErrorKind::ReadTimeout, "slow").into();
        assert_eq!(err.to_string(), "read timeout: slow");
        assert_eq!(err.transport_kind(), Some(TransportErrorKind::ReadTimeout));
    }

    #[test]
    fn not_supported_names_operation() {
        let err = RestClientError::NotSupported {
            operation: "post_form",
        };
        assert_eq!(err.to_string(), "post_form is not supported");
        assert_eq!(err.transport_kind(), None);
    }
}
