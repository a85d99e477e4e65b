use serde_json::Value;

use crate::RawResponse;

/// Status code and decoded JSON body of a completed call.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonResult {
    /// Status code as text, e.g. `"200"`.
    pub code: String,
    pub body: Value,
}

/// What a verb call returns once the transport has produced a response.
///
/// Non-2xx responses land here too; check [`Outcome::status`].
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The body decoded as JSON.
    Parsed(JsonResult),
    /// The body was not JSON; the response is returned untouched.
    Raw(RawResponse),
}

impl Outcome {
    /// Numeric status of either variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Parsed(result) => result.code.parse().ok(),
            Self::Raw(response) => Some(response.status),
        }
    }

    pub fn code(&self) -> String {
        match self {
            Self::Parsed(result) => result.code.clone(),
            Self::Raw(response) => response.status.to_string(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn as_parsed(&self) -> Option<&JsonResult> {
        match self {
            Self::Parsed(result) => Some(result),
            Self::Raw(_) => None,
        }
    }

    pub fn into_parsed(self) -> Option<JsonResult> {
        match self {
            Self::Parsed(result) => Some(result),
            Self::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<RawResponse> {
        match self {
            Self::Parsed(_) => None,
            Self::Raw(response) => Some(response),
        }
    }
}
