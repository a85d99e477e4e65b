use crate::{JsonResult, RawResponse};

/// A response whose body is not JSON, with the parser's complaint.
#[derive(Debug)]
pub(crate) struct Undecodable {
    pub(crate) response: RawResponse,
    pub(crate) error: serde_json::Error,
}

/// Decodes the body as JSON. On failure the response is handed back untouched.
///
/// An empty body is not valid JSON and takes the failure path.
pub(crate) fn decode_json_result(response: RawResponse) -> Result<JsonResult, Undecodable> {
    match serde_json::from_slice(&response.body) {
        Ok(body) => Ok(JsonResult {
            code: response.status.to_string(),
            body,
        }),
        Err(error) => Err(Undecodable { response, error }),
    }
}
