use json_rest_client::{Outcome, RestClient};

/// Runs against a real endpoint when `JSON_REST_LIVE_ENDPOINT` is set.
///
/// Optional `JSON_REST_LIVE_PATH` picks the resource (default `/`).
fn load_live_target() -> Result<(String, String), String> {
    let endpoint = std::env::var("JSON_REST_LIVE_ENDPOINT")
        .map_err(|_| "JSON_REST_LIVE_ENDPOINT is required".to_owned())?;
    if endpoint.trim().is_empty() {
        return Err("JSON_REST_LIVE_ENDPOINT is set but empty".to_owned());
    }
    let path = std::env::var("JSON_REST_LIVE_PATH").unwrap_or_else(|_| "/".to_owned());
    Ok((endpoint, path))
}

#[test]
fn live_get_returns_code_and_body() {
    let (endpoint, path) = match load_live_target() {
        Ok(values) => values,
        Err(_) => {
            eprintln!("skipping live test: JSON_REST_LIVE_ENDPOINT not set");
            return;
        }
    };

    let client = RestClient::new(&endpoint, 2, ()).expect("live endpoint must parse");
    let outcome = client.get(&path, (), ()).expect("live request must complete");

    match outcome {
        Outcome::Parsed(result) => {
            assert_eq!(result.code.len(), 3);
            assert!(result.code.parse::<u16>().is_ok());
        }
        Outcome::Raw(response) => {
            assert!((100..600).contains(&response.status));
        }
    }
}
