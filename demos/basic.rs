use json_rest_client::{Outcome, RestClient};

fn main() -> anyhow::Result<()> {
    let endpoint = std::env::var("JSON_REST_ENDPOINT")?;

    let client = RestClient::new(&endpoint, 3, [("X-Demo", "basic")])?;

    match client.get("/users", [("page", 1)], ())? {
        Outcome::Parsed(result) => println!("{} {}", result.code, result.body),
        Outcome::Raw(response) => println!("{} (not JSON) {}", response.status, response.text()),
    }

    let created = client.post("/users", [("name", "Kit")], ())?;
    println!("create -> {}", created.code());

    Ok(())
}
