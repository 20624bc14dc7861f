//! Print the OpenAPI document as JSON.

use taskdeck::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
