//! services/api/src/bin/openapi.rs
//!
//! This binary writes the OpenAPI 3.0 document for the swap board REST API
//! to a file, `openapi.json` unless a path is given.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

/// Renders the OpenAPI document and writes it to `path`.
fn write_openapi_document(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = api_doc.to_pretty_json()?;
    std::fs::write(path, document)?;
    println!("OpenAPI document written to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_openapi_document(ApiDoc::openapi(), &path)?;
    Ok(())
}
