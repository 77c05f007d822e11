//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI document for the REST API.
//!
//! Usage: `openapi [PATH]`. Writes to `openapi.json` by default, or to stdout when
//! PATH is `-`.

use std::io::Write;

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = ApiDoc::openapi();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    let json = doc.to_pretty_json()?;

    match std::env::args().nth(1).as_deref() {
        Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
        target => {
            let path = target.unwrap_or(DEFAULT_OUTPUT);
            std::fs::write(path, json)?;
            eprintln!("Wrote {} paths to {}", doc.paths.paths.len(), path);
        }
    }
    Ok(())
}
