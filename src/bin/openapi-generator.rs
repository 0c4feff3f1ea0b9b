//! Dumps the OpenAPI document to stdout.

use utoipa::OpenApi;
use whatcard_back::services::documentation::ApiDoc;

fn main() {
    let doc = ApiDoc::openapi();
    println!("{}", doc.to_pretty_json().unwrap());
}
