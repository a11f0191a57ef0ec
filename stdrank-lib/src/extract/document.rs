use crate::Result;
use ohno::IntoAppError;
use serde::Deserialize;

/// Shape of an importers listing: `{"results": [{...}, {...}]}`.
#[derive(Debug, Deserialize)]
struct ImportersDocument {
    results: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Count the records in the `results` array of a JSON body.
///
/// The body must be an object with a `results` array whose elements are all objects.
pub fn count_results(body: &[u8]) -> Result<u64> {
    let document: ImportersDocument = serde_json::from_slice(body).into_app_err("decoding importers document")?;
    Ok(document.results.len() as u64)
}
