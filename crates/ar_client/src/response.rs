use ar_core::{ArgumentPage, AspectSpace, Error, Result};
use serde_json::Value;

/// Reads the `totalSize` field of an `/arguments` response.
pub fn parse_total_size(body: &Value) -> Result<u64> {
    let value = body
        .get("totalSize")
        .ok_or_else(|| Error::MalformedResponse("missing field `totalSize`".to_string()))?;
    value.as_u64().ok_or_else(|| {
        Error::MalformedResponse(format!(
            "`totalSize` is not a non-negative integer: {}",
            value
        ))
    })
}

pub fn parse_page(body: Value) -> Result<ArgumentPage> {
    serde_json::from_value(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid arguments page: {}", e)))
}

pub fn parse_aspect_space(body: Value) -> Result<AspectSpace> {
    serde_json::from_value(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid aspect space: {}", e)))
}
