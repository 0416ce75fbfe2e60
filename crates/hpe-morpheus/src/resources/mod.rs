//! Morpheus managed resources

pub mod role;
pub mod user;

use hpe_subprovider::Diagnostics;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a plan, state or config object, recording a diagnostic on failure
pub(crate) fn decode_model<T: DeserializeOwned>(
    value: &Value,
    summary: &str,
    diags: &mut Diagnostics,
) -> Option<T> {
    match hpe_subprovider::decode(value) {
        Ok(model) => Some(model),
        Err(e) => {
            diags.add_error(summary, e.to_string());
            None
        }
    }
}

/// Parse a numeric import id
pub(crate) fn parse_import_id(id: &str) -> Result<i64, String> {
    id.trim()
        .parse()
        .map_err(|_| format!("provided import ID '{}' is invalid (non-number)", id))
}
