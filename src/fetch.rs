use serde_json::Value;
use tracing::debug;

use crate::document::{self, SerializeMode};
use crate::error::ViewerError;

/// Fetches a JSON body over HTTP and returns it pretty-printed.
///
/// Network failures, error statuses and non-JSON bodies all surface as
/// [`ViewerError::Fetch`]. Callers apply the returned text only on success,
/// so a failed fetch never touches the currently displayed document.
pub async fn fetch_json_text(url: &str) -> Result<String, ViewerError> {
    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ViewerError::Fetch(e.to_string()))?;
    let value: Value = response
        .json()
        .await
        .map_err(|e| ViewerError::Fetch(e.to_string()))?;
    debug!(url, "fetched JSON document");
    Ok(document::serialize(&value, SerializeMode::Pretty))
}
