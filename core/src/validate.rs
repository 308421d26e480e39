//! Argument checks for content collection queries.

use crate::error::Error;
use crate::query::Query;

/// Query keys accepted by `content/items/{model}`.
pub const CONTENT_QUERY_KEYS: [&str; 7] = ["locale", "filter", "sort", "fields", "limit", "skip", "populate"];

/// Reject an empty model name or any parameter outside
/// [`CONTENT_QUERY_KEYS`]. Pure; runs before a request is built.
pub(crate) fn content_items(model: &str, params: &Query) -> Result<(), Error> {
    if model.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "invalid parameter 'model' for CockpitClient::content_items(model): \
             provide a non-empty content model name"
                .to_string(),
        ));
    }

    let invalid: Vec<&str> = params.keys().filter(|key| !CONTENT_QUERY_KEYS.contains(key)).collect();
    if !invalid.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "invalid parameter 'params' for CockpitClient::content_items(model, params): \
             '{}' are not valid parameters; allowed keys are '{}'",
            invalid.join(", "),
            CONTENT_QUERY_KEYS.join(", "),
        )));
    }

    Ok(())
}
