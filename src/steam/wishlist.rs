//! Paginated wishlist download.
//!
//! The wishlist endpoint pages its response; pages are fetched in order
//! and merged key-by-key until the service returns an empty object. An
//! empty first page is a legitimate empty wishlist, not an error.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::progress::Progress;

use super::StoreClient;

/// Fetch every wishlist page for `userid` and merge them in page order.
pub async fn fetch(
    client: &StoreClient,
    userid: &str,
    progress: &Progress,
) -> Result<Map<String, Value>> {
    let mut wishlist = Map::new();
    let mut page = 0u32;

    loop {
        progress.report(format!("Fetching wishlist page {}", page + 1));

        let url = format!(
            "{}/wishlist/profiles/{}/wishlistdata/?p={}",
            client.store_base, userid, page
        );
        let response = client.get(&url, true).await?;

        let status = response.status();
        if !status.is_success() {
            let hint = if client.has_cookie() {
                "is the provided cookie invalid or expired?"
            } else {
                "is the wishlist private?"
            };
            return Err(ExportError::Auth(format!(
                "could not get wishlist (HTTP {}): {hint}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            ExportError::Format(format!("wishlist page {} is not valid JSON: {e}", page + 1))
        })?;

        match value {
            Value::Object(records) if !records.is_empty() => {
                debug!(page, records = records.len(), "merged wishlist page");
                for (gameid, record) in records {
                    wishlist.insert(gameid, record);
                }
            }
            // Empty object or non-object: past the last page.
            _ => break,
        }

        page += 1;
    }

    Ok(wishlist)
}
