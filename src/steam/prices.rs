//! Store price lookups, merged into the raw record set.
//!
//! The appdetails endpoint answers one entry per requested app id. Every
//! answered record gets a `_price` field: the `data.price_overview`
//! object when the app has one, JSON null otherwise. The null is the
//! "fetch attempted, nothing priced" marker that later runs (via
//! `--save`/`--load`) use to skip refetching.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::item::PRICE_KEY;
use crate::progress::Progress;

use super::StoreClient;

/// App ids per appdetails request.
const BATCH_SIZE: usize = 100;

/// Fetch price data for every record in `raw` and merge it in place.
/// `country` selects the storefront region.
pub async fn merge(
    client: &StoreClient,
    raw: &mut Map<String, Value>,
    country: &str,
    progress: &Progress,
) -> Result<()> {
    let gameids: Vec<String> = raw.keys().cloned().collect();

    for (index, batch) in gameids.chunks(BATCH_SIZE).enumerate() {
        progress.report(format!("Fetching price information, batch {}", index + 1));

        let url = format!(
            "{}/api/appdetails/?filters=price_overview&cc={}&appids={}",
            client.store_base,
            country,
            batch.join(",")
        );
        let response = client.get(&url, false).await?.error_for_status()?;
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ExportError::Format(format!("price response is not valid JSON: {e}")))?;
        let Value::Object(entries) = value else {
            return Err(ExportError::Format(
                "price response is not a JSON object".to_string(),
            ));
        };

        for (gameid, entry) in entries {
            let price = entry
                .pointer("/data/price_overview")
                .cloned()
                .unwrap_or(Value::Null);
            match raw.get_mut(&gameid) {
                Some(Value::Object(record)) => {
                    record.insert(PRICE_KEY.to_string(), price);
                }
                _ => debug!(gameid = %gameid, "price entry for unknown app id"),
            }
        }
    }

    Ok(())
}

/// Whether the record set already carries price data, judged by the first
/// record's `_price` marker.
pub fn has_price_data(raw: &Map<String, Value>) -> bool {
    raw.values()
        .next()
        .map(|record| matches!(record, Value::Object(map) if map.contains_key(PRICE_KEY)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw_set(ids: &[&str]) -> Map<String, Value> {
        let mut raw = Map::new();
        for id in ids {
            raw.insert(id.to_string(), json!({"name": format!("App {id}")}));
        }
        raw
    }

    fn client_for(server: &MockServer) -> StoreClient {
        let mut client = StoreClient::new(None);
        client.store_base = server.uri();
        client
    }

    #[tokio::test]
    async fn test_merge_sets_price_or_null_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .and(query_param("filters", "price_overview"))
            .and(query_param("cc", "de"))
            .and(query_param("appids", "581300,440900"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "581300": {
                    "success": true,
                    "data": {
                        "price_overview": {
                            "currency": "EUR",
                            "initial": 1999,
                            "final": 999,
                            "discount_percent": 50
                        }
                    }
                },
                "440900": {"success": true, "data": []}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut raw = raw_set(&["581300", "440900"]);
        merge(&client, &mut raw, "de", &Progress::new(true))
            .await
            .unwrap();

        assert_eq!(
            raw["581300"]["_price"]["final"],
            json!(999),
            "priced app carries the overview object"
        );
        assert_eq!(raw["440900"]["_price"], Value::Null);
        assert!(has_price_data(&raw));
    }

    #[tokio::test]
    async fn test_merge_batches_by_hundred() {
        let server = MockServer::start().await;
        // Two batches: ids 0..=99 and 100..=119.
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let ids: Vec<String> = (0..120).map(|i| i.to_string()).collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let client = client_for(&server);
        let mut raw = raw_set(&id_refs);
        merge(&client, &mut raw, "us", &Progress::new(true))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut raw = raw_set(&["581300"]);
        let err = merge(&client, &mut raw, "us", &Progress::new(true))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Network { .. }));
    }

    #[tokio::test]
    async fn test_empty_set_makes_no_requests() {
        // No mock server at all: a request would fail the test.
        let mut client = StoreClient::new(None);
        client.store_base = "http://127.0.0.1:9".to_string();
        let mut raw = Map::new();
        merge(&client, &mut raw, "us", &Progress::new(true))
            .await
            .unwrap();
        assert!(!has_price_data(&raw));
    }

    #[test]
    fn test_has_price_data_checks_first_record() {
        let mut raw = Map::new();
        raw.insert("1".to_string(), json!({"name": "A", "_price": null}));
        raw.insert("2".to_string(), json!({"name": "B"}));
        assert!(has_price_data(&raw));

        let mut raw = Map::new();
        raw.insert("1".to_string(), json!({"name": "A"}));
        raw.insert("2".to_string(), json!({"name": "B", "_price": null}));
        assert!(!has_price_data(&raw));
    }
}
