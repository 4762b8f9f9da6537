//! Wishlist records and the normalizer.
//!
//! The storefront returns a JSON object keyed by app id; each value is a
//! loosely typed record. Normalization derives the convenience fields
//! (`gameid`, `link`, `released`), flattens fetched price data, and leaves
//! everything else untouched. The transform is total and idempotent:
//! every raw record yields exactly one normalized record, and running it
//! twice changes nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Store page URL prefix for the derived `link` field.
pub const STORE_APP_URL: &str = "https://store.steampowered.com/app";

/// Raw-record key carrying the fetched price sub-object between the price
/// merge and normalization. Never appears in normalized records.
pub const PRICE_KEY: &str = "_price";

// ─── Output field allow-list ──────────────────────────────────────────────────

/// Every field name `--fields` and `--sort` accept, canonical spelling.
pub const FIELDS: &[&str] = &[
    // Raw wishlist fields.
    "name",
    "capsule",
    "review_score",
    "review_desc",
    "reviews_total",
    "reviews_percent",
    "release_date",
    "release_string",
    "platform_icons",
    "subs",
    "type",
    "screenshots",
    "review_css",
    "priority",
    "added",
    "background",
    "rank",
    "tags",
    "is_free_game",
    "deck_compat",
    "early_access",
    "win",
    "mac",
    "linux",
    "free",
    "prerelease",
    // Derived during normalization.
    "gameid",
    "link",
    "released",
    // Flattened price fields (with --prices).
    "initial",
    "final",
    "discount_percent",
    "initial_formatted",
    "final_formatted",
    "currency",
];

/// Resolve a requested field name against the allow-list.
///
/// `id` and `url` are accepted as aliases for `gameid` and `link`.
pub fn canonical_field(name: &str) -> Option<&'static str> {
    let name = match name {
        "id" => "gameid",
        "url" => "link",
        other => other,
    };
    FIELDS.iter().copied().find(|field| *field == name)
}

// ─── Normalized record ────────────────────────────────────────────────────────

/// One normalized wishlist record.
#[derive(Debug, Clone, PartialEq)]
pub struct WishlistItem {
    /// Storefront app id, the record's key in the raw response.
    pub gameid: String,
    /// Ordered field map: the raw fields plus the derived ones.
    pub fields: Map<String, Value>,
}

impl WishlistItem {
    /// Look up a field by canonical name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Price sub-object from the appdetails endpoint, validated and defaulted
/// during normalization. Absent sub-fields stay absent in the flattened
/// record rather than becoming nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceOverview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<i64>,
    #[serde(rename = "final", skip_serializing_if = "Option::is_none")]
    pub final_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_formatted: Option<String>,
}

// ─── Normalization ────────────────────────────────────────────────────────────

/// Normalize the whole raw record set, preserving wishlist order.
pub fn normalize(raw: &Map<String, Value>) -> Vec<WishlistItem> {
    raw.iter()
        .map(|(gameid, record)| normalize_entry(gameid, record))
        .collect()
}

/// Normalize one raw record.
pub fn normalize_entry(gameid: &str, record: &Value) -> WishlistItem {
    let mut fields = match record {
        Value::Object(map) => map.clone(),
        other => {
            warn!(gameid, kind = json_kind(other), "raw record is not an object");
            Map::new()
        }
    };

    let price = fields.shift_remove(PRICE_KEY);

    fields.insert("gameid".to_string(), Value::String(gameid.to_string()));
    fields.insert(
        "link".to_string(),
        Value::String(format!("{STORE_APP_URL}/{gameid}")),
    );
    let released = !is_truthy(fields.get("prerelease"));
    fields.insert("released".to_string(), Value::Bool(released));

    if let Some(price @ Value::Object(_)) = price {
        let overview: PriceOverview = serde_json::from_value(price).unwrap_or_default();
        if let Ok(Value::Object(flat)) = serde_json::to_value(&overview) {
            for (key, value) in flat {
                fields.insert(key, value);
            }
        }
    }

    WishlistItem {
        gameid: gameid.to_string(),
        fields,
    }
}

// ─── Value helpers ────────────────────────────────────────────────────────────

/// Loose truthiness for flag-like raw fields, which arrive as 0/1 numbers
/// or booleans depending on the endpoint's mood.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Numeric coercion for filter comparisons and numeric sorting: numbers as
/// themselves, numeric strings parsed, booleans as 0/1, everything else
/// `None`.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Render one field value as delimited-output (and lexicographic sort)
/// text: arrays join with `:`, nested objects collapse to compact JSON,
/// null and missing render empty.
pub fn render_scalar(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| render_scalar(Some(item)))
            .collect::<Vec<_>>()
            .join(":"),
        Some(object @ Value::Object(_)) => serde_json::to_string(object).unwrap_or_default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_record(value: Value) -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert("581300".to_string(), value);
        raw
    }

    #[test]
    fn test_gameid_equals_source_key() {
        let raw = raw_record(json!({"name": "Celeste"}));
        let items = normalize(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].gameid, "581300");
        assert_eq!(items[0].field("gameid"), Some(&json!("581300")));
    }

    #[test]
    fn test_derived_link_and_released() {
        let raw = raw_record(json!({"name": "Celeste", "prerelease": 0}));
        let item = &normalize(&raw)[0];
        assert_eq!(
            item.field("link"),
            Some(&json!("https://store.steampowered.com/app/581300"))
        );
        assert_eq!(item.field("released"), Some(&json!(true)));

        let raw = raw_record(json!({"prerelease": 1}));
        let item = &normalize(&raw)[0];
        assert_eq!(item.field("released"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_prerelease_counts_as_released() {
        let raw = raw_record(json!({"name": "Celeste"}));
        assert_eq!(normalize(&raw)[0].field("released"), Some(&json!(true)));
    }

    #[test]
    fn test_price_sub_object_flattens() {
        let raw = raw_record(json!({
            "name": "Celeste",
            "_price": {
                "currency": "EUR",
                "initial": 1999,
                "final": 999,
                "discount_percent": 50,
                "initial_formatted": "19,99€",
                "final_formatted": "9,99€"
            }
        }));
        let item = &normalize(&raw)[0];
        assert_eq!(item.field("initial"), Some(&json!(1999)));
        assert_eq!(item.field("final"), Some(&json!(999)));
        assert_eq!(item.field("discount_percent"), Some(&json!(50)));
        assert_eq!(item.field("currency"), Some(&json!("EUR")));
        assert!(item.field(PRICE_KEY).is_none());
    }

    #[test]
    fn test_null_price_marker_adds_nothing() {
        let raw = raw_record(json!({"name": "Celeste", "_price": null}));
        let item = &normalize(&raw)[0];
        assert!(item.field("final").is_none());
        assert!(item.field(PRICE_KEY).is_none());
    }

    #[test]
    fn test_partial_price_object_leaves_missing_fields_absent() {
        let raw = raw_record(json!({"_price": {"final": 499, "currency": "USD"}}));
        let item = &normalize(&raw)[0];
        assert_eq!(item.field("final"), Some(&json!(499)));
        assert_eq!(item.field("currency"), Some(&json!("USD")));
        assert!(item.field("initial").is_none());
        assert!(item.field("discount_percent").is_none());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = raw_record(json!({
            "name": "Celeste",
            "prerelease": 0,
            "tags": ["Platformer"],
            "_price": {"final": 999, "currency": "EUR"}
        }));
        let once = normalize(&raw);
        let again = normalize_entry("581300", &Value::Object(once[0].fields.clone()));
        assert_eq!(once[0], again);
    }

    #[test]
    fn test_non_object_record_still_normalizes() {
        let raw = raw_record(json!("not an object"));
        let item = &normalize(&raw)[0];
        assert_eq!(item.gameid, "581300");
        assert_eq!(item.field("released"), Some(&json!(true)));
        assert!(item.field("name").is_none());
    }

    #[test]
    fn test_order_preserved_across_records() {
        let mut raw = Map::new();
        raw.insert("900".to_string(), json!({}));
        raw.insert("100".to_string(), json!({}));
        raw.insert("500".to_string(), json!({}));
        let items = normalize(&raw);
        let ids: Vec<&str> = items.iter().map(|i| i.gameid.as_str()).collect();
        assert_eq!(ids, vec!["900", "100", "500"]);
    }

    #[test]
    fn test_canonical_field_resolves_aliases() {
        assert_eq!(canonical_field("id"), Some("gameid"));
        assert_eq!(canonical_field("url"), Some("link"));
        assert_eq!(canonical_field("name"), Some("name"));
        assert_eq!(canonical_field("bogus"), None);
        assert_eq!(canonical_field(""), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!(["a"]))));
    }

    #[test]
    fn test_as_number_coercion() {
        assert_eq!(as_number(Some(&json!(42))), Some(42.0));
        assert_eq!(as_number(Some(&json!("19.5"))), Some(19.5));
        assert_eq!(as_number(Some(&json!(" 7 "))), Some(7.0));
        assert_eq!(as_number(Some(&json!(true))), Some(1.0));
        assert_eq!(as_number(Some(&json!("n/a"))), None);
        assert_eq!(as_number(None), None);
    }

    #[test]
    fn test_render_scalar_shapes() {
        assert_eq!(render_scalar(Some(&json!("plain"))), "plain");
        assert_eq!(render_scalar(Some(&json!(3))), "3");
        assert_eq!(render_scalar(Some(&json!(true))), "true");
        assert_eq!(render_scalar(Some(&json!(["a", "b", 3]))), "a:b:3");
        assert_eq!(render_scalar(None), "");
        assert_eq!(render_scalar(Some(&json!(null))), "");
        assert_eq!(render_scalar(Some(&json!({"k": 1}))), r#"{"k":1}"#);
    }
}
