//! Declarative record filters.
//!
//! Every CLI filter flag maps to one predicate; a record survives iff all
//! active predicates hold. Predicates are pure functions over a normalized
//! record, so filtering preserves wishlist order.

use std::collections::HashSet;

use clap::ValueEnum;

use crate::item::{as_number, is_truthy, WishlistItem};

/// Platforms a record can support, keyed to the raw flag fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Linux,
    Win,
    Mac,
}

impl Platform {
    /// Raw record field carrying the platform flag.
    pub fn field(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Win => "win",
            Platform::Mac => "mac",
        }
    }
}

/// Storefront app categories, as spelled in the raw `type` field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AppType {
    Game,
    Dlc,
    Mod,
    Demo,
    Application,
    Music,
}

impl AppType {
    pub fn as_str(self) -> &'static str {
        match self {
            AppType::Game => "game",
            AppType::Dlc => "dlc",
            AppType::Mod => "mod",
            AppType::Demo => "demo",
            AppType::Application => "application",
            AppType::Music => "music",
        }
    }
}

/// Resolved filter configuration, one field per CLI filter flag.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Keep records supporting at least one of these platforms.
    pub platforms: Vec<Platform>,
    /// Keep records whose `type` is one of these.
    pub types: Vec<AppType>,
    /// Keep records tagged with every one of these (alphabetic,
    /// case-insensitive comparison).
    pub tags: Vec<String>,
    /// Keep released (`true`) or unreleased (`false`) records.
    pub released: Option<bool>,
    /// Keep early-access (`true`) or non-early-access (`false`) records.
    pub early_access: Option<bool>,
    /// Keep free-to-play (`true`) or paid (`false`) records.
    pub free: Option<bool>,
    /// Keep records with Steam Deck compatibility at least this rating.
    pub deck: Option<u8>,
    /// Keep records discounted by at least this percentage.
    pub discount: Option<u8>,
    /// Keep records whose final price (in minor currency units) is at most
    /// this.
    pub price_under: Option<i64>,
}

impl FilterOptions {
    /// True when any active filter reads the flattened price fields.
    pub fn needs_price_data(&self) -> bool {
        self.discount.is_some() || self.price_under.is_some()
    }
}

type Predicate = Box<dyn Fn(&WishlistItem) -> bool>;

/// Conjunction of filter predicates.
#[derive(Default)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    /// Build the predicate set for the given options plus any fetched
    /// membership lists (each list is a separate AND term).
    pub fn build(opts: &FilterOptions, lists: Vec<HashSet<String>>) -> Self {
        let mut set = FilterSet::default();

        if !opts.platforms.is_empty() {
            let platforms = opts.platforms.clone();
            set.push(move |item| {
                platforms
                    .iter()
                    .any(|p| is_truthy(item.field(p.field())))
            });
        }
        if !opts.types.is_empty() {
            let types = opts.types.clone();
            set.push(move |item| {
                let kind = match item.field("type") {
                    Some(serde_json::Value::String(s)) => s.to_lowercase(),
                    _ => return false,
                };
                types.iter().any(|t| t.as_str() == kind)
            });
        }
        if !opts.tags.is_empty() {
            let wanted: Vec<String> = opts.tags.iter().map(|t| clean_tag(t)).collect();
            set.push(move |item| {
                let tags: Vec<String> = match item.field("tags") {
                    Some(serde_json::Value::Array(tags)) => tags
                        .iter()
                        .filter_map(|t| t.as_str())
                        .map(clean_tag)
                        .collect(),
                    _ => Vec::new(),
                };
                wanted.iter().all(|w| tags.iter().any(|t| t == w))
            });
        }
        if let Some(want) = opts.released {
            set.push(move |item| is_truthy(item.field("released")) == want);
        }
        if let Some(want) = opts.early_access {
            set.push(move |item| is_truthy(item.field("early_access")) == want);
        }
        if let Some(want) = opts.free {
            set.push(move |item| is_truthy(item.field("is_free_game")) == want);
        }
        if let Some(rating) = opts.deck {
            set.push(move |item| {
                as_number(item.field("deck_compat")).unwrap_or(0.0) >= f64::from(rating)
            });
        }
        if let Some(percent) = opts.discount {
            set.push(move |item| {
                as_number(item.field("discount_percent")).unwrap_or(0.0) >= f64::from(percent)
            });
        }
        if let Some(ceiling) = opts.price_under {
            set.push(move |item| {
                as_number(item.field("final")).unwrap_or(0.0) <= ceiling as f64
            });
        }
        for list in lists {
            set.push(move |item| list.contains(&item.gameid));
        }

        set
    }

    fn push(&mut self, predicate: impl Fn(&WishlistItem) -> bool + 'static) {
        self.predicates.push(Box::new(predicate));
    }

    /// True iff every predicate accepts the record.
    pub fn matches(&self, item: &WishlistItem) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    /// Keep matching records, preserving order.
    pub fn apply(&self, items: Vec<WishlistItem>) -> Vec<WishlistItem> {
        if self.predicates.is_empty() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Tag comparison form: alphabetic characters only, lowercased, so
/// "Rogue-like", "roguelike" and "Roguelike" all compare equal.
pub fn clean_tag(raw: impl AsRef<str>) -> String {
    raw.as_ref()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase()
}
