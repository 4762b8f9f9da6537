//! Stable record sorting.
//!
//! Sorting happens between filtering and formatting and applies to both
//! output modes. Without a sort request the pipeline keeps wishlist order.

use std::cmp::Ordering;

use crate::item::{as_number, render_scalar, WishlistItem};

/// How the sort field is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Compare the field's scalar rendering; missing renders empty.
    Lexicographic,
    /// Coerce to f64; non-numeric and missing values sort last in both
    /// directions.
    Numeric,
}

/// A resolved sort request: canonical field name, mode, direction.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub field: &'static str,
    pub mode: SortMode,
    pub reverse: bool,
}

enum SortKey {
    Text(String),
    Number(f64),
    Missing,
}

/// Stable in-place sort. Equal keys keep their relative order.
pub fn sort_items(items: &mut [WishlistItem], spec: &SortSpec) {
    items.sort_by(|a, b| {
        let cmp = match (sort_key(a, spec), sort_key(b, spec)) {
            // Missing keys stay at the end regardless of direction.
            (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
            (SortKey::Missing, _) => return Ordering::Greater,
            (_, SortKey::Missing) => return Ordering::Less,
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(&b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(&b),
            // Keys come from one spec, so mixed variants cannot happen.
            _ => Ordering::Equal,
        };
        if spec.reverse {
            cmp.reverse()
        } else {
            cmp
        }
    });
}

fn sort_key(item: &WishlistItem, spec: &SortSpec) -> SortKey {
    let value = item.field(spec.field);
    match spec.mode {
        SortMode::Lexicographic => SortKey::Text(render_scalar(value)),
        SortMode::Numeric => match as_number(value) {
            Some(n) => SortKey::Number(n),
            None => SortKey::Missing,
        },
    }
}
