//! Storefront HTTP access: wishlist pages, price lookups, app-id lists.

pub mod applists;
pub mod client;
pub mod prices;
pub mod wishlist;

pub use client::StoreClient;
