// Copyright 2026 Steamwish Contributors
// SPDX-License-Identifier: Apache-2.0

//! Steamwish library: export a Steam wishlist as JSON or delimited text.
//!
//! The pipeline runs strictly left to right: fetch (or load) the raw
//! record set, merge prices, normalize, filter, sort, render. The binary
//! in `main.rs` is a thin driver; this library crate exposes the stages
//! for integration testing.

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod item;
pub mod output;
pub mod progress;
pub mod snapshot;
pub mod sort;
pub mod steam;

pub use error::{ExportError, Result};
