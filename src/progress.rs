// Copyright 2026 Steamwish Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress messages on the diagnostic stream.
//!
//! Progress is best-effort and purely informational: it goes to stderr,
//! is suppressed entirely by `--quiet`, and never affects control flow.
//! Operational logging (`tracing`) is a separate channel gated by
//! `RUST_LOG`; this module is the user-facing one.

/// Reporter handed down the pipeline; cheap to copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    quiet: bool,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print one progress line to stderr unless suppressed.
    pub fn report(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }
}
