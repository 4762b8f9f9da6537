//! Downloadable app-id lists backing the membership filters.

use std::collections::HashSet;

use crate::error::Result;
use crate::progress::Progress;

use super::StoreClient;

/// Published app-id lists, one per membership filter flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppList {
    Demos,
    Cards,
    Achievements,
}

impl AppList {
    /// List name, used both in the download URL and in progress output.
    pub fn name(self) -> &'static str {
        match self {
            AppList::Demos => "demos",
            AppList::Cards => "cards",
            AppList::Achievements => "achievements",
        }
    }
}

/// Download one list as a set of app ids, one id per line.
pub async fn fetch(
    client: &StoreClient,
    list: AppList,
    progress: &Progress,
) -> Result<HashSet<String>> {
    progress.report(format!("Loading {}", list.name()));

    let url = format!("{}/{}", client.lists_base, list.name());
    let response = client.get(&url, false).await?.error_for_status()?;
    let body = response.text().await?;

    Ok(body
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
