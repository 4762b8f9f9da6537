//! The export pipeline.
//!
//! One pass, strictly staged: fetch or load the raw record set, merge
//! prices, save, normalize, filter, sort, render. The rendered output
//! comes back as a single string so the caller writes stdout exactly
//! once; an error anywhere produces no partial output.

use tracing::debug;

use crate::config::{Config, Source};
use crate::error::{ExportError, Result};
use crate::filter::FilterSet;
use crate::item;
use crate::output;
use crate::progress::Progress;
use crate::snapshot;
use crate::sort;
use crate::steam::{applists, prices, wishlist, StoreClient};

/// Run the whole pipeline and return the rendered output.
pub async fn run(config: &Config, client: &StoreClient) -> Result<String> {
    let progress = Progress::new(config.quiet);

    // Raw record set: download, or read a saved file.
    let (mut raw, loaded) = match &config.source {
        Source::Fetch { userid, .. } => (wishlist::fetch(client, userid, &progress).await?, false),
        Source::Load(path) => (snapshot::load(path)?, true),
    };

    // Price augmentation. A loaded set keeps its prices unless the file
    // has none or --refresh asks for current ones.
    if let Some(country) = &config.prices {
        if !loaded || !prices::has_price_data(&raw) || config.refresh {
            prices::merge(client, &mut raw, country, &progress).await?;
        } else {
            debug!("keeping prices from loaded file");
        }
    }

    if let Some(path) = &config.save {
        snapshot::save(path, &raw)?;
    }

    // Price filters need price data from this run or the loaded file.
    if config.filters.needs_price_data()
        && config.prices.is_none()
        && !prices::has_price_data(&raw)
    {
        return Err(ExportError::Filter(
            "price filters need price data; use --prices, or --load a file saved with --prices"
                .to_string(),
        ));
    }

    let mut lists = Vec::new();
    for list in &config.lists {
        lists.push(applists::fetch(client, *list, &progress).await?);
    }

    let mut items = item::normalize(&raw);
    items = FilterSet::build(&config.filters, lists).apply(items);
    if let Some(spec) = &config.sort {
        sort::sort_items(&mut items, spec);
    }

    output::render(&items, &config.output)
}
