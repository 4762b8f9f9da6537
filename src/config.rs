//! Command line surface and its resolution into a validated run config.
//!
//! Parsing and validation are split: clap handles shapes and enums, and
//! `Config::resolve` turns the parsed flags into one validated value,
//! catching conflicting flags, bad ranges and unknown field names before
//! any I/O happens.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{ExportError, Result};
use crate::filter::{AppType, FilterOptions, Platform};
use crate::item::canonical_field;
use crate::output::{OutputMode, QuoteMode};
use crate::sort::{SortMode, SortSpec};
use crate::steam::applists::AppList;

const FIELD_HELP: &str = "\
Available wishlist fields, see JSON output:
    name, capsule, review_score, review_desc, reviews_total, reviews_percent,
    release_date, release_string, platform_icons, subs, type, screenshots,
    review_css, priority, added, background, rank, tags, is_free_game,
    deck_compat, early_access, win, mac, linux, free, prerelease

Additional derived fields:
    gameid (alias: id), link (alias: url), released

Additional fields when using --prices to get price information:
    initial, final, discount_percent, initial_formatted, final_formatted, currency";

#[derive(Debug, Parser)]
#[command(
    name = "steamwish",
    about = "Export your Steam wishlist",
    version,
    after_help = FIELD_HELP
)]
pub struct Cli {
    /// Steam user id, a 17 digit number. Required unless --load is given
    #[arg(value_name = "userid")]
    pub userid: Option<String>,

    /// Value of the steamLoginSecure browser cookie, required for a
    /// private wishlist
    #[arg(short, long, value_name = "cookie")]
    pub cookie: Option<String>,

    /// Don't report progress on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Output JSON (default)
    #[arg(short, long)]
    pub json: bool,

    /// Output delimited text
    #[arg(short = 't', long)]
    pub csv: bool,

    /// Comma-separated list of fields to include
    #[arg(short, long, value_name = "fields")]
    pub fields: Option<String>,

    /// Field separator for delimited output (default: tab)
    #[arg(short, long, value_name = "separator")]
    pub separator: Option<String>,

    /// Quoting style for delimited output; "never" escapes delimiters
    /// occurring in fields instead
    #[arg(long, value_enum, default_value = "never")]
    pub quote: QuoteMode,

    /// Sort by this field
    #[arg(long, value_name = "field")]
    pub sort: Option<String>,

    /// Sort numerically
    #[arg(long, visible_alias = "numeric")]
    pub num: bool,

    /// Reverse the sort
    #[arg(long)]
    pub reverse: bool,

    /// Save the unprocessed wishlist to <file>
    #[arg(long, value_name = "file")]
    pub save: Option<PathBuf>,

    /// Load a wishlist saved with --save from <file> instead of
    /// downloading
    #[arg(long, value_name = "file")]
    pub load: Option<PathBuf>,

    /// Supported platform. Can be repeated for multiple platforms
    #[arg(short, long, value_enum)]
    pub platform: Vec<Platform>,

    /// Free games only
    #[arg(long)]
    pub free: bool,

    /// Non-free games only
    #[arg(long)]
    pub no_free: bool,

    /// Games with demos only
    #[arg(long)]
    pub demo: bool,

    /// Games with achievements only
    #[arg(long)]
    pub achievements: bool,

    /// Games with trading cards only
    #[arg(long)]
    pub cards: bool,

    /// Released games only
    #[arg(long)]
    pub released: bool,

    /// Unreleased games only
    #[arg(long)]
    pub no_released: bool,

    /// Early access games only
    #[arg(long)]
    pub early: bool,

    /// No early access games
    #[arg(long)]
    pub no_early: bool,

    /// Type of app. Can be repeated for multiple types
    #[arg(long = "type", value_enum)]
    pub types: Vec<AppType>,

    /// Games with this tag only. Can be repeated, and every given tag
    /// must match. Case and non-alphabetic characters are ignored
    #[arg(long, value_name = "tag")]
    pub tag: Vec<String>,

    /// Games with a Steam Deck compatibility rating of <int> or higher
    /// (0 to 3)
    #[arg(long, value_name = "int")]
    pub deck: Option<String>,

    /// Fetch current prices and discounts for this 2 letter country code.
    /// With --load, prices come from the file unless it has none
    #[arg(long, value_name = "country code")]
    pub prices: Option<String>,

    /// With --load, fetch up to date prices instead of using the prices
    /// from the loaded file
    #[arg(long)]
    pub refresh: bool,

    /// Games with a discount percentage of <int> or more
    #[arg(long, value_name = "int")]
    pub discount: Option<String>,

    /// Games with a price of <int> or less, in minor currency units
    /// (for example 1999 for $19.99)
    #[arg(long, value_name = "int")]
    pub price: Option<String>,
}

/// Where the raw record set comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Download the wishlist from the store.
    Fetch {
        userid: String,
        cookie: Option<String>,
    },
    /// Read a previously saved record set.
    Load(PathBuf),
}

/// Validated run configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: Source,
    pub save: Option<PathBuf>,
    /// Country code for price fetching, when requested.
    pub prices: Option<String>,
    pub refresh: bool,
    pub quiet: bool,
    pub filters: FilterOptions,
    /// Membership lists to download, in fetch order.
    pub lists: Vec<AppList>,
    pub sort: Option<SortSpec>,
    pub output: OutputMode,
}

impl Config {
    /// Validate the parsed command line. Everything that can be rejected
    /// without I/O is rejected here.
    pub fn resolve(cli: Cli) -> Result<Self> {
        if cli.save.is_some() && cli.load.is_some() {
            return Err(argument("--save and --load are mutually exclusive"));
        }
        if cli.json && cli.csv {
            return Err(argument("--json and --csv are mutually exclusive"));
        }

        let source = match cli.load {
            Some(path) => Source::Load(path),
            None => {
                let userid = cli
                    .userid
                    .ok_or_else(|| argument("Missing <userid> or --load"))?;
                if userid.len() != 17 || !userid.chars().all(|c| c.is_ascii_digit()) {
                    return Err(argument("User id must be a 17 digit number."));
                }
                Source::Fetch {
                    userid,
                    cookie: cli.cookie,
                }
            }
        };

        let prices = match cli.prices {
            Some(cc) if cc.len() == 2 && cc.chars().all(|c| c.is_ascii_alphabetic()) => Some(cc),
            Some(_) => return Err(argument("Country code must be two letters.")),
            None => None,
        };

        let filters = FilterOptions {
            platforms: cli.platform,
            types: cli.types,
            tags: cli.tag,
            released: flag_pair(cli.released, cli.no_released, "--released", "--no-released")?,
            early_access: flag_pair(cli.early, cli.no_early, "--early", "--no-early")?,
            free: flag_pair(cli.free, cli.no_free, "--free", "--no-free")?,
            deck: cli
                .deck
                .as_deref()
                .map(|v| bounded_int(v, "Steam Deck rating", Some(3)))
                .transpose()?
                .map(|v| v as u8),
            discount: cli
                .discount
                .as_deref()
                .map(|v| bounded_int(v, "Discount", Some(100)))
                .transpose()?
                .map(|v| v as u8),
            price_under: cli
                .price
                .as_deref()
                .map(|v| bounded_int(v, "Price", None))
                .transpose()?,
        };

        let mut lists = Vec::new();
        if cli.demo {
            lists.push(AppList::Demos);
        }
        if cli.cards {
            lists.push(AppList::Cards);
        }
        if cli.achievements {
            lists.push(AppList::Achievements);
        }

        let sort = match cli.sort.as_deref() {
            Some(field) => {
                let field =
                    canonical_field(field).ok_or_else(|| ExportError::Field(field.to_string()))?;
                Some(SortSpec {
                    field,
                    mode: if cli.num {
                        SortMode::Numeric
                    } else {
                        SortMode::Lexicographic
                    },
                    reverse: cli.reverse,
                })
            }
            None => None,
        };

        // An empty --fields means "everything", matching a missing flag.
        let fields = cli
            .fields
            .as_deref()
            .filter(|spec| !spec.is_empty())
            .map(resolve_fields)
            .transpose()?;

        let output = if cli.csv {
            let separator = match cli.separator.as_deref() {
                None => b'\t',
                Some(s) if s.len() == 1 => s.as_bytes()[0],
                Some(_) => return Err(argument("Separator must be a single byte.")),
            };
            OutputMode::Delimited {
                fields: fields.unwrap_or_else(|| vec!["gameid"]),
                separator,
                quote: cli.quote,
            }
        } else {
            OutputMode::Json { fields }
        };

        Ok(Config {
            source,
            save: cli.save,
            prices,
            refresh: cli.refresh,
            quiet: cli.quiet,
            filters,
            lists,
            sort,
            output,
        })
    }
}

fn argument(message: &str) -> ExportError {
    ExportError::Argument(message.to_string())
}

/// Resolve a yes/no flag pair into an optional direction.
fn flag_pair(yes: bool, no: bool, yes_flag: &str, no_flag: &str) -> Result<Option<bool>> {
    match (yes, no) {
        (true, true) => Err(ExportError::Argument(format!(
            "{yes_flag} and {no_flag} are mutually exclusive"
        ))),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}

/// Parse a non-negative integer option, optionally capped at `max`.
fn bounded_int(value: &str, name: &str, max: Option<i64>) -> Result<i64> {
    let out_of_range = || {
        ExportError::Argument(match max {
            Some(max) => format!("{name} must be an integer between 0 and {max}, inclusive."),
            None => format!("{name} must be a non-negative integer."),
        })
    };
    let parsed: i64 = value.trim().parse().map_err(|_| out_of_range())?;
    if parsed < 0 || max.is_some_and(|m| parsed > m) {
        return Err(out_of_range());
    }
    Ok(parsed)
}

/// Split and canonicalize a comma-separated field list.
fn resolve_fields(spec: &str) -> Result<Vec<&'static str>> {
    spec.split(',')
        .map(|name| canonical_field(name).ok_or_else(|| ExportError::Field(name.to_string())))
        .collect()
}
