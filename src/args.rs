use clap::{Parser, ValueEnum};
use classifieds_scraper::SortOrder;

#[derive(Parser, Debug)]
#[command(name = "classifieds-scraper")]
#[command(about = "Scrapes classified listings for a product search")]
#[command(version)]
pub struct Args {
    /// Product to search for
    pub product: String,

    /// Minimum price (requires --max-price)
    #[arg(long)]
    pub min_price: Option<u64>,

    /// Maximum price (requires --min-price)
    #[arg(long)]
    pub max_price: Option<u64>,

    /// Result ordering
    #[arg(short, long, value_enum, default_value_t = SortArg::Relevance)]
    pub sort: SortArg,

    /// Region code, e.g. "go" or "sp"
    #[arg(short, long)]
    pub region: Option<String>,

    /// Number of result pages fetched concurrently
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Total timeout in seconds for fetching result pages
    #[arg(long)]
    pub total_timeout: Option<u64>,

    /// Path to JSON configuration file
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    Newest,
    PriceAsc,
    PriceDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::Newest => SortOrder::Newest,
            SortArg::PriceAsc => SortOrder::PriceAsc,
            SortArg::PriceDesc => SortOrder::PriceDesc,
        }
    }
}
