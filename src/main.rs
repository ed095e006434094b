use clap::Parser;
use classifieds_scraper::{Search, SearchRequest};
use std::error::Error;
use std::time::Duration;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let request = SearchRequest::new(
        &args.product,
        args.min_price,
        args.max_price,
        args.sort.into(),
        args.region,
    )?;

    ::log::info!("Starting search for: {}", request.product_name());

    let mut search = Search::new(request);
    if let Some(path) = args.config {
        ::log::info!("Loading configuration from file: {}", path);
        search = search.with_config_file(path)?;
    }
    if let Some(concurrency) = args.concurrency {
        search = search.with_max_concurrency(concurrency);
    }
    if let Some(total_timeout) = args.total_timeout {
        search = search.with_total_timeout(Duration::from_secs(total_timeout));
    }

    ::log::info!(
        "Rendering pages through WebDriver at {} (override with WEBDRIVER_URL)",
        search.config().browser.webdriver_url
    );

    let start_time = std::time::Instant::now();
    let listings = search.run().await?;

    ::log::info!(
        "Search complete - {} listings in {:.2} seconds",
        listings.len(),
        start_time.elapsed().as_secs_f64()
    );

    println!("{}", serde_json::to_string_pretty(&listings)?);
    Ok(())
}
