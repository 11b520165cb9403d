use recipe_indexer::{crawl_and_index, IndexerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let config = IndexerConfig::load()?;
    println!("Crawling {}", config.crawl.listing_url);

    let report = crawl_and_index(config).await?;
    println!(
        "Found {} recipe links, indexed {}, {} failed",
        report.links, report.stored, report.failures
    );

    match report.search {
        Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        None => println!("Could not query the search backend"),
    }

    Ok(())
}
