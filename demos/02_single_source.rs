use vn_restricted_rs::{FeedClient, HnxSource, HsxSource, RetryConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    vn_restricted_rs::init_tracing();

    // HOSE: plain HTTP, no browser involved.
    let client = FeedClient::builder()
        .max_pages(5)
        .retry_config(RetryConfig::disabled())
        .build()?;

    let hsx = HsxSource::new(&client);

    let first = hsx.fetch_page(1).await?;
    println!("--- Raw first page: {} rows ---", first.len());
    if let Some(row) = first.first() {
        println!("{:?}", row.cells);
    }
    println!();

    let records = hsx.fetch_records().await?;
    println!("--- {} normalized HOSE records ---", records.len());
    for rec in records.iter().take(10) {
        println!("  {} {:<40} {} {}", rec.ticker, rec.name, rec.date, rec.reason);
    }
    println!();

    // HNX only: launches headless Chromium on first use.
    let hnx = HnxSource::new(&client);
    let rows = hnx.crawl_rows().await?;
    println!("--- {} raw HNX rows ---", rows.len());

    let records = hnx.crawl().await?;
    println!("--- {} normalized HNX records ---", records.len());
    for rec in records.iter().take(10) {
        println!("  {} {:<40} {} {}", rec.ticker, rec.name, rec.date, rec.reason);
    }
    Ok(())
}
