use std::time::Duration;

use vn_restricted_rs::FeedClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    vn_restricted_rs::init_tracing();

    // 1. Default endpoints, a tighter HTTP timeout, and both sources crawled side by side.
    let client = FeedClient::builder()
        .timeout(Duration::from_secs(15))
        .concurrent_sources(true)
        .build()?;

    // 2. One aggregation run, serialized the way an HTTP endpoint would return it.
    let result = client.run_aggregation().await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    eprintln!(
        "{} records, generated at {}",
        result.metadata.total, result.metadata.generated_at
    );
    Ok(())
}
