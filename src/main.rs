use anyhow::{Context, Result};
use bq_rows::{Client, QueryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let credentials = std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
        .context("GOOGLE_APPLICATION_CREDENTIALS must point to an authorized user secret json")?;
    let project_id = std::env::var("BQ_PROJECT_ID").context("BQ_PROJECT_ID must be set")?;
    let query = std::env::args()
        .nth(1)
        .context("usage: bq_rows '<sql query>'")?;

    let client = Client::new(&credentials).await?;
    let job = client.post_query(&project_id, query).await?;
    let mut results = job.query_results(QueryConfig::default()).await?;

    println!("columns: {:?}", results.get_columns()?);
    while results.has_next() {
        let row = results.next().await?;
        println!("{:?}", row);
    }
    let info = results.result_info();
    println!(
        "{} rows, {} bytes processed, cache hit: {}",
        info.total_rows, info.total_bytes_processed, info.cache_hit
    );
    Ok(())
}
