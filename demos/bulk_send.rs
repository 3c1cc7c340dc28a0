use std::time::Duration;

use textbelt::config::ClientConfig;
use textbelt::{BulkRequest, BulkSendError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = ClientConfig::from_env()?.build_client()?;
    let phones = std::env::var("TEXTBELT_PHONES")
        .map_err(|_| "TEXTBELT_PHONES (comma separated) is required")?;
    let phones = phones.split(',').map(str::trim).collect::<Vec<_>>();

    let request = BulkRequest::shared(phones, "Hello from the textbelt bulk demo.")
        .batch_size(10)
        .delay(Duration::from_millis(500));

    let report = match client.send_bulk(&request).await {
        Ok(report) => report,
        Err(BulkSendError::RateLimited { retry_after, partial }) => {
            eprintln!("rate limited (retry after {retry_after:?})");
            *partial
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "sent {}/{} (failed {}, skipped {})",
        report.successful_messages(),
        report.total_messages(),
        report.failed_messages(),
        report.skipped_messages()
    );
    for (phone, error) in report.errors() {
        println!("  {phone}: {error}");
    }

    Ok(())
}
