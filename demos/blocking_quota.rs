use textbelt::blocking::TextbeltClient;
use textbelt::config::ClientConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let client = TextbeltClient::from_async(config.build_client()?)?;

    let quota = client.check_quota()?;
    println!("quota_remaining: {}", quota.quota_remaining);

    Ok(())
}
