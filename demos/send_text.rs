use std::io;

use textbelt::config::ClientConfig;
use textbelt::{E164Phone, MessageText, SendText};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let phone_raw = std::env::var("TEXTBELT_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTBELT_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("TEXTBELT_MESSAGE")
        .unwrap_or_else(|_| "Hello from the textbelt demo.".to_owned());

    let client = config.build_client()?;
    let request = SendText::new(E164Phone::new(phone_raw)?, MessageText::new(message)?);

    // TEXTBELT_TEST=1 uses the test key: nothing is delivered and no quota is spent.
    let response = if std::env::var("TEXTBELT_TEST").is_ok_and(|v| v == "1") {
        client.send_test(&request).await?
    } else {
        client.send_text(&request).await?
    };
    println!(
        "text_id: {:?}, quota_remaining: {}",
        response.text_id.as_ref().map(|id| id.as_str()),
        response.quota_remaining
    );

    if let Some(text_id) = response.text_id {
        let status = client.check_status(&text_id).await?;
        println!("status: {}", status.status.as_str());
    }

    Ok(())
}
