use std::io::{self, BufRead, Write};

use textbelt::config::{ClientConfig, env_var};
use textbelt::{E164Phone, GenerateOtp, MessageText, OtpCode, UserId, VerifyOtp};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = ClientConfig::from_env()?.build_client()?;
    let phone = E164Phone::new(env_var("TEXTBELT_PHONE")?)?;
    let user_id = UserId::new("demo-user")?;

    let request = GenerateOtp::new(phone, user_id.clone())
        .message(MessageText::new("Your demo code is $OTP")?);
    let generated = client.generate_otp(&request).await?;
    println!("code sent, quota_remaining: {}", generated.quota_remaining);

    print!("enter code: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let verified = client
        .verify_otp(&VerifyOtp::new(OtpCode::new(line.trim())?, user_id))
        .await?;
    println!("valid: {}", verified.is_valid_otp);

    Ok(())
}
