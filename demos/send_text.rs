use feishu_im::{Credentials, FeishuClient, ReceiveIdType, SendOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let app_id = std::env::var("APP_ID").map_err(|_| "APP_ID environment variable is required")?;
    let app_secret =
        std::env::var("APP_SECRET").map_err(|_| "APP_SECRET environment variable is required")?;
    let chat_id = std::env::var("FEISHU_CHAT_ID")
        .map_err(|_| "FEISHU_CHAT_ID environment variable is required")?;
    let message = std::env::var("FEISHU_MESSAGE")
        .unwrap_or_else(|_| "Hello from the feishu-im example.".to_owned());

    let client = FeishuClient::new(Credentials::new(app_id, app_secret)?);

    match client
        .send_text_message(ReceiveIdType::ChatId, chat_id, message)
        .await?
    {
        SendOutcome::Sent(response) => {
            println!(
                "message_id: {:?}, log_id: {:?}",
                response.message_id, response.log_id
            );
        }
        SendOutcome::Rejected(failure) => {
            println!(
                "rejected: {failure} (retryable: {}, auth error: {})",
                failure.code.is_retryable(),
                failure.code.is_auth_error()
            );
        }
    }

    Ok(())
}
