//! Message sender: send one text message and report the outcome through the log.

use serde::Serialize;

use crate::client::{FeishuClient, FeishuError};
use crate::domain::{CreateMessage, MessageText, ReceiveId, ReceiveIdType, SendOutcome};

/// Send `message` as a `text` message to `receive_id`.
///
/// On success the response `data` is logged at `info` level as pretty JSON. When
/// the server rejects the message (non-zero `code`), one `error` line with the
/// code, message and log id is written and [`SendOutcome::Rejected`] is
/// returned; this is not an `Err`.
///
/// Errors:
/// - [`FeishuError::Validation`] if `receive_id` or `message` is empty,
/// - [`FeishuError::Auth`] if the credentials are rejected by the token endpoint,
/// - any other non-API [`FeishuError`] from the client (transport, HTTP status, parse).
pub async fn send_text_message(
    client: &FeishuClient,
    receive_id_type: ReceiveIdType,
    receive_id: impl Into<String>,
    message: impl Into<String>,
) -> Result<SendOutcome, FeishuError> {
    let request = CreateMessage::text(
        receive_id_type,
        ReceiveId::new(receive_id)?,
        MessageText::new(message)?,
    );

    match client.create_message(request).await {
        Ok(response) => {
            log::info!("{}", pretty_json(&response.data));
            Ok(SendOutcome::Sent(response))
        }
        Err(FeishuError::Api(failure)) => {
            log::error!("im.v1.message.create failed, {failure}");
            Ok(SendOutcome::Rejected(failure))
        }
        Err(err) => Err(err),
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => value.to_string(),
    }
}
