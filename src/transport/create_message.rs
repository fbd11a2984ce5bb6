use serde::{Deserialize, Serialize};

use crate::domain::{CreateMessage, CreateMessageResponse, MessageContent, ReceiveIdType};
use crate::transport::envelope::{ErrorDetail, Reply, TransportError, failure};

pub const CREATE_MESSAGE_PATH: &str = "/open-apis/im/v1/messages";

#[derive(Debug, Serialize)]
struct CreateMessageJsonRequest<'a> {
    receive_id: &'a str,
    msg_type: &'static str,
    /// JSON object serialized into a string, as the API expects.
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateMessageJsonResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

pub fn encode_create_message_query(request: &CreateMessage) -> Vec<(String, String)> {
    vec![(
        ReceiveIdType::FIELD.to_owned(),
        request.receive_id_type().as_str().to_owned(),
    )]
}

pub fn encode_create_message_body(
    request: &CreateMessage,
) -> Result<serde_json::Value, TransportError> {
    let content = match request.content() {
        MessageContent::Text(text) => serde_json::to_string(&TextContent {
            text: text.as_str(),
        })?,
    };

    Ok(serde_json::to_value(CreateMessageJsonRequest {
        receive_id: request.receive_id().as_str(),
        msg_type: request.content().msg_type(),
        content,
        uuid: request.uuid().map(|uuid| uuid.as_str()),
    })?)
}

pub fn decode_create_message_response(
    json: &str,
) -> Result<Reply<CreateMessageResponse>, TransportError> {
    let parsed: CreateMessageJsonResponse = serde_json::from_str(json)?;
    if parsed.code != 0 {
        return Ok(Reply::Failure(failure(parsed.code, parsed.msg, parsed.error)));
    }

    let data = parsed.data.unwrap_or_default();
    let message_id = data
        .get("message_id")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);

    Ok(Reply::Success(CreateMessageResponse {
        log_id: parsed.error.and_then(|detail| detail.log_id),
        message_id,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{ApiCode, MessageText, ReceiveId, RequestUuid};

    use super::*;

    fn text_request(kind: ReceiveIdType, id: &str, text: &str) -> CreateMessage {
        CreateMessage::text(
            kind,
            ReceiveId::new(id).unwrap(),
            MessageText::new(text).unwrap(),
        )
    }

    #[test]
    fn encode_chat_message_query_and_body() {
        let request = text_request(ReceiveIdType::ChatId, "oc_test", "hello");

        assert_eq!(
            encode_create_message_query(&request),
            vec![("receive_id_type".to_owned(), "chat_id".to_owned())]
        );
        assert_eq!(
            encode_create_message_body(&request).unwrap(),
            json!({
                "receive_id": "oc_test",
                "msg_type": "text",
                "content": "{\"text\":\"hello\"}"
            })
        );
    }

    #[test]
    fn encoded_content_round_trips_text_exactly() {
        let samples = [
            "hello",
            "  padded  ",
            "quote \" and \\ slash",
            "你好，这是一条测试消息",
            "line\nbreak",
        ];
        for text in samples {
            let body =
                encode_create_message_body(&text_request(ReceiveIdType::OpenId, "ou_1", text))
                    .unwrap();
            assert_eq!(body["msg_type"], "text");
            let content: serde_json::Value =
                serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
            assert_eq!(content, json!({ "text": text }));
        }
    }

    #[test]
    fn encode_includes_uuid_only_when_set() {
        let request = text_request(ReceiveIdType::Email, "a@example.com", "hi");
        let body = encode_create_message_body(&request).unwrap();
        assert!(body.get("uuid").is_none());

        let request = request.with_uuid(RequestUuid::new("req-42").unwrap());
        let body = encode_create_message_body(&request).unwrap();
        assert_eq!(body["uuid"], "req-42");
    }

    #[test]
    fn decode_success_keeps_data_and_message_id() {
        let json = r#"
        {
          "code": 0,
          "msg": "success",
          "data": {
            "message_id": "om_1",
            "chat_id": "oc_test",
            "msg_type": "text"
          }
        }
        "#;

        let Reply::Success(response) = decode_create_message_response(json).unwrap() else {
            panic!("expected success");
        };
        assert_eq!(response.message_id.as_deref(), Some("om_1"));
        assert_eq!(response.data["chat_id"], "oc_test");
        assert_eq!(response.log_id, None);
    }

    #[test]
    fn decode_failure_reads_log_id_from_error_block() {
        let json = r#"
        {
          "code": 230002,
          "msg": "Bot/User can NOT be out of the chat.",
          "error": { "log_id": "20240101ABC" }
        }
        "#;

        let Reply::Failure(failure) = decode_create_message_response(json).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(failure.code, ApiCode::new(230002));
        assert_eq!(failure.msg, "Bot/User can NOT be out of the chat.");
        assert_eq!(failure.log_id.as_deref(), Some("20240101ABC"));
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(matches!(
            decode_create_message_response("<html>bad gateway</html>"),
            Err(TransportError::Json(_))
        ));
    }
}
