use crate::domain::value::{MessageText, ReceiveId, ReceiveIdType, RequestUuid};

/// Message payload. Only plain text is supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(MessageText),
}

impl MessageContent {
    /// Value of `msg_type` for this payload.
    pub fn msg_type(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMessage {
    receive_id_type: ReceiveIdType,
    receive_id: ReceiveId,
    content: MessageContent,
    uuid: Option<RequestUuid>,
}

impl CreateMessage {
    pub fn new(
        receive_id_type: ReceiveIdType,
        receive_id: ReceiveId,
        content: MessageContent,
    ) -> Self {
        Self {
            receive_id_type,
            receive_id,
            content,
            uuid: None,
        }
    }

    /// Shorthand for a plain text message.
    pub fn text(
        receive_id_type: ReceiveIdType,
        receive_id: ReceiveId,
        text: MessageText,
    ) -> Self {
        Self::new(receive_id_type, receive_id, MessageContent::Text(text))
    }

    /// Attach an idempotency key.
    pub fn with_uuid(mut self, uuid: RequestUuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn receive_id_type(&self) -> ReceiveIdType {
        self.receive_id_type
    }

    pub fn receive_id(&self) -> &ReceiveId {
        &self.receive_id
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn uuid(&self) -> Option<&RequestUuid> {
        self.uuid.as_ref()
    }
}
