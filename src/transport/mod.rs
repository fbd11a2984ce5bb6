//! Transport layer: wire-format details (serialization/deserialization).

mod auth;
mod create_message;
mod envelope;

pub use auth::{TENANT_ACCESS_TOKEN_PATH, decode_tenant_token_response, encode_tenant_token_body};
pub use create_message::{
    CREATE_MESSAGE_PATH, decode_create_message_response, encode_create_message_body,
    encode_create_message_query,
};
pub use envelope::{Reply, TransportError};
