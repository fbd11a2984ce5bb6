//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{CreateMessage, MessageContent};
pub use response::{ApiFailure, CreateMessageResponse, SendOutcome};
pub use validation::ValidationError;
pub use value::{
    ApiCode, AppId, AppSecret, KnownApiCode, MessageText, ReceiveId, ReceiveIdType, RequestUuid,
    TenantAccessToken,
};
