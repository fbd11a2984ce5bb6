use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    UnknownReceiveIdType { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::UnknownReceiveIdType { input } => write!(
                f,
                "unknown receive_id_type: {input} (expected open_id, user_id, union_id, email or chat_id)"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
