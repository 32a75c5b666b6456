use crate::domain::email::EmailAddress;
use crate::domain::ids::ParticipantId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub email: EmailAddress,
    pub created_at: i64,
    pub source: Option<String>,
}

impl Participant {
    pub fn new(now_utc: i64, email: EmailAddress, source: Option<&str>) -> Self {
        Self {
            id: ParticipantId::new(),
            email,
            created_at: now_utc,
            source: source.map(str::to_string),
        }
    }
}

pub fn normalize_source(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        return Err(CoreError::InvalidSource);
    }
    Ok(trimmed.to_string())
}
