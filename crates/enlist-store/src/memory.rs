//! In-memory participant store for tests and dry runs.

use crate::error::{Result, StoreError};
use enlist_core::registration::{register_each, Inserted, ParticipantStore, RegistrationMeta};
use enlist_core::{normalize_email, BulkResult, EmailAddress, Participant};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Default)]
pub struct MemoryParticipantStore {
    participants: RefCell<BTreeMap<EmailAddress, Participant>>,
    unavailable: Option<String>,
    rejected: HashSet<String>,
}

impl MemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch call fails with [`StoreError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Inserts of this email, once normalized, fail without failing the batch.
    pub fn reject(mut self, email: &str) -> Self {
        self.rejected.insert(normalize_email(email));
        self
    }

    pub fn seed(&self, participants: impl IntoIterator<Item = Participant>) {
        let mut map = self.participants.borrow_mut();
        for participant in participants {
            map.entry(participant.email.clone()).or_insert(participant);
        }
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.participants.borrow().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.participants.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.borrow().is_empty()
    }
}

impl ParticipantStore for MemoryParticipantStore {
    type Error = StoreError;

    fn exists_by_email(&self, email: &EmailAddress) -> Result<bool> {
        Ok(self.participants.borrow().contains_key(email))
    }

    fn insert_participant(
        &self,
        meta: RegistrationMeta<'_>,
        email: &EmailAddress,
    ) -> Result<Inserted> {
        if self.rejected.contains(email.as_str()) {
            return Err(StoreError::Unavailable(format!(
                "write rejected for {}",
                email
            )));
        }
        let mut participants = self.participants.borrow_mut();
        if participants.contains_key(email) {
            return Ok(Inserted::AlreadyExists);
        }
        let participant = Participant::new(meta.now_utc, email.clone(), meta.source);
        participants.insert(email.clone(), participant.clone());
        Ok(Inserted::Added(participant))
    }

    fn bulk_add_registered_emails(
        &self,
        meta: RegistrationMeta<'_>,
        emails: &[String],
    ) -> Result<BulkResult> {
        if let Some(reason) = &self.unavailable {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(register_each(self, meta, emails))
    }
}
