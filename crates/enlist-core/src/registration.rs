//! Participant registration against a pluggable store.
//!
//! The store owns existence checks and the add-or-skip decision. A batch
//! call either returns a [`BulkResult`] describing every entry, or fails
//! as a whole; per-entry failures never abort the batch.

use crate::domain::{EmailAddress, Participant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp and provenance applied to every participant created in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationMeta<'a> {
    pub now_utc: i64,
    pub source: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted {
    Added(Participant),
    AlreadyExists,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl BulkResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub trait ParticipantStore {
    type Error: fmt::Display;

    fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, Self::Error>;

    /// Inserts unless a participant with the same normalized email exists.
    fn insert_participant(
        &self,
        meta: RegistrationMeta<'_>,
        email: &EmailAddress,
    ) -> Result<Inserted, Self::Error>;

    /// Registers every entry in order. `Err` means the batch as a whole failed.
    fn bulk_add_registered_emails(
        &self,
        meta: RegistrationMeta<'_>,
        emails: &[String],
    ) -> Result<BulkResult, Self::Error> {
        Ok(register_each(self, meta, emails))
    }
}

pub fn register_each<S>(store: &S, meta: RegistrationMeta<'_>, emails: &[String]) -> BulkResult
where
    S: ParticipantStore + ?Sized,
{
    let mut result = BulkResult::default();
    for raw in emails {
        let email = match EmailAddress::parse(raw) {
            Ok(email) => email,
            Err(err) => {
                result.errors.push(err.to_string());
                continue;
            }
        };
        match store.insert_participant(meta, &email) {
            Ok(Inserted::Added(_)) => result.added += 1,
            Ok(Inserted::AlreadyExists) => result.skipped += 1,
            Err(err) => result.errors.push(format!("{email}: {err}")),
        }
    }
    result
}
