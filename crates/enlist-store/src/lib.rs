pub mod db;
pub mod error;
pub mod memory;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::{Result, StoreError};
use enlist_core::registration::{register_each, Inserted, ParticipantStore, RegistrationMeta};
use enlist_core::{BulkResult, EmailAddress};
use rusqlite::Connection;
use std::path::Path;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = db::open_read_only(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn participants(&self) -> repo::ParticipantsRepo<'_> {
        repo::ParticipantsRepo::new(&self.conn)
    }

    /// Fails when the schema is behind or ahead of this build's migrations.
    pub fn ensure_migrated(&self) -> Result<()> {
        let current = self.schema_version()?;
        let latest = migrate::latest_version();
        if current != latest {
            return Err(StoreError::Migration(format!(
                "db version {} does not match expected {}",
                current, latest
            )));
        }
        Ok(())
    }
}

impl ParticipantStore for Store {
    type Error = StoreError;

    fn exists_by_email(&self, email: &EmailAddress) -> Result<bool> {
        self.participants().exists_by_email(email)
    }

    fn insert_participant(
        &self,
        meta: RegistrationMeta<'_>,
        email: &EmailAddress,
    ) -> Result<Inserted> {
        let inserted = self
            .participants()
            .insert(meta.now_utc, email, meta.source)?;
        Ok(match inserted {
            Some(participant) => Inserted::Added(participant),
            None => Inserted::AlreadyExists,
        })
    }

    fn bulk_add_registered_emails(
        &self,
        meta: RegistrationMeta<'_>,
        emails: &[String],
    ) -> Result<BulkResult> {
        self.ensure_migrated()?;
        Ok(register_each(self, meta, emails))
    }
}
