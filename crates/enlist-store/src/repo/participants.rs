use crate::error::{Result, StoreError};
use enlist_core::domain::{EmailAddress, Participant, ParticipantId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;

pub struct ParticipantsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ParticipantsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns `None` when the email is already registered.
    pub fn insert(
        &self,
        now_utc: i64,
        email: &EmailAddress,
        source: Option<&str>,
    ) -> Result<Option<Participant>> {
        let participant = Participant::new(now_utc, email.clone(), source);
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO participants (id, email, created_at, source)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                participant.id.to_string(),
                participant.email.as_str(),
                participant.created_at,
                participant.source
            ],
        )?;
        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(participant))
    }

    pub fn exists_by_email(&self, email: &EmailAddress) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM participants WHERE email = ?1;",
                [email.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, created_at, source FROM participants WHERE email = ?1;",
        )?;
        let mut rows = stmt.query([email.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(participant_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> Result<Vec<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, created_at, source
             FROM participants
             ORDER BY created_at ASC, email ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut participants = Vec::new();
        while let Some(row) = rows.next()? {
            participants.push(participant_from_row(row)?);
        }
        Ok(participants)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM participants;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn participant_from_row(row: &Row<'_>) -> Result<Participant> {
    let id_str: String = row.get(0)?;
    let id = ParticipantId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let email_str: String = row.get(1)?;
    let email = EmailAddress::parse(&email_str)?;
    Ok(Participant {
        id,
        email,
        created_at: row.get(2)?,
        source: row.get(3)?,
    })
}
