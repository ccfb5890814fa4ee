//! Event repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Events are read-only from the relationship side; attendance is written
//!   through `UserRepository::save_user`.
//! - `list_events` returns store order (`id ASC`) without attendees.

use crate::model::event::{Event, EventId, EventRelations, NewEvent};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    location,
    date_ms
FROM events";

/// Repository interface for event records.
pub trait EventRepository {
    /// Validates and inserts one event, returning the stored record.
    fn create_event(&self, event: &NewEvent) -> RepoResult<Event>;
    /// Loads one event with the requested relations.
    fn get_event(&self, id: EventId, relations: EventRelations) -> RepoResult<Option<Event>>;
    /// Lists every event in store order, attendees not loaded.
    fn list_events(&self) -> RepoResult<Vec<Event>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &NewEvent) -> RepoResult<Event> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (title, description, location, date_ms)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                event.title.as_str(),
                event.description.as_str(),
                event.location.as_str(),
                event.date.timestamp_millis(),
            ],
        )?;

        Ok(Event {
            id: self.conn.last_insert_rowid(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date,
            users: None,
        })
    }

    fn get_event(&self, id: EventId, relations: EventRelations) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut event = parse_event_row(row)?;
        if relations.users {
            event.users = Some(load_attendee_ids(self.conn, id)?);
        }
        Ok(Some(event))
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let date_ms: i64 = row.get("date_ms")?;
    let date = DateTime::<Utc>::from_timestamp_millis(date_ms).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid date_ms value `{date_ms}` in events.date_ms"))
    })?;

    Ok(Event {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        location: row.get("location")?,
        date,
        users: None,
    })
}

fn load_attendee_ids(conn: &Connection, event_id: EventId) -> RepoResult<BTreeSet<UserId>> {
    let mut stmt = conn.prepare("SELECT user_id FROM user_events WHERE event_id = ?1;")?;
    let ids = stmt
        .query_map([event_id], |row| row.get::<_, UserId>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(ids)
}
