//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/save over `users` and its link tables.
//! - Load relationship sets selectively (`UserRelations`).
//!
//! # Invariants
//! - `list_users` returns store order (`id ASC`) without relations.
//! - `save_user` rewrites only relations that are `Some`.
//! - `save_users` persists all records in one transaction or none.
//! - `apply_links` checks endpoints and edits link rows inside one
//!   `IMMEDIATE` transaction, so concurrent writers never lose a link.

use crate::model::event::EventId;
use crate::model::user::{NewUser, User, UserId, UserRelations};
use crate::repo::{ensure_connection_ready, EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

const USER_SELECT_SQL: &str = "SELECT
    id,
    nickname,
    first_name,
    last_name,
    email
FROM users";

/// One link-row mutation applied by [`UserRepository::apply_links`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    AddFriend { user_id: UserId, friend_id: UserId },
    RemoveFriend { user_id: UserId, friend_id: UserId },
    AddAttendance { user_id: UserId, event_id: EventId },
    RemoveAttendance { user_id: UserId, event_id: EventId },
}

/// Repository interface for user records.
pub trait UserRepository {
    /// Validates and inserts one user, returning the stored record.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    /// Loads one user with the requested relationship sets.
    fn get_user(&self, id: UserId, relations: UserRelations) -> RepoResult<Option<User>>;
    /// Lists every user in store order, relations not loaded.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Persists one user record.
    fn save_user(&self, user: &User) -> RepoResult<()>;
    /// Persists several user records atomically.
    fn save_users(&self, users: &[&User]) -> RepoResult<()>;
    /// Applies link changes in one transaction against the current rows.
    ///
    /// Returns, per change, whether a row was inserted or deleted.
    ///
    /// # Errors
    /// - `NotFound` when `user_id` is missing, or the friend/event of an
    ///   add is missing. Nothing is applied then.
    fn apply_links(&self, changes: &[LinkChange]) -> RepoResult<Vec<bool>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (nickname, first_name, last_name, email)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.nickname.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.email.as_str(),
            ],
        )?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            nickname: user.nickname.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            friends: None,
            events: None,
        })
    }

    fn get_user(&self, id: UserId, relations: UserRelations) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut user = parse_user_row(row)?;
        if relations.friends {
            user.friends = Some(load_friend_ids(self.conn, id)?);
        }
        if relations.events {
            user.events = Some(load_event_ids(self.conn, id)?);
        }
        Ok(Some(user))
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn save_user(&self, user: &User) -> RepoResult<()> {
        self.save_users(&[user])
    }

    fn save_users(&self, users: &[&User]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for user in users {
            write_user(&tx, user)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn apply_links(&self, changes: &[LinkChange]) -> RepoResult<Vec<bool>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let applied = changes
            .iter()
            .map(|change| apply_link(&tx, *change))
            .collect::<RepoResult<Vec<_>>>()?;
        tx.commit()?;
        Ok(applied)
    }
}

fn apply_link(tx: &Transaction<'_>, change: LinkChange) -> RepoResult<bool> {
    let changed = match change {
        LinkChange::AddFriend { user_id, friend_id } => {
            ensure_exists(tx, EntityRef::User(user_id))?;
            ensure_exists(tx, EntityRef::User(friend_id))?;
            tx.execute(
                "INSERT OR IGNORE INTO user_friends (user_id, friend_id) VALUES (?1, ?2);",
                params![user_id, friend_id],
            )?
        }
        LinkChange::RemoveFriend { user_id, friend_id } => {
            ensure_exists(tx, EntityRef::User(user_id))?;
            tx.execute(
                "DELETE FROM user_friends WHERE user_id = ?1 AND friend_id = ?2;",
                params![user_id, friend_id],
            )?
        }
        LinkChange::AddAttendance { user_id, event_id } => {
            ensure_exists(tx, EntityRef::User(user_id))?;
            ensure_exists(tx, EntityRef::Event(event_id))?;
            tx.execute(
                "INSERT OR IGNORE INTO user_events (user_id, event_id) VALUES (?1, ?2);",
                params![user_id, event_id],
            )?
        }
        LinkChange::RemoveAttendance { user_id, event_id } => {
            ensure_exists(tx, EntityRef::User(user_id))?;
            tx.execute(
                "DELETE FROM user_events WHERE user_id = ?1 AND event_id = ?2;",
                params![user_id, event_id],
            )?
        }
    };
    Ok(changed > 0)
}

fn ensure_exists(tx: &Transaction<'_>, entity: EntityRef) -> RepoResult<()> {
    let (sql, id) = match entity {
        EntityRef::User(id) => ("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);", id),
        EntityRef::Event(id) => ("SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1);", id),
    };
    let exists: bool = tx.query_row(sql, [id], |row| row.get(0))?;
    if !exists {
        return Err(RepoError::NotFound(entity));
    }
    Ok(())
}

fn write_user(tx: &Transaction<'_>, user: &User) -> RepoResult<()> {
    let changed = tx.execute(
        "UPDATE users
         SET
            nickname = ?2,
            first_name = ?3,
            last_name = ?4,
            email = ?5,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1;",
        params![
            user.id,
            user.nickname.as_str(),
            user.first_name.as_str(),
            user.last_name.as_str(),
            user.email.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound(EntityRef::User(user.id)));
    }

    if let Some(friends) = user.friends.as_ref() {
        tx.execute("DELETE FROM user_friends WHERE user_id = ?1;", [user.id])?;
        for friend_id in friends {
            tx.execute(
                "INSERT INTO user_friends (user_id, friend_id) VALUES (?1, ?2);",
                params![user.id, friend_id],
            )?;
        }
    }

    if let Some(events) = user.events.as_ref() {
        tx.execute("DELETE FROM user_events WHERE user_id = ?1;", [user.id])?;
        for event_id in events {
            tx.execute(
                "INSERT INTO user_events (user_id, event_id) VALUES (?1, ?2);",
                params![user.id, event_id],
            )?;
        }
    }

    Ok(())
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        nickname: row.get("nickname")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        friends: None,
        events: None,
    })
}

fn load_friend_ids(conn: &Connection, user_id: UserId) -> RepoResult<BTreeSet<UserId>> {
    let mut stmt = conn.prepare("SELECT friend_id FROM user_friends WHERE user_id = ?1;")?;
    let ids = stmt
        .query_map([user_id], |row| row.get::<_, UserId>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(ids)
}

fn load_event_ids(conn: &Connection, user_id: UserId) -> RepoResult<BTreeSet<EventId>> {
    let mut stmt = conn.prepare("SELECT event_id FROM user_events WHERE user_id = ?1;")?;
    let ids = stmt
        .query_map([user_id], |row| row.get::<_, EventId>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(ids)
}
