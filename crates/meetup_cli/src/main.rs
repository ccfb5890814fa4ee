//! Command-line calling layer for the meetup core.
//!
//! # Responsibility
//! - Resolve the acting user from `--as` / `MEETUP_USER_ID`.
//! - Invoke one core operation per subcommand and print JSON results.
//! - Map failures to a message on stderr and a kind-specific exit code.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use meetup_core::db::open_db;
use meetup_core::{
    core_version, default_log_level, init_logging, normalize_page, ErrorKind, EventId,
    EventRepository, NewEvent, NewUser, ProfileService, RelationshipOutcome,
    RelationshipService, SearchConfig, SearchService, SqliteEventRepository,
    SqliteUserRepository, UserId, UserRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "meetup", version, about = "Meetup users, events and relationships")]
struct Args {
    /// SQLite database file
    #[arg(long, env = "MEETUP_DB", default_value = "meetup.db")]
    db: PathBuf,

    /// Absolute directory for rotating log files; logging is off when unset
    #[arg(long, env = "MEETUP_LOG_DIR")]
    log_dir: Option<String>,

    #[arg(long, env = "MEETUP_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long, env = "MEETUP_PAGE_SIZE", default_value_t = meetup_core::config::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    #[arg(long, env = "MEETUP_MAX_DISTANCE", default_value_t = meetup_core::config::DEFAULT_SEARCH_MAX_DISTANCE)]
    max_distance: usize,

    /// Acting user id
    #[arg(long = "as", env = "MEETUP_USER_ID")]
    acting_user: Option<UserId>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a user
    Register {
        nickname: String,
        first_name: String,
        last_name: String,
        email: String,
    },
    /// Create an event; `date` is RFC 3339, e.g. 2024-05-01T18:00:00Z
    CreateEvent {
        title: String,
        date: DateTime<Utc>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    SearchUsers {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        query: Option<String>,
    },
    SearchEvents {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        query: Option<String>,
    },
    /// Become friends with another user (both sides)
    Befriend { friend_id: UserId },
    /// End a friendship (both sides)
    Unfriend { friend_id: UserId },
    Attend { event_id: EventId },
    Leave { event_id: EventId },
    /// Show a user with friends and events; defaults to the acting user
    Profile { user_id: Option<UserId> },
    /// Show an event with its attendees
    Event { event_id: EventId },
    Version,
}

/// Failure surfaced to the shell.
struct CliFailure {
    kind: Option<ErrorKind>,
    message: String,
}

impl CliFailure {
    fn plain(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
        }
    }

    fn exit_code(&self) -> u8 {
        match self.kind {
            None => 1,
            Some(ErrorKind::NotFound) => 3,
            Some(ErrorKind::Conflict) => 4,
            Some(ErrorKind::Validation) => 5,
            Some(ErrorKind::DataAccess) => 6,
        }
    }
}

macro_rules! kinded {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CliFailure {
                fn from(err: $ty) -> Self {
                    Self {
                        kind: Some(err.kind()),
                        message: err.to_string(),
                    }
                }
            }
        )*
    };
}

kinded!(
    meetup_core::RepoError,
    meetup_core::SearchError,
    meetup_core::RelationshipError,
    meetup_core::ProfileError,
);

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            log::error!(
                "event=cli_command module=cli status=error exit_code={}",
                failure.exit_code()
            );
            eprintln!("error: {}", failure.message);
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(args: Args) -> Result<(), CliFailure> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| CliFailure::plain(err.to_string()))?;
    }

    if matches!(args.command, Command::Version) {
        println!("meetup {}", core_version());
        return Ok(());
    }

    let config = SearchConfig::new(args.page_size, args.max_distance)
        .map_err(|err| CliFailure::plain(err.to_string()))?;
    let conn = open_db(&args.db).map_err(|err| CliFailure::plain(err.to_string()))?;

    match args.command {
        Command::Register {
            nickname,
            first_name,
            last_name,
            email,
        } => {
            let user = users(&conn)?.create_user(&NewUser::new(
                nickname, first_name, last_name, email,
            ))?;
            print_json(&user)
        }
        Command::CreateEvent {
            title,
            date,
            description,
            location,
        } => {
            let event =
                events(&conn)?.create_event(&NewEvent::new(title, description, location, date))?;
            print_json(&event)
        }
        Command::SearchUsers { page, query } => {
            let search = SearchService::new(users(&conn)?, events(&conn)?, config);
            print_json(&search.search_users(normalize_page(page), query.as_deref())?)
        }
        Command::SearchEvents { page, query } => {
            let search = SearchService::new(users(&conn)?, events(&conn)?, config);
            print_json(&search.search_events(normalize_page(page), query.as_deref())?)
        }
        Command::Befriend { friend_id } => {
            let me = acting_user(args.acting_user)?;
            let outcome = coordinator(&conn)?.establish_friendship(me, friend_id)?;
            report(outcome, "friendship established", "already friends")
        }
        Command::Unfriend { friend_id } => {
            let me = acting_user(args.acting_user)?;
            let outcome = coordinator(&conn)?.dissolve_friendship(me, friend_id)?;
            report(outcome, "friendship removed", "not friends")
        }
        Command::Attend { event_id } => {
            let me = acting_user(args.acting_user)?;
            let outcome = coordinator(&conn)?.add_attendance(me, event_id)?;
            report(outcome, "attending event", "already attending")
        }
        Command::Leave { event_id } => {
            let me = acting_user(args.acting_user)?;
            let outcome = coordinator(&conn)?.remove_attendance(me, event_id)?;
            report(outcome, "left event", "not attending")
        }
        Command::Profile { user_id } => {
            let id = match user_id {
                Some(id) => id,
                None => acting_user(args.acting_user)?,
            };
            let profiles = ProfileService::new(users(&conn)?, events(&conn)?);
            print_json(&profiles.user_profile(id)?)
        }
        Command::Event { event_id } => {
            let profiles = ProfileService::new(users(&conn)?, events(&conn)?);
            print_json(&profiles.event_details(event_id)?)
        }
        Command::Version => Ok(()),
    }
}

fn users(conn: &Connection) -> Result<SqliteUserRepository<'_>, CliFailure> {
    Ok(SqliteUserRepository::try_new(conn)?)
}

fn events(conn: &Connection) -> Result<SqliteEventRepository<'_>, CliFailure> {
    Ok(SqliteEventRepository::try_new(conn)?)
}

/// Each invocation has its own lock registry; cross-process writers are
/// serialized by the store transaction.
fn coordinator(
    conn: &Connection,
) -> Result<RelationshipService<SqliteUserRepository<'_>>, CliFailure> {
    Ok(RelationshipService::new(users(conn)?))
}

fn acting_user(acting_user: Option<UserId>) -> Result<UserId, CliFailure> {
    acting_user.ok_or_else(|| CliFailure::plain("no acting user; pass --as or set MEETUP_USER_ID"))
}

fn report(outcome: RelationshipOutcome, applied: &str, unchanged: &str) -> Result<(), CliFailure> {
    let message = if outcome.is_applied() {
        applied
    } else {
        unchanged
    };
    println!("{message}");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliFailure> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliFailure::plain(format!("failed to encode output: {err}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let not_found = CliFailure {
            kind: Some(ErrorKind::NotFound),
            message: String::new(),
        };
        let conflict = CliFailure {
            kind: Some(ErrorKind::Conflict),
            message: String::new(),
        };
        assert_eq!(not_found.exit_code(), 3);
        assert_eq!(conflict.exit_code(), 4);
        assert_eq!(CliFailure::plain("boom").exit_code(), 1);
    }

    #[test]
    fn acting_user_is_required_for_mutations() {
        assert!(acting_user(None).is_err());
        assert_eq!(acting_user(Some(7)).ok(), Some(7));
    }

    #[test]
    fn args_read_subcommand_and_identity() {
        let args = Args::try_parse_from([
            "meetup", "--db", "/tmp/x.db", "--as", "4", "befriend", "9",
        ])
        .unwrap();
        assert_eq!(args.acting_user, Some(4));
        assert!(matches!(args.command, Command::Befriend { friend_id: 9 }));
    }

    #[test]
    fn search_page_defaults_to_first() {
        let args = Args::try_parse_from(["meetup", "search-users", "--query", "bob"]).unwrap();
        match args.command {
            Command::SearchUsers { page, query } => {
                assert_eq!(normalize_page(page), 1);
                assert_eq!(query.as_deref(), Some("bob"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
