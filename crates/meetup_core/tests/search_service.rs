use chrono::{TimeZone, Utc};
use meetup_core::db::open_db_in_memory;
use meetup_core::{
    paginate, EventRepository, NewEvent, NewUser, SearchConfig, SearchService,
    SqliteEventRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::Connection;

fn seed_users(conn: &Connection, nicknames: &[&str]) {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    for nickname in nicknames {
        repo.create_user(&NewUser::new(
            *nickname,
            "Test",
            "User",
            format!("{nickname}@example.com"),
        ))
        .unwrap();
    }
}

fn service(
    conn: &Connection,
    config: SearchConfig,
) -> SearchService<SqliteUserRepository<'_>, SqliteEventRepository<'_>> {
    SearchService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteEventRepository::try_new(conn).unwrap(),
        config,
    )
}

fn nicknames(users: Vec<meetup_core::User>) -> Vec<String> {
    users.into_iter().map(|user| user.nickname).collect()
}

#[test]
fn no_query_matches_plain_pagination_of_store_order() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["zed", "alice", "bob", "carol", "dave"]);
    let config = SearchConfig::new(2, 2).unwrap();
    let search = service(&conn, config);

    let all = SqliteUserRepository::try_new(&conn)
        .unwrap()
        .list_users()
        .unwrap();
    for page in 1..=4 {
        let expected = paginate(all.clone(), page, config.page_size());
        assert_eq!(search.search_users(page, None).unwrap(), expected);
        assert_eq!(search.search_users(page, Some("")).unwrap(), expected);
    }
}

#[test]
fn exact_nickname_ranks_first() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alicia", "bob", "alice", "alina"]);
    let search = service(&conn, SearchConfig::default());

    let found = nicknames(search.search_users(1, Some("alice")).unwrap());
    assert_eq!(found.first().map(String::as_str), Some("alice"));
    assert!(!found.contains(&"bob".to_string()));
}

#[test]
fn query_is_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["Alice", "bob"]);
    let search = service(&conn, SearchConfig::default());

    assert_eq!(
        nicknames(search.search_users(1, Some("aLiCe")).unwrap()),
        vec!["Alice"]
    );
}

#[test]
fn email_field_is_searched() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let search = service(&conn, SearchConfig::default());

    assert_eq!(
        nicknames(search.search_users(1, Some("bob@example.co")).unwrap()),
        vec!["bob"]
    );
}

#[test]
fn equal_scores_keep_store_order() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["rob", "bob", "cob"]);
    let search = service(&conn, SearchConfig::default());

    assert_eq!(
        nicknames(search.search_users(1, Some("xob")).unwrap()),
        vec!["rob", "bob", "cob"]
    );
}

#[test]
fn far_queries_return_nothing() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let search = service(&conn, SearchConfig::default());

    assert!(search
        .search_users(1, Some("completely different"))
        .unwrap()
        .is_empty());
}

#[test]
fn events_match_by_title_or_iso_date() {
    let conn = open_db_in_memory().unwrap();
    let events = SqliteEventRepository::try_new(&conn).unwrap();
    let meetup = events
        .create_event(&NewEvent::new(
            "Rust meetup",
            "talks",
            "Berlin",
            Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
        ))
        .unwrap();
    let picnic = events
        .create_event(&NewEvent::new(
            "Picnic",
            "food",
            "Park",
            Utc.with_ymd_and_hms(2024, 7, 14, 12, 0, 0).unwrap(),
        ))
        .unwrap();
    let search = service(&conn, SearchConfig::default());

    let by_title = search.search_events(1, Some("rust meetp")).unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, meetup.id);

    let by_date = search
        .search_events(1, Some("2024-07-14T12:00:00.000Z"))
        .unwrap();
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date[0].id, picnic.id);

    let unfiltered = search.search_events(1, None).unwrap();
    let ids: Vec<_> = unfiltered.iter().map(|event| event.id).collect();
    assert_eq!(ids, vec![meetup.id, picnic.id]);
}

#[test]
fn page_past_results_is_empty() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let search = service(&conn, SearchConfig::new(10, 2).unwrap());

    assert!(search.search_users(100, None).unwrap().is_empty());
    assert!(search.search_users(100, Some("alice")).unwrap().is_empty());
}
