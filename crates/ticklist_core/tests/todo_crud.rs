use ticklist_core::db::open_db_in_memory;
use ticklist_core::{RepoError, SqliteTodoRepository, TodoItem, TodoRepository};

#[test]
fn insert_assigns_id_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let id = repo.insert(&TodoItem::new("buy milk")).unwrap();

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.title, "buy milk");
    assert!(!loaded.completed);
    assert_eq!(loaded.completed_at, None);
}

#[test]
fn insert_with_existing_id_replaces_the_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let id = repo.insert(&TodoItem::new("draft")).unwrap();

    let mut replacement = TodoItem::new("final");
    replacement.id = Some(id);
    replacement.completed = true;
    replacement.completed_at = Some(1_000);
    let replaced_id = repo.insert(&replacement).unwrap();
    assert_eq!(replaced_id, id);

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.title, "final");
    assert!(loaded.completed);
    assert_eq!(loaded.completed_at, Some(1_000));
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

#[test]
fn storage_accepts_blank_titles() {
    // The non-empty rule lives at the state-holder boundary, not here.
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let id = repo.insert(&TodoItem::new("")).unwrap();
    assert_eq!(repo.get_by_id(id).unwrap().unwrap().title, "");
}

#[test]
fn update_overwrites_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let id = repo.insert(&TodoItem::new("draft")).unwrap();
    let mut item = repo.get_by_id(id).unwrap().unwrap();
    item.title = "updated".to_string();
    item.completed = true;
    item.completed_at = Some(2_000);
    repo.update(&item).unwrap();

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.title, "updated");
    assert!(loaded.completed);
    assert_eq!(loaded.completed_at, Some(2_000));
}

#[test]
fn update_of_absent_row_is_a_silent_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let mut ghost = TodoItem::new("ghost");
    ghost.id = Some(404);
    repo.update(&ghost).unwrap();
    assert!(repo.get_by_id(404).unwrap().is_none());
}

#[test]
fn update_without_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let err = repo.update(&TodoItem::new("never inserted")).unwrap_err();
    assert!(matches!(err, RepoError::MissingId));
}

#[test]
fn delete_removes_row_and_tolerates_absent_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let id = repo.insert(&TodoItem::new("temp")).unwrap();
    repo.delete(id).unwrap();
    assert!(repo.get_by_id(id).unwrap().is_none());

    repo.delete(id).unwrap();
}

#[test]
fn delete_all_empties_the_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    repo.insert(&TodoItem::new("one")).unwrap();
    repo.insert(&TodoItem::new("two")).unwrap();
    repo.insert(&TodoItem::new("three")).unwrap();

    repo.delete_all().unwrap();
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn list_orders_open_items_first_then_completion_time_then_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let open_a = repo.insert(&TodoItem::new("open a")).unwrap();
    let done_early = repo.insert(&completed_item("done early", 100)).unwrap();
    let open_b = repo.insert(&TodoItem::new("open b")).unwrap();
    let done_late = repo.insert(&completed_item("done late", 200)).unwrap();

    let listed = repo.list_all().unwrap();
    let ids: Vec<_> = listed.iter().map(|item| item.id.unwrap()).collect();
    assert_eq!(ids, vec![open_b, open_a, done_late, done_early]);

    let first_completed = listed.iter().position(|item| item.completed).unwrap();
    assert!(listed[..first_completed].iter().all(|item| !item.completed));
    assert!(listed[first_completed..].iter().all(|item| item.completed));
}

#[test]
fn list_breaks_completion_time_ties_by_id_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let first = repo.insert(&completed_item("tied first", 500)).unwrap();
    let second = repo.insert(&completed_item("tied second", 500)).unwrap();

    let ids: Vec<_> = repo
        .list_all()
        .unwrap()
        .iter()
        .map(|item| item.id.unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn search_matches_title_substrings_and_preserves_ordering() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    let exact = repo.insert(&TodoItem::new("abcd")).unwrap();
    let infix = repo.insert(&TodoItem::new("xabcx")).unwrap();
    repo.insert(&TodoItem::new("xyz")).unwrap();

    let hits = repo.search("abc").unwrap();
    let ids: Vec<_> = hits.iter().map(|item| item.id.unwrap()).collect();
    assert_eq!(ids, vec![infix, exact]);
}

#[test]
fn search_with_empty_pattern_returns_everything() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::new(&conn);

    repo.insert(&TodoItem::new("one")).unwrap();
    repo.insert(&TodoItem::new("two")).unwrap();

    assert_eq!(repo.search("").unwrap().len(), 2);
}

fn completed_item(title: &str, completed_at: i64) -> TodoItem {
    let mut item = TodoItem::new(title);
    item.completed = true;
    item.completed_at = Some(completed_at);
    item
}
