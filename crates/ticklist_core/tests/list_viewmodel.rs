use std::sync::mpsc;
use std::time::{Duration, Instant};
use ticklist_core::{TodoItem, TodoListViewModel, TodoStore};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn add_todo_inserts_one_item_and_resets_input() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    let (focus_tx, focus_rx) = mpsc::channel();
    vm.reset_focus_event().subscribe(move |()| {
        let _ = focus_tx.send(());
    });
    let (list_tx, list_rx) = mpsc::channel();
    vm.todos().subscribe(move |items: &Vec<TodoItem>| {
        let _ = list_tx.send(items.clone());
    });

    vm.set_new_todo_title("NYT Task");
    vm.add_todo();

    focus_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(vm.new_todo_title().get(), "");

    let items = wait_until(&list_rx, |items| items.len() == 1);
    assert_eq!(items[0].title, "NYT Task");
    assert!(!items[0].completed);
    assert_eq!(items[0].completed_at, None);
}

#[test]
fn add_todo_with_blank_title_signals_validation_error_without_storage_calls() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    let (error_tx, error_rx) = mpsc::channel();
    vm.error_event().subscribe(move |message: String| {
        let _ = error_tx.send(message);
    });
    let (list_tx, list_rx) = mpsc::channel();
    vm.todos().subscribe(move |items: &Vec<TodoItem>| {
        let _ = list_tx.send(items.clone());
    });

    vm.set_new_todo_title("   ");
    vm.add_todo();

    let message = error_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(message, "The todo title cannot be empty.");
    assert!(error_rx.try_recv().is_err());

    // A follow-up valid add is the only row that ever lands in storage.
    vm.set_new_todo_title("real task");
    vm.add_todo();
    let items = wait_until(&list_rx, |items| !items.is_empty());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "real task");
}

#[test]
fn delete_all_empties_the_live_list() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    let (list_tx, list_rx) = mpsc::channel();
    vm.todos().subscribe(move |items: &Vec<TodoItem>| {
        let _ = list_tx.send(items.clone());
    });

    for title in ["one", "two", "three"] {
        vm.set_new_todo_title(title);
        vm.add_todo();
    }
    wait_until(&list_rx, |items| items.len() == 3);

    vm.delete_all_todos();
    wait_until(&list_rx, |items| items.is_empty());
}

#[test]
fn search_returns_live_matches_in_list_order() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    let (list_tx, list_rx) = mpsc::channel();
    vm.todos().subscribe(move |items: &Vec<TodoItem>| {
        let _ = list_tx.send(items.clone());
    });
    for title in ["abcd", "xabcx", "xyz"] {
        vm.set_new_todo_title(title);
        vm.add_todo();
    }
    wait_until(&list_rx, |items| items.len() == 3);

    let hits = vm.search_todos("abc");
    let (hits_tx, hits_rx) = mpsc::channel();
    hits.subscribe(move |items: &Vec<TodoItem>| {
        let _ = hits_tx.send(items.clone());
    });

    let matches = wait_until(&hits_rx, |items| items.len() == 2);
    let titles: Vec<_> = matches.iter().map(|item| item.title.as_str()).collect();
    // Both matches are open, so newest id wins.
    assert_eq!(titles, vec!["xabcx", "abcd"]);
}

#[test]
fn search_on_a_dead_store_degrades_to_error_signal_and_static_empty_list() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());
    drop(store);

    let (error_tx, error_rx) = mpsc::channel();
    vm.error_event().subscribe(move |message: String| {
        let _ = error_tx.send(message);
    });

    let hits = vm.search_todos("anything");
    assert!(hits.get().is_empty());
    let message = error_rx.recv_timeout(WAIT).unwrap();
    assert!(message.starts_with("Failed to search todo items:"));
}

#[test]
fn item_click_navigates_exactly_once_to_an_attached_observer() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    let (nav_tx, nav_rx) = mpsc::channel();
    vm.navigate_to_todo().subscribe(move |id| {
        let _ = nav_tx.send(id);
    });

    vm.on_todo_item_clicked(5);
    assert_eq!(nav_rx.recv_timeout(WAIT).unwrap(), 5);
    assert!(nav_rx.try_recv().is_err());
}

#[test]
fn consumed_navigation_is_not_replayed_to_late_observers() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    vm.on_todo_item_clicked(5);
    vm.on_todo_item_navigated();

    let (nav_tx, nav_rx) = mpsc::channel();
    vm.navigate_to_todo().subscribe(move |id| {
        let _ = nav_tx.send(id);
    });
    assert!(nav_rx.try_recv().is_err());
}

#[test]
fn pending_title_changes_are_re_emitted_to_observers() {
    let store = TodoStore::open_in_memory().unwrap();
    let vm = TodoListViewModel::new(store.handle());

    let (title_tx, title_rx) = mpsc::channel();
    vm.new_todo_title().subscribe(move |title: &String| {
        let _ = title_tx.send(title.clone());
    });
    assert_eq!(title_rx.recv_timeout(WAIT).unwrap(), "");

    vm.set_new_todo_title("restored after rotation");
    assert_eq!(
        title_rx.recv_timeout(WAIT).unwrap(),
        "restored after rotation"
    );
}

fn wait_until<T>(rx: &mpsc::Receiver<T>, ready: impl Fn(&T) -> bool) -> T {
    let deadline = Instant::now() + WAIT;
    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .expect("timed out waiting for a live view update");
        let value = rx
            .recv_timeout(remaining)
            .expect("timed out waiting for a live view update");
        if ready(&value) {
            return value;
        }
    }
}
