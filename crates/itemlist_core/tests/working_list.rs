use itemlist_core::{Item, ItemId, ItemPage, LoadOutcome, WorkingList};

fn item(id: &str) -> Item {
    Item::new(id, format!("Name {id}"), format!("{id}@x.io"), "")
}

fn page(ids: &[&str], total: usize) -> ItemPage {
    ItemPage {
        total,
        items: ids.iter().map(|id| item(id)).collect(),
    }
}

fn order(ids: &[&str]) -> Vec<ItemId> {
    ids.iter().map(|id| id.to_string()).collect()
}

type Fetched = Result<(ItemPage, Vec<ItemId>), String>;

#[test]
fn begin_load_is_single_flight() {
    let mut list = WorkingList::new(2);
    let ticket = list.begin_load().expect("first load should start");
    assert_eq!((ticket.offset, ticket.limit), (0, 2));
    assert!(list.begin_load().is_none());

    let fetched: Fetched = Ok((page(&["1", "2"], 5), Vec::new()));
    list.complete_load(&ticket, fetched);
    assert!(!list.is_loading());

    let next = list.begin_load().expect("guard should be released");
    assert_eq!(next.offset, 2);
}

#[test]
fn repeated_loads_with_same_order_never_duplicate() {
    let mut list = WorkingList::new(2);
    let server_order = order(&["3", "1"]);

    let first = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["3", "1"], 4), server_order.clone()));
    assert_eq!(
        list.complete_load(&first, fetched),
        LoadOutcome::Merged { added: 2 }
    );

    let second = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["1", "2"], 4), server_order));
    assert_eq!(
        list.complete_load(&second, fetched),
        LoadOutcome::Merged { added: 1 }
    );

    assert_eq!(list.ids(), vec!["3", "1", "2"]);
}

#[test]
fn merge_resorts_whole_list_against_order() {
    let mut list = WorkingList::new(3);

    let first = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["1", "2", "3"], 6), Vec::new()));
    list.complete_load(&first, fetched);

    let second = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["4", "5", "6"], 6), order(&["5", "2"])));
    list.complete_load(&second, fetched);

    assert_eq!(list.ids(), vec!["5", "2", "1", "3", "4", "6"]);
    assert!(!list.has_more());
    assert_eq!(list.cursor(), 2);
}

#[test]
fn has_more_tracks_cursor_against_total() {
    let mut list = WorkingList::new(2);
    let ticket = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["1", "2"], 3), Vec::new()));
    list.complete_load(&ticket, fetched);
    assert!(list.has_more());

    let ticket = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["3"], 3), Vec::new()));
    list.complete_load(&ticket, fetched);
    assert!(!list.has_more());
    assert!(list.begin_load().is_none());
}

#[test]
fn failed_load_releases_guard_without_advancing() {
    let mut list = WorkingList::new(2);
    let ticket = list.begin_load().unwrap();

    let fetched: Fetched = Err("connection refused".to_string());
    assert_eq!(list.complete_load(&ticket, fetched), LoadOutcome::Failed);
    assert!(!list.is_loading());
    assert_eq!(list.cursor(), 0);
    assert_eq!(list.begin_load().map(|ticket| ticket.offset), Some(0));
}

#[test]
fn search_change_resets_and_discards_stale_results() {
    let mut list = WorkingList::new(2);
    let stale = list.begin_load().unwrap();

    assert!(list.set_search("Ann"));
    assert_eq!(list.search(), "ann");
    assert!(list.items().is_empty());
    assert!(!list.is_loading());

    let fresh = list.begin_load().unwrap();
    assert_eq!(fresh.search, "ann");

    let fetched: Fetched = Ok((page(&["1", "2"], 10), Vec::new()));
    assert_eq!(list.complete_load(&stale, fetched), LoadOutcome::Stale);
    assert!(list.items().is_empty());
    assert!(list.is_loading(), "stale result must not release the fresh load");

    let fetched: Fetched = Ok((page(&["7"], 1), Vec::new()));
    list.complete_load(&fresh, fetched);
    assert_eq!(list.ids(), vec!["7"]);
}

#[test]
fn setting_same_search_keeps_state() {
    let mut list = WorkingList::new(2);
    let ticket = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["1"], 5), Vec::new()));
    list.complete_load(&ticket, fetched);

    assert!(!list.set_search(""));
    assert_eq!(list.ids(), vec!["1"]);
}

#[test]
fn reorder_local_moves_and_reports_scope() {
    let mut list = WorkingList::new(4);
    list.set_search("na");
    let ticket = list.begin_load().unwrap();
    let fetched: Fetched = Ok((page(&["1", "2", "3", "4"], 4), Vec::new()));
    list.complete_load(&ticket, fetched);

    let request = list.reorder_local(3, 0).expect("in-range move");
    assert_eq!(list.ids(), vec!["4", "1", "2", "3"]);
    assert_eq!(request.ids, list.ids());
    assert_eq!(request.scope, "na");

    let request = list.reorder_local(0, 99).expect("target is clamped");
    assert_eq!(request.ids, vec!["1", "2", "3", "4"]);

    assert!(list.reorder_local(4, 0).is_none());
}

#[test]
fn abandon_load_releases_only_current_generation() {
    let mut list = WorkingList::new(2);
    let old = list.begin_load().unwrap();
    list.abandon_load(&old);
    assert!(!list.is_loading());

    let old = list.begin_load().unwrap();
    list.set_search("x");
    let fresh = list.begin_load().unwrap();
    list.abandon_load(&old);
    assert!(list.is_loading());
    list.abandon_load(&fresh);
    assert!(!list.is_loading());
}
