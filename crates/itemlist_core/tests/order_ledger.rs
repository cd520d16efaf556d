use itemlist_core::db::open_db_in_memory;
use itemlist_core::{
    CatalogStore, Item, ItemId, OrderLedger, OrderOrigin, OrderRepository, OrderWrite,
    RepoError, RepoResult, SqliteOrderRepository,
};
use std::cell::Cell;

fn ids(values: &[&str]) -> Vec<ItemId> {
    values.iter().map(|value| value.to_string()).collect()
}

fn catalog(values: &[&str]) -> CatalogStore {
    CatalogStore::try_new(
        values
            .iter()
            .map(|id| Item::new(*id, format!("Name {id}"), format!("{id}@x.io"), ""))
            .collect(),
    )
    .unwrap()
}

fn sqlite_repo() -> SqliteOrderRepository {
    SqliteOrderRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

/// Repository whose writes always fail.
struct FailingRepo {
    saves: Cell<usize>,
}

impl OrderRepository for FailingRepo {
    fn load_order(&self) -> RepoResult<Option<Vec<ItemId>>> {
        Ok(None)
    }

    fn save_order(&self, _ids: &[ItemId]) -> RepoResult<()> {
        self.saves.set(self.saves.get() + 1);
        Err(RepoError::InvalidData("disk full".to_string()))
    }
}

#[test]
fn load_defaults_to_identity_order_when_nothing_persisted() {
    let ledger = OrderLedger::load(sqlite_repo(), &catalog(&["1", "2", "3"]));
    assert_eq!(ledger.current(), ids(&["1", "2", "3"]).as_slice());
    assert_eq!(ledger.origin(), OrderOrigin::Identity);
}

#[test]
fn load_treats_empty_record_as_missing() {
    let repo = sqlite_repo();
    repo.save_order(&[]).unwrap();

    let ledger = OrderLedger::load(repo, &catalog(&["1", "2"]));
    assert_eq!(ledger.current(), ids(&["1", "2"]).as_slice());
    assert_eq!(ledger.origin(), OrderOrigin::Identity);
}

#[test]
fn load_restores_persisted_order() {
    let repo = sqlite_repo();
    repo.save_order(&ids(&["3", "1"])).unwrap();

    let ledger = OrderLedger::load(repo, &catalog(&["1", "2", "3"]));
    assert_eq!(ledger.current(), ids(&["3", "1"]).as_slice());
    assert_eq!(ledger.origin(), OrderOrigin::Persisted);
}

#[test]
fn load_falls_back_to_identity_on_corrupt_record() {
    let repo = sqlite_repo();
    repo.connection()
        .execute(
            "INSERT INTO order_ledger (id, ids_json) VALUES (1, 'not json');",
            [],
        )
        .unwrap();

    let ledger = OrderLedger::load(repo, &catalog(&["1", "2"]));
    assert_eq!(ledger.current(), ids(&["1", "2"]).as_slice());
}

#[test]
fn replace_sets_order_exactly() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), ids(&["1", "2", "3"]));

    let outcome = ledger.replace(ids(&["2", "9", "1"]));
    assert_eq!(outcome, OrderWrite::Applied { persisted: true });
    assert_eq!(ledger.current(), ids(&["2", "9", "1"]).as_slice());
}

#[test]
fn replace_drops_repeated_ids() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), Vec::new());
    ledger.replace(ids(&["2", "1", "2"]));
    assert_eq!(ledger.current(), ids(&["2", "1"]).as_slice());
}

#[test]
fn scoped_splice_anchors_block_at_first_member() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), ids(&["a", "b", "c", "d"]));

    let outcome = ledger.scoped_splice(ids(&["c", "a"]), "scope");
    assert_eq!(outcome, OrderWrite::Applied { persisted: true });
    assert_eq!(ledger.current(), ids(&["c", "a", "b", "d"]).as_slice());
}

#[test]
fn scoped_splice_keeps_unmatched_items_in_place() {
    let mut ledger =
        OrderLedger::with_order(sqlite_repo(), ids(&["x", "a", "y", "b", "z", "c"]));

    ledger.scoped_splice(ids(&["c", "b", "a"]), "scope");
    assert_eq!(
        ledger.current(),
        ids(&["x", "c", "b", "a", "y", "z"]).as_slice()
    );
}

#[test]
fn scoped_splice_is_noop_when_no_id_present() {
    let repo = sqlite_repo();
    let mut ledger = OrderLedger::with_order(repo, ids(&["a", "b"]));

    let outcome = ledger.scoped_splice(ids(&["q", "r"]), "scope");
    assert_eq!(outcome, OrderWrite::Unchanged);
    assert_eq!(ledger.current(), ids(&["a", "b"]).as_slice());
    assert_eq!(ledger.repository().load_order().unwrap(), None);
}

#[test]
fn scoped_splice_inserts_new_ids_at_anchor() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), ids(&["a", "b", "c"]));

    ledger.scoped_splice(ids(&["new", "b"]), "scope");
    assert_eq!(ledger.current(), ids(&["a", "new", "b", "c"]).as_slice());
}

#[test]
fn apply_dispatches_on_scope() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), ids(&["a", "b", "c", "d"]));

    ledger.apply(ids(&["d", "b"]), "term");
    assert_eq!(ledger.current(), ids(&["a", "d", "b", "c"]).as_slice());

    ledger.apply(ids(&["c"]), "");
    assert_eq!(ledger.current(), ids(&["c"]).as_slice());
}

#[test]
fn mutations_are_persisted() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), ids(&["a", "b", "c"]));
    ledger.scoped_splice(ids(&["c", "a"]), "scope");

    assert_eq!(
        ledger.repository().load_order().unwrap(),
        Some(ids(&["c", "a", "b"]))
    );
}

#[test]
fn persistence_failure_keeps_memory_state() {
    let repo = FailingRepo {
        saves: Cell::new(0),
    };
    let mut ledger = OrderLedger::with_order(repo, ids(&["a", "b"]));

    let outcome = ledger.replace(ids(&["b", "a"]));
    assert_eq!(outcome, OrderWrite::Applied { persisted: false });
    assert_eq!(ledger.current(), ids(&["b", "a"]).as_slice());

    ledger.scoped_splice(ids(&["a"]), "scope");
    assert_eq!(ledger.repository().saves.get(), 2);
}

#[test]
fn with_order_reports_explicit_origin() {
    let ledger = OrderLedger::with_order(sqlite_repo(), ids(&["2", "1", "2"]));

    assert_eq!(ledger.origin(), OrderOrigin::Explicit);
    assert_eq!(ledger.current(), ids(&["2", "1"]).as_slice());
}

#[test]
fn snapshot_is_not_affected_by_later_writes() {
    let mut ledger = OrderLedger::with_order(sqlite_repo(), ids(&["a", "b", "c", "d"]));
    let before = ledger.snapshot();

    ledger.scoped_splice(ids(&["c", "a"]), "scope");
    let after_splice = ledger.snapshot();
    ledger.replace(ids(&["z"]));

    assert_eq!(*before, ids(&["a", "b", "c", "d"]));
    assert_eq!(*after_splice, ids(&["c", "a", "b", "d"]));
    assert_eq!(ledger.current(), ids(&["z"]).as_slice());
}
