use listkeep_core::db::open_db_in_memory;
use listkeep_core::repo::sqlite::SqliteAssociationStore;
use listkeep_core::{
    AssociationError, AssociationKey, AssociationService, AssociationStore, ErrorKind, Item,
    ItemService, List, ListService, NewItem, NewList, SqliteStorage,
};
use rusqlite::Connection;
use std::collections::BTreeSet;
use uuid::Uuid;

struct Fixture<'conn> {
    lists: ListService<SqliteStorage<'conn>>,
    items: ItemService<SqliteStorage<'conn>>,
    associations: AssociationService<SqliteStorage<'conn>>,
}

impl<'conn> Fixture<'conn> {
    fn new(conn: &'conn Connection) -> Self {
        let storage = SqliteStorage::try_new(conn).unwrap();
        Self {
            lists: ListService::new(storage),
            items: ItemService::new(storage),
            associations: AssociationService::new(storage),
        }
    }

    fn list(&self, owner: &str, name: &str) -> List {
        self.lists.create_list(owner, &NewList::named(name)).unwrap()
    }

    fn item(&self, owner: &str, name: &str) -> Item {
        self.items.create_item(owner, &NewItem::named(name)).unwrap()
    }
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM list_items;", [], |row| row.get(0))
        .unwrap()
}

/// More pairs than one statement could bind at two variables each.
const WIDE_FAN_OUT: usize = 17_000;

fn seed_lists(conn: &Connection, owner: &str, count: usize) -> Vec<Uuid> {
    let tx = conn.unchecked_transaction().unwrap();
    let mut ids = Vec::with_capacity(count);
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO lists (id, name, owner, created_by, updated_by)
                 VALUES (?1, ?2, ?3, ?3, ?3);",
            )
            .unwrap();
        for n in 0..count {
            let id = Uuid::new_v4();
            stmt.execute(rusqlite::params![id.to_string(), format!("List {n:05}"), owner])
                .unwrap();
            ids.push(id);
        }
    }
    tx.commit().unwrap();
    ids
}

#[test]
fn associating_milk_with_groceries_counts_one() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");

    let outcome = fx
        .associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();

    assert_eq!(outcome.message, "Assigned item 'Milk' to list 'Groceries'");
    assert_eq!(outcome.content.component.id, milk.id);
    assert_eq!(outcome.content.associated.len(), 1);
    assert_eq!(outcome.content.associated[0].id, groceries.id);
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        1
    );
}

#[test]
fn foreign_item_is_reported_as_not_found() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let eggs = fx.item("bob", "Eggs");

    let err = fx
        .associations
        .create_for_item(eggs.id, "alice", &[groceries.id])
        .unwrap_err();
    assert!(matches!(err, AssociationError::ItemNotFound(id) if id == eggs.id));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = fx
        .associations
        .create_for_list(groceries.id, "alice", &[eggs.id])
        .unwrap_err();
    assert!(matches!(err, AssociationError::ItemsNotFound(ref ids) if ids == &vec![eggs.id]));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = fx
        .associations
        .create_for_item(eggs.id, "bob", &[groceries.id])
        .unwrap_err();
    assert!(matches!(err, AssociationError::ListsNotFound(ref ids) if ids == &vec![groceries.id]));

    assert_eq!(row_count(&conn), 0);
}

#[test]
fn second_identical_association_already_exists() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");

    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();
    let err = fx
        .associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap_err();

    assert!(matches!(err, AssociationError::AlreadyAssociated { .. }));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        1
    );
}

#[test]
fn moving_milk_to_pantry_reports_names_and_counts() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();

    let outcome = fx
        .associations
        .move_item(milk.id, groceries.id, pantry.id, "alice")
        .unwrap();

    assert_eq!(outcome.content.item_name, "Milk");
    assert_eq!(outcome.content.current_list_name, "Groceries");
    assert_eq!(outcome.content.destination_list_name, "Pantry");
    assert_eq!(
        outcome.message,
        "Moved item 'Milk' from list 'Groceries' to list 'Pantry'"
    );
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        0
    );
    assert_eq!(fx.associations.count_for_list(pantry.id, "alice").unwrap(), 1);
}

#[test]
fn bulk_delete_after_list_removal_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();

    // Before the list is removed the bulk delete succeeds.
    let pantry = fx.list("alice", "Pantry");
    let empty = fx
        .associations
        .delete_all_for_list(pantry.id, "alice")
        .unwrap();
    assert_eq!(empty.content.deleted_count, 0);

    fx.lists.delete_list(groceries.id, "alice").unwrap();

    let err = fx
        .associations
        .delete_all_for_list(groceries.id, "alice")
        .unwrap_err();
    assert!(matches!(err, AssociationError::ListNotFound(id) if id == groceries.id));
    assert_eq!(fx.associations.count_for_item(milk.id, "alice").unwrap(), 0);
}

#[test]
fn bulk_associate_with_unknown_lists_names_every_missing_id() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let milk = fx.item("alice", "Milk");
    let missing: BTreeSet<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let requested: Vec<Uuid> = missing.iter().copied().collect();

    let err = fx
        .associations
        .create_for_item(milk.id, "alice", &requested)
        .unwrap_err();

    match err {
        AssociationError::ListsNotFound(ids) => {
            assert_eq!(ids, missing.into_iter().collect::<Vec<_>>());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn partial_fan_out_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[pantry.id])
        .unwrap();

    let err = fx
        .associations
        .create_for_item(milk.id, "alice", &[groceries.id, pantry.id])
        .unwrap_err();

    assert!(matches!(err, AssociationError::AlreadyAssociated { .. }));
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        0
    );
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn fan_out_creates_one_row_per_distinct_list() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let pantry = fx.list("alice", "Pantry");
    let bakery = fx.list("alice", "Bakery");
    let garden = fx.list("alice", "Garden");
    let milk = fx.item("alice", "Milk");

    let outcome = fx
        .associations
        .create_for_item(milk.id, "alice", &[pantry.id, bakery.id, garden.id, pantry.id])
        .unwrap();

    assert_eq!(outcome.message, "Assigned item 'Milk' to 3 lists.");
    let names: Vec<&str> = outcome
        .content
        .associated
        .iter()
        .map(|succinct| succinct.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bakery", "Garden", "Pantry"]);
    assert_eq!(fx.associations.count_for_item(milk.id, "alice").unwrap(), 3);
}

#[test]
fn create_for_list_fans_out_over_items() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");
    let eggs = fx.item("alice", "Eggs");

    let outcome = fx
        .associations
        .create_for_list(groceries.id, "alice", &[milk.id, eggs.id])
        .unwrap();

    assert_eq!(outcome.message, "Assigned list 'Groceries' to 2 items.");
    assert_eq!(outcome.content.associated[0].name, "Eggs");
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        2
    );
}

#[test]
fn empty_selection_is_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let milk = fx.item("alice", "Milk");

    let err = fx
        .associations
        .create_for_item(milk.id, "alice", &[])
        .unwrap_err();
    assert!(matches!(err, AssociationError::EmptySelection));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn delete_one_removes_exactly_that_association() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id, pantry.id])
        .unwrap();

    let outcome = fx
        .associations
        .delete_one(milk.id, groceries.id, "alice")
        .unwrap();
    assert_eq!(outcome.message, "Removed item 'Milk' from list 'Groceries'");
    assert_eq!(fx.associations.count_for_item(milk.id, "alice").unwrap(), 1);

    let err = fx
        .associations
        .delete_one(milk.id, groceries.id, "alice")
        .unwrap_err();
    assert!(matches!(
        err,
        AssociationError::AssociationNotFound { item_id, list_id }
            if item_id == milk.id && list_id == groceries.id
    ));
}

#[test]
fn delete_all_for_list_leaves_other_lists_alone() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");
    let eggs = fx.item("alice", "Eggs");
    fx.associations
        .create_for_list(groceries.id, "alice", &[milk.id, eggs.id])
        .unwrap();
    fx.associations
        .create_for_list(pantry.id, "alice", &[milk.id])
        .unwrap();

    let outcome = fx
        .associations
        .delete_all_for_list(groceries.id, "alice")
        .unwrap();

    assert_eq!(outcome.content.deleted_count, 2);
    assert_eq!(outcome.message, "Removed 2 items from list 'Groceries'.");
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        0
    );
    assert_eq!(fx.associations.count_for_list(pantry.id, "alice").unwrap(), 1);
}

#[test]
fn delete_all_for_item_reports_singular_count() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();

    let outcome = fx
        .associations
        .delete_all_for_item(milk.id, "alice")
        .unwrap();
    assert_eq!(outcome.message, "Removed item 'Milk' from 1 list.");

    let outcome = fx
        .associations
        .delete_all_for_item(milk.id, "alice")
        .unwrap();
    assert_eq!(outcome.content.deleted_count, 0);
}

#[test]
fn move_there_and_back_restores_original_key() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();

    fx.associations
        .move_item(milk.id, groceries.id, pantry.id, "alice")
        .unwrap();
    assert_eq!(fx.associations.count_for_item(milk.id, "alice").unwrap(), 1);
    fx.associations
        .move_item(milk.id, pantry.id, groceries.id, "alice")
        .unwrap();

    let lists = fx.associations.lists_for_item(milk.id, "alice").unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, groceries.id);
}

#[test]
fn move_to_same_list_is_a_noop_success() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id])
        .unwrap();

    let outcome = fx
        .associations
        .move_item(milk.id, groceries.id, groceries.id, "alice")
        .unwrap();

    assert_eq!(outcome.content.destination_list_name, "Groceries");
    assert_eq!(
        fx.associations.count_for_list(groceries.id, "alice").unwrap(),
        1
    );
}

#[test]
fn move_onto_existing_association_fails_and_keeps_both_rows() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");
    fx.associations
        .create_for_item(milk.id, "alice", &[groceries.id, pantry.id])
        .unwrap();

    let err = fx
        .associations
        .move_item(milk.id, groceries.id, pantry.id, "alice")
        .unwrap_err();

    match &err {
        AssociationError::MoveFailed { source, .. } => {
            assert!(matches!(**source, AssociationError::AlreadyAssociated { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fx.associations.count_for_item(milk.id, "alice").unwrap(), 2);
}

#[test]
fn move_without_association_is_not_found_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let milk = fx.item("alice", "Milk");

    let err = fx
        .associations
        .move_item(milk.id, groceries.id, pantry.id, "alice")
        .unwrap_err();
    assert!(matches!(err, AssociationError::AssociationNotFound { .. }));

    let err = fx
        .associations
        .move_item(milk.id, groceries.id, Uuid::new_v4(), "alice")
        .unwrap_err();
    assert!(matches!(err, AssociationError::ListNotFound(_)));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn counts_match_a_full_scan() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let pantry = fx.list("alice", "Pantry");
    let items: Vec<Uuid> = ["Milk", "Eggs", "Flour"]
        .iter()
        .map(|name| fx.item("alice", name).id)
        .collect();
    fx.associations
        .create_for_list(groceries.id, "alice", &items)
        .unwrap();
    fx.associations
        .create_for_list(pantry.id, "alice", &items[..1])
        .unwrap();

    for list_id in [groceries.id, pantry.id] {
        let scanned: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM list_items WHERE list_id = ?1;",
                [list_id.to_string()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(
            fx.associations.count_for_list(list_id, "alice").unwrap(),
            u64::try_from(scanned).unwrap()
        );
    }
}

#[test]
fn counts_for_foreign_entities_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let groceries = fx.list("alice", "Groceries");
    let milk = fx.item("alice", "Milk");

    assert!(matches!(
        fx.associations.count_for_list(groceries.id, "bob").unwrap_err(),
        AssociationError::ListNotFound(_)
    ));
    assert!(matches!(
        fx.associations.count_for_item(milk.id, "bob").unwrap_err(),
        AssociationError::ItemNotFound(_)
    ));
}

#[test]
fn fan_out_wider_than_one_statement_creates_every_pair() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let milk = fx.item("alice", "Milk");
    let list_ids = seed_lists(&conn, "alice", WIDE_FAN_OUT);

    let outcome = fx
        .associations
        .create_for_item(milk.id, "alice", &list_ids)
        .unwrap();

    assert_eq!(outcome.message, "Assigned item 'Milk' to 17000 lists.");
    assert_eq!(outcome.content.associated.len(), WIDE_FAN_OUT);
    assert_eq!(outcome.content.associated[0].name, "List 00000");
    assert_eq!(outcome.content.associated[WIDE_FAN_OUT - 1].name, "List 16999");
    assert_eq!(
        fx.associations.count_for_item(milk.id, "alice").unwrap(),
        17_000
    );
    assert_eq!(row_count(&conn), 17_000);
}

#[test]
fn unknown_ids_beyond_one_statement_are_all_reported_missing() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let milk = fx.item("alice", "Milk");
    let missing: Vec<Uuid> = (0..40_000).map(|_| Uuid::new_v4()).collect();

    let err = fx
        .associations
        .create_for_item(milk.id, "alice", &missing)
        .unwrap_err();

    match err {
        AssociationError::ListsNotFound(ids) => assert_eq!(ids.len(), 40_000),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn conflict_in_the_last_chunk_rolls_back_the_whole_fan_out() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let milk = fx.item("alice", "Milk");
    let list_ids = seed_lists(&conn, "alice", WIDE_FAN_OUT);
    let last = list_ids.iter().copied().max().unwrap();
    fx.associations
        .create_for_item(milk.id, "alice", &[last])
        .unwrap();

    let err = fx
        .associations
        .create_for_item(milk.id, "alice", &list_ids)
        .unwrap_err();

    assert!(matches!(err, AssociationError::AlreadyAssociated { .. }));
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn store_insert_outside_a_transaction_is_still_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let milk = fx.item("alice", "Milk");
    let list_ids = seed_lists(&conn, "alice", 1_200);
    let last = list_ids.iter().copied().max().unwrap();
    fx.associations
        .create_for_item(milk.id, "alice", &[last])
        .unwrap();
    let pairs: BTreeSet<AssociationKey> = list_ids
        .iter()
        .map(|list_id| AssociationKey::new(*list_id, milk.id))
        .collect();

    let store = SqliteAssociationStore::new(&conn);
    assert!(store.create_many(&pairs).is_err());
    assert_eq!(row_count(&conn), 1);

    let rest: BTreeSet<AssociationKey> = pairs
        .iter()
        .copied()
        .filter(|pair| pair.list_id != last)
        .collect();
    assert_eq!(store.create_many(&rest).unwrap().len(), 1_199);
    assert_eq!(row_count(&conn), 1_200);
}
