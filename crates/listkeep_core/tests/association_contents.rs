use listkeep_core::db::open_db_in_memory;
use listkeep_core::{
    AssociationError, AssociationPatch, AssociationService, ComponentKind, ErrorKind, ItemService,
    ListService, MaintenanceService, NewItem, NewList, ResetSummary, SqliteStorage,
};
use serde_json::json;

#[test]
fn new_associations_start_visible_with_zero_quantity() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let list = ListService::new(storage)
        .create_list("alice", &NewList::named("Groceries"))
        .unwrap();
    let milk = ItemService::new(storage)
        .create_item("alice", &NewItem::named("Milk"))
        .unwrap();
    let associations = AssociationService::new(storage);
    associations
        .create_for_item(milk.id, "alice", &[list.id])
        .unwrap();

    let entries = associations.list_contents(list.id, "alice").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].item.id, milk.id);
    assert_eq!(entries[0].quantity, 0);
    assert!(!entries[0].suppressed);
}

#[test]
fn settings_helpers_update_one_field_each() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let list = ListService::new(storage)
        .create_list("alice", &NewList::named("Groceries"))
        .unwrap();
    let milk = ItemService::new(storage)
        .create_item("alice", &NewItem::named("Milk"))
        .unwrap();
    let associations = AssociationService::new(storage);
    associations
        .create_for_item(milk.id, "alice", &[list.id])
        .unwrap();

    let outcome = associations.set_quantity(milk.id, list.id, "alice", 3).unwrap();
    assert_eq!(outcome.content.quantity, 3);
    assert!(!outcome.content.is_suppressed);
    assert_eq!(outcome.message, "Updated item 'Milk' in list 'Groceries'");

    let outcome = associations
        .set_suppressed(milk.id, list.id, "alice", true)
        .unwrap();
    assert_eq!(outcome.content.quantity, 3);
    assert!(outcome.content.is_suppressed);

    let outcome = associations
        .update_association(milk.id, list.id, "alice", AssociationPatch::default())
        .unwrap();
    assert_eq!(outcome.message, "No changes for item 'Milk' in list 'Groceries'");
    assert_eq!(outcome.content.key().list_id, list.id);
}

#[test]
fn settings_for_missing_association_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let list = ListService::new(storage)
        .create_list("alice", &NewList::named("Groceries"))
        .unwrap();
    let milk = ItemService::new(storage)
        .create_item("alice", &NewItem::named("Milk"))
        .unwrap();

    let err = AssociationService::new(storage)
        .set_quantity(milk.id, list.id, "alice", 2)
        .unwrap_err();
    assert!(matches!(err, AssociationError::AssociationNotFound { .. }));
    assert!(err.kind().is_recoverable());
}

#[test]
fn list_contents_are_sorted_and_keep_suppressed_entries() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let lists = ListService::new(storage);
    let items = ItemService::new(storage);
    let associations = AssociationService::new(storage);

    let groceries = lists.create_list("alice", &NewList::named("Groceries")).unwrap();
    let pantry = lists.create_list("alice", &NewList::named("Pantry")).unwrap();
    let milk = items.create_item("alice", &NewItem::named("Milk")).unwrap();
    let eggs = items.create_item("alice", &NewItem::named("Eggs")).unwrap();
    let flour = items.create_item("alice", &NewItem::named("Flour")).unwrap();
    associations
        .create_for_list(groceries.id, "alice", &[milk.id, eggs.id, flour.id])
        .unwrap();
    associations
        .create_for_item(milk.id, "alice", &[pantry.id])
        .unwrap();
    associations
        .set_suppressed(flour.id, groceries.id, "alice", true)
        .unwrap();

    let entries = associations.list_contents(groceries.id, "alice").unwrap();
    let view: Vec<(&str, bool)> = entries
        .iter()
        .map(|entry| (entry.item.name.as_str(), entry.suppressed))
        .collect();
    assert_eq!(
        view,
        vec![("Eggs", false), ("Flour", true), ("Milk", false)]
    );

    let lists_for_milk = associations.lists_for_item(milk.id, "alice").unwrap();
    let names: Vec<&str> = lists_for_milk
        .iter()
        .map(|succinct| succinct.name.as_str())
        .collect();
    assert_eq!(names, vec!["Groceries", "Pantry"]);
    assert!(lists_for_milk
        .iter()
        .all(|succinct| succinct.kind == ComponentKind::List));

    assert!(matches!(
        associations.list_contents(groceries.id, "bob").unwrap_err(),
        AssociationError::ListNotFound(_)
    ));
}

#[test]
fn purge_all_removes_associations_of_every_owner() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let lists = ListService::new(storage);
    let items = ItemService::new(storage);
    let associations = AssociationService::new(storage);
    for owner in ["alice", "bob"] {
        let list = lists.create_list(owner, &NewList::named("Groceries")).unwrap();
        let item = items.create_item(owner, &NewItem::named("Milk")).unwrap();
        associations.create_for_item(item.id, owner, &[list.id]).unwrap();
    }

    let outcome = MaintenanceService::new(storage).purge_all().unwrap();

    assert_eq!(outcome.content, 2);
    assert_eq!(outcome.message, "Deleted 2 associations.");
    assert_eq!(lists.lists_for_owner("alice").unwrap().len(), 1);
    assert_eq!(items.items_for_owner("bob").unwrap().len(), 1);
}

#[test]
fn reset_reports_counts_for_every_table() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let lists = ListService::new(storage);
    let items = ItemService::new(storage);
    let list = lists.create_list("alice", &NewList::named("Groceries")).unwrap();
    lists.create_list("alice", &NewList::named("Pantry")).unwrap();
    let milk = items.create_item("alice", &NewItem::named("Milk")).unwrap();
    AssociationService::new(storage)
        .create_for_item(milk.id, "alice", &[list.id])
        .unwrap();

    let outcome = MaintenanceService::new(storage).reset().unwrap();

    assert_eq!(
        outcome.content,
        ResetSummary {
            associations: 1,
            items: 1,
            lists: 2,
        }
    );
    assert!(lists.lists_for_owner("alice").unwrap().is_empty());
}

#[test]
fn outcome_and_error_kind_serialize_as_stable_payloads() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();
    let list = ListService::new(storage)
        .create_list("alice", &NewList::named("Groceries"))
        .unwrap();
    let milk = ItemService::new(storage)
        .create_item("alice", &NewItem::named("Milk"))
        .unwrap();

    let outcome = AssociationService::new(storage)
        .create_for_item(milk.id, "alice", &[list.id])
        .unwrap();
    let payload = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        payload,
        json!({
            "content": {
                "component": {"kind": "item", "id": milk.id, "name": "Milk"},
                "associated": [{"kind": "list", "id": list.id, "name": "Groceries"}],
            },
            "message": "Assigned item 'Milk' to list 'Groceries'",
        })
    );
    assert_eq!(
        serde_json::to_value(ErrorKind::AlreadyExists).unwrap(),
        json!("already_exists")
    );
}
