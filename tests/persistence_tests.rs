mod common;

use std::fs;

use finance_core::{
    config::ConfigManager,
    domain::{MonetaryRecord, RecordDraft, RecordKind, Tag, TagDraft},
    errors::CoreError,
    storage::{
        json_backend::{load_snapshot_from_path, save_snapshot_to_path},
        DataStore, JsonStore, StoreSnapshot,
    },
};
use rust_decimal_macros::dec;
use tempfile::TempDir;
use uuid::Uuid;

use common::at;

#[test]
fn amounts_keep_their_exact_decimal_value_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    let user = Uuid::new_v4();
    {
        let mut store = JsonStore::open(&path).unwrap();
        for amount in [dec!(0.10), dec!(0.20), dec!(1234567.89)] {
            store
                .insert(
                    user,
                    RecordDraft::single(RecordKind::Expense, "x", amount, at(2025, 1, 1, 0, 0)),
                )
                .unwrap();
        }
    }
    let snapshot = load_snapshot_from_path(&path).unwrap();
    let total: rust_decimal::Decimal = snapshot.expenses.iter().map(|r| r.amount).sum();
    assert_eq!(total, dec!(1234568.19));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn dangling_tag_references_are_reported_on_open() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    let user = Uuid::new_v4();
    let mut record = MonetaryRecord::from_draft(
        Uuid::new_v4(),
        user,
        RecordDraft::single(RecordKind::Income, "Bônus", dec!(10), at(2025, 1, 1, 0, 0)),
    );
    record.tag_id = Some(Uuid::new_v4());
    let snapshot = StoreSnapshot {
        incomes: vec![record],
        ..StoreSnapshot::default()
    };
    save_snapshot_to_path(&snapshot, &path).unwrap();

    let store = JsonStore::open(&path).unwrap();
    assert_eq!(store.warnings().len(), 1);
}

#[test]
fn corrupt_store_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(JsonStore::open(&path), Err(CoreError::Serde(_))));
}

#[test]
fn tag_colors_are_written_as_hex() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    let mut store = JsonStore::open(&path).unwrap();
    store
        .insert_tag(Uuid::new_v4(), TagDraft::new("Pets", "E67E22").unwrap())
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"#e67e22\""));
    let tags: Vec<Tag> = load_snapshot_from_path(&path).unwrap().tags;
    assert_eq!(tags[0].name, "Pets");
}

#[test]
fn config_points_the_store_at_a_custom_file() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let mut config = manager.load().unwrap();
    config.data_file = Some(temp.path().join("elsewhere").join("data.json"));
    manager.save(&config).unwrap();

    let config = manager.load().unwrap();
    let mut store = JsonStore::open(manager.data_file(&config)).unwrap();
    store
        .insert_tag(Uuid::new_v4(), TagDraft::new("Viagem", "#8e44ad").unwrap())
        .unwrap();
    assert!(temp.path().join("elsewhere").join("data.json").exists());
}
