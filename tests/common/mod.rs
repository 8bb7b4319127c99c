#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use finance_core::{
    domain::{MonetaryRecord, RecordDraft, RecordKind},
    storage::JsonStore,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a JSON store in a unique temporary directory.
pub fn temp_store() -> JsonStore {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("store.json");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonStore::open(path).expect("open json store")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).expect("valid time")
}

/// Builds a stored-looking record without going through a store.
pub fn record(kind: RecordKind, amount: Decimal, when: NaiveDateTime) -> MonetaryRecord {
    let draft = RecordDraft::single(kind, format!("{kind} on {when}"), amount, when);
    MonetaryRecord::from_draft(Uuid::new_v4(), Uuid::nil(), draft)
}
