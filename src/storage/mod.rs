pub mod json_backend;
pub mod memory;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    DateRange, MonetaryRecord, RecordDraft, RecordKind, RecordUpdate, Tag, TagDraft,
};
use crate::errors::CoreResult;

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Filter applied by [`DataStore::fetch`]. `None` fields do not filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordQuery {
    pub user_id: Uuid,
    pub range: Option<DateRange>,
    pub tag_id: Option<Uuid>,
}

impl RecordQuery {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            range: None,
            tag_id: None,
        }
    }

    pub fn in_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_tag(mut self, tag_id: Uuid) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn matches(&self, record: &MonetaryRecord) -> bool {
        record.user_id == self.user_id
            && self
                .range
                .map_or(true, |range| range.contains(record.transaction_date))
            && self.tag_id.map_or(true, |tag| record.tag_id == Some(tag))
    }
}

/// Relational backend holding one income table, one expense table and tags.
///
/// Each table only accepts records of its own kind. `fetch` returns records
/// newest first.
pub trait DataStore {
    fn fetch(&self, kind: RecordKind, query: &RecordQuery) -> CoreResult<Vec<MonetaryRecord>>;
    fn get(&self, kind: RecordKind, id: Uuid) -> CoreResult<MonetaryRecord>;
    fn insert(&mut self, user_id: Uuid, draft: RecordDraft) -> CoreResult<MonetaryRecord>;
    fn insert_batch(
        &mut self,
        user_id: Uuid,
        drafts: Vec<RecordDraft>,
    ) -> CoreResult<Vec<MonetaryRecord>>;
    fn update(
        &mut self,
        kind: RecordKind,
        id: Uuid,
        update: &RecordUpdate,
    ) -> CoreResult<MonetaryRecord>;
    fn delete(&mut self, kind: RecordKind, id: Uuid) -> CoreResult<MonetaryRecord>;

    fn fetch_tags(&self, user_id: Uuid) -> CoreResult<Vec<Tag>>;
    fn get_tag(&self, id: Uuid) -> CoreResult<Tag>;
    fn insert_tag(&mut self, user_id: Uuid, draft: TagDraft) -> CoreResult<Tag>;
    fn update_tag(&mut self, id: Uuid, draft: TagDraft) -> CoreResult<Tag>;
    /// Removes the tag and clears it from every record that referenced it.
    fn delete_tag(&mut self, id: Uuid) -> CoreResult<Tag>;
}

/// Serializable contents of a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub incomes: Vec<MonetaryRecord>,
    #[serde(default)]
    pub expenses: Vec<MonetaryRecord>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl StoreSnapshot {
    pub fn table(&self, kind: RecordKind) -> &Vec<MonetaryRecord> {
        match kind {
            RecordKind::Income => &self.incomes,
            RecordKind::Expense => &self.expenses,
        }
    }

    pub fn table_mut(&mut self, kind: RecordKind) -> &mut Vec<MonetaryRecord> {
        match kind {
            RecordKind::Income => &mut self.incomes,
            RecordKind::Expense => &mut self.expenses,
        }
    }
}

/// Detects dangling references and inconsistent installment groups.
pub fn snapshot_warnings(snapshot: &StoreSnapshot) -> Vec<String> {
    let tag_ids: HashSet<_> = snapshot.tags.iter().map(|t| t.id).collect();
    let mut warnings = Vec::new();
    let mut groups: HashMap<Uuid, Vec<&MonetaryRecord>> = HashMap::new();

    for kind in [RecordKind::Income, RecordKind::Expense] {
        for record in snapshot.table(kind) {
            if record.kind != kind {
                warnings.push(format!(
                    "record {} is stored as {} but labelled {}",
                    record.id, kind, record.kind
                ));
            }
            if let Some(tag) = record.tag_id {
                if !tag_ids.contains(&tag) {
                    warnings.push(format!("record {} references missing tag {}", record.id, tag));
                }
            }
            if let Some(group) = record.group_id {
                groups.entry(group).or_default().push(record);
            }
        }
    }

    for (group, members) in groups {
        let total = members[0].installment_total;
        let mut indexes: Vec<u32> = members.iter().map(|r| r.installment_index).collect();
        indexes.sort_unstable();
        let contiguous = indexes.iter().enumerate().all(|(i, idx)| *idx == i as u32 + 1);
        if !contiguous || members.iter().any(|r| r.installment_total != total) {
            warnings.push(format!("installment group {group} has gaps or mixed totals"));
        }
    }
    warnings
}
