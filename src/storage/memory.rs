use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{MonetaryRecord, RecordDraft, RecordKind, RecordUpdate, Tag, TagDraft};
use crate::errors::{CoreError, CoreResult};

use super::{DataStore, RecordQuery, StoreSnapshot};

/// Volatile store; also the state behind [`super::JsonStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: StoreSnapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    fn record_mut(&mut self, kind: RecordKind, id: Uuid) -> CoreResult<&mut MonetaryRecord> {
        self.snapshot
            .table_mut(kind)
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("{kind} {id}")))
    }

    fn tag_mut(&mut self, id: Uuid) -> CoreResult<&mut Tag> {
        self.snapshot
            .tags
            .iter_mut()
            .find(|tag| tag.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("tag {id}")))
    }
}

impl DataStore for MemoryStore {
    fn fetch(&self, kind: RecordKind, query: &RecordQuery) -> CoreResult<Vec<MonetaryRecord>> {
        let mut records: Vec<MonetaryRecord> = self
            .snapshot
            .table(kind)
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        debug!(%kind, count = records.len(), "fetched records");
        Ok(records)
    }

    fn get(&self, kind: RecordKind, id: Uuid) -> CoreResult<MonetaryRecord> {
        self.snapshot
            .table(kind)
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("{kind} {id}")))
    }

    fn insert(&mut self, user_id: Uuid, draft: RecordDraft) -> CoreResult<MonetaryRecord> {
        draft.validate()?;
        let record = MonetaryRecord::from_draft(Uuid::new_v4(), user_id, draft);
        self.snapshot.table_mut(record.kind).push(record.clone());
        info!(kind = %record.kind, id = %record.id, "inserted record");
        Ok(record)
    }

    fn insert_batch(
        &mut self,
        user_id: Uuid,
        drafts: Vec<RecordDraft>,
    ) -> CoreResult<Vec<MonetaryRecord>> {
        // all-or-nothing: validate every draft before touching the tables
        for draft in &drafts {
            draft.validate()?;
        }
        let records: Vec<MonetaryRecord> = drafts
            .into_iter()
            .map(|draft| MonetaryRecord::from_draft(Uuid::new_v4(), user_id, draft))
            .collect();
        for record in &records {
            self.snapshot.table_mut(record.kind).push(record.clone());
        }
        info!(count = records.len(), "inserted record batch");
        Ok(records)
    }

    fn update(
        &mut self,
        kind: RecordKind,
        id: Uuid,
        update: &RecordUpdate,
    ) -> CoreResult<MonetaryRecord> {
        let record = self.record_mut(kind, id)?;
        record.apply(update)?;
        info!(%kind, %id, "updated record");
        Ok(record.clone())
    }

    fn delete(&mut self, kind: RecordKind, id: Uuid) -> CoreResult<MonetaryRecord> {
        let table = self.snapshot.table_mut(kind);
        let position = table
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("{kind} {id}")))?;
        info!(%kind, %id, "deleted record");
        Ok(table.remove(position))
    }

    fn fetch_tags(&self, user_id: Uuid) -> CoreResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .snapshot
            .tags
            .iter()
            .filter(|tag| tag.user_id == user_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(tags)
    }

    fn get_tag(&self, id: Uuid) -> CoreResult<Tag> {
        self.snapshot
            .tags
            .iter()
            .find(|tag| tag.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("tag {id}")))
    }

    fn insert_tag(&mut self, user_id: Uuid, draft: TagDraft) -> CoreResult<Tag> {
        let tag = Tag::from_draft(Uuid::new_v4(), user_id, draft);
        self.snapshot.tags.push(tag.clone());
        info!(id = %tag.id, name = %tag.name, "inserted tag");
        Ok(tag)
    }

    fn update_tag(&mut self, id: Uuid, draft: TagDraft) -> CoreResult<Tag> {
        let tag = self.tag_mut(id)?;
        tag.apply(draft);
        Ok(tag.clone())
    }

    fn delete_tag(&mut self, id: Uuid) -> CoreResult<Tag> {
        let position = self
            .snapshot
            .tags
            .iter()
            .position(|tag| tag.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("tag {id}")))?;
        let tag = self.snapshot.tags.remove(position);
        let mut detached = 0usize;
        for kind in [RecordKind::Income, RecordKind::Expense] {
            for record in self.snapshot.table_mut(kind) {
                if record.tag_id == Some(id) {
                    record.tag_id = None;
                    detached += 1;
                }
            }
        }
        info!(%id, detached, "deleted tag");
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn draft(kind: RecordKind, day: u32) -> RecordDraft {
        let when = NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        RecordDraft::single(kind, "Item", dec!(10), when)
    }

    #[test]
    fn fetch_returns_newest_first() {
        let user = Uuid::new_v4();
        let mut store = MemoryStore::new();
        for day in [3, 9, 1] {
            store.insert(user, draft(RecordKind::Expense, day)).unwrap();
        }
        let days: Vec<_> = store
            .fetch(RecordKind::Expense, &RecordQuery::for_user(user))
            .unwrap()
            .iter()
            .map(|r| r.transaction_date.date().format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["09", "03", "01"]);
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let user = Uuid::new_v4();
        let mut store = MemoryStore::new();
        let mut bad = draft(RecordKind::Expense, 2);
        bad.amount = dec!(0);
        let err = store
            .insert_batch(user, vec![draft(RecordKind::Expense, 1), bad])
            .expect_err("batch with invalid draft must fail");
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(store.snapshot().expenses.is_empty());
    }

    #[test]
    fn delete_tag_detaches_records() {
        let user = Uuid::new_v4();
        let mut store = MemoryStore::new();
        let tag = store
            .insert_tag(user, TagDraft::new("Food", "#e67e22").unwrap())
            .unwrap();
        let record = store
            .insert(user, draft(RecordKind::Income, 4).with_tag(Some(tag.id)))
            .unwrap();

        store.delete_tag(tag.id).unwrap();

        let stored = store.get(RecordKind::Income, record.id).unwrap();
        assert_eq!(stored.tag_id, None);
        assert!(matches!(store.get_tag(tag.id), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut store = MemoryStore::new();
        let err = store
            .delete(RecordKind::Income, Uuid::new_v4())
            .expect_err("unknown id");
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
