//! Creating, editing and removing incomes and expenses.

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::services::recurrence_service::{RecurrenceRequest, RecurrenceService};
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{MonetaryRecord, Owned, RecordDraft, RecordKind, RecordUpdate};
use crate::storage::DataStore;

/// Provides validated CRUD helpers for incomes and expenses.
pub struct TransactionService;

impl TransactionService {
    /// Saves a standalone record.
    pub fn add_single(
        store: &mut dyn DataStore,
        user_id: Uuid,
        draft: RecordDraft,
    ) -> ServiceResult<MonetaryRecord> {
        if draft.installment_total != 1 {
            return Err(ServiceError::Invalid(
                "use add_recurring for installment series".into(),
            ));
        }
        Self::ensure_tag(store, user_id, draft.tag_id)?;
        let record = store.insert(user_id, draft)?;
        Ok(record)
    }

    /// Generates the installment series and stores it in one batch, returning
    /// the records in installment order.
    pub fn add_recurring(
        store: &mut dyn DataStore,
        user_id: Uuid,
        request: &RecurrenceRequest,
    ) -> ServiceResult<Vec<MonetaryRecord>> {
        Self::ensure_tag(store, user_id, request.tag_id)?;
        let drafts = RecurrenceService::generate(request).map_err(|err| {
            warn!(error = %err, "rejected recurring request");
            err
        })?;
        let records = store.insert_batch(user_id, drafts)?;
        info!(
            kind = %request.kind,
            count = records.len(),
            "saved installment series"
        );
        Ok(records)
    }

    /// Full-field edit of one record. Other installments of the same group are
    /// not touched.
    pub fn update(
        store: &mut dyn DataStore,
        user_id: Uuid,
        kind: RecordKind,
        id: Uuid,
        update: &RecordUpdate,
    ) -> ServiceResult<MonetaryRecord> {
        Self::owned_record(store, user_id, kind, id)?;
        Self::ensure_tag(store, user_id, update.tag_id)?;
        Ok(store.update(kind, id, update)?)
    }

    pub fn remove(
        store: &mut dyn DataStore,
        user_id: Uuid,
        kind: RecordKind,
        id: Uuid,
    ) -> ServiceResult<MonetaryRecord> {
        Self::owned_record(store, user_id, kind, id)?;
        Ok(store.delete(kind, id)?)
    }

    fn owned_record(
        store: &dyn DataStore,
        user_id: Uuid,
        kind: RecordKind,
        id: Uuid,
    ) -> ServiceResult<MonetaryRecord> {
        let record = store.get(kind, id)?;
        if !record.is_owned_by(user_id) {
            return Err(ServiceError::Invalid(format!(
                "{kind} {id} does not belong to the current user"
            )));
        }
        Ok(record)
    }

    fn ensure_tag(store: &dyn DataStore, user_id: Uuid, tag_id: Option<Uuid>) -> ServiceResult<()> {
        if let Some(tag_id) = tag_id {
            let tag = store.get_tag(tag_id)?;
            if !tag.is_owned_by(user_id) {
                return Err(ServiceError::Invalid(format!(
                    "tag {tag_id} does not belong to the current user"
                )));
            }
        }
        Ok(())
    }
}
