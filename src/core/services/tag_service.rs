use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Owned, Tag, TagDraft};
use crate::storage::DataStore;

pub struct TagService;

impl TagService {
    pub fn list(store: &dyn DataStore, user_id: Uuid) -> ServiceResult<Vec<Tag>> {
        Ok(store.fetch_tags(user_id)?)
    }

    pub fn create(
        store: &mut dyn DataStore,
        user_id: Uuid,
        name: &str,
        color: &str,
    ) -> ServiceResult<Tag> {
        let draft = TagDraft::new(name, color)?;
        Ok(store.insert_tag(user_id, draft)?)
    }

    pub fn update(
        store: &mut dyn DataStore,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        color: &str,
    ) -> ServiceResult<Tag> {
        Self::owned(store, user_id, id)?;
        let draft = TagDraft::new(name, color)?;
        Ok(store.update_tag(id, draft)?)
    }

    /// Deletes the tag; its records stay but lose the reference.
    pub fn remove(store: &mut dyn DataStore, user_id: Uuid, id: Uuid) -> ServiceResult<Tag> {
        Self::owned(store, user_id, id)?;
        Ok(store.delete_tag(id)?)
    }

    fn owned(store: &dyn DataStore, user_id: Uuid, id: Uuid) -> ServiceResult<Tag> {
        let tag = store.get_tag(id)?;
        if !tag.is_owned_by(user_id) {
            return Err(ServiceError::Invalid(format!(
                "tag {id} does not belong to the current user"
            )));
        }
        Ok(tag)
    }
}
