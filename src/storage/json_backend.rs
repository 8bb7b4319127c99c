use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::utils::{ensure_dir, PathResolver},
    domain::{MonetaryRecord, RecordDraft, RecordKind, RecordUpdate, Tag, TagDraft},
    errors::{CoreError, CoreResult},
};

use super::{snapshot_warnings, DataStore, MemoryStore, RecordQuery, StoreSnapshot};

const TMP_SUFFIX: &str = "tmp";

/// File-backed store. The whole snapshot is rewritten after every mutation.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
    warnings: Vec<String>,
}

impl JsonStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            load_snapshot_from_path(&path)?
        } else {
            StoreSnapshot::default()
        };
        let warnings = snapshot_warnings(&snapshot);
        for warning in &warnings {
            warn!(path = %path.display(), "{warning}");
        }
        info!(path = %path.display(), "opened json store");
        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
            warnings,
        })
    }

    /// Opens the store under the application data directory.
    pub fn open_default() -> CoreResult<Self> {
        Self::open(PathResolver::data_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Problems found in the file when it was opened.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        self.inner.snapshot()
    }

    /// Runs `op` on a copy of the in-memory store and keeps the copy only once
    /// it is on disk, so a failed write leaves the store unchanged.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStore) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut staged = self.inner.clone();
        let value = op(&mut staged)?;
        save_snapshot_to_path(staged.snapshot(), &self.path).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "store write failed");
            err
        })?;
        self.inner = staged;
        Ok(value)
    }
}

impl DataStore for JsonStore {
    fn fetch(&self, kind: RecordKind, query: &RecordQuery) -> CoreResult<Vec<MonetaryRecord>> {
        self.inner.fetch(kind, query)
    }

    fn get(&self, kind: RecordKind, id: Uuid) -> CoreResult<MonetaryRecord> {
        self.inner.get(kind, id)
    }

    fn insert(&mut self, user_id: Uuid, draft: RecordDraft) -> CoreResult<MonetaryRecord> {
        self.commit(|store| store.insert(user_id, draft))
    }

    fn insert_batch(
        &mut self,
        user_id: Uuid,
        drafts: Vec<RecordDraft>,
    ) -> CoreResult<Vec<MonetaryRecord>> {
        self.commit(|store| store.insert_batch(user_id, drafts))
    }

    fn update(
        &mut self,
        kind: RecordKind,
        id: Uuid,
        update: &RecordUpdate,
    ) -> CoreResult<MonetaryRecord> {
        self.commit(|store| store.update(kind, id, update))
    }

    fn delete(&mut self, kind: RecordKind, id: Uuid) -> CoreResult<MonetaryRecord> {
        self.commit(|store| store.delete(kind, id))
    }

    fn fetch_tags(&self, user_id: Uuid) -> CoreResult<Vec<Tag>> {
        self.inner.fetch_tags(user_id)
    }

    fn get_tag(&self, id: Uuid) -> CoreResult<Tag> {
        self.inner.get_tag(id)
    }

    fn insert_tag(&mut self, user_id: Uuid, draft: TagDraft) -> CoreResult<Tag> {
        self.commit(|store| store.insert_tag(user_id, draft))
    }

    fn update_tag(&mut self, id: Uuid, draft: TagDraft) -> CoreResult<Tag> {
        self.commit(|store| store.update_tag(id, draft))
    }

    fn delete_tag(&mut self, id: Uuid) -> CoreResult<Tag> {
        self.commit(|store| store.delete_tag(id))
    }
}

/// Writes the snapshot by staging to a sibling temporary file and renaming it.
pub fn save_snapshot_to_path(snapshot: &StoreSnapshot, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> CoreResult<StoreSnapshot> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Err(CoreError::Storage(format!(
            "store file `{}` is empty",
            path.display()
        )));
    }
    Ok(serde_json::from_str(&data)?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
