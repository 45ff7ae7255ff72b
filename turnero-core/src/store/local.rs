//! Local key-value storage.
//!
//! Each collection is one JSON array under its storage key, kept as
//! `<data_dir>/<key>.json`. This is the on-disk equivalent of browser
//! local storage: the whole collection is read, modified and written back.

use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{TurneroError, TurneroResult};
use crate::record::{Collection, Entry};
use crate::store::RecordStore;

pub struct LocalStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStore {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for<C: Collection>(&self) -> PathBuf {
        self.dir.join(format!("{}.json", C::STORAGE_KEY))
    }

    async fn read<C: Collection>(&self) -> TurneroResult<Vec<Entry<C>>> {
        let path = self.path_for::<C>();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(TurneroError::Storage(format!(
                    "Could not read {}: {e}",
                    path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            TurneroError::Storage(format!("{} is not a valid record list: {e}", path.display()))
        })
    }

    async fn write<C: Collection>(&self, entries: &[Entry<C>]) -> TurneroResult<()> {
        let path = self.path_for::<C>();
        let tmp_path = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| TurneroError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            TurneroError::Storage(format!("Could not create {}: {e}", self.dir.display()))
        })?;
        tokio::fs::write(&tmp_path, content).await.map_err(|e| {
            TurneroError::Storage(format!("Could not write {}: {e}", tmp_path.display()))
        })?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            TurneroError::Storage(format!("Could not replace {}: {e}", path.display()))
        })?;

        Ok(())
    }

    fn not_found<C: Collection>(id: &str) -> TurneroError {
        TurneroError::NotFound {
            collection: C::LABEL,
            id: id.to_string(),
        }
    }
}

/// Millisecond timestamp id, bumped past any id already taken.
fn next_id<C>(entries: &[Entry<C>]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while entries.iter().any(|e| e.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

impl RecordStore for LocalStore {
    async fn list<C: Collection>(&self) -> TurneroResult<Vec<Entry<C>>> {
        tracing::debug!(key = C::STORAGE_KEY, "listing local records");
        self.read().await
    }

    async fn get<C: Collection>(&self, id: &str) -> TurneroResult<Entry<C>> {
        self.read::<C>()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found::<C>(id))
    }

    async fn create<C: Collection>(&self, fields: &C) -> TurneroResult<String> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read::<C>().await?;
        let id = next_id(&entries);
        entries.push(Entry::new(id.clone(), fields.clone()));
        self.write(&entries).await?;

        tracing::info!(key = C::STORAGE_KEY, %id, "created local record");
        Ok(id)
    }

    async fn update<C: Collection>(&self, id: &str, fields: &C) -> TurneroResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read::<C>().await?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found::<C>(id))?;
        entry.fields = fields.clone();
        self.write(&entries).await?;

        tracing::info!(key = C::STORAGE_KEY, %id, "updated local record");
        Ok(())
    }

    async fn delete<C: Collection>(&self, id: &str) -> TurneroResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read::<C>().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(Self::not_found::<C>(id));
        }
        self.write(&entries).await?;

        tracing::info!(key = C::STORAGE_KEY, %id, "deleted local record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Consulta, Turno};

    fn ana() -> Turno {
        Turno {
            name: "Ana Gomez".into(),
            phone: "1122334455".into(),
            service: "Corte".into(),
            date: "2025-01-10".into(),
            time: "14:30".into(),
        }
    }

    #[tokio::test]
    async fn test_list_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let turnos: Vec<Entry<Turno>> = store.list().await.unwrap();
        assert!(turnos.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let id = store.create(&ana()).await.unwrap();
        let turnos: Vec<Entry<Turno>> = store.list().await.unwrap();

        assert_eq!(turnos, vec![Entry::new(id, ana())]);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let first = store.create(&ana()).await.unwrap();
        let second = store.create(&ana()).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_collections_use_separate_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store.create(&ana()).await.unwrap();
        store
            .create(&Consulta {
                full_name: "Laura Diaz".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(dir.path().join("turnos.json").exists());
        assert!(dir.path().join("consultas-clientes.json").exists());
        let consultas: Vec<Entry<Consulta>> = store.list().await.unwrap();
        assert_eq!(consultas.len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create(&ana()).await.unwrap();

        let changed = Turno {
            time: "16:00".into(),
            ..ana()
        };
        store.update(&id, &changed).await.unwrap();

        let entry: Entry<Turno> = store.get(&id).await.unwrap();
        assert_eq!(entry.fields, changed);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let err = store.update("nope", &ana()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_collection_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create(&ana()).await.unwrap();

        let err = store.delete::<Turno>("nope").await.unwrap_err();
        assert!(err.is_not_found());

        let turnos: Vec<Entry<Turno>> = store.list().await.unwrap();
        assert_eq!(turnos.len(), 1);
        assert_eq!(turnos[0].id, id);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create(&ana()).await.unwrap();

        store.delete::<Turno>(&id).await.unwrap();

        let turnos: Vec<Entry<Turno>> = store.list().await.unwrap();
        assert!(turnos.is_empty());
        assert!(store.get::<Turno>(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("turnos.json"), "{not json").unwrap();
        let store = LocalStore::new(dir.path());

        let err = store.list::<Turno>().await.unwrap_err();
        assert!(matches!(err, TurneroError::Storage(_)));
    }
}
