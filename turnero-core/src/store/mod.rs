//! Record persistence.
//!
//! `RecordStore` is the uniform CRUD capability over a backend. Two backends
//! implement it: `LocalStore` (JSON files, the browser-storage equivalent) and
//! `FirestoreStore` (the cloud document store). `Store` picks one from config.
//!
//! No backend mutates anything optimistically, retries, or reconciles
//! concurrent writers: the last write wins.

mod firestore;
mod local;

pub use firestore::FirestoreStore;
pub use local::LocalStore;

use crate::config::{Backend, TurneroConfig};
use crate::error::TurneroResult;
use crate::record::{Collection, Entry};

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// All records of a collection, in backend order.
    async fn list<C: Collection>(&self) -> TurneroResult<Vec<Entry<C>>>;

    /// A single record. `NotFound` if the id does not exist.
    async fn get<C: Collection>(&self, id: &str) -> TurneroResult<Entry<C>>;

    /// Store a new record and return the id the backend assigned.
    async fn create<C: Collection>(&self, fields: &C) -> TurneroResult<String>;

    /// Replace a record's fields. `NotFound` if the id does not exist.
    async fn update<C: Collection>(&self, id: &str, fields: &C) -> TurneroResult<()>;

    /// Remove a record. `NotFound` if the id does not exist.
    async fn delete<C: Collection>(&self, id: &str) -> TurneroResult<()>;
}

/// The backend selected at startup.
pub enum Store {
    Local(LocalStore),
    Firestore(FirestoreStore),
}

impl Store {
    pub fn open(config: &TurneroConfig) -> TurneroResult<Self> {
        match config.backend {
            Backend::Local => Ok(Store::Local(LocalStore::new(config.data_path()))),
            Backend::Firestore => Ok(Store::Firestore(FirestoreStore::new(&config.firestore)?)),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Store::Local(_) => Backend::Local,
            Store::Firestore(_) => Backend::Firestore,
        }
    }
}

impl RecordStore for Store {
    async fn list<C: Collection>(&self) -> TurneroResult<Vec<Entry<C>>> {
        match self {
            Store::Local(s) => s.list().await,
            Store::Firestore(s) => s.list().await,
        }
    }

    async fn get<C: Collection>(&self, id: &str) -> TurneroResult<Entry<C>> {
        match self {
            Store::Local(s) => s.get(id).await,
            Store::Firestore(s) => s.get(id).await,
        }
    }

    async fn create<C: Collection>(&self, fields: &C) -> TurneroResult<String> {
        match self {
            Store::Local(s) => s.create(fields).await,
            Store::Firestore(s) => s.create(fields).await,
        }
    }

    async fn update<C: Collection>(&self, id: &str, fields: &C) -> TurneroResult<()> {
        match self {
            Store::Local(s) => s.update(id, fields).await,
            Store::Firestore(s) => s.update(id, fields).await,
        }
    }

    async fn delete<C: Collection>(&self, id: &str) -> TurneroResult<()> {
        match self {
            Store::Local(s) => s.delete::<C>(id).await,
            Store::Firestore(s) => s.delete::<C>(id).await,
        }
    }
}
