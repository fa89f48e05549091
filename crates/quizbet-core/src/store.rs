use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
    path::PathBuf,
    sync::{Arc, Mutex as StdMutex},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    state::{Ledger, RoundState, UserDirectory},
    Error,
};

/// File name of the balance ledger.
pub const LEDGER_FILE: &str = "data.json";

/// File name of the user directory.
pub const USERS_FILE: &str = "users.json";

/// File name of the round state.
pub const ROUND_FILE: &str = "game.json";

/// Whole-document storage.
#[derive(Debug, Clone)]
pub enum Backend {
    /// JSON files in a directory.
    File(FileBackend),
    /// In-process map, for tests and dry runs.
    Memory(MemoryBackend),
}

impl Backend {
    /// Create a file backend rooted at `dir`.
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::File(FileBackend { dir: dir.into() })
    }

    /// Create an empty in-memory backend.
    pub fn memory() -> Self {
        Self::Memory(MemoryBackend::default())
    }

    async fn prepare(&self) -> crate::Result<()> {
        match self {
            Self::File(backend) => backend.prepare().await,
            Self::Memory(_) => Ok(()),
        }
    }

    async fn load(&self, name: &str) -> crate::Result<Option<Vec<u8>>> {
        match self {
            Self::File(backend) => backend.load(name).await,
            Self::Memory(backend) => Ok(backend.load(name)),
        }
    }

    async fn save(&self, name: &str, bytes: Vec<u8>) -> crate::Result<()> {
        match self {
            Self::File(backend) => backend.save(name, &bytes).await,
            Self::Memory(backend) => {
                backend.save(name, bytes);
                Ok(())
            }
        }
    }

    fn locate(&self, name: &str) -> PathBuf {
        match self {
            Self::File(backend) => backend.path(name),
            Self::Memory(_) => PathBuf::from(name),
        }
    }
}

/// JSON files in a directory, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    async fn prepare(&self) -> crate::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| Error::io(&self.dir, err))
    }

    async fn load(&self, name: &str) -> crate::Result<Option<Vec<u8>>> {
        let path = self.path(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::io(path, err)),
        }
    }

    async fn save(&self, name: &str, bytes: &[u8]) -> crate::Result<()> {
        let path = self.path(name);
        let tmp = self.path(&format!("{name}.tmp"));
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|err| Error::io(&tmp, err))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|err| Error::io(&path, err))
    }
}

/// In-memory documents. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: Arc<StdMutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        self.documents
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .get(name)
            .cloned()
    }

    fn save(&self, name: &str, bytes: Vec<u8>) {
        self.documents
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .insert(name.to_owned(), bytes);
    }
}

/// A named document guarded by its own lock.
#[derive(Debug)]
pub struct Document<T> {
    name: &'static str,
    value: Mutex<T>,
}

impl<T> Document<T>
where
    T: Clone + Default + Serialize + DeserializeOwned,
{
    async fn open(backend: &Backend, name: &'static str, create: bool) -> crate::Result<Self> {
        let value = match backend.load(name).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|source| Error::Corrupt {
                path: backend.locate(name),
                source,
            })?,
            None if !create => T::default(),
            None => {
                let value = T::default();
                backend.save(name, serde_json::to_vec_pretty(&value)?).await?;
                tracing::info!(document = name, "created document with defaults");
                value
            }
        };
        Ok(Self {
            name,
            value: Mutex::new(value),
        })
    }

    /// Lock the document and stage changes on a copy.
    pub async fn stage(&self) -> Staged<'_, T> {
        let guard = self.value.lock().await;
        let staged = guard.clone();
        Staged {
            name: self.name,
            guard,
            staged,
        }
    }

    /// Clone the current value.
    pub async fn snapshot(&self) -> T {
        self.value.lock().await.clone()
    }
}

/// Pending changes to a locked document.
///
/// Dropping without [`Staged::commit`] discards the changes.
pub struct Staged<'a, T> {
    name: &'static str,
    guard: MutexGuard<'a, T>,
    staged: T,
}

impl<T: Serialize> Staged<'_, T> {
    /// Persist the staged value, then make it current.
    pub async fn commit(self, backend: &Backend) -> crate::Result<()> {
        let Self {
            name,
            mut guard,
            staged,
        } = self;
        backend.save(name, serde_json::to_vec_pretty(&staged)?).await?;
        *guard = staged;
        Ok(())
    }
}

impl<T> Deref for Staged<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.staged
    }
}

impl<T> DerefMut for Staged<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.staged
    }
}

/// The three game documents.
///
/// Operations that need more than one document must lock them in field order:
/// `users`, `ledger`, `round`.
#[derive(Debug)]
pub struct Store {
    backend: Backend,
    /// User directory.
    pub users: Document<UserDirectory>,
    /// Balance ledger.
    pub ledger: Document<Ledger>,
    /// Round state.
    pub round: Document<RoundState>,
}

impl Store {
    /// Load all documents, creating missing ones with defaults.
    pub async fn open(backend: Backend) -> crate::Result<Self> {
        backend.prepare().await?;
        Self::load(backend, true).await
    }

    /// Load all documents without touching storage. Missing ones read as
    /// defaults and are not created.
    pub async fn open_read_only(backend: Backend) -> crate::Result<Self> {
        Self::load(backend, false).await
    }

    async fn load(backend: Backend, create: bool) -> crate::Result<Self> {
        let users = Document::open(&backend, USERS_FILE, create).await?;
        let ledger = Document::open(&backend, LEDGER_FILE, create).await?;
        let round = Document::open(&backend, ROUND_FILE, create).await?;
        Ok(Self {
            backend,
            users,
            ledger,
            round,
        })
    }

    /// Get the backend.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("quizbet-store-{}", rand::random::<u64>()))
    }

    #[tokio::test]
    async fn dropped_stage_is_discarded() -> crate::Result<()> {
        let store = Store::open(Backend::memory()).await?;
        {
            let mut ledger = store.ledger.stage().await;
            ledger.set("Kim", 500);
        }
        assert_eq!(store.ledger.snapshot().await.balance("Kim"), 0);

        let mut ledger = store.ledger.stage().await;
        ledger.set("Kim", 500);
        ledger.commit(store.backend()).await?;
        assert_eq!(store.ledger.snapshot().await.balance("Kim"), 500);
        Ok(())
    }

    #[tokio::test]
    async fn file_backend_round_trip() -> crate::Result<()> {
        let dir = temp_dir();
        {
            let store = Store::open(Backend::file(&dir)).await?;
            let mut ledger = store.ledger.stage().await;
            ledger.set("Kim", 42);
            ledger.commit(store.backend()).await?;
        }
        assert!(dir.join(USERS_FILE).exists());
        assert!(dir.join(ROUND_FILE).exists());

        let store = Store::open(Backend::file(&dir)).await?;
        assert_eq!(store.ledger.snapshot().await.balance("Kim"), 42);
        assert!(!dir.join(format!("{LEDGER_FILE}.tmp")).exists());

        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[tokio::test]
    async fn read_only_open_leaves_no_files() -> crate::Result<()> {
        let dir = temp_dir();
        let store = Store::open_read_only(Backend::file(&dir)).await?;
        assert!(store.ledger.snapshot().await.is_empty());
        assert_eq!(store.round.snapshot().await, RoundState::default());
        assert!(!dir.exists());

        Store::open(Backend::file(&dir)).await?;
        assert!(dir.join(LEDGER_FILE).exists());
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(ROUND_FILE), b"{ not json").unwrap();

        let err = Store::open(Backend::file(&dir)).await.unwrap_err();
        match &err {
            Error::Corrupt { path, .. } => assert_eq!(path, &dir.join(ROUND_FILE)),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_user_facing());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
