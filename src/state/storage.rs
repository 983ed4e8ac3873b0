use crate::{
    cfg::StorageSettings,
    error::{IOAction, IOSnafu, SlateResult},
};
use moka::future::{Cache, CacheBuilder};
use snafu::ResultExt;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

const FILE_SUFFIX: &str = ".kv.json";

/// Local key-value storage holding JSON strings.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> SlateResult<Option<String>>;
    async fn set(&self, key: &str, value: String) -> SlateResult<()>;
    async fn remove(&self, key: &str) -> SlateResult<()>;
    async fn clear(&self) -> SlateResult<()>;
}

/// One `<key>.kv.json` file per key inside a directory. Keys are escaped
/// reversibly, so two keys never share a file, and `clear` only touches files
/// with that suffix.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len() + FILE_SUFFIX.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("_{byte:02x}"));
            }
        }
        file_name.push_str(FILE_SUFFIX);
        self.dir.join(file_name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> SlateResult<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(source).context(IOSnafu {
                action: IOAction::ReadingFile(path),
            }),
        }
    }

    async fn set(&self, key: &str, value: String) -> SlateResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context(IOSnafu {
                action: IOAction::CreatingDirectory(self.dir.clone()),
            })?;

        let path = self.path_for(key);
        tokio::fs::write(&path, value).await.context(IOSnafu {
            action: IOAction::WritingToFile(path),
        })
    }

    async fn remove(&self, key: &str) -> SlateResult<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e).context(IOSnafu {
                action: IOAction::DeletingFile(path),
            }),
            _ => Ok(()),
        }
    }

    async fn clear(&self) -> SlateResult<()> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(source).context(IOSnafu {
                    action: IOAction::ReadingDirectory(self.dir.clone()),
                })
            }
        };

        loop {
            let next_entry = entries.next_entry().await.context(IOSnafu {
                action: IOAction::ReadingDirectory(self.dir.clone()),
            })?;
            let Some(next_entry) = next_entry else {
                break;
            };

            let path = next_entry.path();
            let ours = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(FILE_SUFFIX));
            if ours {
                tokio::fs::remove_file(&path).await.context(IOSnafu {
                    action: IOAction::DeletingFile(path.clone()),
                })?;
            }
        }

        Ok(())
    }
}

/// Lives as long as the process does. Also what backs the "don't remember me"
/// session.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    entries: Cache<String, Arc<str>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let entries = CacheBuilder::default().name(name).build();
        Self { entries }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory_store")
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> SlateResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|v| v.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> SlateResult<()> {
        self.entries.insert(key.to_string(), value.into()).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> SlateResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> SlateResult<()> {
        self.entries.invalidate_all();
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub enum SlateStorage {
    File(FileStore),
    Memory(MemoryStore),
}

impl SlateStorage {
    #[must_use]
    pub fn new(settings: &StorageSettings) -> Self {
        match &settings.dir {
            Some(dir) => {
                info!(?dir, "Using file storage");
                Self::File(FileStore::new(dir.clone()))
            }
            None => {
                info!("Using in-memory storage");
                Self::Memory(MemoryStore::new("slate_storage"))
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for SlateStorage {
    async fn get(&self, key: &str) -> SlateResult<Option<String>> {
        match self {
            Self::File(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> SlateResult<()> {
        match self {
            Self::File(store) => store.set(key, value).await,
            Self::Memory(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> SlateResult<()> {
        match self {
            Self::File(store) => store.remove(key).await,
            Self::Memory(store) => store.remove(key).await,
        }
    }

    async fn clear(&self) -> SlateResult<()> {
        match self {
            Self::File(store) => store.clear().await,
            Self::Memory(store) => store.clear().await,
        }
    }
}
