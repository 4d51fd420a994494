use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;

/// String-keyed persistent storage. The meal collection lives under a single key,
/// so the interface is a plain get/set with whole-value overwrite.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// File-backed store: one file per key under the configured data directory.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub async fn new(root: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&root)
            .await
            .context("create data dir")?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("read store file"),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        // temp file + rename, so readers never observe a half-written value
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, value).await.context("write store file")?;
        tokio::fs::rename(&tmp, &path)
            .await
            .context("commit store file")?;
        Ok(())
    }
}

/// In-memory store used by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: tokio::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.inner.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_get_absent_key_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf())
            .await
            .expect("file store");
        let got = store.get("repas").await.expect("get");
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn file_store_set_then_get_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf())
            .await
            .expect("file store");
        store.set("repas", "[1,2,3]").await.expect("set");
        let got = store.get("repas").await.expect("get");
        assert_eq!(got.as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn file_store_set_overwrites_whole_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf())
            .await
            .expect("file store");
        store.set("repas", "[1]").await.expect("set");
        store.set("repas", "[]").await.expect("set again");
        let got = store.get("repas").await.expect("get");
        assert_eq!(got.as_deref(), Some("[]"));
    }
}
