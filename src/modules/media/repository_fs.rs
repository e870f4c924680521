use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::{
    api::error,
    modules::media::{model::MediaConfig, repository::MediaRepository},
};

/// Flat directory storage rooted at `MediaConfig::storage_root`.
#[derive(Clone)]
pub struct MediaFsRepository {
    config: MediaConfig,
}

impl MediaFsRepository {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Only a single plain component resolves; `..`, `a/b` and absolute paths do not.
    fn path_of(&self, name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.config.storage_root.join(name)),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl MediaRepository for MediaFsRepository {
    fn config(&self) -> &MediaConfig {
        &self.config
    }

    async fn create(&self, name: &str) -> Result<Option<tokio::fs::File>, error::SystemError> {
        let path =
            self.path_of(name).ok_or_else(|| error::SystemError::bad_request("Invalid file name"))?;

        match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn open(
        &self,
        name: &str,
    ) -> Result<Option<(tokio::fs::File, u64)>, error::SystemError> {
        let Some(path) = self.path_of(name) else {
            return Ok(None);
        };

        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some((file, metadata.len())))
    }

    async fn remove(&self, name: &str) -> Result<(), error::SystemError> {
        let Some(path) = self.path_of(name) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, error::SystemError> {
        let mut entries = tokio::fs::read_dir(&self.config.storage_root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Non UTF-8 names cannot be addressed through the HTTP API anyway.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        Ok(names)
    }
}
