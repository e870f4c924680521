use std::io::SeekFrom;
use std::sync::Arc;

use actix_web::web::Bytes;
use futures_util::{Stream, TryStreamExt};
use log::{info, warn};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::api::error;
use crate::modules::media::{
    model::{content_type_for, MediaConfig, MediaFile, UploadCandidate},
    naming::StorageNamer,
    range::RangeSpec,
    repository::MediaRepository,
    stream::MediaStream,
};

const MAX_NAME_ATTEMPTS: usize = 8;
const NOT_FOUND_MESSAGE: &str = "Video not found";

#[derive(Clone)]
pub struct MediaService<R>
where
    R: MediaRepository + Send + Sync,
{
    repo: Arc<R>,
    namer: Arc<StorageNamer>,
}

impl<R> MediaService<R>
where
    R: MediaRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        info!("MediaService initialized, storing under {}", repo.config().storage_root.display());
        Self { repo, namer: Arc::new(StorageNamer::new()) }
    }

    pub fn config(&self) -> &MediaConfig {
        self.repo.config()
    }

    /// Validate an incoming file part before anything is written
    pub fn accept(&self, raw_name: &str) -> Result<UploadCandidate, error::SystemError> {
        UploadCandidate::new(raw_name, self.config())
    }

    /// Stream one upload body into a freshly named file.
    ///
    /// The file is synced to disk before this returns. On any failure the
    /// partially written file is removed.
    pub async fn store<S, E>(
        &self,
        candidate: UploadCandidate,
        body: S,
    ) -> Result<MediaFile, error::SystemError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let (name, file) = self.allocate(&candidate).await?;

        match self.write_body(file, body).await {
            Ok(size) => Ok(MediaFile { name, size, extension: candidate.extension }),
            Err(err) => {
                self.discard_one(&name).await;
                Err(err)
            }
        }
    }

    /// Remove files accepted earlier in a batch that is being rejected
    pub async fn discard(&self, files: &[MediaFile]) {
        for file in files {
            self.discard_one(&file.name).await;
        }
    }

    /// Names of stored files with an allowed extension, sorted
    pub async fn list_catalog(&self) -> Result<Vec<String>, error::SystemError> {
        let mut names: Vec<String> = self
            .repo
            .list()
            .await?
            .into_iter()
            .filter(|name| self.config().allowed_extension(name).is_some())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Open a stored file and position it for the requested range
    pub async fn open_stream(
        &self,
        name: &str,
        range: Option<&str>,
    ) -> Result<MediaStream, error::SystemError> {
        let extension = self
            .config()
            .allowed_extension(name)
            .ok_or_else(|| error::SystemError::not_found(NOT_FOUND_MESSAGE))?;

        let (mut file, size) = self
            .repo
            .open(name)
            .await?
            .ok_or_else(|| error::SystemError::not_found(NOT_FOUND_MESSAGE))?;

        let span = match range {
            None => None,
            Some(value) => {
                let span = RangeSpec::parse(value)
                    .and_then(|spec| spec.resolve(size))
                    .ok_or(error::SystemError::RangeNotSatisfiable { size })?;
                file.seek(SeekFrom::Start(span.start)).await?;
                Some(span)
            }
        };

        Ok(MediaStream { file, size, span, content_type: content_type_for(&extension) })
    }

    async fn allocate(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<(String, tokio::fs::File), error::SystemError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = self.namer.next_name(&candidate.original_name);
            if let Some(file) = self.repo.create(&name).await? {
                return Ok((name, file));
            }
            warn!("Storage name {} already taken, retrying", name);
        }

        Err(error::SystemError::internal(format!(
            "no free storage name for {} after {} attempts",
            candidate.original_name, MAX_NAME_ATTEMPTS
        )))
    }

    async fn write_body<S, E>(
        &self,
        mut file: tokio::fs::File,
        mut body: S,
    ) -> Result<u64, error::SystemError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let max_file_size = self.config().max_file_size;
        let mut written: u64 = 0;

        while let Some(chunk) = body.try_next().await.map_err(|e| {
            error::SystemError::bad_request(format!("Upload stream interrupted: {e}"))
        })? {
            written += chunk.len() as u64;
            if written > max_file_size {
                return Err(error::SystemError::bad_request(format!(
                    "File too large (max {} bytes)",
                    max_file_size
                )));
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }

    async fn discard_one(&self, name: &str) {
        if let Err(e) = self.repo.remove(name).await {
            warn!("Failed to remove rejected upload {}: {}", name, e);
        }
    }
}
