use crate::{api::error, modules::media::model::MediaConfig};

#[async_trait::async_trait]
pub trait MediaRepository {
    fn config(&self) -> &MediaConfig;

    /// Creates `name` exclusively. `Ok(None)` when a file of that name already exists.
    async fn create(&self, name: &str) -> Result<Option<tokio::fs::File>, error::SystemError>;

    /// Opens `name` for reading together with its current size.
    async fn open(
        &self,
        name: &str,
    ) -> Result<Option<(tokio::fs::File, u64)>, error::SystemError>;

    async fn remove(&self, name: &str) -> Result<(), error::SystemError>;

    /// Names of all regular files in storage.
    async fn list(&self) -> Result<Vec<String>, error::SystemError>;
}
