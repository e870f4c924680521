use crate::{api::error, constants::Env, modules::media::MediaConfig};

pub fn media_config(env: &Env) -> MediaConfig {
    MediaConfig {
        max_file_size: env.max_file_size,
        max_files_per_upload: env.max_files_per_upload,
        allowed_extensions: env.allowed_extensions.clone(),
        ..MediaConfig::with_root(&env.media_dir)
    }
}

/// Make sure the storage directory exists before the server accepts uploads.
pub async fn prepare_storage(config: &MediaConfig) -> Result<(), error::SystemError> {
    tokio::fs::create_dir_all(&config.storage_root).await?;
    log::info!("Media storage ready at {}", config.storage_root.display());
    Ok(())
}
