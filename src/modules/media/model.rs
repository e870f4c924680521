use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::api::error;
use crate::constants::{DEFAULT_ALLOWED_EXTENSIONS, UPLOAD_FIELD};

/// Media storage configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub storage_root: PathBuf,
    pub max_file_size: u64,
    pub max_files_per_upload: usize,
    /// Lower-cased, dot-prefixed (`.mp4`).
    pub allowed_extensions: Vec<String>,
    pub field_name: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./public/videos"),
            max_file_size: 200 * 1024 * 1024, // 200MB
            max_files_per_upload: 20,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            field_name: UPLOAD_FIELD.to_string(),
        }
    }
}

impl MediaConfig {
    pub fn with_root(storage_root: impl Into<PathBuf>) -> Self {
        Self { storage_root: storage_root.into(), ..Default::default() }
    }

    /// Returns the normalized extension of `name` when it is in the allow-set.
    pub fn allowed_extension(&self, name: &str) -> Option<String> {
        let extension = extension_of(name)?;
        self.allowed_extensions.contains(&extension).then_some(extension)
    }
}

/// Lower-cased extension with its leading dot, `None` for names like `clip` or `.mp4`.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

pub fn content_type_for(extension: &str) -> Cow<'static, str> {
    match extension {
        ".mp4" => "video/mp4".into(),
        ".webm" => "video/webm".into(),
        ".mov" => "video/quicktime".into(),
        other => mime_guess::from_ext(other.trim_start_matches('.'))
            .first_or_octet_stream()
            .to_string()
            .into(),
    }
}

/// A stored media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub size: u64,
    pub extension: String,
}

/// One file part of an upload, checked before any byte touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub original_name: String,
    pub extension: String,
}

impl UploadCandidate {
    pub fn new(raw_name: &str, config: &MediaConfig) -> Result<Self, error::SystemError> {
        // Clients may send a full path (`C:\fakepath\clip.mp4`); only the last segment is kept.
        let original_name = raw_name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
        if original_name.is_empty() || original_name == "." || original_name == ".." {
            return Err(error::SystemError::bad_request("Invalid file name"));
        }

        let extension = config.allowed_extension(original_name).ok_or_else(|| {
            error::SystemError::bad_request(format!(
                "Only video files allowed ({})",
                config.allowed_extensions.join(", ")
            ))
        })?;

        Ok(Self { original_name: original_name.to_string(), extension })
    }
}
