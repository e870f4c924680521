use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Body of a successful `POST /upload-multiple`
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: Cow<'static, str>,
    pub uploaded: Vec<String>,
}

impl UploadResponse {
    pub fn new(uploaded: Vec<String>) -> Self {
        Self { message: "Upload successful".into(), uploaded }
    }
}
