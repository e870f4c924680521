pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".mov"];
pub const UPLOAD_FIELD: &str = "videos";

pub struct Env {
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub workers: usize,
    pub keep_alive_secs: u64,
    pub client_request_timeout_secs: u64,
    pub media_dir: String,
    pub max_file_size: u64,
    pub max_files_per_upload: usize,
    pub allowed_extensions: Vec<String>,
}

fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> T {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>()))
}

/// Splits a comma separated list like `mp4, .WebM` into `[".mp4", ".webm"]`.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .collect()
}

impl Env {
    fn new() -> Self {
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var::<u16>("PORT", "3000");
        let workers = parse_var::<usize>("WORKERS", "2");
        let keep_alive_secs = parse_var::<u64>("KEEP_ALIVE_SECS", "75");
        let client_request_timeout_secs = parse_var::<u64>("CLIENT_REQUEST_TIMEOUT_SECS", "60");

        let media_dir = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./public/videos".to_string());
        let max_file_size = parse_var::<u64>("MAX_FILE_SIZE", "209715200");
        let max_files_per_upload = parse_var::<usize>("MAX_FILES_PER_UPLOAD", "20");
        let allowed_extensions = std::env::var("ALLOWED_EXTENSIONS")
            .map(|raw| parse_extensions(&raw))
            .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect());

        Env {
            frontend_url,
            ip,
            port,
            workers,
            keep_alive_secs,
            client_request_timeout_secs,
            media_dir,
            max_file_size,
            max_files_per_upload,
            allowed_extensions,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
