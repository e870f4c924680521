pub mod handle;
pub mod model;
pub mod naming;
pub mod range;
pub mod repository;
pub mod repository_fs;
pub mod route;
pub mod schema;
pub mod service;
pub mod stream;

pub use model::MediaConfig;
pub use repository_fs::MediaFsRepository;
pub use service::MediaService;
