use actix_web::web;

use crate::modules::media::repository::MediaRepository;

pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: MediaRepository + Send + Sync + 'static,
{
    cfg.service(
        web::resource("/api/videos")
            .route(web::get().to(crate::modules::media::handle::list_videos::<R>)),
    )
    .service(
        web::resource("/upload-multiple")
            .route(web::post().to(crate::modules::media::handle::upload_multiple::<R>)),
    )
    .service(
        web::resource("/videos/{name}")
            .route(web::get().to(crate::modules::media::handle::stream_video::<R>)),
    );
}
