use actix_multipart::Multipart;
use actix_web::{body::SizedStream, http::header, web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use log::{error, info, warn};

use crate::api::success::Success;
use crate::api::{error, success};
use crate::modules::media::{
    model::MediaFile, repository::MediaRepository, schema::UploadResponse, service::MediaService,
};

/// List stored videos
pub async fn list_videos<R>(
    service: web::Data<MediaService<R>>,
) -> Result<success::Success<Vec<String>>, error::Error>
where
    R: MediaRepository + Send + Sync + 'static,
{
    let names = service.list_catalog().await.map_err(|e| {
        error!("Error reading videos folder: {}", e);
        error::Error::internal_server_error("Error reading videos folder")
    })?;

    Ok(Success::ok(names))
}

/// Upload a batch of videos
///
/// Either every file of the batch is stored or none is.
pub async fn upload_multiple<R>(
    mut payload: Multipart,
    service: web::Data<MediaService<R>>,
) -> Result<success::Success<UploadResponse>, error::Error>
where
    R: MediaRepository + Send + Sync + 'static,
{
    let mut uploaded = Vec::new();

    if let Err(err) = receive_files(&mut payload, &service, &mut uploaded).await {
        warn!("Upload rejected after {} stored file(s): {}", uploaded.len(), err);
        service.discard(&uploaded).await;
        return Err(error::Error::upload_failed(err));
    }

    if uploaded.is_empty() {
        return Err(error::Error::bad_request("No files uploaded."));
    }

    for file in &uploaded {
        info!("Received file {} ({} bytes)", file.name, file.size);
    }

    let names = uploaded.into_iter().map(|file| file.name).collect();
    Ok(Success::ok(UploadResponse::new(names)))
}

async fn receive_files<R>(
    payload: &mut Multipart,
    service: &MediaService<R>,
    uploaded: &mut Vec<MediaFile>,
) -> Result<(), error::SystemError>
where
    R: MediaRepository + Send + Sync,
{
    let config = service.config();

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        // Plain form values and empty file inputs carry no upload.
        let Some(filename) = filename else {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        };

        if field.name() != Some(config.field_name.as_str()) {
            return Err(error::SystemError::bad_request(format!(
                "Unexpected field (files must be sent as '{}')",
                config.field_name
            )));
        }

        if uploaded.len() >= config.max_files_per_upload {
            return Err(error::SystemError::bad_request(format!(
                "Too many files (max {})",
                config.max_files_per_upload
            )));
        }

        let candidate = service.accept(&filename)?;
        let file = service.store(candidate, &mut field).await?;
        uploaded.push(file);
    }

    Ok(())
}

fn malformed(err: actix_multipart::MultipartError) -> error::SystemError {
    error::SystemError::bad_request(format!("Malformed multipart body: {err}"))
}

/// Stream a video, honouring a single `Range: bytes=...` request
pub async fn stream_video<R>(
    name: web::Path<String>,
    req: HttpRequest,
    service: web::Data<MediaService<R>>,
) -> Result<HttpResponse, error::Error>
where
    R: MediaRepository + Send + Sync + 'static,
{
    let range = req.headers().get(header::RANGE).map(|value| value.to_str().unwrap_or_default());

    let media = service.open_stream(&name, range).await?;

    let mut res = match media.span {
        Some(span) => {
            let mut res = HttpResponse::PartialContent();
            res.insert_header((header::CONTENT_RANGE, span.content_range(media.size)));
            res
        }
        None => HttpResponse::Ok(),
    };
    res.insert_header((header::ACCEPT_RANGES, "bytes"))
        .content_type(media.content_type.clone().into_owned());

    let length = media.body_length();
    Ok(res.body(SizedStream::new(length, media.into_body())))
}
