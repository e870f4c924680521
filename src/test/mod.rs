use actix_web::{
    body::{BodySize, MessageBody},
    http::{header, StatusCode},
    test, web, App,
};
use std::path::Path;
use std::sync::Arc;

use crate::modules::media::{route, MediaConfig, MediaFsRepository, MediaService};

const BOUNDARY: &str = "----videovault-test-boundary";

macro_rules! media_app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(MediaService::new(Arc::new(MediaFsRepository::new(
                    $config,
                )))))
                .configure(route::configure::<MediaFsRepository>),
        )
        .await
    };
}

/// One multipart part: field name, optional file name, content.
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload-multiple")
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(multipart_body(parts))
}

fn video_request(name: &str, range: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::get().uri(&format!("/videos/{name}"));
    match range {
        Some(range) => req.insert_header((header::RANGE, range)),
        None => req,
    }
}

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

fn stored_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

fn header_str<'a>(headers: &'a header::HeaderMap, name: header::HeaderName) -> &'a str {
    headers.get(name).unwrap().to_str().unwrap()
}

#[actix_web::test]
async fn test_upload_then_range_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));
    let data = sample(5000);

    let resp =
        test::call_service(&app, upload_request(&[("videos", Some("clip.mp4"), &data)]).to_request())
            .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["message"], "Upload successful");
    let uploaded = json["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 1);
    let name = uploaded[0].as_str().unwrap().to_string();

    let (ticket, original) = name.split_once('-').unwrap();
    assert!(ticket.parse::<i64>().is_ok());
    assert_eq!(original, "clip.mp4");
    assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), data);

    let resp =
        test::call_service(&app, video_request(&name, Some("bytes=1000-1999")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header_str(resp.headers(), header::CONTENT_RANGE), "bytes 1000-1999/5000");
    assert_eq!(header_str(resp.headers(), header::ACCEPT_RANGES), "bytes");
    assert_eq!(header_str(resp.headers(), header::CONTENT_TYPE), "video/mp4");
    assert_eq!(resp.response().body().size(), BodySize::Sized(1000));
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), &data[1000..2000]);
}

#[actix_web::test]
async fn test_full_content_without_range() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample(200_000);
    std::fs::write(dir.path().join("1-movie.webm"), &data).unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp = test::call_service(&app, video_request("1-movie.webm", None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(resp.headers(), header::CONTENT_TYPE), "video/webm");
    assert!(resp.headers().get(header::CONTENT_RANGE).is_none());
    assert_eq!(resp.response().body().size(), BodySize::Sized(200_000));
    let body = test::read_body(resp).await;
    assert_eq!(body.len(), 200_000);
    assert_eq!(body.as_ref(), data.as_slice());
}

#[actix_web::test]
async fn test_partial_range_forms() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample(5000);
    std::fs::write(dir.path().join("1-clip.mov"), &data).unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let cases = [
        ("bytes=4000-", "bytes 4000-4999/5000", 4000..5000),
        ("bytes=-100", "bytes 4900-4999/5000", 4900..5000),
        ("bytes=4990-9999", "bytes 4990-4999/5000", 4990..5000),
        ("bytes=0-0", "bytes 0-0/5000", 0..1),
        ("bytes=10-99999999999999999999999", "bytes 10-4999/5000", 10..5000),
    ];

    for (range, content_range, span) in cases {
        let resp =
            test::call_service(&app, video_request("1-clip.mov", Some(range)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT, "{range}");
        assert_eq!(header_str(resp.headers(), header::CONTENT_RANGE), content_range);
        assert_eq!(header_str(resp.headers(), header::CONTENT_TYPE), "video/quicktime");
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), &data[span], "{range}");
    }
}

#[actix_web::test]
async fn test_large_range_spans_many_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample(300_000);
    std::fs::write(dir.path().join("1-long.mp4"), &data).unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp = test::call_service(
        &app,
        video_request("1-long.mp4", Some("bytes=70000-269999")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), &data[70_000..270_000]);
}

#[actix_web::test]
async fn test_unsatisfiable_ranges() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("1-clip.mp4"), sample(5000)).unwrap();
    std::fs::write(dir.path().join("2-empty.mp4"), b"").unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let cases = [
        ("1-clip.mp4", "bytes=6000-7000", "bytes */5000"),
        ("1-clip.mp4", "bytes=5000-", "bytes */5000"),
        ("1-clip.mp4", "bytes=300-200", "bytes */5000"),
        ("1-clip.mp4", "items=0-10", "bytes */5000"),
        ("1-clip.mp4", "bytes=0-1,4-5", "bytes */5000"),
        ("1-clip.mp4", "bytes=+5-10", "bytes */5000"),
        ("1-clip.mp4", "bytes=5 - 10", "bytes */5000"),
        ("2-empty.mp4", "bytes=0-", "bytes */0"),
    ];

    for (name, range, content_range) in cases {
        let resp = test::call_service(&app, video_request(name, Some(range)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE, "{range}");
        assert_eq!(header_str(resp.headers(), header::CONTENT_RANGE), content_range);
    }
}

#[actix_web::test]
async fn test_unknown_video_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"not a video").unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    for name in ["does-not-exist.mp4", "notes.txt", "..%2Fsecret.mp4"] {
        let resp = test::call_service(&app, video_request(name, None).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{name}");
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"Video not found");
    }
}

#[actix_web::test]
async fn test_catalog_lists_only_media() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["1-a.mp4", "2-b.WEBM", "3-c.mov", "notes.txt", "poster.jpg"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/videos").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let names: Vec<String> = test::read_body_json(resp).await;
    assert_eq!(names, vec!["1-a.mp4", "2-b.WEBM", "3-c.mov"]);
}

#[actix_web::test]
async fn test_catalog_unreadable_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path().join("missing")));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/videos").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Error reading videos folder");
}

#[actix_web::test]
async fn test_batch_with_identical_names() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp = test::call_service(
        &app,
        upload_request(&[
            ("videos", Some("same.webm"), b"first"),
            ("videos", Some("same.webm"), b"second"),
            ("title", None, b"holiday"),
            ("videos", Some("other.MOV"), b"third"),
        ])
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    let uploaded: Vec<String> = serde_json::from_value(json["uploaded"].clone()).unwrap();

    assert_eq!(uploaded.len(), 3);
    assert_ne!(uploaded[0], uploaded[1]);
    assert_eq!(std::fs::read(dir.path().join(&uploaded[0])).unwrap(), b"first");
    assert_eq!(std::fs::read(dir.path().join(&uploaded[1])).unwrap(), b"second");
    assert!(uploaded[2].ends_with("-other.MOV"));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/videos").to_request()).await;
    let mut listed: Vec<String> = test::read_body_json(resp).await;
    let mut expected = uploaded.clone();
    listed.sort();
    expected.sort();
    assert_eq!(listed, expected);
}

#[actix_web::test]
async fn test_disallowed_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp = test::call_service(
        &app,
        upload_request(&[("videos", Some("notes.txt"), b"hello")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Upload failed: Only video files allowed (.mp4, .webm, .mov)");
    assert!(stored_names(dir.path()).is_empty());

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/videos").to_request()).await;
    let names: Vec<String> = test::read_body_json(resp).await;
    assert!(names.is_empty());
}

#[actix_web::test]
async fn test_invalid_file_rolls_back_whole_batch() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp = test::call_service(
        &app,
        upload_request(&[
            ("videos", Some("good.mp4"), b"valid video"),
            ("videos", Some("bad.exe"), b"MZ"),
        ])
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(stored_names(dir.path()).is_empty());
}

#[actix_web::test]
async fn test_no_files_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    for parts in [vec![("title", None, &b"just text"[..])], vec![("videos", Some(""), &b""[..])]] {
        let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"No files uploaded.");
    }
}

#[actix_web::test]
async fn test_oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = MediaConfig { max_file_size: 10, ..MediaConfig::with_root(dir.path()) };
    let app = media_app!(config);

    let resp = test::call_service(
        &app,
        upload_request(&[("videos", Some("big.mp4"), b"0123456789A")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Upload failed: File too large (max 10 bytes)");
    assert!(stored_names(dir.path()).is_empty());
}

#[actix_web::test]
async fn test_too_many_files_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = MediaConfig { max_files_per_upload: 2, ..MediaConfig::with_root(dir.path()) };
    let app = media_app!(config);

    let resp = test::call_service(
        &app,
        upload_request(&[
            ("videos", Some("a.mp4"), b"a"),
            ("videos", Some("b.mp4"), b"b"),
            ("videos", Some("c.mp4"), b"c"),
        ])
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Upload failed: Too many files (max 2)");
    assert!(stored_names(dir.path()).is_empty());
}

#[actix_web::test]
async fn test_unexpected_file_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path()));

    let resp = test::call_service(
        &app,
        upload_request(&[("video", Some("clip.mp4"), b"data")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(stored_names(dir.path()).is_empty());
}

#[actix_web::test]
async fn test_storage_failure_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = media_app!(MediaConfig::with_root(dir.path().join("missing")));

    let resp = test::call_service(
        &app,
        upload_request(&[("videos", Some("clip.mp4"), b"data")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Upload failed: Internal Server Error");
}
