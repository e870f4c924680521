use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use std::borrow::Cow;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Errors rendered to HTTP clients as plain text.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Range Not Satisfiable (size {size})")]
    RangeNotSatisfiable { size: u64 },
    #[error("Internal Server Error: {0}")]
    InternalServer(Cow<'static, str>),
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal_server_error(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalServer(msg.into())
    }

    /// Maps an ingestion failure, prefixing the client message with `Upload failed: `.
    pub fn upload_failed(err: SystemError) -> Self {
        match Error::from(err) {
            Error::BadRequest(msg) => Error::BadRequest(format!("Upload failed: {msg}").into()),
            Error::NotFound(msg) => Error::BadRequest(format!("Upload failed: {msg}").into()),
            Error::InternalServer(msg) => {
                Error::InternalServer(format!("Upload failed: {msg}").into())
            }
            other => other,
        }
    }

    fn message(&self) -> Cow<'static, str> {
        match self {
            Error::BadRequest(msg) | Error::NotFound(msg) | Error::InternalServer(msg) => {
                msg.clone()
            }
            Error::RangeNotSatisfiable { .. } => "Requested range not satisfiable".into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Error::InternalServer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        res.content_type("text/plain; charset=utf-8");

        if let Error::RangeNotSatisfiable { size } = self {
            res.insert_header((header::CONTENT_RANGE, format!("bytes */{size}")));
            res.insert_header((header::ACCEPT_RANGES, "bytes"));
        }

        res.body(self.message().into_owned())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Range not satisfiable for {size} bytes")]
    RangeNotSatisfiable { size: u64 },
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into().into())
    }
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::NotFound(msg) => Error::NotFound(msg),
            SystemError::RangeNotSatisfiable { size } => Error::RangeNotSatisfiable { size },
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer(INTERNAL_MESSAGE.into())
            }
        }
    }
}
