use std::borrow::Cow;

use actix_web::web::Bytes;
use futures_util::{stream, Stream};
use tokio::io::AsyncReadExt;

use crate::modules::media::range::ByteSpan;

pub const CHUNK_SIZE: usize = 64 * 1024;

/// An opened media file, positioned at the first byte to send.
#[derive(Debug)]
pub struct MediaStream {
    pub file: tokio::fs::File,
    pub size: u64,
    pub span: Option<ByteSpan>,
    pub content_type: Cow<'static, str>,
}

impl MediaStream {
    pub fn body_length(&self) -> u64 {
        self.span.map_or(self.size, |span| span.len())
    }

    pub fn into_body(self) -> impl Stream<Item = Result<Bytes, std::io::Error>> + 'static {
        let length = self.body_length();
        read_chunks(self.file, length)
    }
}

/// Reads `length` bytes from the current position, one chunk per poll.
///
/// Nothing is read ahead of the consumer, and dropping the stream closes the file.
pub fn read_chunks(
    file: tokio::fs::File,
    length: u64,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + 'static {
    stream::try_unfold((file, length), |(mut file, remaining)| async move {
        if remaining == 0 {
            return Ok(None);
        }

        let mut buf = vec![0u8; remaining.min(CHUNK_SIZE as u64) as usize];
        let read = file.read(&mut buf).await?;
        if read == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "file ended before the requested span",
            ));
        }
        buf.truncate(read);

        Ok(Some((Bytes::from(buf), (file, remaining - read as u64))))
    })
}
