//! Transport-level stream plumbing shared by JSON-lines backends.
//!
//! Converts an HTTP response body carrying newline-delimited JSON into a
//! stream of parsed chunk values. Line framing is handled by a codec so
//! UTF-8 boundaries inside multi-byte characters survive arbitrary network
//! chunking.

use std::pin::Pin;

use futures::Stream;
use futures_util::{StreamExt, TryStreamExt};

use crate::error::GatewayError;

/// Stream of already-parsed backend chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<serde_json::Value, GatewayError>> + Send>>;

/// Decode a newline-delimited JSON response body into parsed chunks.
///
/// Empty lines are skipped; unparsable lines surface as `ParseError` items
/// so the consumer decides whether to abort.
pub fn json_lines_stream(response: reqwest::Response) -> ChunkStream {
    use tokio_util::codec::{FramedRead, LinesCodec};
    use tokio_util::io::StreamReader;

    let byte_stream = response
        .bytes_stream()
        .map_err(|e| std::io::Error::other(format!("Stream error: {e}")));
    let reader = StreamReader::new(byte_stream);
    let lines = FramedRead::new(reader, LinesCodec::new());

    let chunks = lines
        .map(|res| res.map_err(|e| GatewayError::StreamError(format!("Line framing error: {e}"))))
        .filter_map(|res| async move {
            match res {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        return None;
                    }
                    Some(
                        serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| {
                            GatewayError::ParseError(format!("Failed to parse stream chunk: {e}"))
                        }),
                    )
                }
                Err(e) => Some(Err(e)),
            }
        });

    Box::pin(chunks)
}

/// Build a chunk stream from in-memory chunks (tests and scripted backends).
pub fn chunk_stream_from_iter<I>(chunks: I) -> ChunkStream
where
    I: IntoIterator<Item = Result<serde_json::Value, GatewayError>>,
    I::IntoIter: Send + 'static,
{
    Box::pin(futures::stream::iter(chunks))
}
