//! Streaming decoder for chat completion responses.
//!
//! The API streams `data: <json>` lines terminated by `data: [DONE]`.
//! [`ChunkStream`] turns the raw body into [`ChatCompletionChunk`]s, one line
//! at a time and only when polled. Lines end at `\n`, `\r\n` or a bare `\r`.
//!
//! - blank lines and lines without the `data: ` prefix are skipped;
//! - `data: [DONE]` ends the stream, later lines are never read;
//! - a `data:` line whose payload is not a chunk object is dropped;
//! - end of body without `[DONE]` ends the stream normally;
//! - a transport error is yielded once, then the stream ends.
//!
//! Whenever the stream ends (including on cancellation or drop) the body is
//! dropped, releasing the connection.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes, BytesMut};
use futures::Stream;
use futures::stream::BoxStream;
use pin_project_lite::pin_project;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{debug, trace};

use crate::error::Error;
use crate::types::{ChatCompletionChunk, from_json_object};

/// Prefix of lines carrying a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that terminates the stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Byte stream of an HTTP response body.
pub type ByteStream = BoxStream<'static, Result<Bytes, reqwest::Error>>;

/// Chunk stream returned by the client for a streaming completion.
pub type ChatCompletionStream = ChunkStream<ByteStream>;

/// Outcome of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line produces no event.
    Skip,
    /// The line is the `[DONE]` sentinel.
    Done,
    /// The line decoded into a chunk.
    Chunk(ChatCompletionChunk),
}

/// Strip the `data: ` prefix from a line.
///
/// Returns `None` for blank lines and lines without the prefix.
#[must_use]
pub fn parse_sse_data(line: &str) -> Option<&str> {
    if line.trim().is_empty() {
        return None;
    }
    line.strip_prefix(DATA_PREFIX)
}

/// Check if the payload is the end-of-stream sentinel.
#[must_use]
pub fn is_done_marker(data: &str) -> bool {
    data == DONE_MARKER
}

/// Decode a single line of the stream body.
///
/// Never fails: a payload that is not a valid chunk yields [`LineOutcome::Skip`].
#[must_use]
pub fn decode_line(line: &str) -> LineOutcome {
    let Some(data) = parse_sse_data(line) else {
        return LineOutcome::Skip;
    };

    if is_done_marker(data) {
        return LineOutcome::Done;
    }

    match from_json_object::<ChatCompletionChunk>(data.as_bytes()) {
        Ok(chunk) => LineOutcome::Chunk(chunk),
        Err(e) => {
            debug!(error = %e, data, "skipping unparseable stream chunk");
            LineOutcome::Skip
        }
    }
}

pin_project! {
    /// Lazily decodes a byte stream into [`ChatCompletionChunk`]s.
    ///
    /// Bytes are only read from the inner stream when no complete line is
    /// buffered, so nothing is read ahead of the line being decoded.
    pub struct ChunkStream<S> {
        #[pin]
        inner: Option<S>,
        cancelled: Option<Pin<Box<WaitForCancellationFutureOwned>>>,
        buffer: BytesMut,
        finished: bool,
    }
}

impl<S> std::fmt::Debug for ChunkStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream")
            .field("buffered", &self.buffer.len())
            .field("cancellable", &self.cancelled.is_some())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<S, E> ChunkStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<Error>,
{
    /// Wrap a byte stream.
    pub fn new(stream: S) -> Self {
        Self {
            inner: Some(stream),
            cancelled: None,
            buffer: BytesMut::new(),
            finished: false,
        }
    }

    /// End the stream once `token` is cancelled.
    ///
    /// The token is checked before every line; once cancelled no further
    /// chunk is produced and the body is dropped.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancelled = Some(Box::pin(token.cancelled_owned()));
        self
    }

    /// Check if the stream has ended.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Take the next complete line from the buffer, without its terminator.
///
/// A line ends at `\n`, `\r\n` or a bare `\r`. A `\r` that is the last
/// buffered byte is only taken at end of body, since its `\n` may still be
/// in flight.
fn take_line(buffer: &mut BytesMut, at_eof: bool) -> Option<String> {
    let pos = buffer.iter().position(|&b| b == b'\n' || b == b'\r')?;
    let terminator = match (buffer[pos], buffer.get(pos + 1).copied()) {
        (b'\r', Some(b'\n')) => 2,
        (b'\r', None) if !at_eof => return None,
        _ => 1,
    };
    let line = buffer.split_to(pos);
    buffer.advance(terminator);
    Some(line_to_string(&line))
}

fn line_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl<S, E> Stream for ChunkStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<Error>,
{
    type Item = Result<ChatCompletionChunk, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.finished {
                return Poll::Ready(None);
            }

            if let Some(cancelled) = this.cancelled.as_mut()
                && cancelled.as_mut().poll(cx).is_ready()
            {
                trace!("stream cancelled");
                this.inner.set(None);
                *this.cancelled = None;
                this.buffer.clear();
                *this.finished = true;
                return Poll::Ready(None);
            }

            // Decode a buffered line before touching the body again
            let at_eof = this.inner.is_none();
            let line = match take_line(this.buffer, at_eof) {
                Some(line) => Some(line),
                None if at_eof && !this.buffer.is_empty() => {
                    // Final line without a terminator
                    let rest = this.buffer.split();
                    Some(line_to_string(&rest))
                }
                None => None,
            };

            if let Some(line) = line {
                match decode_line(&line) {
                    LineOutcome::Skip => continue,
                    LineOutcome::Chunk(chunk) => return Poll::Ready(Some(Ok(chunk))),
                    LineOutcome::Done => {
                        trace!("received [DONE]");
                        this.inner.set(None);
                        *this.cancelled = None;
                        this.buffer.clear();
                        *this.finished = true;
                        return Poll::Ready(None);
                    }
                }
            }

            let Some(inner) = this.inner.as_mut().as_pin_mut() else {
                trace!("stream body ended");
                *this.cancelled = None;
                *this.finished = true;
                return Poll::Ready(None);
            };

            match inner.poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    this.inner.set(None);
                    *this.cancelled = None;
                    this.buffer.clear();
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => this.inner.set(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S, E> futures::stream::FusedStream for ChunkStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<Error>,
{
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
