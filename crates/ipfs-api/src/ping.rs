//! Streaming decoder for the `ping` command.
//!
//! The daemon answers `ping` with newline-delimited JSON, one object per
//! probe, while the probes are still running:
//!
//! ```text
//! {"Success":true,"Text":"Looking up peer QmPeer","Time":0}
//! {"Success":true,"Text":"","Time":1234567}
//! {"Success":true,"Text":"Average latency: 1.23ms","Time":0}
//! ```
//!
//! [`PingStream`] reads one line per poll, so results reach the caller in
//! daemon order as soon as they arrive and nothing is buffered beyond the
//! current line. The sequence is single-pass: reading it again means
//! issuing another `ping`.
//!
//! The first malformed line ends the stream with [`ApiError::Decode`].
//! Results already yielded stay valid. The response body is dropped as soon
//! as the stream ends for any reason, and also when the `PingStream` itself
//! is dropped early.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream, StreamExt, TryStreamExt};
use ipfs_types::PingResult;
use serde::Deserialize;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{debug, trace, warn};

use crate::dispatch::ResponseStream;
use crate::error::{ApiError, Result};

/// One line of a `ping` response, as sent by the daemon.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PingRecord {
    success: bool,
    text: String,
    /// Round trip time in nanoseconds.
    time: u64,
}

/// Decodes a single `ping` response line.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the line is not a JSON object with a
/// boolean `Success`, a string `Text` and a non-negative integer `Time`.
pub fn decode_ping_line(line: &str) -> Result<PingResult> {
    let record: PingRecord = serde_json::from_str(line)
        .map_err(|e| ApiError::decode(format!("invalid ping line: {e}")))?;
    Ok(PingResult::from_nanos(record.success, record.text, record.time))
}

/// Lazily decoded results of one `ping` command.
pub struct PingStream {
    lines: Option<FramedRead<ResponseStream, LinesCodec>>,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    delivered: usize,
}

impl PingStream {
    /// Takes ownership of a response body and decodes it line by line.
    ///
    /// Lines longer than `max_line_length` bytes fail the stream.
    #[must_use]
    pub fn new(body: ResponseStream, cancel: &CancellationToken, max_line_length: usize) -> Self {
        Self {
            lines: Some(FramedRead::new(
                body,
                LinesCodec::new_with_max_length(max_line_length),
            )),
            cancelled: Box::pin(cancel.clone().cancelled_owned()),
            delivered: 0,
        }
    }

    /// Wraps any reader, e.g. a recorded response.
    #[must_use]
    pub fn from_reader<R>(reader: R, cancel: &CancellationToken, max_line_length: usize) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::new(Box::new(reader), cancel, max_line_length)
    }

    /// Number of results yielded so far.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.delivered
    }

    /// Reads the remaining results, failing on the first error.
    pub async fn collect_results(self) -> Result<Vec<PingResult>> {
        self.try_collect().await
    }

    /// Drops the response body and ends the stream.
    fn finish(&mut self) {
        if self.lines.take().is_some() {
            trace!(delivered = self.delivered, "ping stream released");
        }
    }
}

impl Stream for PingStream {
    type Item = Result<PingResult>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        let Some(lines) = this.lines.as_mut() else {
            return Poll::Ready(None);
        };

        if this.cancelled.as_mut().poll(cx).is_ready() {
            debug!(delivered = this.delivered, "ping cancelled");
            this.finish();
            return Poll::Ready(Some(Err(ApiError::Cancelled)));
        }

        let item = match ready!(lines.poll_next_unpin(cx)) {
            None => {
                debug!(delivered = this.delivered, "ping stream complete");
                this.finish();
                return Poll::Ready(None);
            }
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                Err(ApiError::decode("ping line exceeds maximum length"))
            }
            Some(Err(LinesCodecError::Io(e))) => Err(ApiError::from(e)),
            Some(Ok(line)) => {
                debug!("RSP {line}");
                decode_ping_line(&line)
            }
        };

        match &item {
            Ok(_) => this.delivered += 1,
            Err(e) => {
                warn!(delivered = this.delivered, error = %e, "ping stream failed");
                this.finish();
            }
        }
        Poll::Ready(Some(item))
    }
}

impl FusedStream for PingStream {
    fn is_terminated(&self) -> bool {
        self.lines.is_none()
    }
}

impl fmt::Debug for PingStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PingStream")
            .field("open", &self.lines.is_some())
            .field("delivered", &self.delivered)
            .finish_non_exhaustive()
    }
}
