//! The seam between the operations layer and the HTTP transport.
//!
//! A transport implements [`CommandDispatcher`] once; [`GenericApi`](crate::GenericApi)
//! shapes every operation as a [`Command`] and picks the cheapest response
//! shape for it (text, typed, or an open byte stream).

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::command::Command;
use crate::error::{ApiError, Result};

/// An open response body, read sequentially.
///
/// Dropping it releases the underlying connection.
pub type ResponseStream = Box<dyn AsyncRead + Send + Unpin>;

/// Executes daemon commands.
///
/// Implementations must be safe to call from many tasks at once and must
/// not retry on their own. Each call maps to exactly one remote request.
pub trait CommandDispatcher: Send + Sync {
    /// Runs `command` and returns the whole response body as text.
    fn execute_text(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Runs `command` and decodes the JSON response body into `T`.
    fn execute_typed<T>(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send;

    /// Runs `command` and returns the response body as soon as it starts
    /// arriving.
    fn execute_stream(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ResponseStream>> + Send;
}

impl<D: CommandDispatcher> CommandDispatcher for Arc<D> {
    fn execute_text(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).execute_text(command, cancel)
    }

    fn execute_typed<T>(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).execute_typed(command, cancel)
    }

    fn execute_stream(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ResponseStream>> + Send {
        (**self).execute_stream(command, cancel)
    }
}

impl<D: CommandDispatcher> CommandDispatcher for &D {
    fn execute_text(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).execute_text(command, cancel)
    }

    fn execute_typed<T>(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).execute_typed(command, cancel)
    }

    fn execute_stream(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ResponseStream>> + Send {
        (**self).execute_stream(command, cancel)
    }
}

/// Drives `fut` to completion unless `cancel` fires first.
///
/// Transports wrap their request futures with this so that cancellation
/// drops the in-flight request and surfaces as [`ApiError::Cancelled`].
pub async fn run_cancellable<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiError::Cancelled),
        result = fut => result,
    }
}
