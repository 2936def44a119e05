//! Scripted dispatcher shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use ipfs_api::{ApiError, Command, CommandDispatcher, ResponseStream, Result, run_cancellable};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio_util::sync::CancellationToken;

/// A canned reply for one dispatcher call.
pub enum Reply {
    /// Full response body (text or JSON).
    Body(String),
    /// Open response body.
    Stream(ResponseStream),
    /// Transport failure with the given message.
    Fail(String),
    /// Never completes; only cancellation ends the call.
    Hang,
}

/// Fake transport that replays canned replies per command name and records
/// every command it receives.
#[derive(Default)]
pub struct FakeDispatcher {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Arc<Mutex<Vec<Command>>>,
}

impl FakeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next call of `command`.
    #[must_use]
    pub fn with_reply(self, command: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("lock")
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queues a JSON/text body for the next call of `command`.
    #[must_use]
    pub fn with_body(self, command: &str, body: &str) -> Self {
        self.with_reply(command, Reply::Body(body.to_string()))
    }

    /// Commands received so far, in call order.
    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().expect("lock").clone()
    }

    fn next_reply(&self, command: &Command) -> Reply {
        self.calls.lock().expect("lock").push(command.clone());
        self.replies
            .lock()
            .expect("lock")
            .get_mut(command.name())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Reply::Fail(format!("no reply scripted for '{}'", command.name())))
    }

    async fn body(&self, command: &Command, cancel: &CancellationToken) -> Result<String> {
        let reply = self.next_reply(command);
        run_cancellable(cancel, async move {
            match reply {
                Reply::Body(body) => Ok(body),
                Reply::Stream(_) => Err(ApiError::transport("stream reply for text call")),
                Reply::Fail(message) => Err(ApiError::transport(message)),
                Reply::Hang => std::future::pending().await,
            }
        })
        .await
    }
}

impl CommandDispatcher for FakeDispatcher {
    async fn execute_text(&self, command: &Command, cancel: &CancellationToken) -> Result<String> {
        self.body(command, cancel).await
    }

    async fn execute_typed<T>(&self, command: &Command, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let body = self.body(command, cancel).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn execute_stream(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> Result<ResponseStream> {
        let reply = self.next_reply(command);
        run_cancellable(cancel, async move {
            match reply {
                Reply::Stream(stream) => Ok(stream),
                Reply::Body(body) => {
                    let stream: ResponseStream = Box::new(std::io::Cursor::new(body.into_bytes()));
                    Ok(stream)
                }
                Reply::Fail(message) => Err(ApiError::transport(message)),
                Reply::Hang => std::future::pending().await,
            }
        })
        .await
    }
}

/// Formats one `ping` response line.
pub fn ping_line(success: bool, text: &str, time_ns: u64) -> String {
    format!("{{\"Success\":{success},\"Text\":\"{text}\",\"Time\":{time_ns}}}\n")
}

/// Creates an open response body and the daemon-side writer feeding it.
pub fn live_body() -> (DuplexStream, Reply) {
    let (daemon, client) = tokio::io::duplex(64 * 1024);
    (daemon, Reply::Stream(Box::new(client)))
}

/// Writes a ping line to a live body.
pub async fn send_line(daemon: &mut DuplexStream, line: &str) -> std::io::Result<()> {
    daemon.write_all(line.as_bytes()).await?;
    daemon.flush().await
}
