//! Typed daemon operations built on a [`CommandDispatcher`].

use ipfs_types::{MultiAddress, MultiHash, Peer, VersionInfo};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::command::Command;
use crate::config::ApiConfig;
use crate::dispatch::CommandDispatcher;
use crate::error::{ApiError, Result};
use crate::ping::PingStream;

/// Body of a `resolve` response.
#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(rename = "Path")]
    path: String,
}

/// Client-side view of the daemon's generic commands.
///
/// Holds no per-call state, so one instance can serve many tasks as long as
/// the dispatcher can.
#[derive(Debug, Clone)]
pub struct GenericApi<D> {
    dispatcher: D,
    config: ApiConfig,
}

impl<D: CommandDispatcher> GenericApi<D> {
    /// Creates an API over `dispatcher` with default settings.
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            config: ApiConfig::default(),
        }
    }

    /// Creates an API over `dispatcher` with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `config` fails [`ApiConfig::validate`].
    pub fn with_config(dispatcher: D, config: ApiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { dispatcher, config })
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Identity of `peer`, or of the local daemon when `peer` is `None`.
    pub async fn id(&self, peer: Option<&MultiHash>, cancel: &CancellationToken) -> Result<Peer> {
        let command = Command::new("id").with_optional_argument(peer.map(MultiHash::to_base58));
        debug!(%command, "dispatching");
        self.dispatcher.execute_typed(&command, cancel).await
    }

    /// Pings a peer by id, sending `count` probes (default from config).
    ///
    /// The returned stream yields results while the daemon is still probing.
    pub async fn ping_peer(
        &self,
        peer: &MultiHash,
        count: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<PingStream> {
        self.ping(peer.to_base58(), count, cancel).await
    }

    /// Pings a peer at a multiaddress, sending `count` probes (default from config).
    pub async fn ping_address(
        &self,
        address: &MultiAddress,
        count: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<PingStream> {
        self.ping(address.to_string(), count, cancel).await
    }

    async fn ping(
        &self,
        target: String,
        count: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<PingStream> {
        let command = Command::new("ping")
            .with_argument(target)
            .with_count("count", count.unwrap_or(self.config.default_ping_count));
        debug!(%command, "dispatching");
        let body = self.dispatcher.execute_stream(&command, cancel).await?;
        Ok(PingStream::new(body, cancel, self.config.max_line_length))
    }

    /// Resolves an IPFS/IPNS name to a path.
    ///
    /// `recursive` defaults to the configured value (normally `true`).
    pub async fn resolve(
        &self,
        name: &str,
        recursive: Option<bool>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let command = Command::new("resolve").with_argument(name).with_bool(
            "recursive",
            recursive.unwrap_or(self.config.default_recursive),
        );
        debug!(%command, "dispatching");
        let body = self.dispatcher.execute_text(&command, cancel).await?;
        let response: ResolveResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("invalid resolve response: {e}")))?;
        Ok(response.path)
    }

    /// Asks the daemon to stop.
    pub async fn shutdown(&self, cancel: &CancellationToken) -> Result<()> {
        let command = Command::new("shutdown");
        debug!(%command, "dispatching");
        self.dispatcher.execute_text(&command, cancel).await?;
        Ok(())
    }

    /// Version and build information of the daemon.
    pub async fn version(&self, cancel: &CancellationToken) -> Result<VersionInfo> {
        let command = Command::new("version");
        debug!(%command, "dispatching");
        self.dispatcher.execute_typed(&command, cancel).await
    }
}
