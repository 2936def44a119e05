//! Typed client operations for the IPFS HTTP command API.
//!
//! This crate turns method calls (identify, ping, resolve, version,
//! shutdown) into generic daemon commands and decodes the responses. The
//! HTTP transport itself lives behind the [`CommandDispatcher`] trait, which
//! offers three response shapes:
//!
//! - text, for small bodies decoded here (`resolve`)
//! - typed, for bodies the transport maps straight onto a record (`id`, `version`)
//! - an open byte stream, for bodies consumed as they arrive (`ping`)
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use ipfs_api::{CommandDispatcher, GenericApi};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example<D: CommandDispatcher>(transport: D) -> ipfs_api::Result<()> {
//! let api = GenericApi::new(transport);
//! let cancel = CancellationToken::new();
//!
//! let peer: ipfs_api::MultiHash = "QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ".parse()?;
//! let mut pings = api.ping_peer(&peer, Some(3), &cancel).await?;
//! while let Some(result) = pings.next().await {
//!     let result = result?;
//!     println!("{} {:?}", result.text, result.time);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ping;

pub use api::GenericApi;
pub use command::Command;
pub use config::ApiConfig;
pub use dispatch::{CommandDispatcher, ResponseStream, run_cancellable};
pub use error::{ApiError, Result};
pub use ping::{PingStream, decode_ping_line};
pub use ipfs_types::{MultiAddress, MultiHash, Peer, PingResult, VersionInfo};
