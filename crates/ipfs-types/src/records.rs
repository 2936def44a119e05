//! Records returned by daemon commands.

use crate::multiaddr::MultiAddress;
use crate::multihash::MultiHash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Build and commit information reported by the `version` command.
///
/// Keys are taken verbatim from the daemon (`Version`, `Commit`, `Repo`, ...).
pub type VersionInfo = HashMap<String, String>;

/// Identity of a peer, as reported by the `id` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Peer {
    /// Peer id.
    #[serde(rename = "ID")]
    pub id: MultiHash,

    /// Base64 encoded public key.
    #[serde(default)]
    pub public_key: Option<String>,

    /// Addresses the peer listens on.
    #[serde(default)]
    pub addresses: Vec<MultiAddress>,

    /// Implementation name and version (e.g. "go-ipfs/0.4.5/").
    #[serde(default)]
    pub agent_version: Option<String>,

    /// Protocol version (e.g. "ipfs/0.1.0").
    #[serde(default)]
    pub protocol_version: Option<String>,
}

/// One probe of a `ping` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResult {
    /// Whether the probe reached the peer.
    pub success: bool,
    /// Diagnostic or timing message from the daemon.
    pub text: String,
    /// Measured round trip time.
    pub time: Duration,
}

impl PingResult {
    /// Creates a result from a round trip time in nanoseconds.
    #[must_use]
    pub fn from_nanos(success: bool, text: impl Into<String>, time_ns: u64) -> Self {
        Self {
            success,
            text: text.into(),
            time: Duration::from_nanos(time_ns),
        }
    }

    /// Round trip time in fractional milliseconds.
    #[must_use]
    pub fn time_ms(&self) -> f64 {
        self.time.as_secs_f64() * 1_000.0
    }
}
