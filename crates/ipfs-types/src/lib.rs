//! Value types for the IPFS HTTP API.
//!
//! Peer ids and multiaddresses are treated as validated tokens with a
//! canonical string form. They are passed through to daemon commands
//! verbatim; this crate does not model the libp2p data structures behind
//! them.
//!
//! # Example
//!
//! ```rust
//! use ipfs_types::{MultiAddress, MultiHash};
//!
//! # fn example() -> ipfs_types::Result<()> {
//! let peer: MultiHash = "QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ".parse()?;
//! let addr: MultiAddress = format!("/ip4/104.131.131.82/tcp/4001/p2p/{peer}").parse()?;
//! assert_eq!(addr.peer_id(), Some(peer));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod multiaddr;
pub mod multihash;
pub mod records;

pub use error::{Result, TypeError};
pub use multiaddr::{Component, MultiAddress};
pub use multihash::MultiHash;
pub use records::{Peer, PingResult, VersionInfo};
