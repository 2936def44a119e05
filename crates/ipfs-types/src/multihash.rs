//! Content-addressed peer identifiers.
//!
//! A peer id is a multihash, `<varint code><varint length><digest>`, carried
//! as a base58btc string. The daemon accepts the string form verbatim as a
//! command argument.

use crate::error::{Result, TypeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Multihash code for SHA2-256 digests (`Qm...` peer ids).
pub const SHA2_256: u64 = 0x12;

/// Multihash code for inlined identity digests (`12D3Koo...` peer ids).
pub const IDENTITY: u64 = 0x00;

/// Longest varint accepted by the multiformats spec.
const MAX_VARINT_LEN: usize = 9;

/// A validated multihash, used as a peer identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MultiHash {
    bytes: Vec<u8>,
    code: u64,
    digest_offset: usize,
}

impl MultiHash {
    /// Builds a multihash from a hash function code and its digest.
    #[must_use]
    pub fn new(code: u64, digest: &[u8]) -> Self {
        let mut bytes = encode_varint(code);
        bytes.extend(encode_varint(digest.len() as u64));
        let digest_offset = bytes.len();
        bytes.extend_from_slice(digest);
        Self {
            bytes,
            code,
            digest_offset,
        }
    }

    /// Parses a multihash from its binary form.
    ///
    /// Non-minimal varint prefixes are accepted and re-encoded, so the
    /// result always holds the canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix varints are malformed or the digest
    /// length does not match the declared length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (code, code_len) = decode_varint(bytes)
            .ok_or_else(|| TypeError::invalid_peer_id("malformed hash code"))?;
        let rest = bytes.get(code_len..).unwrap_or_default();
        let (declared, len_len) = decode_varint(rest)
            .ok_or_else(|| TypeError::invalid_peer_id("malformed digest length"))?;
        let digest_offset = code_len + len_len;
        let actual = bytes.len() - digest_offset;
        if declared != actual as u64 {
            return Err(TypeError::invalid_peer_id(format!(
                "digest length mismatch: declared {declared}, found {actual}"
            )));
        }
        let digest = bytes.get(digest_offset..).unwrap_or_default();
        Ok(Self::new(code, digest))
    }

    /// Decodes a multihash from base58btc.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not base58 or not a multihash.
    pub fn from_base58(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(TypeError::invalid_peer_id("empty string"));
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| TypeError::invalid_peer_id(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Encodes the multihash as base58btc.
    #[must_use]
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }

    /// Returns the hash function code.
    #[must_use]
    pub const fn code(&self) -> u64 {
        self.code
    }

    /// Returns the digest bytes.
    #[must_use]
    pub fn digest(&self) -> &[u8] {
        self.bytes.get(self.digest_offset..).unwrap_or_default()
    }

    /// Returns the full binary multihash.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(2);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// Reads an unsigned LEB128 varint, returning the value and bytes consumed.
///
/// At most nine bytes are read, so the value never exceeds 63 bits.
fn decode_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

impl fmt::Debug for MultiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiHash({})", self.to_base58())
    }
}

impl fmt::Display for MultiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for MultiHash {
    type Err = TypeError;
    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl Serialize for MultiHash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for MultiHash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
