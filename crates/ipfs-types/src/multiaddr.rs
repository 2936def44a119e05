//! Multi-transport addresses (`/ip4/1.2.3.4/tcp/4001/p2p/Qm...`).
//!
//! Only the text form is modelled. Each component is a protocol name,
//! optionally followed by one value whose shape depends on the protocol.
//! Protocols outside the table below are passed through: an unknown name
//! takes the next segment as its value unless that segment is itself a
//! known protocol.

use crate::error::{Result, TypeError};
use crate::multihash::MultiHash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Value carried by a protocol component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    None,
    Ipv4,
    Ipv6,
    Port,
    Host,
    PeerId,
    /// Any non-empty segment (`certhash`, `ip6zone`, `onion3`, ...).
    Opaque,
    /// Every remaining segment (`unix` socket paths).
    Path,
}

fn value_kind(protocol: &str) -> Option<ValueKind> {
    let kind = match protocol {
        "ip4" => ValueKind::Ipv4,
        "ip6" => ValueKind::Ipv6,
        "tcp" | "udp" | "dccp" | "sctp" => ValueKind::Port,
        "dns" | "dns4" | "dns6" | "dnsaddr" | "sni" => ValueKind::Host,
        "ipfs" | "p2p" => ValueKind::PeerId,
        "certhash" | "ip6zone" | "ipcidr" | "onion" | "onion3" | "garlic32" | "garlic64"
        | "memory" | "http-path" => ValueKind::Opaque,
        "unix" => ValueKind::Path,
        "quic" | "quic-v1" | "ws" | "wss" | "http" | "https" | "p2p-circuit"
        | "webtransport" | "webrtc" | "webrtc-direct" | "tls" | "noise" | "utp" | "udt"
        | "p2p-webrtc-direct" | "p2p-webrtc-star" | "p2p-websocket-star" | "plaintextv2" => {
            ValueKind::None
        }
        _ => return None,
    };
    Some(kind)
}

/// One `/protocol[/value]` segment of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    protocol: String,
    value: Option<String>,
}

impl Component {
    /// Returns the protocol name.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Returns the protocol value, if the protocol carries one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A validated multiaddress in canonical text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiAddress {
    components: Vec<Component>,
}

impl MultiAddress {
    /// Parses a multiaddress from text.
    ///
    /// A single trailing slash is tolerated and dropped from the canonical
    /// form.
    ///
    /// # Errors
    ///
    /// Returns an error for missing or malformed values of known protocols,
    /// malformed protocol names, and empty components.
    pub fn parse(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix('/')
            .ok_or_else(|| TypeError::invalid_address(s, "must start with '/'"))?;
        let body = body.strip_suffix('/').unwrap_or(body);
        if body.is_empty() {
            return Err(TypeError::invalid_address(s, "no components"));
        }

        let mut parts = body.split('/').peekable();
        let mut components = Vec::new();
        while let Some(protocol) = parts.next() {
            if protocol.is_empty() {
                return Err(TypeError::invalid_address(s, "empty component"));
            }
            let value = match value_kind(protocol) {
                Some(ValueKind::None) => None,
                Some(ValueKind::Path) => {
                    let rest: Vec<&str> = parts.by_ref().collect();
                    if rest.iter().all(|segment| segment.is_empty()) {
                        return Err(TypeError::invalid_address(
                            s,
                            format!("protocol '{protocol}' needs a value"),
                        ));
                    }
                    Some(rest.join("/"))
                }
                Some(kind) => {
                    let raw = parts.next().filter(|v| !v.is_empty()).ok_or_else(|| {
                        TypeError::invalid_address(
                            s,
                            format!("protocol '{protocol}' needs a value"),
                        )
                    })?;
                    validate_value(kind, raw).map_err(|message| {
                        TypeError::invalid_address(s, format!("{protocol}: {message}"))
                    })?;
                    Some(raw.to_string())
                }
                None => {
                    if !is_protocol_name(protocol) {
                        return Err(TypeError::invalid_address(
                            s,
                            format!("invalid protocol name '{protocol}'"),
                        ));
                    }
                    parts
                        .next_if(|next| !next.is_empty() && value_kind(next).is_none())
                        .map(str::to_string)
                }
            };
            components.push(Component {
                protocol: protocol.to_string(),
                value,
            });
        }

        Ok(Self { components })
    }

    /// Returns the address components in order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns the peer id of a trailing `/p2p/<id>` or `/ipfs/<id>` component.
    #[must_use]
    pub fn peer_id(&self) -> Option<MultiHash> {
        let last = self.components.last()?;
        match last.protocol.as_str() {
            "p2p" | "ipfs" => last.value.as_deref().and_then(|v| v.parse().ok()),
            _ => None,
        }
    }
}

/// Protocol names are lowercase ASCII words joined by `-`.
fn is_protocol_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate_value(kind: ValueKind, raw: &str) -> std::result::Result<(), String> {
    match kind {
        ValueKind::None | ValueKind::Opaque | ValueKind::Path => Ok(()),
        ValueKind::Ipv4 => raw
            .parse::<Ipv4Addr>()
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ValueKind::Ipv6 => raw
            .parse::<Ipv6Addr>()
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ValueKind::Port => raw.parse::<u16>().map(|_| ()).map_err(|e| e.to_string()),
        ValueKind::Host => {
            let valid = raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
            if valid {
                Ok(())
            } else {
                Err(format!("invalid host name '{raw}'"))
            }
        }
        ValueKind::PeerId => MultiHash::from_base58(raw)
            .map(|_| ())
            .map_err(|e| e.to_string()),
    }
}

impl fmt::Display for MultiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            write!(f, "/{}", component.protocol)?;
            if let Some(value) = &component.value {
                write!(f, "/{value}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for MultiAddress {
    type Err = TypeError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for MultiAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MultiAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const PEER: &str = "QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ";

    #[test_case("/ip4/104.131.131.82/tcp/4001" ; "ipv4 tcp")]
    #[test_case("/ip6/::1/udp/4001/quic-v1" ; "ipv6 quic")]
    #[test_case("/dnsaddr/bootstrap.libp2p.io" ; "dnsaddr")]
    #[test_case("/dns4/example.com/tcp/443/wss" ; "websocket")]
    #[test_case("/p2p-circuit" ; "bare circuit")]
    #[test_case("/ip6zone/eth0/ip6/fe80::1/tcp/4001" ; "ipv6 zone")]
    #[test_case("/dns4/example.com/tcp/443/tls/sni/example.com/ws" ; "tls sni")]
    #[test_case("/onion3/vww6ybal4bd7szmgncyruucpgfkqahzddi37ktceo3ah7ngmcopnpyyd:1234" ; "onion3")]
    #[test_case("/ip4/1.2.3.4/udp/4001/webrtc-direct/certhash/uEiDDq4_xNyDorZBH3TlGazyJdOWSwvo4PUo5YHFMrvDE8g" ; "webrtc direct")]
    #[test_case("/unix/tmp/ipfs/api.sock" ; "unix path")]
    #[test_case("/ip4/1.2.3.4/tcp/1/future-proto/abc/ws" ; "unknown protocol with value")]
    #[test_case("/ip4/1.2.3.4/tcp/1/future-proto/ws" ; "unknown protocol without value")]
    fn test_parse_is_canonical(text: &str) {
        let addr: MultiAddress = text.parse().expect("valid address");
        assert_eq!(addr.to_string(), text);
    }

    #[test_case("ip4/1.2.3.4" ; "missing leading slash")]
    #[test_case("/" ; "no components")]
    #[test_case("/ip4" ; "missing value")]
    #[test_case("/ip4/1.2.3.999" ; "bad ipv4")]
    #[test_case("/ip4/1.2.3.4/tcp/70000" ; "port out of range")]
    #[test_case("/ip4/1.2.3.4//tcp/1" ; "empty component")]
    #[test_case("/Carrier_Pigeon/1" ; "malformed protocol name")]
    #[test_case("/unix" ; "unix without path")]
    #[test_case("/certhash" ; "certhash without value")]
    #[test_case("/dns/bad_host" ; "bad host")]
    #[test_case("/p2p/not-a-peer" ; "bad peer id")]
    fn test_parse_rejects(text: &str) {
        assert!(MultiAddress::parse(text).is_err());
    }

    #[test]
    fn test_unknown_protocol_components() {
        let addr = MultiAddress::parse("/ip4/1.2.3.4/tcp/1/future-proto/abc/ws").expect("parse");
        let future = &addr.components()[2];
        assert_eq!(future.protocol(), "future-proto");
        assert_eq!(future.value(), Some("abc"));
        assert_eq!(addr.components()[3].protocol(), "ws");

        let bare = MultiAddress::parse("/ip4/1.2.3.4/tcp/1/future-proto/ws").expect("parse");
        assert_eq!(bare.components()[2].value(), None);
        assert_eq!(bare.components().len(), 4);
    }

    #[test]
    fn test_unix_path_takes_remaining_segments() {
        let addr = MultiAddress::parse("/unix/tmp/ipfs/api.sock").expect("parse");
        assert_eq!(addr.components().len(), 1);
        assert_eq!(addr.components()[0].value(), Some("tmp/ipfs/api.sock"));
    }

    #[test]
    fn test_webtransport_address_keeps_peer_id() {
        let text = format!(
            "/ip4/147.75.87.27/udp/4001/quic-v1/webtransport\
             /certhash/uEiAkH5a4DPGKUuOBjYw0CgwjvcJCJMD2K_1hh3T0ho6bkQ\
             /certhash/uEiDmyEzTaGKbrF5pE8NaKrGTPlHrqAGODwiZS2YQbuZ46A/p2p/{PEER}"
        );
        let addr = MultiAddress::parse(&text).expect("parse");
        assert_eq!(addr.to_string(), text);
        assert_eq!(addr.peer_id().map(|id| id.to_string()).as_deref(), Some(PEER));
    }

    #[test]
    fn test_trailing_slash_dropped() {
        let addr = MultiAddress::parse("/ip4/127.0.0.1/tcp/4001/").expect("parse");
        assert_eq!(addr.to_string(), "/ip4/127.0.0.1/tcp/4001");
    }

    #[test]
    fn test_components() {
        let addr = MultiAddress::parse("/ip4/127.0.0.1/tcp/4001/ws").expect("parse");
        let protocols: Vec<_> = addr.components().iter().map(Component::protocol).collect();
        assert_eq!(protocols, ["ip4", "tcp", "ws"]);
        assert_eq!(addr.components()[1].value(), Some("4001"));
        assert_eq!(addr.components()[2].value(), None);
    }

    #[test]
    fn test_peer_id_extraction() {
        let text = format!("/ip4/104.131.131.82/tcp/4001/p2p/{PEER}");
        let addr = MultiAddress::parse(&text).expect("parse");
        let id = addr.peer_id().expect("peer id");
        assert_eq!(id.to_string(), PEER);

        let legacy = MultiAddress::parse(&format!("/ipfs/{PEER}")).expect("parse");
        assert!(legacy.peer_id().is_some());

        let bare = MultiAddress::parse("/ip4/1.2.3.4/tcp/1").expect("parse");
        assert!(bare.peer_id().is_none());
    }

    #[test]
    fn test_serde_string_form() {
        let addr = MultiAddress::parse("/ip4/10.0.0.1/udp/4001/quic").expect("parse");
        let json = serde_json::to_string(&addr).expect("serialize");
        assert_eq!(json, "\"/ip4/10.0.0.1/udp/4001/quic\"");
        let back: MultiAddress = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, addr);
    }
}
