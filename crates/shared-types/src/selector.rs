//! # Function Selector Codec
//!
//! A selector is the fixed-width key identifying one routable function on a
//! diamond. Upstream events deliver selectors as a single packed byte string
//! (`N * 4` bytes, no separators); this module decodes that packing into
//! individually addressable keys and defines the canonical text rendering
//! used everywhere a selector becomes a map key.
//!
//! The codec is pure and stateless. Decoding a malformed packing is a
//! recoverable error: callers log it and skip the whole packed value.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Width of one selector in bytes.
pub const SELECTOR_WIDTH: usize = 4;

/// A 4-byte function selector.
///
/// The canonical text form is `0x` followed by exactly 8 lowercase hex
/// digits. It is injective and stable across runs, which makes it safe to
/// use as an index key and to compare across exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; SELECTOR_WIDTH]);

impl Selector {
    /// Canonical lowercase hex rendering, e.g. `0x1f931c1c`.
    pub fn to_hex(self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse the canonical text form back into a selector.
    ///
    /// Accepts the `0x` prefix as optional; the digit count must be exact.
    pub fn from_hex(s: &str) -> Result<Self, SelectorCodecError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| SelectorCodecError::InvalidHex {
            input: s.to_string(),
        })?;
        let raw: [u8; SELECTOR_WIDTH] =
            bytes
                .try_into()
                .map_err(|_| SelectorCodecError::InvalidHex {
                    input: s.to_string(),
                })?;
        Ok(Self(raw))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; SELECTOR_WIDTH]> for Selector {
    fn from(raw: [u8; SELECTOR_WIDTH]) -> Self {
        Self(raw)
    }
}

// Selectors serialize as their canonical hex form so that exports, the
// replay transport, and index keys all agree on one rendering.
impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Selector::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Errors from decoding packed selector bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorCodecError {
    /// Packed input length is not a multiple of the selector width.
    #[error("packed selector data of {len} bytes is not a multiple of {SELECTOR_WIDTH}")]
    TruncatedInput { len: usize },

    /// Text form is not valid selector hex.
    #[error("invalid selector hex: {input}")]
    InvalidHex { input: String },
}

/// Serde helper for packed selector byte strings: serializes as `0x`-hex
/// so JSON event logs stay readable and round-trip exactly.
///
/// Use as `#[serde(with = "shared_types::selector::packed_hex")]`.
pub mod packed_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(D::Error::custom)
    }
}

/// Decode a packed byte string into its ordered sequence of selectors.
///
/// The input must be exactly `N * 4` bytes; any remainder rejects the whole
/// packed value. An empty input decodes to an empty sequence.
pub fn decode_packed(packed: &[u8]) -> Result<Vec<Selector>, SelectorCodecError> {
    if packed.len() % SELECTOR_WIDTH != 0 {
        return Err(SelectorCodecError::TruncatedInput { len: packed.len() });
    }

    Ok(packed
        .chunks_exact(SELECTOR_WIDTH)
        .map(|chunk| {
            // chunks_exact guarantees the width
            let mut raw = [0u8; SELECTOR_WIDTH];
            raw.copy_from_slice(chunk);
            Selector(raw)
        })
        .collect())
}
