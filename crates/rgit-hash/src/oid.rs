use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_encode};
use crate::HashError;

/// A content address: the SHA-1 hash of an object's framed bytes.
///
/// The same framed bytes always yield the same id, which makes this both
/// the key of the loose object store and the identifier that the wire
/// protocol uses for refs and delta bases.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// Raw digest length in bytes.
    pub const LEN: usize = 20;

    /// Hex rendering length.
    pub const HEX_LEN: usize = 40;

    /// The null id (all zeros).
    pub const NULL: Self = Self([0u8; 20]);

    /// Create an id from exactly 20 raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != Self::LEN {
            return Err(HashError::InvalidHashLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Parse a 40-character hex string (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if hex.len() != Self::HEX_LEN {
            return Err(HashError::InvalidHexLength {
                expected: Self::HEX_LEN,
                actual: hex.len(),
            });
        }
        let mut bytes = [0u8; 20];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check whether this is the null (all-zeros) id.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Lowercase 40-character hex rendering.
    pub fn to_hex(&self) -> String {
        let mut buf = [0u8; Self::HEX_LEN];
        hex_encode(&self.0, &mut buf);
        // SAFETY: hex_encode only writes ASCII hex digits.
        unsafe { std::str::from_utf8_unchecked(&buf) }.to_string()
    }

    /// The loose object path component: `"xx/xxxx..."`.
    pub fn loose_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
