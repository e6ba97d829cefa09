use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A big-endian, 32-byte encoded unsigned integer.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Uint256(pub [u8; 32]);

impl Uint256 {
    /// Encoded length in bytes.
    pub const LEN: usize = 32;

    /// Encodes the provided value.
    pub fn encode(value: U256) -> Self {
        let mut bytes = [0u8; 32];

        for (i, b) in bytes.iter_mut().enumerate() {
            *b = value.byte(Self::LEN - 1 - i);
        }

        Self(bytes)
    }

    /// Decodes the underlying value.
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the `0x` prefixed hexadecimal representation.
    pub fn to_hex(&self) -> String {
        const_hex::encode_prefixed(self.0)
    }
}

impl From<U256> for Uint256 {
    fn from(value: U256) -> Self {
        Self::encode(value)
    }
}

impl TryFrom<&[u8]> for Uint256 {
    type Error = anyhow::Error;

    fn try_from(bytes: &[u8]) -> anyhow::Result<Self> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            anyhow::anyhow!(
                "invalid uint256 length; expected {}, got {}",
                Self::LEN,
                bytes.len()
            )
        })?;

        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Uint256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({})", self.to_hex())
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[test]
fn encodes_big_endian() {
    let encoded = Uint256::encode(U256::from(0x0102u64));

    assert_eq!(&encoded.0[..30], &[0u8; 30]);
    assert_eq!(&encoded.0[30..], &[0x01, 0x02]);
}

#[test]
fn hex_is_prefixed_and_padded() {
    let hex = Uint256::encode(U256::one()).to_hex();

    assert_eq!(hex.len(), 2 + 64);
    assert!(hex.starts_with("0x"));
    assert!(hex.ends_with("01"));
}

#[test]
fn rejects_wrong_length() {
    assert!(Uint256::try_from(&[0u8; 31][..]).is_err());
    assert!(Uint256::try_from(&[0u8; 32][..]).is_ok());
}
