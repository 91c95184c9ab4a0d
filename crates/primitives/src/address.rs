//! Account addresses.
//!
//! An account is identified by a raw 32-byte ed25519 public key. The
//! human-readable form is 58 characters of unpadded RFC 4648 base32 over the
//! public key followed by the last four bytes of its SHA-512/256 digest.

use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};
use std::{fmt, str::FromStr};

/// Byte length of a raw public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Byte length of the address checksum trailer.
const CHECKSUM_LENGTH: usize = 4;

/// Errors raised while parsing a human-readable address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The base32 payload was malformed.
    #[error("invalid base32: {0}")]
    Base32(#[from] data_encoding::DecodeError),
    /// The decoded payload was not public key + checksum sized.
    #[error("decoded address is {0} bytes, expected 36")]
    Length(usize),
    /// The checksum trailer did not match the public key.
    #[error("address checksum mismatch")]
    Checksum,
}

/// A raw 32-byte account public key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; PUBLIC_KEY_LENGTH]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0; PUBLIC_KEY_LENGTH]);

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// The escrow address of an application, derived from its id.
    pub fn from_app_id(app_id: u64) -> Self {
        let mut hasher = Sha512_256::new();
        hasher.update(b"appID");
        hasher.update(app_id.to_be_bytes());
        Self(hasher.finalize().into())
    }

    fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
        let digest = Sha512_256::digest(self.0);
        let mut checksum = [0; CHECKSUM_LENGTH];
        checksum.copy_from_slice(&digest[PUBLIC_KEY_LENGTH - CHECKSUM_LENGTH..]);
        checksum
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for Address {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = [0; PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH];
        payload[..PUBLIC_KEY_LENGTH].copy_from_slice(&self.0);
        payload[PUBLIC_KEY_LENGTH..].copy_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&payload))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = BASE32_NOPAD.decode(s.as_bytes())?;
        if payload.len() != PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH {
            return Err(AddressError::Length(payload.len()));
        }
        let mut key = [0; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(&payload[..PUBLIC_KEY_LENGTH]);
        let address = Self(key);
        if payload[PUBLIC_KEY_LENGTH..] != address.checksum() {
            return Err(AddressError::Checksum);
        }
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_encoding() {
        // well-known encoding of the all-zero public key
        assert_eq!(
            Address::ZERO.to_string(),
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ"
        );
    }

    #[test]
    fn display_parse_roundtrip() {
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let address = Address(key);
        let encoded = address.to_string();
        assert_eq!(encoded.len(), 58);
        assert_eq!(encoded.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let encoded = Address::ZERO.to_string();
        // flip a character inside the key part
        let mut corrupted = encoded.into_bytes();
        corrupted[0] = b'B';
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert_eq!(
            corrupted.parse::<Address>(),
            Err(AddressError::Checksum)
        );
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            "AAAA".parse::<Address>(),
            Err(AddressError::Length(_))
        ));
        assert!(matches!(
            "not base32!".parse::<Address>(),
            Err(AddressError::Base32(_))
        ));
    }

    #[test]
    fn app_escrow_address_is_stable() {
        let a = Address::from_app_id(42);
        let b = Address::from_app_id(42);
        assert_eq!(a, b);
        assert_ne!(a, Address::from_app_id(43));
        // derived addresses still carry a valid checksum encoding
        assert_eq!(a.to_string().parse::<Address>().unwrap(), a);
    }
}
