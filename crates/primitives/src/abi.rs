//! ARC-4 method-call scalars.
//!
//! Just enough of the application-call ABI to invoke token contract methods:
//! method selectors, the static argument encodings the token standards use,
//! and return-value extraction from the logged return payload.

use crate::{
    address::Address,
    codec::{self, CodecError},
};
use num_bigint::BigUint;
use sha2::{Digest, Sha512_256};

/// Marker prefixing the ABI return value in the last application log entry.
pub const RETURN_PREFIX: [u8; 4] = [0x15, 0x1f, 0x7c, 0x75];

/// Byte width of an ABI `uint256`.
pub const UINT256_LENGTH: usize = 32;

/// A contract method, identified by its full ARC-4 signature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Method {
    /// The full signature, e.g. `arc200_transfer(address,uint256)bool`.
    pub signature: &'static str,
}

impl Method {
    /// Define a method from its signature.
    pub const fn new(signature: &'static str) -> Self {
        Self { signature }
    }

    /// The 4-byte selector: the leading bytes of the SHA-512/256 digest of
    /// the signature.
    pub fn selector(&self) -> [u8; 4] {
        let digest = Sha512_256::digest(self.signature.as_bytes());
        let mut selector = [0; 4];
        selector.copy_from_slice(&digest[..4]);
        selector
    }
}

/// Encode an ABI `uint64`.
pub fn encode_uint64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Encode an ABI `uint8`.
pub fn encode_uint8(value: u8) -> Vec<u8> {
    vec![value]
}

/// Encode an ABI `uint256`, rejecting values over 2^256 - 1.
pub fn encode_uint256(value: &BigUint) -> Result<Vec<u8>, CodecError> {
    codec::uint_to_bytes(value, UINT256_LENGTH)
}

/// Encode an ABI `address`: the raw 32-byte public key.
pub fn encode_address(address: &Address) -> Vec<u8> {
    address.as_bytes().to_vec()
}

/// Encode an ABI `byte[N]` static array. The caller is responsible for
/// having padded `bytes` to the declared width.
pub fn encode_fixed_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec()
}

/// Extract the ABI return payload from an application log entry, if the
/// entry carries the return marker.
pub fn return_payload(log: &[u8]) -> Option<&[u8]> {
    log.strip_prefix(RETURN_PREFIX.as_slice())
}

/// Decode an ABI `bool` return value.
pub fn decode_bool(payload: &[u8]) -> bool {
    payload.first().is_some_and(|b| b & 0x80 != 0)
}

/// Decode an ABI `uint64` return value.
pub fn decode_uint64(payload: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = payload.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Decode an ABI `uintN` return value of any width.
pub fn decode_uint(payload: &[u8]) -> BigUint {
    codec::bytes_to_uint(payload)
}

/// Decode an ABI `address` return value.
pub fn decode_address(payload: &[u8]) -> Option<Address> {
    let bytes: [u8; 32] = payload.try_into().ok()?;
    Some(Address(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_stable_and_distinct() {
        let transfer = Method::new("arc200_transfer(address,uint256)bool");
        let approve = Method::new("arc200_approve(address,uint256)bool");
        assert_eq!(transfer.selector(), transfer.selector());
        assert_ne!(transfer.selector(), approve.selector());
    }

    #[test]
    fn uint256_encoding_width() {
        let encoded = encode_uint256(&BigUint::from(1u32)).unwrap();
        assert_eq!(encoded.len(), UINT256_LENGTH);
        assert_eq!(encoded[31], 1);
        assert!(encode_uint256(&(BigUint::from(1u32) << 256)).is_err());
    }

    #[test]
    fn return_payload_requires_marker() {
        let mut log = RETURN_PREFIX.to_vec();
        log.push(0x80);
        assert_eq!(return_payload(&log), Some([0x80].as_slice()));
        assert_eq!(return_payload(b"unrelated log"), None);
    }

    #[test]
    fn uint64_decoding_requires_8_bytes() {
        assert_eq!(decode_uint64(&encode_uint64(12345)), Some(12345));
        assert_eq!(decode_uint64(&[0; 7]), None);
        assert_eq!(decode_uint64(&[0; 9]), None);
    }

    #[test]
    fn bool_decoding() {
        assert!(decode_bool(&[0x80]));
        assert!(!decode_bool(&[0x00]));
        assert!(!decode_bool(&[]));
    }

    #[test]
    fn address_roundtrip_through_abi() {
        let address = Address([7; 32]);
        let encoded = encode_address(&address);
        assert_eq!(decode_address(&encoded), Some(address));
        assert_eq!(decode_address(&encoded[..31]), None);
    }
}
