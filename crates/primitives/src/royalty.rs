//! The fixed-layout NFT royalty record.

use crate::{
    address::Address,
    codec::{self, CodecError},
};

/// Encoded size: four 2-byte point fields followed by three 32-byte keys.
pub const ROYALTY_RECORD_LENGTH: usize = 2 + 2 + 2 + 2 + 32 * 3;

/// Royalty split for an NFT-style asset: an overall royalty share and up to
/// three creators, each with a point share and a payout address.
///
/// Point values are basis-point style weights that must fit in two bytes
/// (0..=65535). Unused creator slots carry zero points and the zero address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RoyaltyRecord {
    /// Overall royalty points.
    pub royalty_points: u64,
    /// Per-creator points, in slot order.
    pub creator_points: [u64; 3],
    /// Per-creator payout addresses, in slot order.
    pub creators: [Address; 3],
}

impl RoyaltyRecord {
    /// Pack the record into its flat 104-byte wire form.
    ///
    /// Layout, in order and with no separators: royalty points (2 bytes,
    /// big-endian), the three creator point fields (2 bytes each), then the
    /// three raw creator public keys (32 bytes each). Fails with
    /// [`CodecError::Overflow`] if any point value exceeds 65535.
    pub fn encode(&self) -> Result<[u8; ROYALTY_RECORD_LENGTH], CodecError> {
        let mut out = [0; ROYALTY_RECORD_LENGTH];
        out[0..2].copy_from_slice(&codec::u64_to_bytes(self.royalty_points, 2)?);
        for (i, points) in self.creator_points.iter().enumerate() {
            let offset = 2 + i * 2;
            out[offset..offset + 2].copy_from_slice(&codec::u64_to_bytes(*points, 2)?);
        }
        for (i, creator) in self.creators.iter().enumerate() {
            let offset = 8 + i * 32;
            out[offset..offset + 32].copy_from_slice(creator.as_bytes());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_always_104_bytes() {
        let record = RoyaltyRecord {
            royalty_points: 250,
            creator_points: [5000, 3000, 2000],
            creators: [Address([1; 32]), Address([2; 32]), Address::ZERO],
        };
        assert_eq!(record.encode().unwrap().len(), ROYALTY_RECORD_LENGTH);
    }

    #[test]
    fn field_order_matches_layout() {
        let a = Address([0xaa; 32]);
        let b = Address([0xbb; 32]);
        let c = Address([0xcc; 32]);
        let record = RoyaltyRecord {
            royalty_points: 10,
            creator_points: [20, 30, 40],
            creators: [a, b, c],
        };
        let encoded = record.encode().unwrap();

        let mut expected = Vec::new();
        for points in [10u64, 20, 30, 40] {
            expected.extend_from_slice(&codec::u64_to_bytes(points, 2).unwrap());
        }
        expected.extend_from_slice(a.as_bytes());
        expected.extend_from_slice(b.as_bytes());
        expected.extend_from_slice(c.as_bytes());
        assert_eq!(encoded.as_slice(), expected.as_slice());
    }

    #[test]
    fn point_overflow_is_rejected() {
        let record = RoyaltyRecord {
            royalty_points: 65536,
            creator_points: [0; 3],
            creators: [Address::ZERO; 3],
        };
        assert!(record.encode().is_err());

        let record = RoyaltyRecord {
            royalty_points: 65535,
            creator_points: [0; 3],
            creators: [Address::ZERO; 3],
        };
        let encoded = record.encode().unwrap();
        assert_eq!(&encoded[0..2], &[0xff, 0xff]);
    }
}
