//! Fixed-width field and big-endian integer codecs.
//!
//! Token contracts store text in fixed-width global state slots, padded with
//! trailing zero bytes, and amounts as big-endian byte strings with no length
//! limit. These helpers convert between those wire forms and native values.

use num_bigint::BigUint;
use num_traits::Zero;

/// Errors raised by the integer encoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The value does not fit in the requested number of bytes.
    #[error("value {value} cannot be represented in {width} bytes")]
    Overflow {
        /// The value that was being encoded.
        value: BigUint,
        /// The requested width in bytes.
        width: usize,
    },
}

/// Pad `input` with trailing zero bytes up to `width` bytes.
///
/// Widths are measured in UTF-8 bytes, since the padded value is consumed
/// downstream as a raw byte field. Input already at or over `width` is
/// returned unchanged: no truncation is performed.
pub fn pad_zero_bytes(input: &str, width: usize) -> String {
    let mut out = String::with_capacity(width.max(input.len()));
    out.push_str(input);
    while out.len() < width {
        out.push('\0');
    }
    out
}

/// Remove the maximal trailing run of zero bytes from a decoded fixed-width
/// field.
///
/// A string without trailing zero bytes is returned unchanged; an all-zero
/// field strips to the empty string.
pub fn strip_zero_bytes(input: &str) -> &str {
    input.trim_end_matches('\0')
}

/// Decode a byte sequence as an unsigned big-endian integer.
///
/// The sequence is treated as the digits of a base-256 number, most
/// significant byte first. There is no length limit; on-chain total-supply
/// values routinely exceed the machine word size. An empty sequence decodes
/// to zero.
pub fn bytes_to_uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Encode `value` into exactly `len` big-endian bytes, zero-filling the high
/// end.
///
/// Fails with [`CodecError::Overflow`] before producing any output when the
/// value needs more than `len` bytes (`value >= 256^len`). Negative values
/// are unrepresentable by construction.
pub fn uint_to_bytes(value: &BigUint, len: usize) -> Result<Vec<u8>, CodecError> {
    if value.bits() > len as u64 * 8 {
        return Err(CodecError::Overflow {
            value: value.clone(),
            width: len,
        });
    }
    if value.is_zero() {
        return Ok(vec![0; len]);
    }
    let raw = value.to_bytes_be();
    let mut out = vec![0; len];
    out[len - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// [`uint_to_bytes`] for machine-sized values, as used for the 2-byte royalty
/// point fields.
pub fn u64_to_bytes(value: u64, len: usize) -> Result<Vec<u8>, CodecError> {
    uint_to_bytes(&BigUint::from(value), len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 4, "\0\0\0\0")]
    #[case("VIA", 8, "VIA\0\0\0\0\0")]
    #[case("Voi Incentive Asset", 32, "Voi Incentive Asset\0\0\0\0\0\0\0\0\0\0\0\0\0")]
    fn pad_appends_zero_bytes(#[case] input: &str, #[case] width: usize, #[case] expected: &str) {
        let padded = pad_zero_bytes(input, width);
        assert_eq!(padded, expected);
        assert_eq!(padded.len(), width);
    }

    #[test]
    fn pad_passes_through_wide_input() {
        // no truncation, no further padding
        assert_eq!(pad_zero_bytes("TOOLONG", 4), "TOOLONG");
        assert_eq!(pad_zero_bytes("EXACT", 5), "EXACT");
    }

    #[test]
    fn strip_removes_trailing_run_only() {
        assert_eq!(strip_zero_bytes("VIA\0\0\0\0\0"), "VIA");
        assert_eq!(strip_zero_bytes("no zeros"), "no zeros");
        assert_eq!(strip_zero_bytes("\0\0\0\0"), "");
        // interior zero bytes survive
        assert_eq!(strip_zero_bytes("a\0b\0"), "a\0b");
    }

    #[test]
    fn pad_strip_roundtrip() {
        for s in ["", "A", "VOI", "exactly-32-bytes-of-ascii-text!!"] {
            assert_eq!(strip_zero_bytes(&pad_zero_bytes(s, 32)), s);
        }
    }

    #[test]
    fn decode_empty_is_zero() {
        assert_eq!(bytes_to_uint(&[]), BigUint::ZERO);
    }

    #[rstest]
    #[case(&[0xff], 255u64)]
    #[case(&[0x01, 0x00], 256u64)]
    #[case(&[0x01, 0x02, 0x03], 66051u64)]
    fn decode_known_vectors(#[case] bytes: &[u8], #[case] expected: u64) {
        assert_eq!(bytes_to_uint(bytes), BigUint::from(expected));
    }

    #[test]
    fn decode_exceeds_machine_width() {
        // 2^128, one past the largest u128
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&[0; 16]);
        assert_eq!(bytes_to_uint(&bytes), BigUint::from(u128::MAX) + 1u32);
    }

    #[rstest]
    #[case(0u64, 1)]
    #[case(255, 1)]
    #[case(256, 2)]
    #[case(65535, 2)]
    #[case(u64::MAX, 8)]
    #[case(1, 32)]
    fn encode_decode_roundtrip(#[case] value: u64, #[case] len: usize) {
        let value = BigUint::from(value);
        let encoded = uint_to_bytes(&value, len).unwrap();
        assert_eq!(encoded.len(), len);
        assert_eq!(bytes_to_uint(&encoded), value);
    }

    #[test]
    fn encode_rejects_overflow_without_output() {
        let err = uint_to_bytes(&BigUint::from(256u32), 1).unwrap_err();
        assert_eq!(
            err,
            CodecError::Overflow {
                value: BigUint::from(256u32),
                width: 1,
            }
        );
        assert!(uint_to_bytes(&BigUint::from(65536u32), 2).is_err());
    }

    #[test]
    fn encode_boundary_fits() {
        assert_eq!(uint_to_bytes(&BigUint::from(255u32), 1).unwrap(), [0xff]);
        assert_eq!(
            uint_to_bytes(&BigUint::from(65535u32), 2).unwrap(),
            [0xff, 0xff]
        );
    }

    #[test]
    fn encode_zero_fills() {
        assert_eq!(
            uint_to_bytes(&BigUint::from(7u32), 4).unwrap(),
            [0, 0, 0, 7]
        );
        assert_eq!(uint_to_bytes(&BigUint::ZERO, 3).unwrap(), [0, 0, 0]);
    }
}
