//! Pure byte-level codecs shared by the arckit token tooling.
//!
//! Everything in this crate is a stateless, synchronous function or a plain
//! value type: the fixed-width field padding conventions used by AVM token
//! contracts, big-endian integer packing, the ARC-4 method-call scalars and
//! the fixed-layout royalty record.

pub mod abi;
pub mod address;
pub mod codec;
pub mod royalty;

pub use address::{Address, AddressError};
pub use codec::CodecError;
pub use royalty::RoyaltyRecord;
