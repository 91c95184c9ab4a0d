//! Client error taxonomy.

use arckit_primitives::{AddressError, CodecError};

/// Error variants encountered while talking to the node or indexer, or while
/// building the transactions sent to them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure from the HTTP stack.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, or the raw body.
        message: String,
    },
    /// A value failed the byte-level codec contracts.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A malformed account address.
    #[error(transparent)]
    Address(#[from] AddressError),
    /// Canonical msgpack encoding failed.
    #[error("transaction encoding error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    /// The configured signer key was not 32 hex-encoded bytes.
    #[error("malformed signer key: expected 32 hex-encoded bytes")]
    MalformedSignerKey,
    /// The operation needs to sign but no signer key was configured.
    #[error("no signer configured")]
    NoSigner,
    /// A base64 field in an API response failed to decode.
    #[error("invalid base64 in api response: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The pool rejected the submitted transaction.
    #[error("transaction {txid} rejected: {message}")]
    Rejected {
        /// Id of the rejected transaction.
        txid: String,
        /// The pool error reported by the node.
        message: String,
    },
    /// The transaction was not confirmed within the wait window.
    #[error("transaction {txid} not confirmed after {rounds} rounds")]
    ConfirmationTimeout {
        /// Id of the pending transaction.
        txid: String,
        /// Rounds waited before giving up.
        rounds: u64,
    },
    /// Simulation of a read-only call failed.
    #[error("simulation failed: {0}")]
    Simulation(String),
    /// The confirmed or simulated call produced no ABI return payload.
    #[error("missing abi return value in application logs")]
    MissingReturn,
    /// The application's global state lacks an expected key.
    #[error("application {app_id} global state has no `{key}` entry")]
    MissingStateKey {
        /// The application id.
        app_id: u64,
        /// The missing key.
        key: &'static str,
    },
}
