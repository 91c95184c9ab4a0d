//! Async HTTP glue over an AVM node and indexer.
//!
//! This crate wraps the node (algod) and indexer REST APIs behind typed
//! clients, builds and signs the two transaction shapes the token tooling
//! needs (payments and application calls), and exposes per-standard contract
//! clients for ARC-200 fungible tokens and ARC-72 NFTs.

pub mod account;
pub mod algod;
pub mod arc200;
pub mod arc72;
pub mod contract;
pub mod error;
pub mod indexer;
pub mod transaction;

pub use account::Account;
pub use algod::AlgodClient;
pub use arc200::Arc200Client;
pub use arc72::Arc72Client;
pub use contract::ContractClient;
pub use error::ClientError;
pub use indexer::IndexerClient;
