//! Local signing account.

use crate::{
    error::ClientError,
    transaction::{SignedTransaction, Transaction},
};
use arckit_primitives::Address;
use ed25519_dalek::{Signer, SigningKey};
use serde_bytes::ByteBuf;
use std::fmt;

/// An ed25519 signing account, loaded from a 32-byte hex-encoded seed.
#[derive(Clone)]
pub struct Account {
    key: SigningKey,
}

impl Account {
    /// Build an account from a hex-encoded 32-byte seed.
    pub fn from_seed_hex(seed: &str) -> Result<Self, ClientError> {
        let bytes = hex::decode(seed.trim()).map_err(|_| ClientError::MalformedSignerKey)?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ClientError::MalformedSignerKey)?;
        Ok(Self {
            key: SigningKey::from_bytes(&seed),
        })
    }

    /// A throwaway account whose address stands in as the sender of
    /// read-only simulated calls when no signer is configured.
    pub fn placeholder() -> Self {
        Self {
            key: SigningKey::from_bytes(&[0; 32]),
        }
    }

    /// The account's address (its public key).
    pub fn address(&self) -> Address {
        Address(self.key.verifying_key().to_bytes())
    }

    /// Sign a transaction over its canonical bytes with the `TX` domain
    /// prefix.
    pub fn sign_transaction(&self, transaction: Transaction) -> Result<SignedTransaction, ClientError> {
        let mut message = b"TX".to_vec();
        message.extend_from_slice(&transaction.bytes()?);
        let signature = self.key.sign(&message);
        Ok(SignedTransaction {
            signature: ByteBuf::from(signature.to_bytes().to_vec()),
            transaction,
        })
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never expose the seed
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::SuggestedParams;
    use ed25519_dalek::Verifier;

    const SEED: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn seed_parsing() {
        assert!(Account::from_seed_hex(SEED).is_ok());
        assert!(Account::from_seed_hex("deadbeef").is_err());
        assert!(Account::from_seed_hex("not hex at all").is_err());
    }

    #[test]
    fn signature_verifies_over_prefixed_bytes() {
        let account = Account::from_seed_hex(SEED).unwrap();
        let params = SuggestedParams {
            fee: 0,
            min_fee: 1000,
            first_valid: 1,
            genesis_id: "test".to_owned(),
            genesis_hash: vec![0; 32],
        };
        let txn = Transaction::payment(&params, &account.address(), &Address([2; 32]), 1);
        let signed = account.sign_transaction(txn.clone()).unwrap();

        let mut message = b"TX".to_vec();
        message.extend_from_slice(&txn.bytes().unwrap());
        let signature =
            ed25519_dalek::Signature::from_slice(signed.signature.as_slice()).unwrap();
        account
            .key
            .verifying_key()
            .verify(&message, &signature)
            .unwrap();
    }

    #[test]
    fn debug_hides_key_material() {
        let account = Account::from_seed_hex(SEED).unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains(SEED));
    }
}
