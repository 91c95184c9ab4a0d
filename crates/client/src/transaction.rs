//! Transaction construction and canonical encoding.
//!
//! The node only accepts canonically encoded transactions: msgpack maps with
//! keys in lexicographic order and zero-valued fields omitted. Field order is
//! therefore load-bearing in the struct declarations below — serde emits
//! fields in declaration order, so they are declared pre-sorted by wire key.

use crate::error::ClientError;
use arckit_primitives::Address;
use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use sha2::{Digest, Sha512_256};

/// Domain separator hashed in front of a transaction for ids and signatures.
const TX_PREFIX: &[u8] = b"TX";
/// Domain separator for group id computation.
const TG_PREFIX: &[u8] = b"TG";

/// Validity window length, in rounds, given to new transactions.
pub const VALIDITY_WINDOW: u64 = 1000;

/// Application on-complete actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OnComplete {
    /// Plain method call.
    #[default]
    NoOp,
    /// Replace the application's programs.
    Update,
    /// Delete the application.
    Delete,
}

impl OnComplete {
    fn wire(self) -> u64 {
        match self {
            OnComplete::NoOp => 0,
            OnComplete::Update => 4,
            OnComplete::Delete => 5,
        }
    }
}

/// Suggested construction parameters fetched from the node.
#[derive(Debug, Clone)]
pub struct SuggestedParams {
    /// Suggested fee in microunits per byte (flat min fee in practice).
    pub fee: u64,
    /// The minimum flat fee.
    pub min_fee: u64,
    /// Round the transaction becomes valid.
    pub first_valid: u64,
    /// Genesis id string of the network.
    pub genesis_id: String,
    /// 32-byte genesis hash of the network.
    pub genesis_hash: Vec<u8>,
}

/// Global state schema requested at application creation.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct StateSchema {
    /// Number of byte-slice slots.
    #[serde(rename = "nbs", skip_serializing_if = "is_zero", default)]
    pub byte_slices: u64,
    /// Number of uint slots.
    #[serde(rename = "nui", skip_serializing_if = "is_zero", default)]
    pub uints: u64,
}

/// A payment or application-call transaction.
///
/// Fields are declared in lexicographic wire-key order; do not reorder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// Payment amount in microunits.
    #[serde(rename = "amt", skip_serializing_if = "is_zero", default)]
    pub amount: u64,
    /// Application call arguments (selector first).
    #[serde(rename = "apaa", skip_serializing_if = "Vec::is_empty", default)]
    pub app_args: Vec<ByteBuf>,
    /// On-complete action.
    #[serde(rename = "apan", skip_serializing_if = "is_zero", default)]
    pub on_complete: u64,
    /// Compiled approval program (create/update only).
    #[serde(rename = "apap", skip_serializing_if = "bytes_empty", default)]
    pub approval_program: ByteBuf,
    /// Global state schema (create only).
    #[serde(rename = "apgs", skip_serializing_if = "Option::is_none", default)]
    pub global_schema: Option<StateSchema>,
    /// Target application id; zero at creation.
    #[serde(rename = "apid", skip_serializing_if = "is_zero", default)]
    pub app_id: u64,
    /// Local state schema (create only).
    #[serde(rename = "apls", skip_serializing_if = "Option::is_none", default)]
    pub local_schema: Option<StateSchema>,
    /// Compiled clear-state program (create/update only).
    #[serde(rename = "apsu", skip_serializing_if = "bytes_empty", default)]
    pub clear_program: ByteBuf,
    /// Flat fee in microunits.
    #[serde(rename = "fee", skip_serializing_if = "is_zero", default)]
    pub fee: u64,
    /// First valid round.
    #[serde(rename = "fv", skip_serializing_if = "is_zero", default)]
    pub first_valid: u64,
    /// Genesis id.
    #[serde(rename = "gen", skip_serializing_if = "String::is_empty", default)]
    pub genesis_id: String,
    /// Genesis hash.
    #[serde(rename = "gh", skip_serializing_if = "bytes_empty", default)]
    pub genesis_hash: ByteBuf,
    /// Group id, set by [`assign_group`].
    #[serde(rename = "grp", skip_serializing_if = "Option::is_none", default)]
    pub group: Option<ByteBuf>,
    /// Last valid round.
    #[serde(rename = "lv", skip_serializing_if = "is_zero", default)]
    pub last_valid: u64,
    /// Arbitrary note bytes.
    #[serde(rename = "note", skip_serializing_if = "bytes_empty", default)]
    pub note: ByteBuf,
    /// Payment receiver.
    #[serde(rename = "rcv", skip_serializing_if = "Option::is_none", default)]
    pub receiver: Option<ByteBuf>,
    /// Sender public key.
    #[serde(rename = "snd", skip_serializing_if = "bytes_empty", default)]
    pub sender: ByteBuf,
    /// Transaction type tag: `pay` or `appl`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty", default)]
    pub tx_type: String,
}

/// A transaction with its ed25519 signature attached.
///
/// An empty signature is omitted from the encoding, which is the form the
/// simulate endpoint accepts with `allow-empty-signatures`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// 64-byte signature over `TX || canonical bytes`.
    #[serde(rename = "sig", skip_serializing_if = "bytes_empty", default)]
    pub signature: ByteBuf,
    /// The signed transaction body.
    #[serde(rename = "txn")]
    pub transaction: Transaction,
}

impl SignedTransaction {
    /// Wrap a transaction without a signature, for simulation.
    pub fn unsigned(transaction: Transaction) -> Self {
        Self {
            signature: ByteBuf::new(),
            transaction,
        }
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn bytes_empty(value: &ByteBuf) -> bool {
    value.is_empty()
}

/// Encode a value as canonical msgpack (struct fields as map entries).
pub fn encode_canonical<T: Serialize>(value: &T) -> Result<Vec<u8>, ClientError> {
    let mut buf = Vec::new();
    let mut serializer = rmp_serde::Serializer::new(&mut buf).with_struct_map();
    value.serialize(&mut serializer)?;
    Ok(buf)
}

impl Transaction {
    fn base(params: &SuggestedParams, sender: &Address, tx_type: &str) -> Self {
        Self {
            fee: params.min_fee.max(params.fee),
            first_valid: params.first_valid,
            genesis_id: params.genesis_id.clone(),
            genesis_hash: ByteBuf::from(params.genesis_hash.clone()),
            last_valid: params.first_valid + VALIDITY_WINDOW,
            sender: ByteBuf::from(sender.as_bytes().to_vec()),
            tx_type: tx_type.to_owned(),
            ..Self::default()
        }
    }

    /// A payment of `amount` microunits from `sender` to `receiver`.
    pub fn payment(
        params: &SuggestedParams,
        sender: &Address,
        receiver: &Address,
        amount: u64,
    ) -> Self {
        Self {
            amount,
            receiver: Some(ByteBuf::from(receiver.as_bytes().to_vec())),
            ..Self::base(params, sender, "pay")
        }
    }

    /// A method call against an existing application.
    pub fn app_call(
        params: &SuggestedParams,
        sender: &Address,
        app_id: u64,
        app_args: Vec<Vec<u8>>,
        on_complete: OnComplete,
    ) -> Self {
        Self {
            app_id,
            app_args: app_args.into_iter().map(ByteBuf::from).collect(),
            on_complete: on_complete.wire(),
            ..Self::base(params, sender, "appl")
        }
    }

    /// An application-create transaction carrying compiled programs.
    pub fn app_create(
        params: &SuggestedParams,
        sender: &Address,
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        global_schema: StateSchema,
        note: Vec<u8>,
    ) -> Self {
        Self {
            approval_program: ByteBuf::from(approval_program),
            clear_program: ByteBuf::from(clear_program),
            global_schema: Some(global_schema),
            note: ByteBuf::from(note),
            ..Self::base(params, sender, "appl")
        }
    }

    /// An update transaction replacing an application's programs.
    pub fn app_update(
        params: &SuggestedParams,
        sender: &Address,
        app_id: u64,
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
    ) -> Self {
        Self {
            app_id,
            approval_program: ByteBuf::from(approval_program),
            clear_program: ByteBuf::from(clear_program),
            on_complete: OnComplete::Update.wire(),
            ..Self::base(params, sender, "appl")
        }
    }

    /// Override the flat fee, keeping at least the network minimum.
    pub fn with_fee(mut self, fee: u64, params: &SuggestedParams) -> Self {
        self.fee = fee.max(params.min_fee);
        self
    }

    /// The canonical bytes hashed for ids and signatures.
    pub fn bytes(&self) -> Result<Vec<u8>, ClientError> {
        encode_canonical(self)
    }

    /// The raw 32-byte transaction hash.
    pub fn raw_id(&self) -> Result<[u8; 32], ClientError> {
        let mut hasher = Sha512_256::new();
        hasher.update(TX_PREFIX);
        hasher.update(self.bytes()?);
        Ok(hasher.finalize().into())
    }

    /// The human-readable transaction id (base32, no padding).
    pub fn id(&self) -> Result<String, ClientError> {
        Ok(BASE32_NOPAD.encode(&self.raw_id()?))
    }
}

#[derive(Serialize)]
struct TxGroupDigest {
    #[serde(rename = "txlist")]
    txlist: Vec<ByteBuf>,
}

/// Compute and assign a shared group id across `txns`.
///
/// The group id is the SHA-512/256 of `TG` plus the encoded list of member
/// transaction hashes, computed before any `grp` field is set.
pub fn assign_group(txns: &mut [Transaction]) -> Result<(), ClientError> {
    let digest = TxGroupDigest {
        txlist: txns
            .iter()
            .map(|txn| Ok(ByteBuf::from(txn.raw_id()?.to_vec())))
            .collect::<Result<_, ClientError>>()?,
    };
    let mut hasher = Sha512_256::new();
    hasher.update(TG_PREFIX);
    hasher.update(encode_canonical(&digest)?);
    let gid: [u8; 32] = hasher.finalize().into();
    for txn in txns.iter_mut() {
        txn.group = Some(ByteBuf::from(gid.to_vec()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SuggestedParams {
        SuggestedParams {
            fee: 0,
            min_fee: 1000,
            first_valid: 5000,
            genesis_id: "testnet-v1.0".to_owned(),
            genesis_hash: vec![9; 32],
        }
    }

    #[test]
    fn payment_carries_min_fee_and_window() {
        let txn = Transaction::payment(&params(), &Address([1; 32]), &Address([2; 32]), 12345);
        assert_eq!(txn.fee, 1000);
        assert_eq!(txn.last_valid, txn.first_valid + VALIDITY_WINDOW);
        assert_eq!(txn.tx_type, "pay");
        assert_eq!(txn.amount, 12345);
    }

    #[test]
    fn canonical_encoding_roundtrip() {
        let txn = Transaction::app_call(
            &params(),
            &Address([1; 32]),
            123,
            vec![vec![0x15, 0x1f, 0x7c, 0x75], vec![0; 32]],
            OnComplete::NoOp,
        );
        let bytes = txn.bytes().unwrap();
        let decoded: Transaction = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded.app_id, 123);
        assert_eq!(decoded.app_args.len(), 2);
        // zero-valued fields must not appear on the wire
        assert_eq!(decoded.amount, 0);
        assert!(decoded.receiver.is_none());
    }

    #[test]
    fn zero_fields_shrink_the_encoding() {
        let with_note = Transaction {
            note: ByteBuf::from(b"arckit/v1:token".to_vec()),
            ..Transaction::payment(&params(), &Address([1; 32]), &Address([2; 32]), 1)
        };
        let without_note = Transaction::payment(&params(), &Address([1; 32]), &Address([2; 32]), 1);
        assert!(with_note.bytes().unwrap().len() > without_note.bytes().unwrap().len());
    }

    #[test]
    fn txid_is_stable_and_group_changes_it() {
        let txn = Transaction::payment(&params(), &Address([1; 32]), &Address([2; 32]), 1);
        let id = txn.id().unwrap();
        assert_eq!(id, txn.id().unwrap());
        assert_eq!(id.len(), 52);

        let mut group = [
            txn.clone(),
            Transaction::payment(&params(), &Address([2; 32]), &Address([1; 32]), 2),
        ];
        assign_group(&mut group).unwrap();
        let gid = group[0].group.clone().unwrap();
        assert_eq!(group[1].group.clone().unwrap(), gid);
        assert_ne!(group[0].id().unwrap(), id);
    }

    #[test]
    fn unsigned_wrapper_omits_signature() {
        let txn = Transaction::payment(&params(), &Address([1; 32]), &Address([2; 32]), 1);
        let unsigned = encode_canonical(&SignedTransaction::unsigned(txn.clone())).unwrap();
        let signed = encode_canonical(&SignedTransaction {
            signature: ByteBuf::from(vec![7; 64]),
            transaction: txn,
        })
        .unwrap();
        assert!(signed.len() > unsigned.len() + 60);
    }
}
