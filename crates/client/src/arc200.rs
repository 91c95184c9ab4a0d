//! ARC-200 fungible-token client.

use crate::{
    algod::PendingTransaction,
    contract::{self, ContractClient},
    error::ClientError,
    transaction::OnComplete,
};
use arckit_primitives::{Address, abi, abi::Method, codec};
use num_bigint::BigUint;
use serde::Serialize;

/// `arc200_balanceOf(address)uint256`
pub const BALANCE_OF: Method = Method::new("arc200_balanceOf(address)uint256");
/// `arc200_allowance(address,address)uint256`
pub const ALLOWANCE: Method = Method::new("arc200_allowance(address,address)uint256");
/// `arc200_transfer(address,uint256)bool`
pub const TRANSFER: Method = Method::new("arc200_transfer(address,uint256)bool");
/// `arc200_approve(address,uint256)bool`
pub const APPROVE: Method = Method::new("arc200_approve(address,uint256)bool");
/// `mint(address,byte[32],byte[8],uint8,uint256)bool`
pub const MINT: Method = Method::new("mint(address,byte[32],byte[8],uint8,uint256)bool");
/// `create()uint64`, on the token factory application.
pub const CREATE: Method = Method::new("create()uint64");
/// `kill()void`
pub const KILL: Method = Method::new("kill()void");
/// `post_update()void`
pub const POST_UPDATE: Method = Method::new("post_update()void");

/// Escrow payment covering token-state box storage at mint.
pub const MINT_PAYMENT: u64 = 1_000_000;
/// Escrow payment sent to the factory to fund the child application.
pub const FACTORY_CREATE_PAYMENT: u64 = 1_152_300;
/// Flat fee for factory create, which issues the inner create transaction.
pub const FACTORY_CREATE_FEE: u64 = 4_000;
/// Escrow payment covering balance-box creation on transfer to a fresh
/// holder.
pub const TRANSFER_PAYMENT: u64 = 28_500;
/// Escrow payment covering approval-box creation.
pub const APPROVE_PAYMENT: u64 = 28_500 + 3_500;
/// Flat fee for state-changing calls that fan out an inner transaction.
pub const CALL_FEE: u64 = 2_000;
/// Flat fee for kill, which closes the escrow with inner transactions.
pub const KILL_FEE: u64 = 3_000;

/// Decoded global state of an ARC-200 token.
#[derive(Debug, Clone, Serialize)]
pub struct Arc200State {
    /// Contract version counter.
    pub contract_version: u64,
    /// Deployment version counter.
    pub deployment_version: u64,
    /// Owner address.
    pub owner: Option<String>,
    /// Whether the application accepts updates.
    pub updatable: u64,
    /// Upgrader address.
    pub upgrader: Option<String>,
    /// Token name, trailing zero bytes stripped.
    pub name: String,
    /// Token symbol, trailing zero bytes stripped.
    pub symbol: String,
    /// Total supply in base units, decimal string.
    pub total_supply: String,
    /// Number of decimals.
    pub decimals: u64,
}

/// Client for one deployed ARC-200 token application.
#[derive(Debug, Clone)]
pub struct Arc200Client {
    contract: ContractClient,
}

impl Arc200Client {
    /// Wrap a bound contract client.
    pub fn new(contract: ContractClient) -> Self {
        Self { contract }
    }

    /// The underlying contract client, for knob adjustments.
    pub fn contract_mut(&mut self) -> &mut ContractClient {
        &mut self.contract
    }

    /// Read and decode the token's global state.
    pub async fn global_state(&self) -> Result<Arc200State, ClientError> {
        let app_id = self.contract.app_id();
        let state = self
            .contract
            .algod()
            .application_global_state(app_id)
            .await?;

        let name = state
            .bytes("name")
            .ok_or(ClientError::MissingStateKey { app_id, key: "name" })?;
        let symbol = state
            .bytes("symbol")
            .ok_or(ClientError::MissingStateKey { app_id, key: "symbol" })?;
        let total_supply = state
            .bytes("totalSupply")
            .map(|bytes| codec::bytes_to_uint(&bytes))
            .unwrap_or_default();

        Ok(Arc200State {
            contract_version: state.uint("contract_version").unwrap_or_default(),
            deployment_version: state.uint("deployment_version").unwrap_or_default(),
            owner: state.bytes("owner").and_then(encode_state_address),
            updatable: state.uint("updatable").unwrap_or_default(),
            upgrader: state.bytes("upgrader").and_then(encode_state_address),
            name: codec::strip_zero_bytes(&String::from_utf8_lossy(&name)).to_owned(),
            symbol: codec::strip_zero_bytes(&String::from_utf8_lossy(&symbol)).to_owned(),
            total_supply: total_supply.to_string(),
            decimals: state.uint("decimals").unwrap_or_default(),
        })
    }

    /// Balance of `owner` in base units.
    pub async fn balance_of(&self, owner: &Address) -> Result<BigUint, ClientError> {
        let payload = self
            .contract
            .read(BALANCE_OF, vec![abi::encode_address(owner)])
            .await?;
        Ok(abi::decode_uint(&payload))
    }

    /// Remaining allowance from `owner` to `spender` in base units.
    pub async fn allowance(
        &self,
        owner: &Address,
        spender: &Address,
    ) -> Result<BigUint, ClientError> {
        let payload = self
            .contract
            .read(
                ALLOWANCE,
                vec![abi::encode_address(owner), abi::encode_address(spender)],
            )
            .await?;
        Ok(abi::decode_uint(&payload))
    }

    /// Initialize the token: recipient of the initial supply, fixed-width
    /// name and symbol fields, decimals and total supply in base units.
    pub async fn mint(
        &self,
        recipient: &Address,
        name: [u8; 32],
        symbol: [u8; 8],
        decimals: u8,
        total_supply: &BigUint,
    ) -> Result<PendingTransaction, ClientError> {
        self.contract
            .call(
                MINT,
                vec![
                    abi::encode_address(recipient),
                    abi::encode_fixed_bytes(&name),
                    abi::encode_fixed_bytes(&symbol),
                    abi::encode_uint8(decimals),
                    abi::encode_uint256(total_supply)?,
                ],
            )
            .await
    }

    /// Create a new token through the bound factory application, returning
    /// the child application's id.
    pub async fn create(&mut self) -> Result<u64, ClientError> {
        self.contract.set_fee(FACTORY_CREATE_FEE);
        self.contract.set_payment_amount(FACTORY_CREATE_PAYMENT);
        let confirmed = self.contract.call(CREATE, Vec::new()).await?;
        let payload = contract::return_value(&confirmed)?;
        abi::decode_uint64(&payload).ok_or(ClientError::MissingReturn)
    }

    /// Transfer `amount` base units to `receiver`.
    pub async fn transfer(
        &self,
        receiver: &Address,
        amount: &BigUint,
    ) -> Result<PendingTransaction, ClientError> {
        self.contract
            .call(
                TRANSFER,
                vec![abi::encode_address(receiver), abi::encode_uint256(amount)?],
            )
            .await
    }

    /// Approve `spender` for `amount` base units.
    pub async fn approve(
        &self,
        spender: &Address,
        amount: &BigUint,
    ) -> Result<PendingTransaction, ClientError> {
        self.contract
            .call(
                APPROVE,
                vec![abi::encode_address(spender), abi::encode_uint256(amount)?],
            )
            .await
    }

    /// Run the post-update hook after a program update.
    pub async fn post_update(&self) -> Result<PendingTransaction, ClientError> {
        self.contract.call(POST_UPDATE, Vec::new()).await
    }

    /// Kill the token and delete the application.
    pub async fn kill(&mut self) -> Result<PendingTransaction, ClientError> {
        self.contract.set_fee(KILL_FEE);
        self.contract.set_on_complete(OnComplete::Delete);
        self.contract.call(KILL, Vec::new()).await
    }
}

fn encode_state_address(bytes: Vec<u8>) -> Option<String> {
    let key: [u8; 32] = bytes.try_into().ok()?;
    Some(Address(key).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

    #[test]
    fn factory_return_payload_is_the_child_app_id() {
        let mut log = arckit_primitives::abi::RETURN_PREFIX.to_vec();
        log.extend_from_slice(&777u64.to_be_bytes());
        let confirmed = PendingTransaction {
            confirmed_round: 1,
            pool_error: String::new(),
            logs: vec![BASE64.encode(&log)],
            application_index: 0,
        };
        let payload = contract::return_value(&confirmed).unwrap();
        assert_eq!(abi::decode_uint64(&payload), Some(777));
    }

    #[test]
    fn state_address_encoding_requires_32_bytes() {
        assert!(encode_state_address(vec![0; 32]).is_some());
        assert!(encode_state_address(vec![0; 31]).is_none());
        assert!(encode_state_address(Vec::new()).is_none());
    }

    #[test]
    fn method_selectors_are_distinct() {
        let selectors = [
            BALANCE_OF, ALLOWANCE, TRANSFER, APPROVE, MINT, CREATE, KILL, POST_UPDATE,
        ]
        .map(|m| m.selector());
        for (i, a) in selectors.iter().enumerate() {
            for b in &selectors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
