//! ARC-72 NFT client.

use crate::{
    algod::PendingTransaction,
    contract::ContractClient,
    error::ClientError,
    transaction::OnComplete,
};
use arckit_primitives::{Address, abi, abi::Method, codec};
use num_bigint::BigUint;
use serde::Serialize;

/// `arc72_totalSupply()uint256`
pub const TOTAL_SUPPLY: Method = Method::new("arc72_totalSupply()uint256");
/// `arc72_balanceOf(address)uint256`
pub const BALANCE_OF: Method = Method::new("arc72_balanceOf(address)uint256");
/// `arc72_ownerOf(uint256)address`
pub const OWNER_OF: Method = Method::new("arc72_ownerOf(uint256)address");
/// `arc72_tokenURI(uint256)byte[256]`
pub const TOKEN_URI: Method = Method::new("arc72_tokenURI(uint256)byte[256]");
/// `mint(address,uint256,byte[256])void`
pub const MINT: Method = Method::new("mint(address,uint256,byte[256])void");
/// `burn(uint256)void`
pub const BURN: Method = Method::new("burn(uint256)void");
/// `kill()void`
pub const KILL: Method = Method::new("kill()void");
/// `post_update()void`
pub const POST_UPDATE: Method = Method::new("post_update()void");

/// Width of the fixed metadata field attached to each token.
pub const METADATA_LENGTH: usize = 256;

/// Escrow payment covering token-box storage at mint.
pub const MINT_PAYMENT: u64 = 336_700;
/// Flat fee for mint and burn, which issue inner transactions.
pub const CALL_FEE: u64 = 3_000;
/// Escrow payment sent alongside kill to cover the close-out.
pub const KILL_PAYMENT: u64 = 1_000_000;
/// Flat fee for kill.
pub const KILL_FEE: u64 = 3_000;

/// Decoded global state of an ARC-72 token.
#[derive(Debug, Clone, Serialize)]
pub struct Arc72State {
    /// Number of minted tokens, decimal string.
    pub total_supply: String,
}

/// Client for one deployed ARC-72 NFT application.
#[derive(Debug, Clone)]
pub struct Arc72Client {
    contract: ContractClient,
}

impl Arc72Client {
    /// Wrap a bound contract client.
    pub fn new(contract: ContractClient) -> Self {
        Self { contract }
    }

    /// The underlying contract client, for knob adjustments.
    pub fn contract_mut(&mut self) -> &mut ContractClient {
        &mut self.contract
    }

    /// Read and decode the collection's global state.
    pub async fn global_state(&self) -> Result<Arc72State, ClientError> {
        let state = self
            .contract
            .algod()
            .application_global_state(self.contract.app_id())
            .await?;
        let total_supply = state
            .bytes("totalSupply")
            .map(|bytes| codec::bytes_to_uint(&bytes))
            .unwrap_or_default();
        Ok(Arc72State {
            total_supply: total_supply.to_string(),
        })
    }

    /// Number of minted tokens.
    pub async fn total_supply(&self) -> Result<BigUint, ClientError> {
        let payload = self.contract.read(TOTAL_SUPPLY, Vec::new()).await?;
        Ok(abi::decode_uint(&payload))
    }

    /// Number of tokens held by `owner`.
    pub async fn balance_of(&self, owner: &Address) -> Result<BigUint, ClientError> {
        let payload = self
            .contract
            .read(BALANCE_OF, vec![abi::encode_address(owner)])
            .await?;
        Ok(abi::decode_uint(&payload))
    }

    /// Owner of `token_id`.
    pub async fn owner_of(&self, token_id: &BigUint) -> Result<Address, ClientError> {
        let payload = self
            .contract
            .read(OWNER_OF, vec![abi::encode_uint256(token_id)?])
            .await?;
        abi::decode_address(&payload).ok_or(ClientError::MissingReturn)
    }

    /// Metadata URI of `token_id`, trailing zero bytes stripped.
    pub async fn token_uri(&self, token_id: &BigUint) -> Result<String, ClientError> {
        let payload = self
            .contract
            .read(TOKEN_URI, vec![abi::encode_uint256(token_id)?])
            .await?;
        Ok(codec::strip_zero_bytes(&String::from_utf8_lossy(&payload)).to_owned())
    }

    /// Mint `token_id` to `to` with a fixed-width metadata field.
    pub async fn mint(
        &self,
        to: &Address,
        token_id: &BigUint,
        metadata: Vec<u8>,
    ) -> Result<PendingTransaction, ClientError> {
        self.contract
            .call(
                MINT,
                vec![
                    abi::encode_address(to),
                    abi::encode_uint256(token_id)?,
                    abi::encode_fixed_bytes(&metadata),
                ],
            )
            .await
    }

    /// Burn `token_id`.
    pub async fn burn(&self, token_id: &BigUint) -> Result<PendingTransaction, ClientError> {
        self.contract
            .call(BURN, vec![abi::encode_uint256(token_id)?])
            .await
    }

    /// Run the post-update hook after a program update.
    pub async fn post_update(&self) -> Result<PendingTransaction, ClientError> {
        self.contract.call(POST_UPDATE, Vec::new()).await
    }

    /// Kill the collection and delete the application.
    pub async fn kill(&mut self) -> Result<PendingTransaction, ClientError> {
        self.contract.set_fee(KILL_FEE);
        self.contract.set_payment_amount(KILL_PAYMENT);
        self.contract.set_on_complete(OnComplete::Delete);
        self.contract.call(KILL, Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arckit_primitives::codec::pad_zero_bytes;

    #[test]
    fn metadata_pads_to_fixed_width() {
        let metadata = pad_zero_bytes("ipfs://QmExample", METADATA_LENGTH);
        assert_eq!(metadata.len(), METADATA_LENGTH);
    }

    #[test]
    fn method_selectors_are_distinct() {
        let selectors = [
            TOTAL_SUPPLY, BALANCE_OF, OWNER_OF, TOKEN_URI, MINT, BURN, KILL, POST_UPDATE,
        ]
        .map(|m| m.selector());
        for (i, a) in selectors.iter().enumerate() {
            for b in &selectors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
