//! Connection configuration and runtime helpers.

use anyhow::Context;
use arckit_client::{Account, AlgodClient, ClientError, ContractClient, IndexerClient};
use clap::Args;
use std::future::Future;
use url::Url;

/// Node, indexer and signer configuration, taken from flags or environment.
#[derive(Debug, Args)]
pub struct NodeArgs {
    /// URL of the node API
    #[arg(
        long,
        env = "ARCKIT_ALGOD_URL",
        default_value = "https://mainnet-api.voi.nodely.dev"
    )]
    algod_url: Url,
    /// API token for the node
    #[arg(long, env = "ARCKIT_ALGOD_TOKEN", default_value = "")]
    algod_token: String,
    /// URL of the indexer API
    #[arg(
        long,
        env = "ARCKIT_INDEXER_URL",
        default_value = "https://mainnet-idx.voi.nodely.dev"
    )]
    indexer_url: Url,
    /// API token for the indexer
    #[arg(long, env = "ARCKIT_INDEXER_TOKEN", default_value = "")]
    indexer_token: String,
    /// Hex-encoded 32-byte signer seed
    #[arg(long, env = "ARCKIT_SIGNER_KEY", hide_env_values = true)]
    signer_key: Option<String>,
}

impl NodeArgs {
    /// Construct the node client.
    pub fn algod(&self) -> AlgodClient {
        AlgodClient::new(self.algod_url.clone(), self.algod_token.clone())
    }

    /// Construct the indexer client.
    pub fn indexer(&self) -> IndexerClient {
        IndexerClient::new(self.indexer_url.clone(), self.indexer_token.clone())
    }

    /// Load the configured signing account; fails when none is set.
    pub fn account(&self) -> anyhow::Result<Account> {
        let key = self
            .signer_key
            .as_deref()
            .ok_or(ClientError::NoSigner)
            .context("set ARCKIT_SIGNER_KEY or pass --signer-key")?;
        Ok(Account::from_seed_hex(key)?)
    }

    /// The signing account, or a placeholder sender for read-only calls.
    pub fn account_or_placeholder(&self) -> anyhow::Result<Account> {
        match &self.signer_key {
            Some(key) => Ok(Account::from_seed_hex(key)?),
            None => Ok(Account::placeholder()),
        }
    }

    /// A contract client for `app_id` with a signing account.
    pub fn contract(&self, app_id: u64) -> anyhow::Result<ContractClient> {
        Ok(ContractClient::new(self.algod(), app_id, self.account()?))
    }

    /// A contract client for `app_id` that only needs to simulate.
    pub fn readonly_contract(&self, app_id: u64) -> anyhow::Result<ContractClient> {
        Ok(ContractClient::new(
            self.algod(),
            app_id,
            self.account_or_placeholder()?,
        ))
    }
}

/// defer run in async
pub fn run_async<F: Future>(future: F) -> F::Output {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    rt.block_on(future)
}
