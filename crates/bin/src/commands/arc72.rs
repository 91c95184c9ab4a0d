use crate::helpers::{NodeArgs, run_async};
use arckit_client::{Arc72Client, arc72, contract, transaction::Transaction};
use arckit_primitives::{Address, RoyaltyRecord, codec};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use clap::{Args, Subcommand};
use num_bigint::BigUint;

#[derive(Debug, Subcommand)]
pub enum Arc72Commands {
    #[command(about = "Print the collection's decoded global state")]
    Get(GetCommand),
    #[command(about = "Print the number of minted tokens")]
    TotalSupply(TotalSupplyCommand),
    #[command(about = "Print the number of tokens held by an address")]
    BalanceOf(BalanceOfCommand),
    #[command(about = "Print the owner of a token")]
    OwnerOf(OwnerOfCommand),
    #[command(about = "Print the metadata URI of a token")]
    TokenUri(TokenUriCommand),
    #[command(about = "Mint a token")]
    Mint(MintCommand),
    #[command(about = "Burn a token")]
    Burn(BurnCommand),
    #[command(about = "Replace the application's programs")]
    Update(UpdateCommand),
    #[command(about = "Run the post-update hook")]
    PostUpdate(PostUpdateCommand),
    #[command(about = "Kill the collection and delete the application")]
    Kill(KillCommand),
    #[command(about = "Pack a royalty record and print it base64-encoded")]
    Royalty(RoyaltyCommand),
}

impl Arc72Commands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Arc72Commands::Get(cmd) => run_async(cmd.run()),
            Arc72Commands::TotalSupply(cmd) => run_async(cmd.run()),
            Arc72Commands::BalanceOf(cmd) => run_async(cmd.run()),
            Arc72Commands::OwnerOf(cmd) => run_async(cmd.run()),
            Arc72Commands::TokenUri(cmd) => run_async(cmd.run()),
            Arc72Commands::Mint(cmd) => run_async(cmd.run()),
            Arc72Commands::Burn(cmd) => run_async(cmd.run()),
            Arc72Commands::Update(cmd) => run_async(cmd.run()),
            Arc72Commands::PostUpdate(cmd) => run_async(cmd.run()),
            Arc72Commands::Kill(cmd) => run_async(cmd.run()),
            Arc72Commands::Royalty(cmd) => cmd.run(),
        }
    }
}

#[derive(Debug, Args)]
pub struct GetCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    #[command(flatten)]
    node: NodeArgs,
}

impl GetCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = Arc72Client::new(self.node.readonly_contract(self.apid)?);
        let state = client.global_state().await?;
        println!("{}", serde_json::to_string_pretty(&state)?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TotalSupplyCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    #[command(flatten)]
    node: NodeArgs,
}

impl TotalSupplyCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = Arc72Client::new(self.node.readonly_contract(self.apid)?);
        println!("{}", client.total_supply().await?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct BalanceOfCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Holder address
    #[arg(long)]
    address: Address,
    #[command(flatten)]
    node: NodeArgs,
}

impl BalanceOfCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = Arc72Client::new(self.node.readonly_contract(self.apid)?);
        println!("{}", client.balance_of(&self.address).await?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct OwnerOfCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Token id
    #[arg(long)]
    token_id: BigUint,
    #[command(flatten)]
    node: NodeArgs,
}

impl OwnerOfCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = Arc72Client::new(self.node.readonly_contract(self.apid)?);
        println!("{}", client.owner_of(&self.token_id).await?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TokenUriCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Token id
    #[arg(long)]
    token_id: BigUint,
    #[command(flatten)]
    node: NodeArgs,
}

impl TokenUriCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = Arc72Client::new(self.node.readonly_contract(self.apid)?);
        println!("{}", client.token_uri(&self.token_id).await?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct MintCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Receiver of the minted token
    #[arg(long)]
    to: Address,
    /// Token id
    #[arg(long)]
    token_id: BigUint,
    /// Metadata, at most 256 bytes; zero-filled when absent
    #[arg(long)]
    metadata: Option<String>,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl MintCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let metadata = match self.metadata.as_deref() {
            Some(text) => {
                anyhow::ensure!(
                    text.len() <= arc72::METADATA_LENGTH,
                    "metadata is {} bytes, field is {}",
                    text.len(),
                    arc72::METADATA_LENGTH
                );
                codec::pad_zero_bytes(text, arc72::METADATA_LENGTH).into_bytes()
            }
            None => vec![0; arc72::METADATA_LENGTH],
        };

        let mut contract = self.node.contract(self.apid)?;
        contract.set_fee(arc72::CALL_FEE);
        contract.set_payment_amount(arc72::MINT_PAYMENT);
        contract.set_simulate_only(self.simulate);
        let client = Arc72Client::new(contract);
        match client.mint(&self.to, &self.token_id, metadata).await {
            Ok(confirmed) => {
                tracing::info!(round = confirmed.confirmed_round, "minted");
                println!("Mint success: true");
            }
            Err(e) => {
                tracing::error!(error = %e, "mint failed");
                println!("Mint success: false");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct BurnCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Token id
    #[arg(long)]
    token_id: BigUint,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl BurnCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut contract = self.node.contract(self.apid)?;
        contract.set_fee(arc72::CALL_FEE);
        contract.set_simulate_only(self.simulate);
        let client = Arc72Client::new(contract);
        match client.burn(&self.token_id).await {
            Ok(_) => println!("Burn success: true"),
            Err(e) => {
                tracing::error!(error = %e, "burn failed");
                println!("Burn success: false");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Path to the base64-encoded compiled approval program
    #[arg(long)]
    approval: std::path::PathBuf,
    /// Path to the base64-encoded compiled clear-state program
    #[arg(long)]
    clear: std::path::PathBuf,
    #[command(flatten)]
    node: NodeArgs,
}

impl UpdateCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let account = self.node.account()?;
        let algod = self.node.algod();
        let approval = super::deploy::read_program(&self.approval)?;
        let clear = super::deploy::read_program(&self.clear)?;
        let params = algod.suggested_params().await?;
        let txn = Transaction::app_update(
            &params,
            &account.address(),
            self.apid,
            approval,
            clear,
        );
        let confirmed = contract::sign_and_send(&algod, &account, vec![txn]).await?;
        tracing::info!(round = confirmed.confirmed_round, "updated");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct PostUpdateCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl PostUpdateCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut contract = self.node.contract(self.apid)?;
        contract.set_simulate_only(self.simulate);
        let client = Arc72Client::new(contract);
        let confirmed = client.post_update().await?;
        tracing::info!(round = confirmed.confirmed_round, "post-update ran");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct KillCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl KillCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut contract = self.node.contract(self.apid)?;
        contract.set_simulate_only(self.simulate);
        let mut client = Arc72Client::new(contract);
        let confirmed = match client.kill().await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "kill failed");
                false
            }
        };
        println!("Kill success: {confirmed}");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct RoyaltyCommand {
    /// Overall royalty points
    #[arg(long)]
    royalty_points: u64,
    /// Creator 1 points
    #[arg(long)]
    creator1_points: u64,
    /// Creator 2 points
    #[arg(long)]
    creator2_points: u64,
    /// Creator 3 points
    #[arg(long)]
    creator3_points: u64,
    /// Creator 1 address
    #[arg(long)]
    creator1_address: Address,
    /// Creator 2 address
    #[arg(long)]
    creator2_address: Address,
    /// Creator 3 address
    #[arg(long)]
    creator3_address: Address,
}

impl RoyaltyCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let record = RoyaltyRecord {
            royalty_points: self.royalty_points,
            creator_points: [
                self.creator1_points,
                self.creator2_points,
                self.creator3_points,
            ],
            creators: [
                self.creator1_address,
                self.creator2_address,
                self.creator3_address,
            ],
        };
        println!("{}", BASE64.encode(record.encode()?));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn royalty_output_is_104_bytes_of_base64() {
        let cmd = RoyaltyCommand {
            royalty_points: 250,
            creator1_points: 5000,
            creator2_points: 3000,
            creator3_points: 2000,
            creator1_address: Address([1; 32]),
            creator2_address: Address([2; 32]),
            creator3_address: Address::ZERO,
        };
        let record = RoyaltyRecord {
            royalty_points: cmd.royalty_points,
            creator_points: [
                cmd.creator1_points,
                cmd.creator2_points,
                cmd.creator3_points,
            ],
            creators: [
                cmd.creator1_address,
                cmd.creator2_address,
                cmd.creator3_address,
            ],
        };
        let encoded = BASE64.encode(record.encode().unwrap());
        assert_eq!(BASE64.decode(&encoded).unwrap().len(), 104);
    }
}
