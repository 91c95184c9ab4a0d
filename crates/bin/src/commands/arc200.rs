use crate::helpers::{NodeArgs, run_async};
use anyhow::Context;
use arckit_client::{Arc200Client, arc200, contract, transaction::Transaction};
use arckit_primitives::{Address, codec};
use clap::{Args, Subcommand};
use num_bigint::BigUint;

/// Byte width of the fixed name field.
const NAME_LENGTH: usize = 32;
/// Byte width of the fixed symbol field.
const SYMBOL_LENGTH: usize = 8;

#[derive(Debug, Subcommand)]
pub enum Arc200Commands {
    #[command(about = "Print the token's decoded global state")]
    Get(GetCommand),
    #[command(about = "Create a new token through a factory application")]
    Create(CreateCommand),
    #[command(about = "Initialize the token and mint the initial supply")]
    Mint(MintCommand),
    #[command(about = "Print the balance of an owner")]
    Balance(BalanceCommand),
    #[command(about = "Print the allowance from an owner to a spender")]
    Allowance(AllowanceCommand),
    #[command(about = "Approve a spender")]
    Approve(ApproveCommand),
    #[command(about = "Transfer tokens")]
    Transfer(TransferCommand),
    #[command(about = "Replace the application's programs")]
    Update(UpdateCommand),
    #[command(about = "Run the post-update hook")]
    PostUpdate(PostUpdateCommand),
    #[command(about = "Kill the token and delete the application")]
    Kill(KillCommand),
}

impl Arc200Commands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Arc200Commands::Get(cmd) => run_async(cmd.run()),
            Arc200Commands::Create(cmd) => run_async(cmd.run()),
            Arc200Commands::Mint(cmd) => run_async(cmd.run()),
            Arc200Commands::Balance(cmd) => run_async(cmd.run()),
            Arc200Commands::Allowance(cmd) => run_async(cmd.run()),
            Arc200Commands::Approve(cmd) => run_async(cmd.run()),
            Arc200Commands::Transfer(cmd) => run_async(cmd.run()),
            Arc200Commands::Update(cmd) => run_async(cmd.run()),
            Arc200Commands::PostUpdate(cmd) => run_async(cmd.run()),
            Arc200Commands::Kill(cmd) => run_async(cmd.run()),
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
        let client = Arc200Client::new(self.node.readonly_contract(self.apid)?);
        let state = client.global_state().await?;
        println!("{}", serde_json::to_string_pretty(&state)?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Factory application id
    #[arg(long)]
    apid: u64,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl CreateCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut contract = self.node.contract(self.apid)?;
        contract.set_simulate_only(self.simulate);
        let mut client = Arc200Client::new(contract);
        let app_id = client.create().await?;
        tracing::info!(app_id, factory = self.apid, "token created");
        println!("{app_id}");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct MintCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Recipient of the initial supply
    #[arg(long)]
    recipient: Address,
    /// Token name, at most 32 bytes
    #[arg(long)]
    name: String,
    /// Token symbol, at most 8 bytes
    #[arg(long)]
    symbol: String,
    /// Number of decimals
    #[arg(long)]
    decimals: u8,
    /// Total supply in whole tokens, scaled by decimals
    #[arg(long)]
    total_supply: BigUint,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl MintCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let name = fixed_field::<NAME_LENGTH>(&self.name).context("token name")?;
        let symbol = fixed_field::<SYMBOL_LENGTH>(&self.symbol).context("token symbol")?;
        let total_supply =
            &self.total_supply * BigUint::from(10u32).pow(u32::from(self.decimals));

        let mut contract = self.node.contract(self.apid)?;
        contract.set_fee(arc200::CALL_FEE);
        contract.set_payment_amount(arc200::MINT_PAYMENT);
        contract.set_simulate_only(self.simulate);
        let client = Arc200Client::new(contract);
        let confirmed = match client
            .mint(&self.recipient, name, symbol, self.decimals, &total_supply)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "mint failed");
                false
            }
        };
        println!("Mint success: {confirmed}");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct BalanceCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Owner address, defaults to the signer
    #[arg(long)]
    owner: Option<Address>,
    #[command(flatten)]
    node: NodeArgs,
}

impl BalanceCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let owner = resolve(self.owner, &self.node)?;
        let client = Arc200Client::new(self.node.readonly_contract(self.apid)?);
        println!("{}", client.balance_of(&owner).await?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct AllowanceCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Owner address, defaults to the signer
    #[arg(long)]
    owner: Option<Address>,
    /// Spender address, defaults to the signer
    #[arg(long)]
    spender: Option<Address>,
    #[command(flatten)]
    node: NodeArgs,
}

impl AllowanceCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let owner = resolve(self.owner, &self.node)?;
        let spender = resolve(self.spender, &self.node)?;
        let client = Arc200Client::new(self.node.readonly_contract(self.apid)?);
        println!("{}", client.allowance(&owner, &spender).await?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ApproveCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Spender address
    #[arg(long)]
    spender: Address,
    /// Amount in base units
    #[arg(long)]
    amount: BigUint,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl ApproveCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut contract = self.node.contract(self.apid)?;
        contract.set_payment_amount(arc200::APPROVE_PAYMENT);
        contract.set_simulate_only(self.simulate);
        let client = Arc200Client::new(contract);
        let confirmed = match client.approve(&self.spender, &self.amount).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "approve failed");
                false
            }
        };
        println!("Approve success: {confirmed}");
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TransferCommand {
    /// Application id
    #[arg(long)]
    apid: u64,
    /// Receiver address
    #[arg(long)]
    receiver: Address,
    /// Amount in base units
    #[arg(long)]
    amount: BigUint,
    /// Simulate without submitting
    #[arg(long)]
    simulate: bool,
    #[command(flatten)]
    node: NodeArgs,
}

impl TransferCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut contract = self.node.contract(self.apid)?;
        contract.set_payment_amount(arc200::TRANSFER_PAYMENT);
        contract.set_simulate_only(self.simulate);
        let client = Arc200Client::new(contract);
        let confirmed = match client.transfer(&self.receiver, &self.amount).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "transfer failed");
                false
            }
        };
        println!("Transfer success: {confirmed}");
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
        let client = Arc200Client::new(contract);
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
        let mut client = Arc200Client::new(contract);
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

/// Pad a text field to its fixed byte width, refusing over-length input that
/// would break the fixed-width contract downstream.
fn fixed_field<const N: usize>(value: &str) -> anyhow::Result<[u8; N]> {
    anyhow::ensure!(
        value.len() <= N,
        "`{value}` is {} bytes, field is {N}",
        value.len()
    );
    let padded = codec::pad_zero_bytes(value, N);
    Ok(padded
        .into_bytes()
        .try_into()
        .expect("padded to exactly N bytes"))
}

/// An explicit address, or the signer's own.
fn resolve(address: Option<Address>, node: &NodeArgs) -> anyhow::Result<Address> {
    match address {
        Some(address) => Ok(address),
        None => Ok(node.account().context("no address given")?.address()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_field_pads_and_rejects() {
        let name = fixed_field::<8>("VIA").unwrap();
        assert_eq!(&name, b"VIA\0\0\0\0\0");
        assert!(fixed_field::<8>("LONGSYMBOL").is_err());
        assert_eq!(&fixed_field::<8>("EXACTLY8").unwrap(), b"EXACTLY8");
    }
}
