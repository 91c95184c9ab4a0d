use crate::helpers::NodeArgs;
use anyhow::Context;
use arckit_client::{
    contract,
    indexer,
    transaction::{StateSchema, Transaction},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DeployCommand {
    /// Application name, used to resolve redeployments
    #[arg(long)]
    name: String,
    /// Path to the base64-encoded compiled approval program
    #[arg(long)]
    approval: PathBuf,
    /// Path to the base64-encoded compiled clear-state program
    #[arg(long)]
    clear: PathBuf,
    /// Global state uint slots
    #[arg(long, default_value_t = 8)]
    global_uints: u64,
    /// Global state byte-slice slots
    #[arg(long, default_value_t = 8)]
    global_byte_slices: u64,
    #[command(flatten)]
    node: NodeArgs,
}

impl DeployCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let account = self.node.account()?;
        let creator = account.address();

        // same-name deployments by the same creator resolve to the existing app
        if let Some(app_id) = self
            .node
            .indexer()
            .find_application(&creator, &self.name)
            .await?
        {
            tracing::info!(app_id, name = %self.name, "application already deployed");
            println!("{app_id}");
            return Ok(());
        }

        let approval = read_program(&self.approval)?;
        let clear = read_program(&self.clear)?;

        let algod = self.node.algod();
        let params = algod.suggested_params().await?;
        let txn = Transaction::app_create(
            &params,
            &creator,
            approval,
            clear,
            StateSchema {
                byte_slices: self.global_byte_slices,
                uints: self.global_uints,
            },
            indexer::deploy_note(&self.name),
        );
        let confirmed = contract::sign_and_send(&algod, &account, vec![txn]).await?;
        if confirmed.application_index == 0 {
            anyhow::bail!("node reported no created application id");
        }
        tracing::info!(
            app_id = confirmed.application_index,
            round = confirmed.confirmed_round,
            "deployed"
        );
        println!("{}", confirmed.application_index);
        Ok(())
    }
}

pub(crate) fn read_program(path: &Path) -> anyhow::Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading program {}", path.display()))?;
    BASE64
        .decode(text.trim())
        .with_context(|| format!("decoding program {}", path.display()))
}
