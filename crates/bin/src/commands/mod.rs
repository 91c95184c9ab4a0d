use crate::helpers::run_async;
use clap::Subcommand;

mod arc200;
mod arc72;
mod deploy;

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Deploy a token application from compiled programs")]
    Deploy(deploy::DeployCommand),
    #[command(subcommand, about = "Manage an ARC-200 fungible token")]
    Arc200(arc200::Arc200Commands),
    #[command(subcommand, about = "Manage an ARC-72 NFT collection")]
    Arc72(arc72::Arc72Commands),
}

impl Commands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Commands::Deploy(cmd) => run_async(cmd.run()),
            Commands::Arc200(cmd) => cmd.run(),
            Commands::Arc72(cmd) => cmd.run(),
        }
    }
}
