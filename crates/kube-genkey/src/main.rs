// ABOUTME: Entry point for the kube-genkey provisioning tool
// ABOUTME: Ensures SSH deploy keys exist and refreshes the ssh-setup config map

use anyhow::Result;
use clap::Parser;
use kube_genkey::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    genkey_log::init_for(&["kube_genkey", "genkey_ssh"]);

    let cli = Cli::parse();

    kube_genkey::run(cli).await?;
    Ok(())
}
