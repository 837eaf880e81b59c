use std::sync::Arc;

use anyhow::{Context, Result};
use atom_deployer::{config::Cli, report, rpc::EthersVault, AtomDeployment};
use clap::Parser;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logging();

    if let Err(e) = run().await {
        tracing::error!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.deploy_config()?;

    let provider = Provider::<Http>::try_from(cli.rpc_url.as_str())
        .with_context(|| format!("invalid RPC URL {}", cli.rpc_url))?
        .interval(config.poll_interval);
    let wallet = cli
        .private_key
        .trim()
        .parse::<LocalWallet>()
        .context("failed parsing signer private key")?
        .with_chain_id(config.endpoint.chain_id);
    tracing::info!(
        signer = ?wallet.address(),
        multivault = %config.endpoint.address,
        chain_id = config.endpoint.chain_id,
        "connecting"
    );

    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    let vault = EthersVault::new(client, &config);

    let outcome = AtomDeployment::new(&vault, &vault, config.endpoint, config.verify_prediction)
        .run()
        .await?;

    if let Some(ref path) = cli.report_path {
        report::record_completed_run(path, &cli.network, &outcome);
    }

    println!(
        "Created `{}` (id {}) and deployed its atom wallet",
        outcome.atom.label, outcome.atom.atom_id
    );
    Ok(())
}
