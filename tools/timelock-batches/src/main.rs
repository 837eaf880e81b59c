use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use multivault_abi::ContractEndpoint;
use time::OffsetDateTime;
use timelock_batches::{
    artifacts::{write_batch, write_timelock_pair},
    encode_direct, encode_timelocked, BatchLabel, GovernanceAction,
};

/// Generate Safe Transaction Builder JSON files for EthMultiVault admin calls.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// EthMultiVault transparent upgradeable proxy address.
    #[arg(long, env = "MULTIVAULT_ADDRESS")]
    multivault: Address,

    /// Chain id, eg Base Sepolia (84532) or Base Mainnet (8453).
    #[arg(long, env = "CHAIN_ID", default_value_t = 84532)]
    chain_id: u64,

    /// Safe the batches will be imported into (recorded in batch metadata).
    #[arg(long, env = "SAFE_ADDRESS")]
    safe: Option<Address>,

    /// Directory the batch files are written to.
    #[arg(long, default_value = "_playground")]
    out_dir: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Timelocked `setExitFee(id, exitFee)`: writes ScheduleExitFee.json and ExecExitFee.json.
    ExitFee {
        /// Vault id (0 is the default vault).
        #[arg(long, env = "VAULT_ID", default_value = "0")]
        vault_id: U256,

        /// Exit fee in basis points of the fee denominator (500 = 5%).
        #[arg(long, env = "EXIT_FEE", default_value = "500")]
        exit_fee: U256,
    },
    /// `pause()`: writes Pause.json.
    Pause,
    /// `unpause()`: writes Unpause.json.
    Unpause,
}

fn main() {
    dotenv::dotenv().ok();
    init_logging();

    if let Err(e) = run() {
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

fn now_ms() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let endpoint = ContractEndpoint {
        address: cli.multivault,
        chain_id: cli.chain_id,
    };
    let created_at = now_ms();
    let meta = |label: BatchLabel| label.metadata(created_at).with_safe(cli.safe);

    match cli.action {
        Action::ExitFee { vault_id, exit_fee } => {
            let action = GovernanceAction::set_exit_fee(vault_id, exit_fee);
            let batches = encode_timelocked(
                &endpoint,
                &action,
                meta(BatchLabel::SCHEDULE_EXIT_FEE),
                meta(BatchLabel::EXEC_EXIT_FEE),
            )
            .context("failed encoding setExitFee batches")?;

            let schedule_path = cli.out_dir.join("ScheduleExitFee.json");
            let exec_path = cli.out_dir.join("ExecExitFee.json");
            write_timelock_pair(&batches, &schedule_path, &exec_path)?;

            println!("Operation id:          {}", batches.operation_id);
            println!("File for scheduling:   {}", schedule_path.display());
            println!("File for executing:    {}", exec_path.display());
        }
        Action::Pause => {
            let batch = encode_direct(&endpoint, &GovernanceAction::pause(), meta(BatchLabel::PAUSE))
                .context("failed encoding pause batch")?;
            let path = cli.out_dir.join("Pause.json");
            write_batch(&path, &batch)?;
            println!("File for pause:        {}", path.display());
        }
        Action::Unpause => {
            let batch = encode_direct(&endpoint, &GovernanceAction::unpause(), meta(BatchLabel::UNPAUSE))
                .context("failed encoding unpause batch")?;
            let path = cli.out_dir.join("Unpause.json");
            write_batch(&path, &batch)?;
            println!("File for unpause:      {}", path.display());
        }
    }
    Ok(())
}
