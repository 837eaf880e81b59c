use std::{path::PathBuf, time::Duration};

use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use clap::Parser;
use multivault_abi::ContractEndpoint;

/// Create the next EthMultiVault atom, then deploy its atom wallet.
///
/// Reads `count()` and `getAtomCost()`, predicts the new atom id, submits
/// `createAtom` and, once mined, `deployAtomWallet(predicted id)`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON-RPC URL of the target chain.
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Chain id, eg Base Sepolia (84532) or Base Mainnet (8453).
    #[arg(long, env = "CHAIN_ID", default_value_t = 84532)]
    pub chain_id: u64,

    /// EthMultiVault transparent upgradeable proxy address.
    #[arg(long, env = "MULTIVAULT_ADDRESS")]
    pub multivault: Address,

    /// Signer private key (hex string, 0x...).
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Fixed legacy gas price, in gwei.
    #[arg(long, env = "GAS_PRICE_GWEI", default_value = "0.5")]
    pub gas_price_gwei: String,

    /// Give up waiting for a tx to be mined after this many seconds.
    #[arg(long, env = "CONFIRMATION_TIMEOUT_SECS", default_value_t = 180)]
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval, in milliseconds.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2_000)]
    pub poll_interval_ms: u64,

    /// Do not re-read `count()` after `createAtom` is mined.
    ///
    /// Without the check a concurrent atom creation goes unnoticed and the
    /// wallet is deployed for someone else's atom.
    #[arg(long)]
    pub skip_prediction_check: bool,

    /// Optional JSON file recording completed runs (eg, atoms.base-sepolia.json).
    #[arg(long, env = "DEPLOY_REPORT_PATH")]
    pub report_path: Option<PathBuf>,

    /// Network name written to the run report.
    #[arg(long, default_value = "base-sepolia")]
    pub network: String,
}

/// Everything the workflow components need, resolved from the CLI once.
#[derive(Clone, Debug)]
pub struct DeployConfig {
    pub endpoint: ContractEndpoint,
    /// Gas price in wei, applied to every submitted tx.
    pub gas_price: U256,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
    pub verify_prediction: bool,
}

impl Cli {
    pub fn deploy_config(&self) -> Result<DeployConfig> {
        Ok(DeployConfig {
            endpoint: ContractEndpoint {
                address: self.multivault,
                chain_id: self.chain_id,
            },
            gas_price: parse_gwei(&self.gas_price_gwei)?,
            confirmation_timeout: Duration::from_secs(self.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            verify_prediction: !self.skip_prediction_check,
        })
    }
}

/// Parse a decimal gwei amount (eg `0.5`) into wei.
pub fn parse_gwei(amount: &str) -> Result<U256> {
    let wei: ethers::types::U256 = ethers::utils::parse_units(amount, "gwei")
        .with_context(|| format!("invalid gas price `{amount}` gwei"))?
        .into();
    Ok(crate::rpc::from_ethers_u256(wei))
}
