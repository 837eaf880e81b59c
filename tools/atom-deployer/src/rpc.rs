//! ethers-backed reader and submitter for a live vault endpoint.

use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use ethers::{
    providers::{Middleware, PendingTransaction},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest, H160, H256, U64},
};
use multivault_abi::{CallDescriptor, ContractEndpoint};

use crate::{
    config::DeployConfig,
    errors::DeployError,
    reader::{VaultReader, ViewFunction},
    submitter::{bounded_wait, Receipt, TxSubmitter},
};

pub fn to_h160(address: Address) -> H160 {
    H160::from_slice(address.as_slice())
}

pub fn to_ethers_u256(value: U256) -> ethers::types::U256 {
    ethers::types::U256::from_big_endian(&value.to_be_bytes::<32>())
}

pub fn from_ethers_u256(value: ethers::types::U256) -> U256 {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    U256::from_be_bytes(buf)
}

/// Vault access through any ethers middleware stack.
///
/// In production `M` is `SignerMiddleware<Provider<Http>, LocalWallet>`, so
/// `send` signs locally and fills the nonce and gas limit from the node.
#[derive(Debug)]
pub struct EthersVault<M> {
    client: Arc<M>,
    endpoint: ContractEndpoint,
    gas_price: U256,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl<M: Middleware + 'static> EthersVault<M> {
    pub fn new(client: Arc<M>, config: &DeployConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint,
            gas_price: config.gas_price,
            confirmation_timeout: config.confirmation_timeout,
            poll_interval: config.poll_interval,
        }
    }

    /// Legacy tx carrying the fixed gas price; nonce and gas limit are left
    /// for the middleware to fill.
    pub fn transaction_for(&self, call: &CallDescriptor) -> TypedTransaction {
        TransactionRequest::new()
            .to(to_h160(call.to))
            .value(to_ethers_u256(call.value))
            .data(call.calldata().to_vec())
            .gas_price(to_ethers_u256(self.gas_price))
            .chain_id(self.endpoint.chain_id)
            .into()
    }
}

#[async_trait]
impl<M: Middleware + 'static> VaultReader for EthersVault<M> {
    async fn read_uint(&self, view: ViewFunction) -> Result<U256, DeployError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(to_h160(self.endpoint.address))
            .data(view.calldata().to_vec())
            .into();
        let ret = self
            .client
            .call(&tx, None)
            .await
            .map_err(|e| DeployError::ReadFailure {
                view: view.name(),
                reason: e.to_string(),
            })?;
        view.decode(&ret)
    }
}

#[async_trait]
impl<M: Middleware + 'static> TxSubmitter for EthersVault<M> {
    async fn send(&self, call: &CallDescriptor) -> Result<TxHash, DeployError> {
        let tx = self.transaction_for(call);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| DeployError::SubmissionFailure {
                method: call.method.name,
                reason: e.to_string(),
            })?;
        Ok(TxHash::from_slice(pending.tx_hash().as_bytes()))
    }

    async fn await_receipt(
        &self,
        method: &'static str,
        tx_hash: TxHash,
    ) -> Result<Receipt, DeployError> {
        let pending = PendingTransaction::new(
            H256::from_slice(tx_hash.as_slice()),
            self.client.provider(),
        )
        .interval(self.poll_interval)
        .confirmations(1);

        let mined = bounded_wait(method, tx_hash, self.confirmation_timeout, async {
            pending.await.map_err(|e| DeployError::SubmissionFailure {
                method,
                reason: e.to_string(),
            })
        })
        .await?;

        // `None` means the node dropped the tx from its mempool.
        let receipt = mined.ok_or_else(|| DeployError::SubmissionFailure {
            method,
            reason: format!("tx {tx_hash} dropped before inclusion"),
        })?;

        Ok(Receipt {
            transaction_hash: tx_hash,
            confirmed: receipt.status == Some(U64::from(1)),
            block_number: receipt.block_number.map(|b| b.as_u64()),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use ethers::{
        providers::Provider,
        types::{Transaction, TransactionReceipt},
    };
    use multivault_abi::AbiValue;

    use super::*;

    fn config() -> DeployConfig {
        DeployConfig {
            endpoint: ContractEndpoint {
                address: Address::repeat_byte(0x42),
                chain_id: 84532,
            },
            gas_price: U256::from(500_000_000u64),
            confirmation_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
            verify_prediction: true,
        }
    }

    #[test]
    fn test_u256_conversions_are_lossless() {
        for v in [U256::ZERO, U256::from(500_000_000u64), U256::MAX] {
            assert_eq!(from_ethers_u256(to_ethers_u256(v)), v);
        }
    }

    #[test]
    fn test_create_tx_carries_value_and_fixed_gas_price() {
        let (provider, _mock) = Provider::mocked();
        let vault = EthersVault::new(Arc::new(provider), &config());
        let call = CallDescriptor::new(
            Address::repeat_byte(0x42),
            U256::from(1_000_000_000_000_000u64),
            "createAtom",
            vec![AbiValue::Bytes(Bytes::from_static(b"atom6"))],
        )
        .unwrap();

        let tx = vault.transaction_for(&call);
        assert_eq!(tx.value(), Some(&ethers::types::U256::from(1_000_000_000_000_000u64)));
        assert_eq!(tx.gas_price(), Some(ethers::types::U256::from(500_000_000u64)));
        assert_eq!(tx.to_addr(), Some(&to_h160(Address::repeat_byte(0x42))));
        assert_eq!(tx.data().map(|d| d.to_vec()), Some(call.calldata().to_vec()));
        assert_eq!(tx.chain_id(), Some(U64::from(84532)));
    }

    #[tokio::test]
    async fn test_reads_counter_through_eth_call() {
        let (provider, mock) = Provider::mocked();
        let word = U256::from(5u8).to_be_bytes::<32>();
        mock.push::<ethers::types::Bytes, _>(ethers::types::Bytes::from(word.to_vec()))
            .unwrap();

        let vault = EthersVault::new(Arc::new(provider), &config());
        assert_eq!(vault.read_uint(ViewFunction::Count).await.unwrap(), U256::from(5u8));
    }

    #[tokio::test]
    async fn test_garbage_return_is_read_failure() {
        let (provider, mock) = Provider::mocked();
        mock.push::<ethers::types::Bytes, _>(ethers::types::Bytes::from(vec![1u8, 2, 3]))
            .unwrap();

        let vault = EthersVault::new(Arc::new(provider), &config());
        let err = vault.read_uint(ViewFunction::AtomCost).await.unwrap_err();
        assert!(matches!(err, DeployError::ReadFailure { view: "getAtomCost", .. }));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_read_failure() {
        // An empty mock answers every request with an error.
        let (provider, _mock) = Provider::mocked();
        let vault = EthersVault::new(Arc::new(provider), &config());
        let err = vault.read_uint(ViewFunction::Count).await.unwrap_err();
        assert!(matches!(err, DeployError::ReadFailure { view: "count", .. }));
    }

    fn create_call() -> CallDescriptor {
        CallDescriptor::new(
            Address::repeat_byte(0x42),
            U256::from(1_000_000_000_000_000u64),
            "createAtom",
            vec![AbiValue::Bytes(Bytes::from_static(b"atom6"))],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_node_rejection_is_submission_failure() {
        // Filling the gas limit fails against an empty mock, so nothing is broadcast.
        let (provider, _mock) = Provider::mocked();
        let vault = EthersVault::new(Arc::new(provider), &config());
        let err = vault.send(&create_call()).await.unwrap_err();
        assert!(matches!(err, DeployError::SubmissionFailure { method: "createAtom", .. }));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_not_confirmed() {
        let hash = TxHash::repeat_byte(0x33);
        let h256 = H256::from_slice(hash.as_slice());
        let (provider, mock) = Provider::mocked();

        // The mock answers last-pushed first: tx lookup, then receipt.
        let receipt = TransactionReceipt {
            transaction_hash: h256,
            block_number: Some(U64::from(7)),
            status: Some(U64::zero()),
            ..Default::default()
        };
        mock.push::<TransactionReceipt, _>(receipt).unwrap();
        let tx = Transaction {
            hash: h256,
            block_number: Some(U64::from(7)),
            ..Default::default()
        };
        mock.push::<Transaction, _>(tx).unwrap();

        let vault = EthersVault::new(Arc::new(provider), &config());
        let receipt = vault.await_receipt("createAtom", hash).await.unwrap();
        assert_eq!(
            receipt,
            Receipt {
                transaction_hash: hash,
                confirmed: false,
                block_number: Some(7),
            }
        );
    }

    #[tokio::test]
    async fn test_dropped_tx_is_submission_failure() {
        let (provider, mock) = Provider::mocked();
        mock.push::<Option<Transaction>, _>(None).unwrap();

        let vault = EthersVault::new(Arc::new(provider), &config());
        let err = vault
            .await_receipt("deployAtomWallet", TxHash::repeat_byte(0x44))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::SubmissionFailure { method: "deployAtomWallet", .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_poll_times_out() {
        // Every lookup errors, so the pending tx keeps polling until the bound.
        let (provider, _mock) = Provider::mocked();
        let vault = EthersVault::new(Arc::new(provider), &config());
        let err = vault
            .await_receipt("createAtom", TxHash::repeat_byte(0x55))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::ConfirmationTimeout { method: "createAtom", timeout, .. }
                if timeout == Duration::from_secs(5)
        ));
    }
}
