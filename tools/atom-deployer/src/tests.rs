//! Workflow tests against an in-memory vault.

use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use multivault_abi::{CallDescriptor, ContractEndpoint, IEthMultiVault};

use crate::{
    errors::{DeployError, ErrorKind},
    reader::{VaultReader, ViewFunction},
    submitter::{Receipt, TxSubmitter},
    workflow::{AtomDeployment, WorkflowState},
};

const ATOM_COST: u64 = 1_000_000_000_000_000;

/// Mock vault: `createAtom` bumps the counter when mined, optionally with
/// extra atoms created by a competing writer.
struct MockVault {
    counter: Mutex<U256>,
    atom_cost: U256,
    sent: Mutex<Vec<CallDescriptor>>,
    reject: Option<&'static str>,
    revert: Option<&'static str>,
    competing_creates: u64,
    fail_reads: bool,
}

impl MockVault {
    fn new(counter: u64) -> Self {
        Self {
            counter: Mutex::new(U256::from(counter)),
            atom_cost: U256::from(ATOM_COST),
            sent: Mutex::new(Vec::new()),
            reject: None,
            revert: None,
            competing_creates: 0,
            fail_reads: false,
        }
    }

    fn sent(&self) -> Vec<CallDescriptor> {
        self.sent.lock().unwrap().clone()
    }
}

fn hash_for(index: usize) -> TxHash {
    TxHash::repeat_byte(index as u8 + 1)
}

#[async_trait]
impl VaultReader for MockVault {
    async fn read_uint(&self, view: ViewFunction) -> Result<U256, DeployError> {
        if self.fail_reads {
            return Err(DeployError::ReadFailure {
                view: view.name(),
                reason: "connection refused".into(),
            });
        }
        Ok(match view {
            ViewFunction::Count => *self.counter.lock().unwrap(),
            ViewFunction::AtomCost => self.atom_cost,
        })
    }
}

#[async_trait]
impl TxSubmitter for MockVault {
    async fn send(&self, call: &CallDescriptor) -> Result<TxHash, DeployError> {
        if self.reject == Some(call.method.name) {
            return Err(DeployError::SubmissionFailure {
                method: call.method.name,
                reason: "insufficient funds for gas * price + value".into(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(call.clone());
        Ok(hash_for(sent.len() - 1))
    }

    async fn await_receipt(&self, method: &'static str, tx_hash: TxHash) -> Result<Receipt, DeployError> {
        let reverted = self.revert == Some(method);
        if method == "createAtom" && !reverted {
            let mut counter = self.counter.lock().unwrap();
            *counter += U256::from(1 + self.competing_creates);
        }
        Ok(Receipt {
            transaction_hash: tx_hash,
            confirmed: !reverted,
            block_number: Some(100),
        })
    }
}

fn endpoint() -> ContractEndpoint {
    ContractEndpoint {
        address: Address::repeat_byte(0x42),
        chain_id: 84532,
    }
}

#[tokio::test]
async fn test_creates_atom_then_deploys_wallet_for_predicted_id() {
    let vault = MockVault::new(5);
    let outcome = AtomDeployment::new(&vault, &vault, endpoint(), true)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.atom.atom_id, U256::from(6u8));
    assert_eq!(outcome.create.transaction_hash, hash_for(0));
    assert_eq!(outcome.wallet.transaction_hash, hash_for(1));

    let sent = vault.sent();
    assert_eq!(sent.len(), 2);

    let create = &sent[0];
    assert_eq!(create.method.name, "createAtom");
    assert_eq!(create.to, endpoint().address);
    assert_eq!(create.value, U256::from(ATOM_COST));
    let decoded = IEthMultiVault::createAtomCall::abi_decode(create.calldata(), true).unwrap();
    assert_eq!(&decoded.atomUri[..], &b"atom6"[..]);

    let wallet = &sent[1];
    assert_eq!(wallet.method.name, "deployAtomWallet");
    assert_eq!(wallet.value, U256::ZERO);
    let decoded = IEthMultiVault::deployAtomWalletCall::abi_decode(wallet.calldata(), true).unwrap();
    assert_eq!(decoded.atomId, U256::from(6u8));
}

#[tokio::test]
async fn test_rejected_create_never_submits_dependent_call() {
    let mut vault = MockVault::new(5);
    vault.reject = Some("createAtom");

    let err = AtomDeployment::new(&vault, &vault, endpoint(), true)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.state, WorkflowState::SubmitCreate);
    assert_eq!(err.kind(), ErrorKind::SubmissionFailure);
    assert!(vault.sent().is_empty());
}

#[tokio::test]
async fn test_unreachable_node_stops_at_read_state() {
    let mut vault = MockVault::new(5);
    vault.fail_reads = true;

    let err = AtomDeployment::new(&vault, &vault, endpoint(), true)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.state, WorkflowState::ReadState);
    assert_eq!(err.kind(), ErrorKind::ReadFailure);
    assert!(vault.sent().is_empty());
}

#[tokio::test]
async fn test_reverted_create_is_terminal() {
    let mut vault = MockVault::new(5);
    vault.revert = Some("createAtom");

    let err = AtomDeployment::new(&vault, &vault, endpoint(), true)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.state, WorkflowState::AwaitCreateConfirmed);
    assert_eq!(err.kind(), ErrorKind::TransactionReverted);
    assert_eq!(vault.sent().len(), 1);
}

#[tokio::test]
async fn test_competing_creator_is_detected_before_wallet_deploy() {
    let mut vault = MockVault::new(5);
    vault.competing_creates = 1;

    let err = AtomDeployment::new(&vault, &vault, endpoint(), true)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.state, WorkflowState::VerifyPrediction);
    assert!(matches!(
        err.source,
        DeployError::PredictionRace { expected, observed }
            if expected == U256::from(6u8) && observed == U256::from(7u8)
    ));
    assert_eq!(vault.sent().len(), 1);
}

#[tokio::test]
async fn test_skipped_check_accepts_the_race() {
    let mut vault = MockVault::new(5);
    vault.competing_creates = 1;

    let outcome = AtomDeployment::new(&vault, &vault, endpoint(), false)
        .run()
        .await
        .unwrap();

    // Still the predicted id, even though the vault moved on.
    assert_eq!(outcome.atom.atom_id, U256::from(6u8));
    let sent = vault.sent();
    let decoded = IEthMultiVault::deployAtomWalletCall::abi_decode(sent[1].calldata(), true).unwrap();
    assert_eq!(decoded.atomId, U256::from(6u8));
}

#[tokio::test]
async fn test_reverted_wallet_deploy_reports_dependent_state() {
    let mut vault = MockVault::new(0);
    vault.revert = Some("deployAtomWallet");

    let err = AtomDeployment::new(&vault, &vault, endpoint(), true)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.state, WorkflowState::AwaitDependentConfirmed);
    assert!(err.to_string().contains("AWAIT_DEPENDENT_CONFIRMED"));
    assert_eq!(vault.sent().len(), 2);
}
