use solana_client::client_error::ClientError;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

/// Failures coming back from the RPC node.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("rpc error: {0}")]
    Rpc(#[from] Box<ClientError>),
    #[error("transaction failed on-chain: {0}")]
    TransactionFailed(#[from] TransactionError),
    #[error("blockhash expired before signature {signature} was confirmed (block height {block_height} > {last_valid_block_height})")]
    BlockhashExpired {
        signature: String,
        block_height: u64,
        last_valid_block_height: u64,
    },
    #[error("{0}")]
    Other(String),
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        LedgerError::Rpc(Box::new(err))
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("connection request was rejected: {0}")]
    Rejected(String),
    #[error("failed to load wallet keypair from {path}: {reason}")]
    Keyfile { path: String, reason: String },
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Outcome of a controller step that did not complete.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no wallet provider detected")]
    NoProvider,
    #[error("create a sender account and connect a receiver wallet first")]
    NotReady {
        sender_missing: bool,
        recipient_missing: bool,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
