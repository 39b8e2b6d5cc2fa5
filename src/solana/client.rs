use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};
use std::time::Duration;

use crate::error::LedgerError;

/// Public devnet endpoint, the only cluster this tool talks to by default.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A blockhash together with the last block height at which transactions
/// referencing it can still land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReference {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl BlockReference {
    pub fn is_expired_at(&self, block_height: u64) -> bool {
        block_height > self.last_valid_block_height
    }
}

/// Result of a single confirmation poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationPoll {
    Confirmed,
    Failed(TransactionError),
    Pending,
    Expired { block_height: u64 },
}

impl ConfirmationPoll {
    /// Classify a signature status against the block reference it was sent with.
    /// `block_height` is only consulted when the signature is still unknown.
    pub fn classify(
        status: Option<Result<(), TransactionError>>,
        block_height: Option<u64>,
        block: &BlockReference,
    ) -> Self {
        match status {
            Some(Ok(())) => ConfirmationPoll::Confirmed,
            Some(Err(err)) => ConfirmationPoll::Failed(err),
            None => match block_height {
                Some(height) if block.is_expired_at(height) => {
                    ConfirmationPoll::Expired { block_height: height }
                }
                _ => ConfirmationPoll::Pending,
            },
        }
    }
}

/// The RPC/ledger operations the transfer controller needs.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Endpoint the ledger talks to, for display.
    fn endpoint(&self) -> String;

    /// Ask the faucet to credit `to` with `lamports`. Returns the airdrop signature.
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError>;

    async fn latest_block_reference(&self) -> Result<BlockReference, LedgerError>;

    /// Wait until `signature` is confirmed or `block` expires.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        block: &BlockReference,
    ) -> Result<(), LedgerError>;

    async fn balance(&self, address: &Pubkey) -> Result<u64, LedgerError>;

    /// Sign `instructions` with `signer` as fee payer, submit and wait for confirmation.
    async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, LedgerError>;
}

pub struct DevnetClient {
    rpc_client: RpcClient,
}

impl DevnetClient {
    pub fn new(rpc_url: &str) -> Self {
        // Use 60 second timeout for better reliability on slow networks
        let rpc_client = RpcClient::new_with_timeout_and_commitment(
            rpc_url.to_string(),
            Duration::from_secs(60),
            CommitmentConfig::confirmed(),
        );

        Self { rpc_client }
    }
}

#[async_trait]
impl Ledger for DevnetClient {
    fn endpoint(&self) -> String {
        self.rpc_client.url()
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
        tracing::debug!(%to, lamports, "requesting airdrop");
        let signature = self.rpc_client.request_airdrop(to, lamports).await?;
        Ok(signature)
    }

    async fn latest_block_reference(&self) -> Result<BlockReference, LedgerError> {
        let (blockhash, last_valid_block_height) = self
            .rpc_client
            .get_latest_blockhash_with_commitment(self.rpc_client.commitment())
            .await?;

        Ok(BlockReference {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        block: &BlockReference,
    ) -> Result<(), LedgerError> {
        loop {
            let status = self.rpc_client.get_signature_status(signature).await?;
            let block_height = if status.is_none() {
                Some(self.rpc_client.get_block_height().await?)
            } else {
                None
            };

            match ConfirmationPoll::classify(status, block_height, block) {
                ConfirmationPoll::Confirmed => return Ok(()),
                ConfirmationPoll::Failed(err) => return Err(err.into()),
                ConfirmationPoll::Expired { block_height } => {
                    return Err(LedgerError::BlockhashExpired {
                        signature: signature.to_string(),
                        block_height,
                        last_valid_block_height: block.last_valid_block_height,
                    })
                }
                ConfirmationPoll::Pending => tokio::time::sleep(CONFIRM_POLL_INTERVAL).await,
            }
        }
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        let lamports = self.rpc_client.get_balance(address).await?;
        Ok(lamports)
    }

    async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, LedgerError> {
        let recent_blockhash = self.rpc_client.get_latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&signer.pubkey()),
            &[signer],
            recent_blockhash,
        );

        let signature = self.rpc_client.send_and_confirm_transaction(&transaction).await?;
        Ok(signature)
    }
}
