use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Only connect if the wallet has already trusted this application;
    /// never prompt.
    pub only_if_trusted: bool,
}

impl ConnectOptions {
    pub fn eager() -> Self {
        Self { only_if_trusted: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Connect(Pubkey),
    Disconnect,
    AccountChanged(Option<Pubkey>),
}

/// A wallet the user controls, found in the environment at startup.
///
/// Mirrors the surface a wallet extension injects into a page: a brand flag,
/// connect/disconnect, signing, and an event stream.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Identity flag used to validate the detected provider.
    fn brand(&self) -> &str;

    fn public_key(&self) -> Option<Pubkey>;

    fn is_connected(&self) -> bool {
        self.public_key().is_some()
    }

    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, ProviderError>;

    async fn disconnect(&self) -> Result<(), ProviderError>;

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, ProviderError>;

    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, ProviderError> {
        let mut signed = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            signed.push(self.sign_transaction(transaction).await?);
        }
        Ok(signed)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, ProviderError>;

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

/// Where providers are injected from.
pub trait ProviderSource {
    fn injected(&self) -> Option<Arc<dyn WalletProvider>>;
}

/// Returns the injected provider if there is one and it identifies as
/// `expected_brand`.
pub fn detect_provider(
    source: &dyn ProviderSource,
    expected_brand: &str,
) -> Option<Arc<dyn WalletProvider>> {
    let provider = source.injected()?;
    if provider.brand() == expected_brand {
        Some(provider)
    } else {
        tracing::warn!(
            brand = provider.brand(),
            expected = expected_brand,
            "ignoring injected wallet with unexpected brand"
        );
        None
    }
}
