use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::wallet::provider::{ConnectOptions, ProviderEvent, ProviderSource, WalletProvider};

pub const KEYFILE_BRAND: &str = "solana-keyfile";

const EVENT_CAPACITY: usize = 16;

/// Wallet backed by a Solana CLI keypair file (the JSON byte array
/// `solana-keygen new` writes). The key is read on every connect and
/// dropped on disconnect.
pub struct KeyfileWallet {
    path: PathBuf,
    trusted: bool,
    keypair: RwLock<Option<Keypair>>,
    last_connected: RwLock<Option<Pubkey>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl KeyfileWallet {
    pub fn new(path: impl Into<PathBuf>, trusted: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            path: path.into(),
            trusted,
            keypair: RwLock::new(None),
            last_connected: RwLock::new(None),
            events,
        }
    }

    fn load(&self) -> Result<Keypair, ProviderError> {
        read_keypair_file(&self.path).map_err(|e| ProviderError::Keyfile {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn emit(&self, event: ProviderEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl WalletProvider for KeyfileWallet {
    fn brand(&self) -> &str {
        KEYFILE_BRAND
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.keypair
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|kp| kp.pubkey())
    }

    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, ProviderError> {
        if options.only_if_trusted && !self.trusted {
            return Err(ProviderError::Rejected(
                "wallet has not trusted this application".to_string(),
            ));
        }

        let keypair = self.load()?;
        let pubkey = keypair.pubkey();
        *self.keypair.write().unwrap_or_else(|e| e.into_inner()) = Some(keypair);

        let previous = self
            .last_connected
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .replace(pubkey);

        tracing::info!(%pubkey, path = %self.path.display(), "keyfile wallet connected");
        if matches!(previous, Some(prev) if prev != pubkey) {
            self.emit(ProviderEvent::AccountChanged(Some(pubkey)));
        }
        self.emit(ProviderEvent::Connect(pubkey));

        Ok(pubkey)
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        let removed = self.keypair.write().unwrap_or_else(|e| e.into_inner()).take();
        match removed {
            Some(_) => {
                tracing::info!(path = %self.path.display(), "keyfile wallet disconnected");
                self.emit(ProviderEvent::Disconnect);
                Ok(())
            }
            None => Err(ProviderError::NotConnected),
        }
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> Result<Transaction, ProviderError> {
        let guard = self.keypair.read().unwrap_or_else(|e| e.into_inner());
        let keypair = guard.as_ref().ok_or(ProviderError::NotConnected)?;

        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[keypair], blockhash)
            .map_err(|e| ProviderError::Signing(e.to_string()))?;

        Ok(transaction)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, ProviderError> {
        let guard = self.keypair.read().unwrap_or_else(|e| e.into_inner());
        let keypair = guard.as_ref().ok_or(ProviderError::NotConnected)?;
        Ok(keypair.sign_message(message))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// Looks for a keyfile wallet at a configured path.
#[derive(Debug, Clone)]
pub struct KeyfileEnvironment {
    pub wallet_path: Option<PathBuf>,
    pub trusted: bool,
}

impl KeyfileEnvironment {
    pub fn new(wallet_path: Option<PathBuf>, trusted: bool) -> Self {
        Self { wallet_path, trusted }
    }

    /// `~/.config/solana/id.json`, where the Solana CLI keeps its default wallet.
    pub fn default_wallet_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("solana").join("id.json"))
    }
}

impl ProviderSource for KeyfileEnvironment {
    fn injected(&self) -> Option<Arc<dyn WalletProvider>> {
        let path = self.wallet_path.as_ref()?;
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no wallet keyfile found");
            return None;
        }
        Some(Arc::new(KeyfileWallet::new(path.clone(), self.trusted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::provider::detect_provider;
    use solana_sdk::{hash::Hash, system_instruction};
    use tempfile::TempDir;

    fn write_wallet(dir: &TempDir, name: &str) -> (PathBuf, Keypair) {
        let keypair = Keypair::new();
        let path = dir.path().join(name);
        solana_sdk::signature::write_keypair_file(&keypair, &path).unwrap();
        (path, keypair)
    }

    #[tokio::test]
    async fn connect_loads_key_and_emits_event() {
        let dir = TempDir::new().unwrap();
        let (path, keypair) = write_wallet(&dir, "id.json");
        let wallet = KeyfileWallet::new(&path, false);
        let mut events = wallet.subscribe();

        let pubkey = wallet.connect(ConnectOptions::default()).await.unwrap();

        assert_eq!(pubkey, keypair.pubkey());
        assert!(wallet.is_connected());
        assert_eq!(events.try_recv().unwrap(), ProviderEvent::Connect(pubkey));
    }

    #[tokio::test]
    async fn eager_connect_requires_trust() {
        let dir = TempDir::new().unwrap();
        let (path, _) = write_wallet(&dir, "id.json");

        let untrusted = KeyfileWallet::new(&path, false);
        assert!(matches!(
            untrusted.connect(ConnectOptions::eager()).await,
            Err(ProviderError::Rejected(_))
        ));
        assert!(!untrusted.is_connected());

        let trusted = KeyfileWallet::new(&path, true);
        assert!(trusted.connect(ConnectOptions::eager()).await.is_ok());
    }

    #[tokio::test]
    async fn unreadable_keyfile_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("id.json");
        std::fs::write(&path, "not a keypair").unwrap();

        let wallet = KeyfileWallet::new(&path, false);
        assert!(matches!(
            wallet.connect(ConnectOptions::default()).await,
            Err(ProviderError::Keyfile { .. })
        ));
    }

    #[tokio::test]
    async fn reconnect_with_different_key_emits_account_changed() {
        let dir = TempDir::new().unwrap();
        let (path, _) = write_wallet(&dir, "id.json");
        let wallet = KeyfileWallet::new(&path, false);
        wallet.connect(ConnectOptions::default()).await.unwrap();

        let replacement = Keypair::new();
        solana_sdk::signature::write_keypair_file(&replacement, &path).unwrap();
        let mut events = wallet.subscribe();
        wallet.connect(ConnectOptions::default()).await.unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            ProviderEvent::AccountChanged(Some(replacement.pubkey()))
        );
        assert_eq!(events.try_recv().unwrap(), ProviderEvent::Connect(replacement.pubkey()));
    }

    #[tokio::test]
    async fn disconnect_drops_key() {
        let dir = TempDir::new().unwrap();
        let (path, _) = write_wallet(&dir, "id.json");
        let wallet = KeyfileWallet::new(&path, false);

        assert!(matches!(wallet.disconnect().await, Err(ProviderError::NotConnected)));

        wallet.connect(ConnectOptions::default()).await.unwrap();
        let mut events = wallet.subscribe();
        wallet.disconnect().await.unwrap();

        assert!(!wallet.is_connected());
        assert_eq!(events.try_recv().unwrap(), ProviderEvent::Disconnect);
    }

    #[tokio::test]
    async fn signs_messages_and_transactions_when_connected() {
        let dir = TempDir::new().unwrap();
        let (path, keypair) = write_wallet(&dir, "id.json");
        let wallet = KeyfileWallet::new(&path, false);

        assert!(matches!(wallet.sign_message(b"hello").await, Err(ProviderError::NotConnected)));

        wallet.connect(ConnectOptions::default()).await.unwrap();
        let signature = wallet.sign_message(b"hello").await.unwrap();
        assert!(signature.verify(keypair.pubkey().as_ref(), b"hello"));

        let ix = system_instruction::transfer(&keypair.pubkey(), &Pubkey::new_unique(), 1);
        let mut tx = Transaction::new_with_payer(&[ix], Some(&keypair.pubkey()));
        tx.message.recent_blockhash = Hash::new_unique();
        let signed = wallet.sign_all_transactions(vec![tx]).await.unwrap();
        assert!(signed[0].is_signed());
    }

    #[test]
    fn environment_injects_only_existing_keyfiles() {
        let dir = TempDir::new().unwrap();
        let missing = KeyfileEnvironment::new(Some(dir.path().join("missing.json")), false);
        assert!(missing.injected().is_none());
        assert!(KeyfileEnvironment::new(None, false).injected().is_none());

        let (path, _) = write_wallet(&dir, "id.json");
        let present = KeyfileEnvironment::new(Some(path), false);
        let provider = detect_provider(&present, KEYFILE_BRAND).unwrap();
        assert_eq!(provider.brand(), KEYFILE_BRAND);
        assert!(detect_provider(&present, "some-other-wallet").is_none());
    }
}
