//! Wallet/transfer controller.
//!
//! Holds the three optional pieces of session state (detected provider,
//! connected recipient, generated sender) and runs the four user actions as
//! sequential pipelines. Every action reports through the toast stack and
//! also returns a typed result so headless callers can stop on failure.

use solana_sdk::{
    native_token::{lamports_to_sol, LAMPORTS_PER_SOL},
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::{ControllerError, LedgerError};
use crate::notify::{ToastKind, ToastStack};
use crate::solana::client::Ledger;
use crate::wallet::keyfile::KEYFILE_BRAND;
use crate::wallet::provider::{self, ConnectOptions, ProviderEvent, ProviderSource, WalletProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSettings {
    /// Lamports requested from the faucet for a new sender.
    pub fund_grant_lamports: u64,
    /// Lamports moved from sender to recipient per transfer.
    pub transfer_lamports: u64,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            fund_grant_lamports: 2 * LAMPORTS_PER_SOL,
            transfer_lamports: LAMPORTS_PER_SOL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingState {
    Pending,
    Funded { signature: Signature },
    Failed { reason: String },
}

/// The throwaway account generated for this session. Never written to disk.
pub struct SenderAccount {
    keypair: Keypair,
    pub funding: FundingState,
    pub last_balance: Option<u64>,
}

impl SenderAccount {
    fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
            funding: FundingState::Pending,
            last_balance: None,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateAccount,
    ConnectWallet,
    DisconnectWallet,
    TransferFunds,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::CreateAccount => "Create a New Solana Account",
            Action::ConnectWallet => "Connect to Wallet",
            Action::DisconnectWallet => "Disconnect from Wallet",
            Action::TransferFunds => "Transfer SOL to Wallet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingReceipt {
    pub address: Pubkey,
    pub signature: Signature,
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub signature: Signature,
    pub lamports: u64,
    pub sender_balance: Option<u64>,
    pub recipient_balance: Option<u64>,
}

pub fn format_sol(lamports: u64) -> String {
    format!("{}", lamports_to_sol(lamports))
}

pub struct TransferController {
    ledger: Arc<dyn Ledger>,
    expected_brand: String,
    settings: TransferSettings,
    provider: Option<Arc<dyn WalletProvider>>,
    recipient: Option<Pubkey>,
    recipient_balance: Option<u64>,
    sender: Option<SenderAccount>,
    toasts: ToastStack,
}

impl TransferController {
    pub fn new(ledger: Arc<dyn Ledger>, settings: TransferSettings) -> Self {
        Self {
            ledger,
            expected_brand: KEYFILE_BRAND.to_string(),
            settings,
            provider: None,
            recipient: None,
            recipient_balance: None,
            sender: None,
            toasts: ToastStack::default(),
        }
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> String {
        self.ledger.endpoint()
    }

    pub fn provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.provider.as_ref()
    }

    pub fn recipient(&self) -> Option<Pubkey> {
        self.recipient
    }

    pub fn recipient_balance(&self) -> Option<u64> {
        self.recipient_balance
    }

    pub fn sender(&self) -> Option<&SenderAccount> {
        self.sender.as_ref()
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastStack {
        &mut self.toasts
    }

    pub fn can_transfer(&self) -> bool {
        self.sender.is_some() && self.recipient.is_some()
    }

    /// Actions the user can trigger in the current state, in display order.
    pub fn available_actions(&self) -> Vec<Action> {
        let mut actions = vec![Action::CreateAccount];
        if self.provider.is_some() {
            if self.recipient.is_none() {
                actions.push(Action::ConnectWallet);
            } else {
                actions.push(Action::DisconnectWallet);
            }
            if self.can_transfer() {
                actions.push(Action::TransferFunds);
            }
        }
        actions
    }

    pub async fn run(&mut self, action: Action) -> Result<(), ControllerError> {
        match action {
            Action::CreateAccount => self.create_funded_account().await.map(|_| ()),
            Action::ConnectWallet => self.connect_wallet().await.map(|_| ()),
            Action::DisconnectWallet => self.disconnect_wallet().await,
            Action::TransferFunds => self.transfer_funds().await.map(|_| ()),
        }
    }

    /// Look for an injected wallet in `source`. Absence is not an error.
    pub fn detect_provider(&mut self, source: &dyn ProviderSource) -> Option<Arc<dyn WalletProvider>> {
        self.provider = provider::detect_provider(source, &self.expected_brand);
        match &self.provider {
            Some(p) => tracing::info!(brand = p.brand(), "wallet provider detected"),
            None => tracing::info!("no wallet provider detected"),
        }
        self.provider.clone()
    }

    pub fn subscribe_provider_events(&self) -> Option<broadcast::Receiver<ProviderEvent>> {
        self.provider.as_ref().map(|p| p.subscribe())
    }

    pub fn handle_provider_event(&mut self, event: ProviderEvent) {
        tracing::debug!(?event, "provider event");
        match event {
            ProviderEvent::Connect(pubkey) | ProviderEvent::AccountChanged(Some(pubkey)) => {
                if self.recipient != Some(pubkey) {
                    self.recipient = Some(pubkey);
                    self.recipient_balance = None;
                }
            }
            ProviderEvent::Disconnect | ProviderEvent::AccountChanged(None) => {
                self.recipient = None;
                self.recipient_balance = None;
            }
        }
    }

    /// Generate a sender keypair and ask the faucet to fund it.
    ///
    /// The keypair stays in place even if funding fails; its `funding`
    /// state records the failure.
    pub async fn create_funded_account(&mut self) -> Result<FundingReceipt, ControllerError> {
        let grant = self.settings.fund_grant_lamports;
        let toast = self
            .toasts
            .loading(format!("Creating new account and airdropping {} SOL...", format_sol(grant)));

        let account = SenderAccount::generate();
        let address = account.pubkey();
        tracing::info!(%address, "sender account created");
        self.sender = Some(account);

        tracing::info!(%address, lamports = grant, "airdropping to sender");
        let result = self.fund(address, grant).await;

        let (funding, balance) = match &result {
            Ok((signature, balance)) => (FundingState::Funded { signature: *signature }, *balance),
            Err(err) => (FundingState::Failed { reason: err.to_string() }, None),
        };
        if let Some(sender) = self.sender.as_mut() {
            sender.funding = funding;
            sender.last_balance = balance;
        }

        match result {
            Ok((signature, balance)) => {
                self.toasts.update(
                    toast,
                    ToastKind::Success,
                    format!("Successfully created account and airdropped {} SOL!", format_sol(grant)),
                );
                Ok(FundingReceipt {
                    address,
                    signature,
                    balance,
                })
            }
            Err(err) => {
                tracing::error!(%address, error = %err, "airdrop failed");
                self.toasts
                    .fail(toast, "Failed to create account and airdrop SOL. Please try again.");
                Err(err.into())
            }
        }
    }

    async fn fund(&self, address: Pubkey, lamports: u64) -> Result<(Signature, Option<u64>), LedgerError> {
        let signature = self.ledger.request_airdrop(&address, lamports).await?;
        let block = self.ledger.latest_block_reference().await?;
        self.ledger.confirm_transaction(&signature, &block).await?;
        tracing::info!(%signature, "airdrop confirmed");

        let balance = self.diagnostic_balance("sender", &address).await;
        Ok((signature, balance))
    }

    /// Balance lookups after an action are informational only; a failure
    /// is logged and does not fail the action.
    async fn diagnostic_balance(&self, role: &str, address: &Pubkey) -> Option<u64> {
        match self.ledger.balance(address).await {
            Ok(lamports) => {
                tracing::info!(role, %address, sol = %format_sol(lamports), "balance");
                Some(lamports)
            }
            Err(err) => {
                tracing::warn!(role, %address, error = %err, "balance lookup failed");
                None
            }
        }
    }

    pub async fn connect_wallet(&mut self) -> Result<Pubkey, ControllerError> {
        let Some(provider) = self.provider.clone() else {
            self.toasts
                .error("No wallet provider found. Configure a wallet keyfile first.");
            return Err(ControllerError::NoProvider);
        };

        let toast = self.toasts.loading("Connecting to wallet...");
        match provider.connect(ConnectOptions::default()).await {
            Ok(pubkey) => {
                tracing::info!(%pubkey, "wallet connected");
                self.recipient = Some(pubkey);
                self.recipient_balance = None;
                self.toasts
                    .update(toast, ToastKind::Success, "Successfully connected to wallet!");
                Ok(pubkey)
            }
            Err(err) => {
                tracing::error!(error = %err, "wallet connect failed");
                self.toasts
                    .fail(toast, "Failed to connect to wallet. Please try again.");
                Err(err.into())
            }
        }
    }

    /// Silent reconnect to a wallet that already trusts us. Never raises a
    /// toast on rejection.
    pub async fn try_eager_connect(&mut self) -> Option<Pubkey> {
        let provider = self.provider.clone()?;
        match provider.connect(ConnectOptions::eager()).await {
            Ok(pubkey) => {
                tracing::info!(%pubkey, "reconnected to trusted wallet");
                self.recipient = Some(pubkey);
                self.recipient_balance = None;
                self.toasts.info("Reconnected to trusted wallet");
                Some(pubkey)
            }
            Err(err) => {
                tracing::debug!(error = %err, "eager connect declined");
                None
            }
        }
    }

    /// Disconnect the wallet. The recipient is cleared whatever the
    /// provider answers.
    pub async fn disconnect_wallet(&mut self) -> Result<(), ControllerError> {
        let Some(provider) = self.provider.clone() else {
            self.recipient = None;
            self.recipient_balance = None;
            self.toasts.error("No wallet provider found.");
            return Err(ControllerError::NoProvider);
        };

        let toast = self.toasts.loading("Disconnecting from wallet...");
        let result = provider.disconnect().await;
        self.recipient = None;
        self.recipient_balance = None;

        match result {
            Ok(()) => {
                tracing::info!("wallet disconnected");
                self.toasts
                    .update(toast, ToastKind::Success, "Successfully disconnected from wallet!");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "wallet disconnect failed");
                self.toasts
                    .fail(toast, "Failed to disconnect from wallet. Please try again.");
                Err(err.into())
            }
        }
    }

    /// Send the fixed transfer amount from the sender to the connected wallet.
    pub async fn transfer_funds(&mut self) -> Result<TransferReceipt, ControllerError> {
        let (sender, recipient) = match (self.sender.as_ref(), self.recipient) {
            (Some(sender), Some(recipient)) => (sender, recipient),
            (sender, recipient) => {
                tracing::warn!(
                    sender_missing = sender.is_none(),
                    recipient_missing = recipient.is_none(),
                    "transfer requested before both endpoints were ready"
                );
                self.toasts
                    .error("Please create a sender account and connect a receiver wallet first");
                return Err(ControllerError::NotReady {
                    sender_missing: sender.is_none(),
                    recipient_missing: recipient.is_none(),
                });
            }
        };

        let lamports = self.settings.transfer_lamports;
        let from = sender.pubkey();
        let toast = self
            .toasts
            .loading(format!("Transferring {} SOL...", format_sol(lamports)));

        let instruction = system_instruction::transfer(&from, &recipient, lamports);
        let result = self.ledger.send_and_confirm(&[instruction], sender.keypair()).await;

        let signature = match result {
            Ok(signature) => signature,
            Err(err) => {
                tracing::error!(%from, %recipient, error = %err, "transfer failed");
                self.toasts.fail(toast, "Failed to transfer SOL. Please try again.");
                return Err(err.into());
            }
        };
        tracing::info!(%signature, "transaction sent and confirmed");

        let sender_balance = self.diagnostic_balance("sender", &from).await;
        let recipient_balance = self.diagnostic_balance("recipient", &recipient).await;
        if let Some(sender) = self.sender.as_mut() {
            sender.last_balance = sender_balance;
        }
        self.recipient_balance = recipient_balance;

        self.toasts.update(
            toast,
            ToastKind::Success,
            format!("Successfully transferred {} SOL!", format_sol(lamports)),
        );

        Ok(TransferReceipt {
            signature,
            lamports,
            sender_balance,
            recipient_balance,
        })
    }

    /// Re-read both balances for the details panel.
    pub async fn refresh_balances(&mut self) {
        if let Some(address) = self.sender.as_ref().map(|s| s.pubkey()) {
            let balance = self.diagnostic_balance("sender", &address).await;
            if let Some(sender) = self.sender.as_mut() {
                sender.last_balance = balance.or(sender.last_balance);
            }
        }
        if let Some(recipient) = self.recipient {
            let balance = self.diagnostic_balance("recipient", &recipient).await;
            self.recipient_balance = balance.or(self.recipient_balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::solana::client::BlockReference;
    use async_trait::async_trait;
    use solana_sdk::{hash::Hash, instruction::Instruction, transaction::Transaction};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Airdrop(Pubkey, u64),
        LatestBlock,
        Confirm(Signature),
        Balance(Pubkey),
        Send {
            instructions: Vec<Instruction>,
            signer: Pubkey,
        },
    }

    #[derive(Default)]
    struct FakeLedger {
        calls: Mutex<Vec<Call>>,
        fail_airdrop: bool,
        fail_send: bool,
        fail_balance: bool,
    }

    impl FakeLedger {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl Ledger for FakeLedger {
        fn endpoint(&self) -> String {
            "fake://ledger".to_string()
        }

        async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
            self.record(Call::Airdrop(*to, lamports));
            if self.fail_airdrop {
                return Err(LedgerError::Other("faucet unavailable".to_string()));
            }
            Ok(Signature::new_unique())
        }

        async fn latest_block_reference(&self) -> Result<BlockReference, LedgerError> {
            self.record(Call::LatestBlock);
            Ok(BlockReference {
                blockhash: Hash::new_unique(),
                last_valid_block_height: 1_000,
            })
        }

        async fn confirm_transaction(
            &self,
            signature: &Signature,
            _block: &BlockReference,
        ) -> Result<(), LedgerError> {
            self.record(Call::Confirm(*signature));
            Ok(())
        }

        async fn balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
            self.record(Call::Balance(*address));
            if self.fail_balance {
                return Err(LedgerError::Other("balance unavailable".to_string()));
            }
            Ok(LAMPORTS_PER_SOL)
        }

        async fn send_and_confirm(
            &self,
            instructions: &[Instruction],
            signer: &Keypair,
        ) -> Result<Signature, LedgerError> {
            self.record(Call::Send {
                instructions: instructions.to_vec(),
                signer: signer.pubkey(),
            });
            if self.fail_send {
                return Err(LedgerError::Other("node rejected transaction".to_string()));
            }
            Ok(Signature::new_unique())
        }
    }

    struct FakeProvider {
        brand: &'static str,
        key: Pubkey,
        reject_connect: bool,
        fail_disconnect: bool,
        events: broadcast::Sender<ProviderEvent>,
    }

    impl FakeProvider {
        fn new() -> Self {
            let (events, _) = broadcast::channel(4);
            Self {
                brand: KEYFILE_BRAND,
                key: Pubkey::new_unique(),
                reject_connect: false,
                fail_disconnect: false,
                events,
            }
        }
    }

    #[async_trait]
    impl WalletProvider for FakeProvider {
        fn brand(&self) -> &str {
            self.brand
        }

        fn public_key(&self) -> Option<Pubkey> {
            Some(self.key)
        }

        async fn connect(&self, _options: ConnectOptions) -> Result<Pubkey, ProviderError> {
            if self.reject_connect {
                return Err(ProviderError::Rejected("user rejected the request".to_string()));
            }
            Ok(self.key)
        }

        async fn disconnect(&self) -> Result<(), ProviderError> {
            if self.fail_disconnect {
                return Err(ProviderError::NotConnected);
            }
            Ok(())
        }

        async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, ProviderError> {
            Ok(transaction)
        }

        async fn sign_message(&self, _message: &[u8]) -> Result<Signature, ProviderError> {
            Ok(Signature::default())
        }

        fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
            self.events.subscribe()
        }
    }

    struct Injected(Option<Arc<dyn WalletProvider>>);

    impl ProviderSource for Injected {
        fn injected(&self) -> Option<Arc<dyn WalletProvider>> {
            self.0.clone()
        }
    }

    fn controller_with(ledger: &Arc<FakeLedger>, provider: Option<FakeProvider>) -> TransferController {
        let mut controller = TransferController::new(ledger.clone(), TransferSettings::default());
        let source = Injected(provider.map(|p| Arc::new(p) as Arc<dyn WalletProvider>));
        controller.detect_provider(&source);
        controller
    }

    fn latest_toast(controller: &TransferController) -> (ToastKind, String) {
        let toast = controller.toasts().latest().unwrap();
        (toast.kind, toast.message.clone())
    }

    #[tokio::test]
    async fn create_funded_account_requests_grant_and_confirms() {
        let ledger = Arc::new(FakeLedger::default());
        let mut controller = controller_with(&ledger, None);

        let receipt = controller.create_funded_account().await.unwrap();

        let sender = controller.sender().unwrap();
        assert_eq!(sender.pubkey(), receipt.address);
        assert_eq!(sender.funding, FundingState::Funded { signature: receipt.signature });
        assert_eq!(sender.last_balance, Some(LAMPORTS_PER_SOL));
        assert_eq!(
            ledger.calls(),
            vec![
                Call::Airdrop(receipt.address, 2 * LAMPORTS_PER_SOL),
                Call::LatestBlock,
                Call::Confirm(receipt.signature),
                Call::Balance(receipt.address),
            ]
        );
        assert_eq!(
            latest_toast(&controller),
            (ToastKind::Success, "Successfully created account and airdropped 2 SOL!".to_string())
        );
        assert_eq!(controller.toasts().len(), 1);
    }

    #[tokio::test]
    async fn failed_airdrop_still_leaves_sender_keypair() {
        let ledger = Arc::new(FakeLedger {
            fail_airdrop: true,
            ..Default::default()
        });
        let mut controller = controller_with(&ledger, Some(FakeProvider::new()));

        let result = controller.create_funded_account().await;

        assert!(matches!(result, Err(ControllerError::Ledger(_))));
        let sender = controller.sender().expect("keypair is kept after a failed grant");
        assert!(matches!(sender.funding, FundingState::Failed { .. }));
        assert_eq!(sender.last_balance, None);
        assert_eq!(controller.recipient(), None);
        assert_eq!(ledger.calls().len(), 1);
        assert_eq!(latest_toast(&controller).0, ToastKind::Error);
    }

    #[tokio::test]
    async fn failed_balance_lookup_does_not_fail_funding() {
        let ledger = Arc::new(FakeLedger {
            fail_balance: true,
            ..Default::default()
        });
        let mut controller = controller_with(&ledger, None);

        let receipt = controller.create_funded_account().await.unwrap();

        assert_eq!(receipt.balance, None);
        assert_eq!(latest_toast(&controller).0, ToastKind::Success);
    }

    #[tokio::test]
    async fn transfer_without_endpoints_makes_no_network_call() {
        let ledger = Arc::new(FakeLedger::default());
        let mut controller = controller_with(&ledger, Some(FakeProvider::new()));

        let result = controller.transfer_funds().await;
        assert!(matches!(
            result,
            Err(ControllerError::NotReady {
                sender_missing: true,
                recipient_missing: true
            })
        ));

        controller.connect_wallet().await.unwrap();
        let result = controller.transfer_funds().await;
        assert!(matches!(
            result,
            Err(ControllerError::NotReady {
                sender_missing: true,
                recipient_missing: false
            })
        ));

        assert!(ledger.calls().is_empty());
        assert_eq!(
            latest_toast(&controller),
            (
                ToastKind::Error,
                "Please create a sender account and connect a receiver wallet first".to_string()
            )
        );
    }

    #[tokio::test]
    async fn transfer_with_sender_only_is_rejected() {
        let ledger = Arc::new(FakeLedger::default());
        let mut controller = controller_with(&ledger, Some(FakeProvider::new()));
        controller.create_funded_account().await.unwrap();
        let calls_before = ledger.calls().len();

        let result = controller.transfer_funds().await;

        assert!(matches!(
            result,
            Err(ControllerError::NotReady {
                sender_missing: false,
                recipient_missing: true
            })
        ));
        assert_eq!(ledger.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn connect_sets_recipient_only_on_success() {
        let ledger = Arc::new(FakeLedger::default());

        let provider = FakeProvider::new();
        let key = provider.key;
        let mut controller = controller_with(&ledger, Some(provider));
        assert_eq!(controller.connect_wallet().await.unwrap(), key);
        assert_eq!(controller.recipient(), Some(key));

        let mut rejecting = FakeProvider::new();
        rejecting.reject_connect = true;
        let mut controller = controller_with(&ledger, Some(rejecting));
        assert!(matches!(
            controller.connect_wallet().await,
            Err(ControllerError::Provider(ProviderError::Rejected(_)))
        ));
        assert_eq!(controller.recipient(), None);
        assert_eq!(latest_toast(&controller).0, ToastKind::Error);
    }

    #[tokio::test]
    async fn connect_without_provider_reports_error() {
        let ledger = Arc::new(FakeLedger::default());
        let mut controller = controller_with(&ledger, None);

        assert!(matches!(controller.connect_wallet().await, Err(ControllerError::NoProvider)));
        assert_eq!(controller.recipient(), None);
        assert_eq!(latest_toast(&controller).0, ToastKind::Error);
    }

    #[tokio::test]
    async fn disconnect_clears_recipient_even_when_provider_fails() {
        let ledger = Arc::new(FakeLedger::default());
        let mut provider = FakeProvider::new();
        provider.fail_disconnect = true;
        let mut controller = controller_with(&ledger, Some(provider));
        controller.connect_wallet().await.unwrap();

        let result = controller.disconnect_wallet().await;

        assert!(matches!(result, Err(ControllerError::Provider(_))));
        assert_eq!(controller.recipient(), None);
        assert_eq!(latest_toast(&controller).0, ToastKind::Error);
    }

    #[tokio::test]
    async fn disconnect_success_clears_recipient() {
        let ledger = Arc::new(FakeLedger::default());
        let mut controller = controller_with(&ledger, Some(FakeProvider::new()));
        controller.connect_wallet().await.unwrap();

        controller.disconnect_wallet().await.unwrap();

        assert_eq!(controller.recipient(), None);
        assert_eq!(
            controller.available_actions(),
            vec![Action::CreateAccount, Action::ConnectWallet]
        );
    }

    #[test]
    fn without_provider_only_create_is_available() {
        let ledger = Arc::new(FakeLedger::default());
        let controller = controller_with(&ledger, None);

        assert!(controller.provider().is_none());
        assert_eq!(controller.available_actions(), vec![Action::CreateAccount]);
    }

    #[test]
    fn provider_with_unexpected_brand_is_ignored() {
        let ledger = Arc::new(FakeLedger::default());
        let mut provider = FakeProvider::new();
        provider.brand = "other-wallet";
        let controller = controller_with(&ledger, Some(provider));

        assert!(controller.provider().is_none());
    }

    #[tokio::test]
    async fn create_connect_transfer_submits_one_fixed_transfer() {
        let ledger = Arc::new(FakeLedger::default());
        let provider = FakeProvider::new();
        let recipient = provider.key;
        let mut controller = controller_with(&ledger, Some(provider));

        controller.create_funded_account().await.unwrap();
        controller.connect_wallet().await.unwrap();
        assert_eq!(
            controller.available_actions(),
            vec![Action::CreateAccount, Action::DisconnectWallet, Action::TransferFunds]
        );

        let sender = controller.sender().unwrap().pubkey();
        let receipt = controller.transfer_funds().await.unwrap();

        let sends: Vec<_> = ledger
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send { instructions, signer } => Some((instructions, signer)),
                _ => None,
            })
            .collect();
        assert_eq!(sends.len(), 1);
        assert_eq!(
            sends[0].0,
            vec![system_instruction::transfer(&sender, &recipient, LAMPORTS_PER_SOL)]
        );
        assert_eq!(sends[0].1, sender);
        assert_eq!(receipt.lamports, LAMPORTS_PER_SOL);
        assert_eq!(receipt.recipient_balance, Some(LAMPORTS_PER_SOL));
        assert_eq!(
            latest_toast(&controller),
            (ToastKind::Success, "Successfully transferred 1 SOL!".to_string())
        );
    }

    #[tokio::test]
    async fn failed_transfer_keeps_state_and_reports() {
        let ledger = Arc::new(FakeLedger {
            fail_send: true,
            ..Default::default()
        });
        let mut controller = controller_with(&ledger, Some(FakeProvider::new()));
        controller.create_funded_account().await.unwrap();
        controller.connect_wallet().await.unwrap();

        assert!(matches!(controller.transfer_funds().await, Err(ControllerError::Ledger(_))));
        assert!(controller.can_transfer());
        assert_eq!(
            latest_toast(&controller),
            (ToastKind::Error, "Failed to transfer SOL. Please try again.".to_string())
        );
    }

    #[tokio::test]
    async fn provider_events_track_recipient() {
        let ledger = Arc::new(FakeLedger::default());
        let mut controller = controller_with(&ledger, Some(FakeProvider::new()));
        let key = Pubkey::new_unique();

        controller.handle_provider_event(ProviderEvent::Connect(key));
        assert_eq!(controller.recipient(), Some(key));

        let other = Pubkey::new_unique();
        controller.handle_provider_event(ProviderEvent::AccountChanged(Some(other)));
        assert_eq!(controller.recipient(), Some(other));

        controller.handle_provider_event(ProviderEvent::Disconnect);
        assert_eq!(controller.recipient(), None);
    }

    #[tokio::test]
    async fn eager_connect_is_silent_on_rejection() {
        let ledger = Arc::new(FakeLedger::default());
        let mut provider = FakeProvider::new();
        provider.reject_connect = true;
        let mut controller = controller_with(&ledger, Some(provider));

        assert_eq!(controller.try_eager_connect().await, None);
        assert!(controller.toasts().is_empty());
    }

    #[tokio::test]
    async fn refresh_reads_both_balances() {
        let ledger = Arc::new(FakeLedger::default());
        let provider = FakeProvider::new();
        let recipient = provider.key;
        let mut controller = controller_with(&ledger, Some(provider));
        controller.create_funded_account().await.unwrap();
        controller.connect_wallet().await.unwrap();
        assert_eq!(controller.recipient_balance(), None);

        controller.refresh_balances().await;

        let sender = controller.sender().unwrap().pubkey();
        let calls = ledger.calls();
        assert_eq!(
            calls[calls.len() - 2..].to_vec(),
            vec![Call::Balance(sender), Call::Balance(recipient)]
        );
        assert_eq!(controller.recipient_balance(), Some(LAMPORTS_PER_SOL));
        assert_eq!(controller.toasts().len(), 2);
    }

    #[tokio::test]
    async fn eager_connect_resets_stale_recipient_balance() {
        let ledger = Arc::new(FakeLedger::default());
        let provider = FakeProvider::new();
        let key = provider.key;
        let mut controller = controller_with(&ledger, Some(provider));
        controller.connect_wallet().await.unwrap();
        controller.refresh_balances().await;
        assert_eq!(controller.recipient_balance(), Some(LAMPORTS_PER_SOL));

        assert_eq!(controller.try_eager_connect().await, Some(key));
        assert_eq!(controller.recipient(), Some(key));
        assert_eq!(controller.recipient_balance(), None);
    }

    #[test]
    fn sol_amounts_render_without_trailing_zeros() {
        assert_eq!(format_sol(2 * LAMPORTS_PER_SOL), "2");
        assert_eq!(format_sol(LAMPORTS_PER_SOL / 2), "0.5");
    }
}
