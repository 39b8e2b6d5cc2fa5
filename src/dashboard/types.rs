use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::broadcast;

use crate::controller::{Action, TransferController};
use crate::wallet::provider::ProviderEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Work queued by a key press and run on the next loop iteration, after the
/// busy popup has been drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingTask {
    Run(Action),
    RefreshBalances,
}

impl PendingTask {
    pub fn describe(&self) -> &'static str {
        match self {
            PendingTask::Run(Action::CreateAccount) => "Creating new account and airdropping SOL",
            PendingTask::Run(Action::ConnectWallet) => "Connecting to wallet",
            PendingTask::Run(Action::DisconnectWallet) => "Disconnecting from wallet",
            PendingTask::Run(Action::TransferFunds) => "Transferring SOL",
            PendingTask::RefreshBalances => "Refreshing balances",
        }
    }
}

/// Dashboard state structure
pub struct Dashboard {
    pub controller: TransferController,
    pub provider_events: Option<broadcast::Receiver<ProviderEvent>>,
    pub wallet_path: Option<PathBuf>,
    pub should_quit: bool,
    pub selected_action: usize,
    pub mode: AppMode,
    pub status_message: Option<String>,
    pub pending_task: Option<PendingTask>,
    pub needs_clear: bool,
    // Animation state
    pub animation_frame: u8,
    pub last_animation_update: Instant,
}
