use crate::dashboard::types::{Dashboard, PendingTask};

impl Dashboard {
    /// Queue the highlighted action. It runs after the next draw so the
    /// busy popup is on screen while we wait on the network.
    pub fn execute_selected_action(&mut self) {
        if self.pending_task.is_some() {
            return;
        }
        let actions = self.controller.available_actions();
        if let Some(action) = actions.get(self.selected_action).copied() {
            self.pending_task = Some(PendingTask::Run(action));
            self.status_message = None;
        }
    }

    pub fn execute_refresh(&mut self) {
        if self.pending_task.is_none() {
            self.pending_task = Some(PendingTask::RefreshBalances);
        }
    }

    pub fn perform_pending_task(&mut self) {
        let Some(task) = self.pending_task else {
            return;
        };

        let controller = &mut self.controller;
        let outcome = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                match task {
                    PendingTask::Run(action) => controller.run(action).await,
                    PendingTask::RefreshBalances => {
                        controller.refresh_balances().await;
                        Ok(())
                    }
                }
            })
        });

        // The toast stack already carries the user-facing message
        self.status_message = Some(match outcome {
            Ok(()) => format!("✓ {}", task.describe()),
            Err(e) => format!("✗ {}: {}", task.describe(), e),
        });

        self.pending_task = None;
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let count = self.controller.available_actions().len();
        if self.selected_action >= count {
            self.selected_action = count.saturating_sub(1);
        }
    }
}
