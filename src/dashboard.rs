use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Block,
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::TryRecvError;

use crate::controller::TransferController;

mod actions;
mod types;
mod ui;
mod utils;

pub use types::Dashboard;
use types::AppMode;

const TICK: Duration = Duration::from_millis(150);

/// Where key presses come from. The terminal in production, a script in tests.
pub trait InputSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

impl Dashboard {
    pub fn new(controller: TransferController, wallet_path: Option<PathBuf>) -> Self {
        let provider_events = controller.subscribe_provider_events();
        Self {
            controller,
            provider_events,
            wallet_path,
            should_quit: false,
            selected_action: 0,
            mode: AppMode::Normal,
            status_message: None,
            pending_task: None,
            needs_clear: false,
            animation_frame: 0,
            last_animation_update: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        tracing::info!(endpoint = %self.controller.endpoint(), "dashboard started");
        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        if let Err(err) = &res {
            tracing::error!(error = %err, "dashboard loop failed");
        }
        tracing::info!("dashboard closed");

        res.map_err(Into::into)
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        let mut input = TerminalInput;
        loop {
            if self.last_animation_update.elapsed() > TICK {
                self.animation_frame = self.animation_frame.wrapping_add(1);
                self.last_animation_update = Instant::now();
            }

            self.controller.toasts_mut().prune_expired(Instant::now());
            self.drain_provider_events();

            // Clear terminal if needed (after closing popups)
            if self.needs_clear {
                terminal.clear()?;
                self.needs_clear = false;
            }

            terminal.draw(|f| self.ui(f))?;

            // Run queued work once the busy popup is on screen
            if self.pending_task.is_some() {
                self.run_pending_task(&mut input)?;
                continue;
            }

            if !input.poll(TICK)? {
                continue;
            }

            if let Event::Key(key) = input.read()? {
                // Windows reports both Press and Release
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key.code);
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Run the queued task, then drop whatever was typed while it blocked
    /// so a repeated Enter cannot start a second action.
    fn run_pending_task(&mut self, input: &mut impl InputSource) -> io::Result<()> {
        self.perform_pending_task();
        self.needs_clear = true;

        let mut discarded = 0usize;
        while input.poll(Duration::ZERO)? {
            input.read()?;
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(discarded, "dropped input received while busy");
        }
        Ok(())
    }

    fn drain_provider_events(&mut self) {
        let Some(receiver) = self.provider_events.as_mut() else {
            return;
        };
        loop {
            match receiver.try_recv() {
                Ok(event) => self.controller.handle_provider_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "dropped wallet events");
                }
                Err(TryRecvError::Closed) => {
                    self.provider_events = None;
                    break;
                }
            }
        }
        self.clamp_selection();
    }

    fn handle_key_event(&mut self, code: KeyCode) {
        if self.mode == AppMode::Help {
            // Any key exits help mode
            self.mode = AppMode::Normal;
            self.needs_clear = true;
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') | KeyCode::F(1) => {
                self.mode = AppMode::Help;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.execute_refresh(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.copy_sender_to_clipboard(),
            KeyCode::Char('y') | KeyCode::Char('Y') => self.copy_recipient_to_clipboard(),
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.controller.toasts_mut().dismiss_all();
                self.needs_clear = true;
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
                self.selected_action = self.selected_action.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
                let count = self.controller.available_actions().len();
                if self.selected_action + 1 < count {
                    self.selected_action += 1;
                }
            }
            KeyCode::Enter => self.execute_selected_action(),
            _ => {}
        }
    }

    fn ui(&self, f: &mut Frame) {
        let size = f.area();

        let bg_block = Block::default().style(Style::default().bg(Color::Rgb(15, 5, 35)));
        f.render_widget(bg_block, size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(10),   // Main content
                Constraint::Length(2), // Footer + status
            ])
            .split(size);

        self.render_header(f, chunks[0]);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        if self.controller.provider().is_some() {
            self.render_actions_panel(f, main[0]);
        } else {
            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(8)])
                .split(main[0]);
            self.render_actions_panel(f, left[0]);
            self.render_provider_notice(f, left[1]);
        }
        self.render_accounts_panel(f, main[1]);
        self.render_footer(f, chunks[2]);

        self.render_toasts(f, size);

        if let Some(task) = self.pending_task {
            self.render_busy_popup(f, size, task);
        }
        if self.mode == AppMode::Help {
            self.render_help_overlay(f, size);
        }
    }
}
