use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Clear, Paragraph, Row, Table, Wrap},
};
use crate::controller::{format_sol, Action, FundingState};
use crate::dashboard::types::*;
use crate::dashboard::utils::truncate_address;
use crate::icons::Icons;
use crate::notify::ToastKind;
use crate::theme::Theme;

const TOAST_WIDTH: u16 = 52;
const TOAST_HEIGHT: u16 = 4;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::BORDER).add_modifier(Modifier::BOLD))
        .border_type(BorderType::Double)
        .title(format!(" ┃ {} ┃ ", title))
        .title_style(Style::default().fg(Theme::accent()).add_modifier(Modifier::BOLD))
}

fn balance_text(balance: Option<u64>) -> String {
    match balance {
        Some(lamports) => format!("{} SOL", format_sol(lamports)),
        None => "---".to_string(),
    }
}

impl Dashboard {
    pub fn render_header(&self, f: &mut Frame, area: Rect) {
        let pulse = self.get_pulse_intensity();
        let header = vec![
            Line::from(vec![
                Span::styled(
                    "D E V N E T   H A N D O F F",
                    Style::default().fg(Color::Rgb(pulse / 2 + 100, 80, 255)).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{} ", Icons::NETWORK), Style::default().fg(Theme::info())),
                Span::styled(self.controller.endpoint(), Style::default().fg(Theme::SUBTEXT0)),
            ]),
        ];

        let paragraph = Paragraph::new(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Theme::BORDER_GLOW))
                    .border_type(BorderType::Double),
            )
            .style(Style::default().bg(Theme::BASE))
            .alignment(Alignment::Center);

        f.render_widget(paragraph, area);
    }

    pub fn render_actions_panel(&self, f: &mut Frame, area: Rect) {
        let actions = self.controller.available_actions();
        let pulse = self.get_pulse_intensity();

        let rows: Vec<Row> = actions
            .iter()
            .enumerate()
            .map(|(idx, action)| {
                let is_selected = idx == self.selected_action;
                let icon = match action {
                    Action::CreateAccount => Icons::CREATE,
                    Action::ConnectWallet => Icons::CONNECT,
                    Action::DisconnectWallet => Icons::DISCONNECT,
                    Action::TransferFunds => Icons::TRANSFER,
                };

                let row_style = if is_selected {
                    Style::default().bg(Color::Rgb(30, 20, (40 + pulse / 4).min(255)))
                } else {
                    Style::default()
                };

                let label = if is_selected {
                    format!("▶ {}", action.label())
                } else {
                    format!("  {}", action.label())
                };

                Row::new(vec![
                    Line::from(Span::styled(icon, Style::default().fg(Theme::CYAN_BRIGHT).add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(
                        label,
                        Style::default()
                            .fg(if is_selected { Theme::selection() } else { Theme::TEXT })
                            .add_modifier(Modifier::BOLD),
                    )),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [Constraint::Length(4), Constraint::Min(20)];
        let table = Table::new(rows, widths)
            .block(panel("ACTIONS"))
            .style(Style::default().bg(Theme::BASE))
            .column_spacing(1);

        f.render_widget(table, area);
    }

    /// Shown in place of the wallet buttons when nothing was detected.
    pub fn render_provider_notice(&self, f: &mut Frame, area: Rect) {
        let looked_at = self
            .wallet_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(no path configured)".to_string());

        let text = vec![
            Line::from(Span::styled(
                "No wallet provider found.",
                Style::default().fg(Theme::warning()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Looked for: ", Style::default().fg(Theme::SUBTEXT0)),
                Span::styled(looked_at, Style::default().fg(Theme::TEXT)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Install the Solana CLI and run `solana-keygen new`, or pass --wallet <PATH>.",
                Style::default().fg(Theme::SUBTEXT1),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(panel("WALLET"))
            .style(Style::default().bg(Theme::BASE))
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    pub fn render_accounts_panel(&self, f: &mut Frame, area: Rect) {
        let (sender_address, funding, sender_balance) = match self.controller.sender() {
            Some(sender) => {
                let funding = match &sender.funding {
                    FundingState::Pending => ("pending".to_string(), Theme::progress()),
                    FundingState::Funded { signature } => (
                        format!("funded ({})", truncate_address(&signature.to_string())),
                        Theme::success(),
                    ),
                    FundingState::Failed { reason } => (format!("airdrop failed: {}", reason), Theme::error()),
                };
                (sender.pubkey().to_string(), funding, sender.last_balance)
            }
            None => ("not created".to_string(), ("---".to_string(), Theme::DIM), None),
        };

        let recipient_address = self
            .controller
            .recipient()
            .map(|pk| pk.to_string())
            .unwrap_or_else(|| "not connected".to_string());

        let provider = match self.controller.provider() {
            Some(p) if p.is_connected() => (format!("{} (connected)", p.brand()), Theme::success()),
            Some(p) => (p.brand().to_string(), Theme::info()),
            None => ("none detected".to_string(), Theme::warning()),
        };

        let label = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().fg(Theme::accent()).add_modifier(Modifier::BOLD)))
        };

        let rows = vec![
            Row::new(vec![
                label("SENDER"),
                Line::from(vec![
                    Span::styled(format!("{} ", Icons::SENDER), Style::default().fg(Theme::CYAN_NEON)),
                    Span::styled(truncate_address(&sender_address), Style::default().fg(Theme::TEXT)),
                ]),
            ]),
            Row::new(vec![
                label("  status"),
                Line::from(Span::styled(funding.0, Style::default().fg(funding.1))),
            ]),
            Row::new(vec![
                label("  balance"),
                Line::from(Span::styled(
                    balance_text(sender_balance),
                    Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD),
                )),
            ]),
            Row::new(vec![
                Line::from(Span::styled("────────────", Style::default().fg(Theme::DIM))),
                Line::from(Span::styled("────────────────────", Style::default().fg(Theme::DIM))),
            ]),
            Row::new(vec![
                label("WALLET"),
                Line::from(vec![
                    Span::styled(format!("{} ", Icons::WALLET), Style::default().fg(Theme::CYAN_NEON)),
                    Span::styled(truncate_address(&recipient_address), Style::default().fg(Theme::TEXT)),
                ]),
            ]),
            Row::new(vec![
                label("  balance"),
                Line::from(Span::styled(
                    balance_text(self.controller.recipient_balance()),
                    Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD),
                )),
            ]),
            Row::new(vec![
                label("  provider"),
                Line::from(Span::styled(provider.0, Style::default().fg(provider.1))),
            ]),
        ];

        let widths = [Constraint::Length(12), Constraint::Min(20)];
        let table = Table::new(rows, widths)
            .block(panel("ACCOUNTS"))
            .style(Style::default().bg(Theme::BASE))
            .column_spacing(1);

        f.render_widget(table, area);
    }

    pub fn render_footer(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let badge = |key: &'static str| {
            Span::styled(key, Style::default().fg(Theme::BASE).bg(Theme::CYAN_BRIGHT).add_modifier(Modifier::BOLD))
        };
        let hint = |text: &'static str| Span::styled(text, Style::default().fg(Theme::SUBTEXT1));

        let controls = Line::from(vec![
            badge(" ↑/↓ "), hint(" Select  "),
            badge(" ENTER "), hint(" Run  "),
            badge(" C "), hint(" Copy sender  "),
            badge(" Y "), hint(" Copy wallet  "),
            badge(" R "), hint(" Refresh  "),
            badge(" ? "), hint(" Help  "),
            badge(" Q "), hint(" Quit"),
        ]);
        f.render_widget(Paragraph::new(controls).style(Style::default().bg(Theme::BASE)), chunks[0]);

        let status = match (&self.pending_task, &self.status_message) {
            (Some(task), _) => Span::styled(
                format!("{}{}", task.describe(), self.get_animated_dots()),
                Style::default().fg(Theme::progress()).add_modifier(Modifier::BOLD),
            ),
            (None, Some(message)) => Span::styled(message.clone(), Style::default().fg(Theme::TEXT)),
            (None, None) => Span::styled("Ready", Style::default().fg(Theme::DIM)),
        };
        f.render_widget(Paragraph::new(Line::from(status)).style(Style::default().bg(Theme::BASE)), chunks[1]);
    }

    /// Floating notification stack, top-right, newest on top.
    pub fn render_toasts(&self, f: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        let mut y = area.y + 1;

        for toast in self.controller.toasts().visible() {
            if y + TOAST_HEIGHT > area.y + area.height {
                break;
            }

            let (icon, color) = match toast.kind {
                ToastKind::Loading => (Icons::LOADING, Theme::progress()),
                ToastKind::Success => (Icons::SUCCESS, Theme::success()),
                ToastKind::Error => (Icons::ERROR, Theme::error()),
                ToastKind::Info => (Icons::INFO, Theme::info()),
            };

            let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);
            f.render_widget(Clear, toast_area);

            let paragraph = Paragraph::new(vec![Line::from(vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(toast.message.as_str(), Style::default().fg(Theme::TEXT)),
            ])])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", toast.created_at.format("%H:%M:%S")))
                    .title_style(Style::default().fg(Theme::SUBTEXT0)),
            )
            .style(Style::default().bg(Theme::GLASS_2))
            .wrap(Wrap { trim: true });

            f.render_widget(paragraph, toast_area);
            y += TOAST_HEIGHT;
        }
    }
}
