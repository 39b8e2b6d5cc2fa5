use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Clear, Paragraph, Wrap},
};
use crate::dashboard::types::*;
use crate::icons::Icons;
use crate::theme::Theme;

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

impl Dashboard {
    /// Drawn for the one frame between a key press and the blocking network
    /// work it triggers.
    pub fn render_busy_popup(&self, f: &mut Frame, area: Rect, task: PendingTask) {
        let popup_area = centered_rect(50, 20, area);
        f.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{} ", Icons::LOADING), Style::default().fg(Theme::progress()).add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{}{}", task.describe(), self.get_animated_dots()),
                    Style::default().fg(Theme::TEXT),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for the network to confirm",
                Style::default().fg(Theme::SUBTEXT0).add_modifier(Modifier::ITALIC),
            )),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Theme::progress()).add_modifier(Modifier::BOLD))
                    .border_type(BorderType::Double)
                    .title(" ┃ WORKING ┃ ")
                    .title_style(Style::default().fg(Theme::accent()).add_modifier(Modifier::BOLD)),
            )
            .style(Style::default().bg(Theme::GLASS_1))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, popup_area);
    }

    pub fn render_help_overlay(&self, f: &mut Frame, area: Rect) {
        let heading = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().fg(Theme::GREEN_NEON).add_modifier(Modifier::BOLD)))
        };
        let entry = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Theme::TEXT)));

        let help_text = vec![
            Line::from(Span::styled(
                "DEVNET HANDOFF - HELP",
                Style::default().fg(Theme::CYAN_BRIGHT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            heading("Navigation:"),
            entry("  ↑/↓ or j/k  - Navigate actions"),
            entry("  Enter       - Run selected action"),
            Line::from(""),
            heading("Flow:"),
            entry("  1. Create a new account (airdrops 2 SOL on devnet)"),
            entry("  2. Connect your wallet"),
            entry("  3. Transfer 1 SOL from the new account to your wallet"),
            Line::from(""),
            heading("Other:"),
            entry("  C           - Copy sender address"),
            entry("  Y           - Copy wallet address"),
            entry("  R           - Refresh balances"),
            entry("  X           - Dismiss notifications"),
            entry("  H or ?      - Show this help"),
            entry("  Q or Esc    - Quit dashboard"),
            Line::from(""),
            Line::from(Span::styled(
                "The sender keypair only lives in memory; it is gone when you quit.",
                Style::default().fg(Theme::warning()),
            )),
            Line::from(""),
            Line::from(Span::styled("Press any key to close help", Style::default().fg(Theme::SUBTEXT0))),
        ];

        let help_area = centered_rect(60, 70, area);
        f.render_widget(Clear, help_area);

        let help_paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Theme::BORDER).add_modifier(Modifier::BOLD))
                    .border_type(BorderType::Double)
                    .title(" ┃ HELP ┃ ")
                    .title_style(Style::default().fg(Theme::accent()).add_modifier(Modifier::BOLD)),
            )
            .style(Style::default().bg(Theme::BASE))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });

        f.render_widget(help_paragraph, help_area);
    }
}
