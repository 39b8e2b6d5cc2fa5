// Dark terminal theme for devnet-handoff
// Deep background, neon accents for state, dim greys for chrome

use ratatui::style::Color;

pub struct Theme;

impl Theme {
    // Base colors
    pub const BASE: Color = Color::Rgb(8, 8, 18);           // Deep space black-blue
    pub const GLASS_1: Color = Color::Rgb(18, 18, 32);      // Raised panel
    pub const GLASS_2: Color = Color::Rgb(22, 22, 38);      // Toasts

    // Text colors
    pub const TEXT: Color = Color::Rgb(255, 255, 255);
    pub const SUBTEXT1: Color = Color::Rgb(200, 210, 230);
    pub const SUBTEXT0: Color = Color::Rgb(160, 170, 200);
    pub const DIM: Color = Color::Rgb(50, 55, 75);

    // Neon accents
    pub const CYAN_NEON: Color = Color::Rgb(0, 255, 255);
    pub const CYAN_BRIGHT: Color = Color::Rgb(80, 255, 255);
    pub const PURPLE_NEON: Color = Color::Rgb(180, 80, 255);  // Solana purple
    pub const GREEN_NEON: Color = Color::Rgb(80, 255, 150);
    pub const RED_NEON: Color = Color::Rgb(255, 80, 120);
    pub const YELLOW_NEON: Color = Color::Rgb(255, 220, 0);
    pub const ORANGE_NEON: Color = Color::Rgb(255, 160, 50);

    // Borders
    pub const BORDER: Color = Color::Rgb(140, 140, 140);
    pub const BORDER_GLOW: Color = Color::Rgb(0, 200, 255);

    /// Panel titles and table headers
    pub const fn accent() -> Color {
        Self::ORANGE_NEON
    }

    pub const fn success() -> Color {
        Self::GREEN_NEON
    }

    pub const fn error() -> Color {
        Self::RED_NEON
    }

    pub const fn warning() -> Color {
        Self::YELLOW_NEON
    }

    pub const fn info() -> Color {
        Self::CYAN_BRIGHT
    }

    /// In-flight network work
    pub const fn progress() -> Color {
        Self::PURPLE_NEON
    }

    pub const fn selection() -> Color {
        Self::YELLOW_NEON
    }
}
