//! UI Theme Module - Consistent color palette and style helpers
//!
//! Provides palette tokens and StyleKit helpers for the dashboard so widgets
//! never hard-code colors.

use ratatui::style::{Color, Modifier, Style};

use sudman_core::unit::ActivityClass;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Primary text color
    pub text: Color,
    /// Dimmed text (hints, footers)
    pub text_dim: Color,
    /// Accent color (titles, prompts)
    pub accent: Color,
    /// Active units, enabled marker
    pub success: Color,
    /// Inactive units, disabled marker
    pub warn: Color,
    /// Failed units
    pub error: Color,
    /// Selection background
    pub selection_bg: Color,
    /// Selection foreground
    pub selection_fg: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::terminal()
    }
}

impl Palette {
    /// Follows the terminal's own 16-color scheme
    pub fn terminal() -> Self {
        Self {
            text: Color::Reset,
            text_dim: Color::DarkGray,
            accent: Color::Cyan,
            success: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            selection_bg: Color::Reset,
            selection_fg: Color::Reset,
            key_hint: Color::Yellow,
        }
    }
}

/// Theme configuration
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    // ========== StyleKit Helper Functions ==========

    /// Style for a unit row, keyed on its active state
    pub fn activity_style(&self, activity: ActivityClass) -> Style {
        let color = match activity {
            ActivityClass::Active => self.palette.success,
            ActivityClass::Failed => self.palette.error,
            ActivityClass::Inactive => self.palette.warn,
            ActivityClass::Other => self.palette.text,
        };
        Style::default().fg(color)
    }

    pub fn enabled_style(&self, enabled: bool) -> Style {
        let color = if enabled {
            self.palette.success
        } else {
            self.palette.warn
        };
        Style::default().fg(color)
    }

    /// Selected rows are drawn reversed over their state color
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
            .add_modifier(Modifier::REVERSED)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default()
            .fg(self.palette.key_hint)
            .add_modifier(Modifier::BOLD)
    }
}

static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the default theme
pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
pub mod styles {
    use super::*;

    pub fn activity(activity: ActivityClass) -> Style {
        theme().activity_style(activity)
    }

    pub fn enabled(enabled: bool) -> Style {
        theme().enabled_style(enabled)
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn title() -> Style {
        theme().title_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }

    pub fn accent() -> Style {
        theme().accent_style()
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }
}
