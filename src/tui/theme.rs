//! Theme and color definitions for the TUI.

use crate::types::{ConnectionStatus, OrderStatus};
use ratatui::style::{Color, Modifier, Style};

/// Theme for the TUI with consistent color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Magenta,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            info: Color::Blue,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.danger)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn tab_active(&self) -> Style {
        self.selected()
    }

    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Badge color for an order status.
    pub fn order_status(&self, status: OrderStatus) -> Style {
        match status {
            OrderStatus::Filled => self.success(),
            OrderStatus::Working => self.info(),
            OrderStatus::Pending => self.warning(),
            OrderStatus::Cancelled => self.muted(),
        }
    }

    pub fn connection_status(&self, status: ConnectionStatus) -> Style {
        match status {
            ConnectionStatus::Connected => self.success(),
            ConnectionStatus::Disconnected => self.error(),
        }
    }

    pub fn active_flag(&self, is_active: bool) -> Style {
        if is_active {
            self.success()
        } else {
            self.muted()
        }
    }
}
