//! Live log pane.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::{LogBuffer, Theme};

/// Style a formatted log line by its level.
pub fn level_style(line: &str, theme: &Theme) -> Style {
    if line.contains("ERROR") {
        theme.error()
    } else if line.contains("WARN") {
        theme.warning()
    } else if line.contains("INFO") {
        theme.success()
    } else if line.contains("DEBUG") || line.contains("TRACE") {
        theme.muted()
    } else {
        theme.info()
    }
}

/// Render the newest lines that fit, newest at the bottom.
pub fn render(frame: &mut Frame, area: Rect, buffer: &LogBuffer, theme: &Theme) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = buffer
        .recent(visible)
        .into_iter()
        .map(|line| {
            let style = level_style(&line, theme);
            ListItem::new(Line::from(Span::styled(line, style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Logs")
            .border_style(theme.border()),
    );

    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_style() {
        let theme = Theme::default();
        assert_eq!(level_style("2026 ERROR boom", &theme), theme.error());
        assert_eq!(level_style(" WARN rejected", &theme), theme.warning());
        assert_eq!(level_style("plain", &theme), theme.info());
    }
}
