//! Brokerage connections view.

use crate::services::Dashboard;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::Theme;

pub fn render(frame: &mut Frame, area: Rect, desk: &Dashboard, selected: usize, theme: &Theme) {
    let connections = desk.list_connections();
    if connections.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No brokerage connections. Press [a] to add one.",
                theme.muted(),
            )),
        ];
        let block = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Brokerage Connections")
                    .border_style(theme.border()),
            )
            .centered();
        frame.render_widget(block, area);
        return;
    }

    let rows: Vec<Row> = connections
        .iter()
        .enumerate()
        .map(|(i, conn)| {
            let row = Row::new(vec![
                Cell::from(conn.firm.to_string()),
                Cell::from(conn.username.clone()),
                Cell::from(conn.account_number.clone()),
                Cell::from(format!("● {}", conn.status))
                    .style(theme.connection_status(conn.status)),
            ]);
            if i == selected {
                row.style(theme.selected())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(16),
        ],
    )
    .header(
        Row::new(vec!["Brokerage", "Username", "Account #", "Status"])
            .style(theme.header())
            .bottom_margin(1),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Brokerage Connections ({})", connections.len()))
            .border_style(theme.border()),
    );

    frame.render_widget(table, area);
}
