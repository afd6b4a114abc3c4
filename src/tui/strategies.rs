//! Strategy group view.

use crate::format::format_capital;
use crate::services::{expandable, Dashboard};
use crate::types::{Strategy, StrategyGroup, StrategyKind};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::Theme;

/// Column headers for a group's table.
pub fn columns(kind: StrategyKind) -> Vec<&'static str> {
    let mut cols = vec!["", "Status", "Brokerage", "Account #", "Symbol"];
    match kind {
        StrategyKind::IvlAutomated => cols.extend(["Qty", "Capital", "Orders"]),
        StrategyKind::Sdte => cols.extend(["Qty", "Orders"]),
        StrategyKind::DiagonalHedge => cols.extend(["Allocation", "Preset"]),
        StrategyKind::Fifo => cols.push("Qty"),
    }
    cols
}

/// Cell text for one strategy row, aligned with [`columns`].
pub fn cells(kind: StrategyKind, strategy: &Strategy, expanded: bool) -> Vec<String> {
    let marker = if !expandable(kind) {
        " "
    } else if expanded {
        "▾"
    } else {
        "▸"
    };
    let mut out = vec![
        marker.to_string(),
        if strategy.is_active { "● Active" } else { "○ Inactive" }.to_string(),
        strategy.firm.to_string(),
        strategy.account_number.clone(),
        strategy.trade_symbol.clone(),
    ];
    let orders = || format!("{} ({} open)", strategy.orders.len(), strategy.open_order_count());
    match kind {
        StrategyKind::IvlAutomated => {
            out.push(strategy.trade_qty.to_string());
            out.push(format_capital(strategy.capital_allocation().unwrap_or_default()));
            out.push(orders());
        }
        StrategyKind::Sdte => {
            out.push(strategy.trade_qty.to_string());
            out.push(orders());
        }
        StrategyKind::DiagonalHedge => {
            out.push(strategy.allocation_value().unwrap_or("$0").to_string());
            out.push(strategy.preset().unwrap_or_default().to_string());
        }
        StrategyKind::Fifo => out.push(strategy.trade_qty.to_string()),
    }
    out
}

fn widths(kind: StrategyKind) -> Vec<Constraint> {
    columns(kind)
        .iter()
        .map(|c| match *c {
            "" => Constraint::Length(2),
            "Status" => Constraint::Length(11),
            "Orders" => Constraint::Length(12),
            _ => Constraint::Min(8),
        })
        .collect()
}

/// Render a strategy group with the selected row highlighted.
///
/// Expanded strategies get their orders and the allocation panel listed
/// underneath the table.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    desk: &Dashboard,
    kind: StrategyKind,
    selected: usize,
    closing_only: bool,
    theme: &Theme,
) {
    let Some(group) = desk.group(kind) else {
        let block = Paragraph::new(Line::from(Span::styled(
            "Group not loaded.",
            theme.muted(),
        )))
        .block(Block::default().borders(Borders::ALL).title(kind.name()));
        frame.render_widget(block, area);
        return;
    };

    let expanded: Vec<&Strategy> = group
        .strategies
        .iter()
        .filter(|s| expandable(kind) && desk.is_expanded(&s.id))
        .collect();

    let table_height = (group.strategies.len() as u16 + 4).min(area.height);
    let (table_area, detail_area) = if expanded.is_empty() {
        (area, None)
    } else {
        let detail = Rect {
            y: area.y + table_height,
            height: area.height.saturating_sub(table_height),
            ..area
        };
        (Rect { height: table_height, ..area }, Some(detail))
    };

    render_table(frame, table_area, desk, group, selected, theme);

    if let Some(detail_area) = detail_area {
        render_details(frame, detail_area, desk, &expanded, closing_only, theme);
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    desk: &Dashboard,
    group: &StrategyGroup,
    selected: usize,
    theme: &Theme,
) {
    let kind = group.kind;
    let rows: Vec<Row> = group
        .strategies
        .iter()
        .enumerate()
        .map(|(i, strategy)| {
            let editing = desk.strategies.is_editing(kind, &strategy.id);
            let row_cells: Vec<Cell> = cells(kind, strategy, desk.is_expanded(&strategy.id))
                .into_iter()
                .enumerate()
                .map(|(col, text)| {
                    let style = if col == 1 {
                        theme.active_flag(strategy.is_active)
                    } else {
                        Style::default()
                    };
                    Cell::from(text).style(style)
                })
                .collect();
            let row = Row::new(row_cells);
            if i == selected {
                row.style(theme.selected())
            } else if editing {
                row.style(theme.warning())
            } else {
                row
            }
        })
        .collect();

    let title = format!(
        "{} ({}/{} active)",
        group.name(),
        group.active_count(),
        group.total_count()
    );

    let table = Table::new(rows, widths(kind))
        .header(
            Row::new(columns(kind))
                .style(theme.header())
                .bottom_margin(1),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(theme.border()),
        );

    frame.render_widget(table, area);
}

fn render_details(
    frame: &mut Frame,
    area: Rect,
    desk: &Dashboard,
    expanded: &[&Strategy],
    closing_only: bool,
    theme: &Theme,
) {
    let mut lines = Vec::new();
    for strategy in expanded {
        lines.push(Line::from(vec![
            Span::styled(format!("#{} ", strategy.id), theme.title()),
            Span::raw(format!("{} on {}", strategy.trade_symbol, strategy.account_number)),
        ]));
        if strategy.orders.is_empty() {
            lines.push(Line::from(Span::styled("  No orders.", theme.muted())));
        }
        for order in &strategy.orders {
            lines.push(Line::from(vec![
                Span::raw(format!(
                    "  {:<4} {:<6} {:<8} {:>6}  ",
                    order.id, order.order_type, order.symbol, order.qty
                )),
                Span::styled(order.status.to_string(), theme.order_status(order.status)),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Current Allocation: ", theme.muted()),
        Span::raw(desk.allocation.current_allocation().to_string()),
        Span::styled("   Next Entry: ", theme.muted()),
        Span::raw(desk.allocation.next_entry_allocation().to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Closing only: ", theme.muted()),
        Span::styled(
            if closing_only { "on" } else { "off" },
            theme.active_flag(closing_only),
        ),
        Span::styled("   [c] close  [x] closing only  [m] allocation  [n] update next entry", theme.muted()),
    ]));

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Details")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}
