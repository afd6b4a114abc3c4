//! Modal input form used for adding and editing.

use crate::format::{coerce_amount, format_capital, normalize_allocation};
use crate::types::{
    ConnectionDraft, Firm, Password, Preset, Strategy, StrategyDraft, StrategyKind, StrategyPatch,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::Theme;

/// What submitting the form does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    NewStrategy(StrategyKind),
    EditStrategy(StrategyKind),
    NewConnection,
    Allocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Firm,
    AccountNumber,
    TradeSymbol,
    TradeQty,
    CapitalAllocation,
    AllocationValue,
    Preset,
    Username,
    Password,
    CurrentAllocation,
    NextEntryAllocation,
}

impl FieldKey {
    fn label(&self) -> &'static str {
        match self {
            FieldKey::Firm => "Brokerage",
            FieldKey::AccountNumber => "Account #",
            FieldKey::TradeSymbol => "Trade Symbol",
            FieldKey::TradeQty => "Trade Qty",
            FieldKey::CapitalAllocation => "Capital Allocation",
            FieldKey::AllocationValue => "Allocation Value",
            FieldKey::Preset => "Preset",
            FieldKey::Username => "Username",
            FieldKey::Password => "Password",
            FieldKey::CurrentAllocation => "Current Allocation",
            FieldKey::NextEntryAllocation => "Next Entry Allocation",
        }
    }

    /// Chosen from a fixed list instead of typed.
    fn is_choice(&self) -> bool {
        matches!(self, FieldKey::Firm | FieldKey::Preset)
    }

    /// Currency fields are re-normalized on every keystroke.
    fn is_currency(&self) -> bool {
        matches!(
            self,
            FieldKey::AllocationValue | FieldKey::CurrentAllocation | FieldKey::NextEntryAllocation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: FieldKey,
    pub value: String,
}

/// Result of feeding a key to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    /// The focused field's value changed.
    Changed(FieldKey),
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub target: FormTarget,
    pub fields: Vec<FormField>,
    pub focus: usize,
    brokerages: Vec<Firm>,
}

impl Form {
    /// Blank form for a new strategy of `kind`.
    pub fn new_strategy(kind: StrategyKind, brokerages: &[Firm]) -> Self {
        let draft = StrategyDraft::default();
        let firm = brokerages.first().copied().unwrap_or_default();
        let mut values = vec![
            (FieldKey::Firm, firm.to_string()),
            (FieldKey::AccountNumber, draft.account_number),
            (FieldKey::TradeSymbol, draft.trade_symbol),
        ];
        values.extend(kind_fields(
            kind,
            draft.trade_qty,
            draft.capital_allocation,
            draft.allocation_value,
            draft.preset,
        ));
        Self::build(FormTarget::NewStrategy(kind), values, brokerages)
    }

    /// Form prefilled from the strategy being edited.
    pub fn edit_strategy(kind: StrategyKind, strategy: &Strategy, brokerages: &[Firm]) -> Self {
        let mut values = vec![
            (FieldKey::Firm, strategy.firm.to_string()),
            (FieldKey::AccountNumber, strategy.account_number.clone()),
            (FieldKey::TradeSymbol, strategy.trade_symbol.clone()),
        ];
        values.extend(kind_fields(
            kind,
            strategy.trade_qty.to_string(),
            strategy.capital_allocation().unwrap_or_default().to_string(),
            strategy.allocation_value().unwrap_or("$0").to_string(),
            strategy.preset().unwrap_or_default(),
        ));
        Self::build(FormTarget::EditStrategy(kind), values, brokerages)
    }

    pub fn new_connection(brokerages: &[Firm]) -> Self {
        let firm = brokerages.first().copied().unwrap_or_default();
        let values = vec![
            (FieldKey::Firm, firm.to_string()),
            (FieldKey::Username, String::new()),
            (FieldKey::AccountNumber, String::new()),
            (FieldKey::Password, String::new()),
        ];
        Self::build(FormTarget::NewConnection, values, brokerages)
    }

    pub fn allocation(current: &str, next_entry: &str) -> Self {
        let values = vec![
            (FieldKey::CurrentAllocation, current.to_string()),
            (FieldKey::NextEntryAllocation, next_entry.to_string()),
        ];
        Self::build(FormTarget::Allocation, values, &[])
    }

    fn build(target: FormTarget, values: Vec<(FieldKey, String)>, brokerages: &[Firm]) -> Self {
        Self {
            target,
            fields: values
                .into_iter()
                .map(|(key, value)| FormField { key, value })
                .collect(),
            focus: 0,
            brokerages: brokerages.to_vec(),
        }
    }

    pub fn value(&self, key: FieldKey) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Feed a key press to the form.
    pub fn handle_key(&mut self, key: &KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Enter => FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                FormAction::None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focused_key().is_choice() => {
                self.cycle_choice();
                FormAction::Changed(self.focused_key())
            }
            KeyCode::Backspace if !self.focused_key().is_choice() => {
                self.fields[self.focus].value.pop();
                self.after_edit();
                FormAction::Changed(self.focused_key())
            }
            KeyCode::Char(c) if !self.focused_key().is_choice() => {
                self.fields[self.focus].value.push(c);
                self.after_edit();
                FormAction::Changed(self.focused_key())
            }
            _ => FormAction::None,
        }
    }

    pub fn focused_key(&self) -> FieldKey {
        self.fields[self.focus].key
    }

    /// Draft for a new strategy from the current values.
    pub fn to_draft(&self) -> StrategyDraft {
        let mut draft = StrategyDraft::default();
        for field in &self.fields {
            match field.key {
                FieldKey::Firm => draft.firm = field.value.parse().unwrap_or_default(),
                FieldKey::AccountNumber => draft.account_number = field.value.clone(),
                FieldKey::TradeSymbol => draft.trade_symbol = field.value.clone(),
                FieldKey::TradeQty => draft.trade_qty = field.value.clone(),
                FieldKey::CapitalAllocation => draft.capital_allocation = field.value.clone(),
                FieldKey::AllocationValue => draft.allocation_value = field.value.clone(),
                FieldKey::Preset => draft.preset = field.value.parse().unwrap_or_default(),
                _ => {}
            }
        }
        draft
    }

    /// Patch carrying only the given field.
    pub fn patch_for(&self, key: FieldKey) -> StrategyPatch {
        let mut patch = StrategyPatch::default();
        let Some(value) = self.value(key) else {
            return patch;
        };
        let value = value.to_string();
        match key {
            FieldKey::Firm => patch.firm = value.parse().ok(),
            FieldKey::AccountNumber => patch.account_number = Some(value),
            FieldKey::TradeSymbol => patch.trade_symbol = Some(value),
            FieldKey::TradeQty => patch.trade_qty = Some(value),
            FieldKey::CapitalAllocation => patch.capital_allocation = Some(value),
            FieldKey::AllocationValue => patch.allocation_value = Some(value),
            FieldKey::Preset => patch.preset = value.parse().ok(),
            _ => {}
        }
        patch
    }

    pub fn to_connection_draft(&self) -> ConnectionDraft {
        ConnectionDraft {
            firm: self
                .value(FieldKey::Firm)
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            username: self.value(FieldKey::Username).unwrap_or_default().to_string(),
            account_number: self
                .value(FieldKey::AccountNumber)
                .unwrap_or_default()
                .to_string(),
            password: Password::new(self.value(FieldKey::Password).unwrap_or_default()),
        }
    }

    fn after_edit(&mut self) {
        let field = &mut self.fields[self.focus];
        if field.key.is_currency() {
            field.value = normalize_allocation(&field.value);
        }
    }

    fn cycle_choice(&mut self) {
        let brokerages = self.brokerages.clone();
        let field = &mut self.fields[self.focus];
        match field.key {
            FieldKey::Preset => {
                let current: Preset = field.value.parse().unwrap_or_default();
                field.value = current.next().to_string();
            }
            FieldKey::Firm if !brokerages.is_empty() => {
                let idx = brokerages
                    .iter()
                    .position(|f| f.as_str() == field.value)
                    .map(|i| (i + 1) % brokerages.len())
                    .unwrap_or(0);
                field.value = brokerages[idx].to_string();
            }
            _ => {}
        }
    }

    fn title(&self) -> String {
        match self.target {
            FormTarget::NewStrategy(kind) => format!("New {} Strategy", kind),
            FormTarget::EditStrategy(kind) => format!("Edit {} Strategy", kind),
            FormTarget::NewConnection => "Add Brokerage Connection".to_string(),
            FormTarget::Allocation => "Capital Allocation".to_string(),
        }
    }
}

fn kind_fields(
    kind: StrategyKind,
    trade_qty: String,
    capital_allocation: String,
    allocation_value: String,
    preset: Preset,
) -> Vec<(FieldKey, String)> {
    let mut values = Vec::new();
    if kind.uses_trade_qty() {
        values.push((FieldKey::TradeQty, trade_qty));
    } else {
        values.push((FieldKey::AllocationValue, allocation_value));
        values.push((FieldKey::Preset, preset.to_string()));
    }
    if kind == StrategyKind::IvlAutomated {
        values.push((FieldKey::CapitalAllocation, capital_allocation));
    }
    values
}

/// Render the form as a centered popup.
pub fn render(frame: &mut Frame, area: Rect, form: &Form, theme: &Theme) {
    let height = form.fields.len() as u16 + 4;
    let popup = centered(area, 60, height);

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let shown = match field.key {
                FieldKey::Password => "*".repeat(field.value.chars().count()),
                FieldKey::CapitalAllocation if i != form.focus => {
                    let amount = coerce_amount(&field.value);
                    format!("{} ({})", field.value, format_capital(amount))
                }
                _ => field.value.clone(),
            };
            let style = if i == form.focus {
                theme.selected()
            } else {
                theme.info()
            };
            let hint = if field.key.is_choice() { " ◂▸" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:>22}: ", field.key.label()), theme.muted()),
                Span::styled(shown, style),
                Span::styled(hint, theme.muted()),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab next field | Enter save | Esc cancel",
        theme.muted(),
    )));

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .border_style(theme.border()),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
}

fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_pct) / 2),
            Constraint::Percentage(width_pct),
            Constraint::Percentage((100 - width_pct) / 2),
        ])
        .split(vertical[1])[1]
}
