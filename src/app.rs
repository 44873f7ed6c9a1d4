use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::{max, min};
use std::io;

use crate::db::repository::TransactionStore;
use crate::errors::Error;
use crate::models::transaction::Transaction;
use crate::operations::form::{FormState, SubmitOutcome};
use crate::operations::summary;

const CATEGORY_PALETTE: &[Color] = &[
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightBlue,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Dashboard,
    Transactions,
    Form,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "[1] Dashboard",
            Tab::Transactions => "[2] Transactions",
            Tab::Form => "[3] Add/Edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Description,
    Amount,
    Kind,
    Category,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Description => FormField::Amount,
            FormField::Amount => FormField::Kind,
            FormField::Kind => FormField::Category,
            FormField::Category => FormField::Description,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Description => FormField::Category,
            FormField::Amount => FormField::Description,
            FormField::Kind => FormField::Amount,
            FormField::Category => FormField::Kind,
        }
    }
}

struct StatusLine {
    text: String,
    color: Color,
}

struct App {
    store: TransactionStore,
    form: FormState,
    tab: Tab,
    table_state: TableState,
    focus: FormField,

    // Pending delete confirmation, holding the target id
    confirm_delete: Option<String>,

    status: Option<StatusLine>,

    // Cached per-draw
    last_page_size: usize,
}

impl App {
    fn new(store: TransactionStore) -> Self {
        let mut app = Self {
            store,
            form: FormState::default(),
            tab: Tab::Dashboard,
            table_state: TableState::default(),
            focus: FormField::Description,
            confirm_delete: None,
            status: None,
            last_page_size: 10,
        };
        app.clamp_selection();
        app
    }

    fn selected_transaction(&self) -> Option<&Transaction> {
        let selected = self.table_state.selected()?;
        self.store.all().get(selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.store.all().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let selected = match self.table_state.selected() {
                Some(sel) => min(sel, len - 1),
                None => 0,
            };
            self.table_state.select(Some(selected));
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.store.all().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }

        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = len.saturating_sub(1) as i32;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.table_state.select(Some(next));
    }

    fn page_up(&mut self) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(-page);
    }

    fn page_down(&mut self) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(page);
    }

    fn set_status(&mut self, text: String, color: Color) {
        self.status = Some(StatusLine { text, color });
    }

    fn start_edit_selected(&mut self) {
        if let Some(transaction) = self.selected_transaction().cloned() {
            self.form.start_edit(&transaction);
            self.tab = Tab::Form;
            self.focus = FormField::Description;
            self.set_status(
                format!("Editing \"{}\"", transaction.description),
                Color::Yellow,
            );
        }
    }

    fn confirm_pending_delete(&mut self) -> Result<(), Error> {
        if let Some(id) = self.confirm_delete.take() {
            let description = self
                .store
                .all()
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.description.clone())
                .unwrap_or_default();

            if self.store.remove(&id)? {
                self.set_status(format!("Deleted \"{}\"", description), Color::Green);
            }
            self.clamp_selection();
        }
        Ok(())
    }

    fn submit_form(&mut self) -> Result<(), Error> {
        let description = self.form.description.trim().to_string();
        match self.form.submit(&mut self.store)? {
            SubmitOutcome::Added => {
                self.clamp_selection();
                self.set_status(format!("Added \"{}\"", description), Color::Green);
            }
            SubmitOutcome::Updated => {
                self.set_status(format!("Updated \"{}\"", description), Color::Green);
                self.tab = Tab::Transactions;
            }
            SubmitOutcome::Rejected(message) => {
                self.set_status(message.to_string(), Color::Red);
            }
        }
        Ok(())
    }
}

pub fn run_app(store: TransactionStore) -> Result<(), Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        let mut app = App::new(store);

        loop {
            terminal.draw(|frame| {
                let size = frame.area();
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(1),
                        Constraint::Length(2),
                    ])
                    .split(size);

                render_header(frame, layout[0], &app);
                match app.tab {
                    Tab::Dashboard => render_dashboard(frame, layout[1], &app),
                    Tab::Transactions => render_transactions(frame, layout[1], &mut app),
                    Tab::Form => render_form(frame, layout[1], &app),
                }
                render_status(frame, layout[2], &app);
                render_footer(frame, layout[3], &app);

                if app.confirm_delete.is_some() {
                    render_confirm_modal(frame, size, &app);
                }
            })?;

            if event::poll(std::time::Duration::from_millis(200))? {
                match event::read()? {
                    Event::Key(key) => {
                        if handle_key(&mut app, key)? {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool, Error> {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }

    if app.confirm_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_pending_delete()?,
            KeyCode::Char('n') | KeyCode::Esc => app.confirm_delete = None,
            _ => {}
        }
        return Ok(false);
    }

    match app.tab {
        Tab::Dashboard => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('2') => app.tab = Tab::Transactions,
            KeyCode::Char('3') => {
                app.tab = Tab::Form;
                app.focus = FormField::Description;
            }
            _ => {}
        },
        Tab::Transactions => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('1') => app.tab = Tab::Dashboard,
            KeyCode::Char('3') => {
                app.tab = Tab::Form;
                app.focus = FormField::Description;
            }
            KeyCode::Up => app.move_selection(-1),
            KeyCode::Down => app.move_selection(1),
            KeyCode::PageUp => app.page_up(),
            KeyCode::PageDown => app.page_down(),
            KeyCode::Home => {
                if !app.store.all().is_empty() {
                    app.table_state.select(Some(0));
                }
            }
            KeyCode::End => {
                let len = app.store.all().len();
                if len > 0 {
                    app.table_state.select(Some(len - 1));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => app.start_edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => {
                app.confirm_delete = app.selected_transaction().map(|t| t.id.clone());
            }
            _ => {}
        },
        Tab::Form => match key.code {
            KeyCode::Esc => {
                app.form.cancel();
                app.status = None;
                app.tab = Tab::Transactions;
            }
            KeyCode::Enter => app.submit_form()?,
            KeyCode::Tab | KeyCode::Down => app.focus = app.focus.next(),
            KeyCode::BackTab | KeyCode::Up => app.focus = app.focus.prev(),
            KeyCode::Left => match app.focus {
                FormField::Kind => {
                    let kind = app.form.kind.toggle();
                    app.form.set_kind(kind);
                }
                FormField::Category => app.form.prev_category(),
                _ => {}
            },
            KeyCode::Right => match app.focus {
                FormField::Kind => {
                    let kind = app.form.kind.toggle();
                    app.form.set_kind(kind);
                }
                FormField::Category => app.form.next_category(),
                _ => {}
            },
            KeyCode::Backspace => match app.focus {
                FormField::Description => {
                    app.form.description.pop();
                }
                FormField::Amount => {
                    app.form.amount.pop();
                }
                _ => {}
            },
            KeyCode::Char(ch) => match app.focus {
                FormField::Description => app.form.description.push(ch),
                FormField::Amount => app.form.amount.push(ch),
                _ => {}
            },
            _ => {}
        },
    }

    Ok(false)
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("FINTRA", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
    ];

    for tab in [Tab::Dashboard, Tab::Transactions, Tab::Form] {
        let style = if tab == app.tab {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(tab.label(), style));
        spans.push(Span::raw("  "));
    }

    let block = Block::default().borders(Borders::ALL);
    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(status.color),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let hint = if app.confirm_delete.is_some() {
        "y/Enter confirm delete  n/Esc cancel"
    } else {
        match app.tab {
            Tab::Dashboard => "1/2/3 switch tab  q/Esc exit",
            Tab::Transactions => {
                "↑/↓ move  e/Enter edit  d delete  1/3 switch tab  q/Esc exit"
            }
            Tab::Form => "Tab/↑/↓ move field  ←/→ change value  Enter save  Esc cancel",
        }
    };

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(hint)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_dashboard(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let transactions = app.store.all();
    let income = summary::total_income(transactions);
    let expenses = summary::total_expenses(transactions);
    let balance = summary::balance(transactions);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(layout[0]);

    let balance_color = if balance < Decimal::ZERO {
        Color::Red
    } else {
        Color::Cyan
    };
    render_card(frame, cards[0], "Income", income, Color::Green);
    render_card(frame, cards[1], "Expenses", expenses, Color::Red);
    render_card(frame, cards[2], "Balance", balance, balance_color);

    render_category_breakdown(frame, layout[1], transactions);
}

fn render_card(frame: &mut ratatui::Frame, area: Rect, title: &str, amount: Decimal, color: Color) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!("{:.2}", amount),
        Style::default().fg(color).bold(),
    )))
    .block(block)
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_category_breakdown(
    frame: &mut ratatui::Frame,
    area: Rect,
    transactions: &[Transaction],
) {
    let block = Block::default()
        .title("Expenses by Category")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let by_category = summary::expenses_by_category(transactions);
    if by_category.is_empty() {
        let empty = Paragraph::new("No expenses recorded yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let max_amount = by_category
        .iter()
        .map(|(_, amount)| amount.to_f64().unwrap_or(0.0))
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let bar_width = inner.width.saturating_sub(32) as f64;

    let mut lines = Vec::new();
    for (idx, (category, amount)) in by_category.iter().enumerate() {
        let color = CATEGORY_PALETTE[idx % CATEGORY_PALETTE.len()];
        let ratio = amount.to_f64().unwrap_or(0.0) / max_amount;
        let filled = (ratio * bar_width).round().max(1.0) as usize;

        lines.push(Line::from(vec![
            Span::styled(format!("{:15}", category), Style::default().fg(color)),
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(format!("{:.2}", amount), Style::default().fg(color)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn render_transactions(frame: &mut ratatui::Frame, area: Rect, app: &mut App) {
    let block = Block::default().title("Transactions").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new([
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Type").style(Style::default().bold()),
        Cell::from("Category").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let rows = app.store.all().iter().map(|transaction| {
        let date = transaction.date.format("%Y-%m-%d").to_string();
        let mut description = transaction.description.clone();
        if description.len() > 42 {
            description.truncate(39);
            description.push_str("...");
        }

        Row::new([
            Cell::from(date),
            Cell::from(description),
            Cell::from(transaction.amount.to_string()),
            Cell::from(transaction.kind.label()),
            Cell::from(transaction.category.clone()),
        ])
    });

    // Estimate a page size based on the table height.
    // Leave room for the header row.
    app.last_page_size = inner.height.saturating_sub(2) as usize;
    if app.last_page_size == 0 {
        app.last_page_size = 1;
    }

    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(45),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut app.table_state);

    if app.store.all().is_empty() {
        let empty = Paragraph::new("No transactions yet. Press 3 to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_form(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let title = if app.form.is_editing() {
        "Edit Transaction"
    } else {
        "Add Transaction"
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = [
        (FormField::Description, "Description", app.form.description.clone()),
        (FormField::Amount, "Amount", app.form.amount.clone()),
        (FormField::Kind, "Type", app.form.kind.label().to_string()),
        (FormField::Category, "Category", app.form.category.clone()),
    ];

    let mut lines = vec![Line::from("")];
    for (field, label, value) in fields {
        let focused = field == app.focus;
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:12}", label), Style::default().fg(Color::White).bold()),
            Span::styled(value, value_style),
        ]));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn render_confirm_modal(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(60, 25, area);
    frame.render_widget(Clear, popup_area);

    let description = app
        .confirm_delete
        .as_ref()
        .and_then(|id| app.store.all().iter().find(|t| t.id == *id))
        .map(|t| t.description.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled("Delete transaction?", Style::default().bold())),
        Line::from(""),
        Line::from(format!("\"{}\"", description)),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter delete   n/Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title("Confirm");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

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
