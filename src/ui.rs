use bank_records::{add_customer, list_customers, CustomerError, CustomerForm, RecordStore};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AccountNumber,
    Name,
    Pin,
    Balance,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::AccountNumber, Field::Name, Field::Pin, Field::Balance];

    pub fn next(&self) -> Self {
        match self {
            Field::AccountNumber => Field::Name,
            Field::Name => Field::Pin,
            Field::Pin => Field::Balance,
            Field::Balance => Field::AccountNumber,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Field::AccountNumber => Field::Balance,
            Field::Name => Field::AccountNumber,
            Field::Pin => Field::Name,
            Field::Balance => Field::Pin,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Field::AccountNumber => "Account Number",
            Field::Name => "Name",
            Field::Pin => "PIN",
            Field::Balance => "Balance",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Everything the form screen shows, passed explicitly to handlers and renderers.
pub struct App {
    store: RecordStore,
    currency_symbol: String,
    pub form: CustomerForm,
    pub focus: Field,
    pub status: Option<Status>,
    pub customers: Vec<String>,
    pub list_state: ListState,
}

impl App {
    pub fn new(store: RecordStore, currency_symbol: impl Into<String>) -> Self {
        let mut app = Self {
            store,
            currency_symbol: currency_symbol.into(),
            form: CustomerForm::default(),
            focus: Field::AccountNumber,
            status: None,
            customers: Vec::new(),
            list_state: ListState::default(),
        };
        app.refresh();
        app
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::AccountNumber => &mut self.form.account_number,
            Field::Name => &mut self.form.name,
            Field::Pin => &mut self.form.pin,
            Field::Balance => &mut self.form.balance,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::AccountNumber => &self.form.account_number,
            Field::Name => &self.form.name,
            Field::Pin => &self.form.pin,
            Field::Balance => &self.form.balance,
        }
    }

    /// Reload the customer list from disk.
    pub fn refresh(&mut self) {
        self.customers = list_customers(&self.store, &self.currency_symbol);
        self.list_state.select(Some(0));
    }

    /// Add the customer in the form. Clears the form only on success.
    pub fn submit(&mut self) {
        match add_customer(&self.store, &self.form) {
            Ok(record) => {
                self.status = Some(Status::Info(format!(
                    "Customer {} added",
                    record.account_number
                )));
                self.form = CustomerForm::default();
                self.focus = Field::AccountNumber;
                self.refresh();
            }
            Err(err @ CustomerError::Storage(_)) => {
                self.status = Some(Status::Error(format!("Could not save: {}", err)));
            }
            Err(err) => {
                self.status = Some(Status::Error(err.to_string()));
            }
        }
    }

    pub fn next(&mut self) {
        let len = self.customers.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.customers.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit
            }
            KeyCode::Enter => self.submit(),
            KeyCode::F(5) => {
                self.refresh();
                self.status = Some(Status::Info("List refreshed".to_string()));
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::PageDown => self.next(),
            KeyCode::PageUp => self.previous(),
            KeyCode::Backspace => {
                self.field_mut(self.focus).pop();
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.field_mut(self.focus).push(c);
            }
            _ => {}
        }
        Action::Continue
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) == Action::Quit {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + list
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_form(f, content[0], app);
    render_customers(f, content[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            "Bank Customer Records",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            app.store.path().display().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Add Customer ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    for (i, field) in Field::ALL.iter().enumerate() {
        let value = app.field(*field);
        // PIN never shown in clear
        let shown = if *field == Field::Pin {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };

        let focused = *field == app.focus;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let input = Paragraph::new(shown.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", field.label())),
        );
        f.render_widget(input, rows[i]);

        if focused {
            let x = rows[i].x + 1 + shown.chars().count() as u16;
            f.set_cursor(x.min(rows[i].right().saturating_sub(2)), rows[i].y + 1);
        }
    }
}

fn render_customers(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .customers
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Customers "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    match &app.status {
        Some(Status::Info(msg)) => {
            status_spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(Color::Green)));
            status_spans.push(Span::raw(" | "));
        }
        Some(Status::Error(msg)) => {
            status_spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" | "));
        }
        None => {}
    }

    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Field | "));
    status_spans.push(Span::styled("F5", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Refresh | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Scroll | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
