use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use pinmark_core::{Icon, OnActivate, Response, ResultItem, SessionEngine};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io;
use std::time::Duration;

use crate::open_helpers;
use crate::theme::TuiTheme;

pub fn run_picker_default(engine: &mut SessionEngine, theme: TuiTheme) -> Result<()> {
    let mut es = RealEventSource;
    let _ = run_picker_with(engine, &mut es, true, theme)?;
    Ok(())
}

pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

pub struct RealEventSource;

impl EventSource for RealEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if crossterm::event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Text the engine sees for a full input line: whatever follows `keyword `.
pub fn query_argument<'a>(input: &'a str, keyword: &str) -> &'a str {
    match input.strip_prefix(keyword) {
        Some("") => "",
        Some(rest) => rest.strip_prefix(' ').unwrap_or(input),
        None => input,
    }
}

/// Cursor position after a render: the first item that neither hides the
/// picker nor returns to the menu, so Enter acts on the first result.
pub fn initial_selection(items: &[ResultItem], menu_query: &str) -> usize {
    let is_back = |it: &ResultItem| {
        matches!(&it.on_activate, OnActivate::SetQuery { query } if query == menu_query)
    };
    let actionable = |it: &ResultItem| it.on_activate != OnActivate::Hide;
    items
        .iter()
        .position(|it| actionable(it) && !is_back(it))
        .or_else(|| items.iter().position(actionable))
        .unwrap_or(0)
}

/// Raw mode and the alternate screen, undone on drop so every exit path
/// leaves the terminal usable.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen);
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::App => "•",
        Icon::Tag | Icon::TagSelected => "#",
    }
}

/// Runs the launcher loop. Returns the URL the user activated, if any.
/// With `draw == false` nothing touches the terminal or spawns an opener,
/// and the loop ends once the event source runs dry.
pub fn run_picker_with(
    engine: &mut SessionEngine,
    es: &mut dyn EventSource,
    draw: bool,
    theme: TuiTheme,
) -> Result<Option<String>> {
    let keyword = engine.settings().keyword.clone();
    let menu_query = engine.menu_query();
    let mut input = engine.menu_query();
    // None forces the current input to be re-sent
    let mut last_input: Option<String> = None;
    let mut items: Vec<ResultItem> = Vec::new();
    let mut selected = 0usize;
    let mut status: Option<String> = None;
    let mut opened: Option<String> = None;

    let (guard, mut terminal) = if draw {
        let guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        (Some(guard), Some(Terminal::new(backend)?))
    } else {
        (None, None)
    };

    loop {
        // SetQuery responses chain until the engine renders a list
        while last_input.as_deref() != Some(input.as_str()) {
            last_input = Some(input.clone());
            match engine.handle_query(query_argument(&input, &keyword)) {
                Response::Render { items: next } => {
                    items = next;
                    selected = initial_selection(&items, &menu_query);
                }
                Response::SetQuery { query } => input = query,
            }
        }
        if selected >= items.len() {
            selected = items.len().saturating_sub(1);
        }

        if let Some(ref mut term) = terminal {
            term.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let q = Paragraph::new(input.as_str()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Pinboard")
                        .border_style(Style::default().fg(theme.border_fg)),
                );
                f.render_widget(q, chunks[0]);

                let list_items: Vec<ListItem> = items
                    .iter()
                    .map(|it| {
                        ListItem::new(vec![
                            Line::raw(format!("{} {}", icon_glyph(it.icon), it.title)),
                            Line::styled(
                                format!("  {}", it.subtitle),
                                Style::default().add_modifier(Modifier::DIM),
                            ),
                        ])
                    })
                    .collect();
                let list = List::new(list_items)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(theme.border_fg)),
                    )
                    .highlight_style(
                        Style::default()
                            .fg(theme.highlight_fg)
                            .bg(theme.highlight_bg),
                    );
                f.render_stateful_widget(
                    list,
                    chunks[1],
                    &mut ListState::default().with_selected(if items.is_empty() {
                        None
                    } else {
                        Some(selected)
                    }),
                );

                let mut help = String::from("Enter select | ↑/↓ move | Esc quit");
                if let Some(msg) = &status {
                    help.push_str(&format!(" | {msg}"));
                }
                let footer = Paragraph::new(help)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(theme.border_fg)),
                    )
                    .style(Style::default().fg(theme.help_fg))
                    .wrap(Wrap { trim: true });
                f.render_widget(footer, chunks[2]);
            })?;
        }

        let Some(ev) = es.poll(Duration::from_millis(200))? else {
            if draw {
                continue;
            }
            break;
        };
        let Event::Key(k) = ev else { continue };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        match k.code {
            KeyCode::Esc => break,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char(ch) => input.push(ch),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Up => selected = selected.saturating_sub(1),
            KeyCode::Down => {
                if selected + 1 < items.len() {
                    selected += 1;
                }
            }
            KeyCode::Enter => {
                let Some(item) = items.get(selected) else { continue };
                match item.on_activate.clone() {
                    OnActivate::OpenUrl { url } => {
                        if draw {
                            if let Err(e) = open_helpers::open_url(&url) {
                                status = Some(e.to_string());
                                continue;
                            }
                        }
                        opened = Some(url);
                        break;
                    }
                    OnActivate::SetQuery { query } => {
                        input = query;
                        last_input = None;
                    }
                    OnActivate::Dispatch { action } => match engine.handle_selection(action) {
                        Response::Render { items: next } => {
                            items = next;
                            selected = initial_selection(&items, &menu_query);
                        }
                        Response::SetQuery { query } => {
                            input = query;
                            last_input = None;
                        }
                    },
                    OnActivate::Hide => break,
                }
            }
            _ => {}
        }
    }

    drop(terminal);
    drop(guard);
    if let Some(url) = &opened {
        tracing::info!(url, "opened bookmark");
    }
    Ok(opened)
}
