//! Tankobon TUI - Actor-based manga catalog browser
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

mod app;
mod config;
mod constants;
mod messages;
mod models;
mod network;
mod routes;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::AppActor;
use config::Config;
use constants::{APP_NAME, APP_VERSION, LOG_FILE};
use messages::ui_events::{key_to_ui_event, InputMode, Screen};
use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use network::NetworkActor;
use ui::{health_span, truncate};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::load();
    tracing::info!(base_url = %config.base_url, version = APP_VERSION, "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(config.base_url, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_goto,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    // Main layout with tab bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    match state.screen {
        Screen::Home => draw_home(f, main_chunks[1]),
        Screen::Search => draw_search(f, state, main_chunks[1]),
        Screen::Manga => draw_manga(f, state, main_chunks[1]),
        Screen::Reader => draw_reader(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if state.show_help {
        draw_help_popup(f, area);
    }

    if state.show_goto {
        draw_goto_popup(f, state, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut tabs = vec![
        Span::styled(
            " 1:Home ",
            if state.screen == Screen::Home {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        Span::raw(" "),
        Span::styled(
            " 2:Search ",
            if state.screen == Screen::Search {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
    ];

    // Breadcrumb for the routed screens
    match state.screen {
        Screen::Manga => tabs.push(Span::styled(
            format!(" /manga/{} ", state.manga_id),
            Style::default().fg(Color::Black).bg(Color::Magenta).bold(),
        )),
        Screen::Reader => tabs.push(Span::styled(
            format!(" /reader/{}/{} ", state.reader_manga_id, state.chapter_id),
            Style::default().fg(Color::Black).bg(Color::Magenta).bold(),
        )),
        _ => {}
    }

    tabs.push(health_span(state.backend_ok));

    f.render_widget(Paragraph::new(Line::from(tabs)), area);
}

fn draw_home(f: &mut Frame, area: Rect) {
    let text = format!(
        "\n Welcome to {} v{}\n\n \
         A terminal browser for your manga catalog.\n\n \
         2        Search the catalog\n \
         g        Go to a route path (/manga/5, /reader/5/9, ...)\n \
         ?        Help\n \
         q        Quit",
        APP_NAME, APP_VERSION
    );

    let welcome = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", APP_NAME)))
        .wrap(Wrap { trim: false });
    f.render_widget(welcome, area);
}

fn draw_search(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query bar
            Constraint::Min(3),    // Results
        ])
        .split(area);

    draw_query_bar(f, state, chunks[0]);
    draw_results(f, state, chunks[1]);
}

fn draw_query_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let border_style = if state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let loading = if state.search_loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Search{} ", loading));

    let input = Paragraph::new(state.query.as_str()).block(block);
    f.render_widget(input, area);

    // Cursor
    if state.input_mode == InputMode::Editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_results(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Results ({}) ", state.results.len()));

    if let Some(err) = &state.search_error {
        let msg = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::Red))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(msg, area);
        return;
    }

    if state.results.is_empty() {
        let hint = if state.search_loading {
            "Searching..."
        } else {
            "No results yet.\n\nPress 'e' to type a query, Enter to search."
        };
        let msg = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(msg, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = state
        .results
        .iter()
        .map(|m| ListItem::new(truncate(&m.title, width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_result));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_manga(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Title detail
            Constraint::Min(3),    // Chapter list
        ])
        .split(area);

    draw_detail(f, state, chunks[0]);
    draw_chapters(f, state, chunks[1]);
}

fn draw_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Title ");

    let content: Vec<Line> = match &state.detail {
        Some(detail) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    detail.title.clone(),
                    Style::default().bold(),
                )),
                Line::from(""),
            ];
            for text_line in detail.description.lines().take(3) {
                lines.push(Line::from(text_line.to_string()));
            }
            if let Some(cover) = &detail.cover_url {
                lines.push(Line::from(Span::styled(
                    format!("cover: {}", cover),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            if state.chapters_loading {
                "Loading..."
            } else {
                ""
            },
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let detail = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    f.render_widget(detail, area);
}

fn draw_chapters(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Chapters ({}) ", state.chapters.len()));

    if let Some(err) = &state.chapters_error {
        let msg = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::Red))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(msg, area);
        return;
    }

    if state.chapters.is_empty() {
        let hint = if state.chapters_loading {
            "Loading chapters..."
        } else {
            "No chapters."
        };
        let msg = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = state
        .chapters
        .iter()
        .map(|c| ListItem::new(truncate(&c.label(), width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_chapter));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_reader(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Current page
            Constraint::Min(3),    // Page list
        ])
        .split(area);

    let position = if state.pages.is_empty() {
        String::from(" Page -/- ")
    } else {
        format!(" Page {}/{} ", state.current_page + 1, state.pages.len())
    };

    let current = state
        .pages
        .get(state.current_page)
        .map(String::as_str)
        .unwrap_or("");

    let page_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(position);
    f.render_widget(Paragraph::new(current).block(page_block), chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Pages (←/→ turn, Backspace back) ");

    if let Some(err) = &state.pages_error {
        let msg = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::Red))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(msg, chunks[1]);
        return;
    }

    if state.pages.is_empty() {
        let hint = if state.pages_loading {
            "Loading pages..."
        } else {
            "No pages."
        };
        let msg = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(msg, chunks[1]);
        return;
    }

    // Page sources in server order, one per row
    let items: Vec<ListItem> = state
        .pages
        .iter()
        .map(|src| ListItem::new(src.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.current_page));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if !state.status.is_empty() {
        state.status.clone()
    } else if state.input_mode == InputMode::Editing {
        String::from(" ESC:stop editing | Enter:search ")
    } else {
        match state.screen {
            Screen::Home => String::from(" 2:search | g:goto | ?:help | q:quit "),
            Screen::Search => String::from(" e:edit | Enter:open | s:search again | Esc:back "),
            Screen::Manga => String::from(" ↑/↓:chapter | Enter:read | r:refresh | Esc:back "),
            Screen::Reader => String::from(" ←/→:page | r:refresh | Esc:back "),
        }
    };

    let fetched = match state.last_fetch {
        Some(at) => format!("fetched {} ({}ms) ", at.format("%H:%M:%S"), state.last_time_ms),
        None => String::new(),
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::raw(hints),
        Span::raw(" "),
        Span::styled(fetched, Style::default().fg(Color::DarkGray)),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 TANKOBON - Keyboard Shortcuts

 NAVIGATION
   1 / 2              Home / Search
   g                  Go to a route path
   Esc / Backspace    Back to the previous screen
   r                  Refresh (re-fetch) the current screen

 SEARCH
   e or /             Edit the query
   Enter (editing)    Run the search
   ↑ / ↓              Select a result
   Enter              Open the selected title

 CHAPTERS
   ↑ / ↓              Select a chapter
   Enter              Open the reader

 READER
   ← / → or p / n     Previous / next page
   Home / End         First / last page

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_goto_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Go to (Enter to open, Esc to cancel) ")
        .style(Style::default().bg(Color::Black));

    let content = if state.goto_buffer.is_empty() {
        "Enter a route path...\n\nExamples: /search, /manga/5, /reader/5/9"
    } else {
        &state.goto_buffer
    };

    let input = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
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
