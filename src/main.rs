use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use lol_terminal::chart::{bar_chart, format_value};
use lol_terminal::config::{Config, SourceKind};
use lol_terminal::coordinator::FetchTicket;
use lol_terminal::fake_feed::FakeStatsSource;
use lol_terminal::feed::spawn_provider;
use lol_terminal::gallery::section_for;
use lol_terminal::logging;
use lol_terminal::selection::SelectionState;
use lol_terminal::state::{self, AppState, LoadStatus, Screen, apply_delta};
use lol_terminal::stats_fetch::{HttpStatsSource, StatsSource};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.state.screen = match self.state.screen {
                    Screen::Wins => Screen::Gallery,
                    Screen::Gallery => Screen::Wins,
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                match self.state.screen {
                    Screen::Wins => {
                        if let Ok(ticket) = self.state.select_player_index(index) {
                            self.dispatch(ticket);
                        }
                    }
                    Screen::Gallery => {
                        let _ = self.state.select_chart_kind_index(index);
                    }
                }
            }
            KeyCode::Char('j') | KeyCode::Down => match self.state.screen {
                Screen::Wins => {
                    let ticket = self.state.select_next_player();
                    self.dispatch(ticket);
                }
                Screen::Gallery => self.state.select_next_chart_kind(),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.screen {
                Screen::Wins => {
                    let ticket = self.state.select_prev_player();
                    self.dispatch(ticket);
                }
                Screen::Gallery => self.state.select_prev_chart_kind(),
            },
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.state.screen == Screen::Wins {
                    let ticket = self.state.refresh();
                    self.state
                        .push_log(format!("[INFO] Refreshing {}", ticket.selector));
                    self.dispatch(Some(ticket));
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn dispatch(&mut self, ticket: Option<FetchTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        let sent = match &self.cmd_tx {
            Some(tx) => tx
                .send(state::ProviderCommand::FetchWins(ticket.clone()))
                .is_ok(),
            None => false,
        };
        if !sent {
            self.state.dispatch_failed(&ticket);
        }
    }
}

fn build_source(config: &Config) -> Result<Arc<dyn StatsSource>> {
    Ok(match config.source {
        SourceKind::Http => Arc::new(HttpStatsSource::new(
            &config.api_url,
            config.request_timeout,
        )?),
        SourceKind::Fake => {
            Arc::new(FakeStatsSource::default().with_fail_pct(config.fake_fail_pct))
        }
    })
}

fn main() -> Result<()> {
    let config = Config::from_env()?;
    let log_path = logging::init(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %config.source_label(),
        "starting"
    );

    let mut state = AppState::from_config(&config)?;
    if let Some(path) = log_path {
        state.push_log(format!("[INFO] Trace log: {}", path.display()));
    }
    let source = build_source(&config)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _provider = spawn_provider(source, config.inflight_max, tx, cmd_rx);

    let mut app = App::new(state, Some(cmd_tx));
    let ticket = app.state.activate();
    app.dispatch(Some(ticket));

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("error: {err}");
    }
    tracing::info!("stopped");
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.state.expire_pending(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Wins => render_wins(frame, chunks[1], &app.state),
        Screen::Gallery => render_gallery(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Wins => format!(
            "LOL STATS | Wins | {} | Source: {}",
            options_line(&state.players),
            state.source_label
        ),
        Screen::Gallery => "LOL STATS | Chart gallery".to_string(),
    };
    let line1 = format!("  .-.  {}", title);
    let line2 = " /___\\".to_string();
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn options_line(selection: &SelectionState) -> String {
    selection
        .options()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if i == selection.index() {
                format!("[{s}]")
            } else {
                s.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Wins => {
            "Tab Gallery | 1-9/j/k Player | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::Gallery => "Tab Wins | 1-9/j/k Chart | ? Help | q Quit".to_string(),
    }
}

fn render_wins(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    let (status, style) = status_line(state);
    frame.render_widget(Paragraph::new(status).style(style), sections[0]);

    match state.chart() {
        Some(desc) if !desc.values.is_empty() => {
            let n = desc.values.len() as u16;
            let width = sections[1].width.saturating_sub(2) / n.max(1);
            let chart = bar_chart(&desc, width.saturating_sub(1).clamp(3, 12));
            frame.render_widget(chart, sections[1]);
        }
        Some(desc) => {
            let empty = Paragraph::new("No wins recorded")
                .block(Block::default().title(desc.title).borders(Borders::ALL));
            frame.render_widget(empty, sections[1]);
        }
        None => {
            let empty = Paragraph::new("No data loaded")
                .block(Block::default().title("Wins by champion").borders(Borders::ALL));
            frame.render_widget(empty, sections[1]);
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, sections[2]);
}

fn status_line(state: &AppState) -> (String, Style) {
    match state.status() {
        LoadStatus::Idle => ("No data yet".to_string(), Style::default()),
        LoadStatus::Loading(selector) => (
            format!("Loading {selector}..."),
            Style::default().fg(Color::Yellow),
        ),
        LoadStatus::Failed(err) => (
            format!("Failed to load: {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        LoadStatus::Ready => {
            let updated = state
                .view
                .updated_at
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            let total = state.view.data.as_ref().map_or(0.0, |d| d.total());
            (
                format!("Updated {updated} | {} wins", format_value(total)),
                Style::default().fg(Color::Green),
            )
        }
    }
}

fn render_gallery(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(1)])
        .split(area);

    let kinds = &state.chart_kinds;
    let items: Vec<Line> = kinds
        .options()
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let style = if i == kinds.index() {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(format!(" {kind} Chart"), style)
        })
        .collect();
    let sidebar =
        Paragraph::new(items).block(Block::default().title("Dashboard").borders(Borders::ALL));
    frame.render_widget(sidebar, columns[0]);

    let section = section_for(kinds.current().as_str());
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let text = Paragraph::new(section.description)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(section.title).borders(Borders::ALL));
    frame.render_widget(text, halves[0]);

    let placeholder = Paragraph::new("chart placeholder")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(placeholder, halves[1]);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "LoL Stats Terminal - Help",
        "",
        "Global:",
        "  Tab          Switch Wins / Chart gallery",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Wins:",
        "  1-9          Jump to player",
        "  j/k or ↑/↓   Next/previous player",
        "  r            Refresh current player",
        "",
        "Gallery:",
        "  1-9          Jump to chart",
        "  j/k or ↑/↓   Next/previous chart",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
