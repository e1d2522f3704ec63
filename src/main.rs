use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

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
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType,
    Paragraph, Row, Table,
};
use tracing_subscriber::EnvFilter;

use atp_terminal::analysis_export::{export_analysis, export_file_name};
use atp_terminal::config::AppConfig;
use atp_terminal::dataset;
use atp_terminal::palette::{diff_color, opponent_color, player_color, surface_color};
use atp_terminal::report::{career_lines, era_label, head_to_head_lines};
use atp_terminal::state::{AppState, EraEdge, PickerSlot, Screen};

struct App {
    state: AppState,
    cfg: AppConfig,
    should_quit: bool,
}

impl App {
    fn new(state: AppState, cfg: AppConfig) -> Self {
        Self {
            state,
            cfg,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.toggle_screen(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => self.state.pick_selected(),
            KeyCode::Char('/') => {
                self.state.search_active = true;
                self.state.search.clear();
                self.state.picker_selected = 0;
            }
            KeyCode::Char('p') => self.state.cycle_slot(),
            KeyCode::Char('s') => {
                if self.state.screen == Screen::HeadToHead {
                    self.state.swap_players();
                }
            }
            KeyCode::Char('[') | KeyCode::Left => self.state.shift_era(-1),
            KeyCode::Char(']') | KeyCode::Right => self.state.shift_era(1),
            KeyCode::Char('e') => self.state.toggle_era_edge(),
            KeyCode::Char('r') => {
                self.state.reset_era();
                self.state.push_log("[INFO] Era reset to full range");
            }
            KeyCode::Char('x') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.clear_search(),
            KeyCode::Enter => {
                self.state.pick_selected();
                self.state.clear_search();
            }
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(ch) => self.state.push_search_char(ch),
            _ => {}
        }
    }

    fn export(&mut self) {
        let era = era_label(self.state.era);
        let (players, career, h2h) = match self.state.screen {
            Screen::Career => {
                let Some(report) = self.state.career.as_ref() else {
                    self.state.push_log("[INFO] Nothing to export");
                    return;
                };
                (vec![report.player.as_str()], Some(report), None)
            }
            Screen::HeadToHead => {
                let Some(report) = self.state.head_to_head.as_ref() else {
                    self.state.push_log("[INFO] Nothing to export");
                    return;
                };
                (
                    vec![report.player_one.as_str(), report.player_two.as_str()],
                    None,
                    Some(report),
                )
            }
        };
        let path = self.cfg.export_dir.join(export_file_name(&players, &era));
        let msg = match export_analysis(&path, career, h2h) {
            Ok(done) => format!(
                "[INFO] Exported {} sheets to {}",
                done.sheets,
                done.path.display()
            ),
            Err(err) => format!("[WARN] Export failed: {err:#}"),
        };
        self.state.push_log(msg);
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = AppConfig::from_env();
    init_tracing(&cfg);

    let dataset = dataset::load_or_mock(&cfg).context("load match data")?;
    let state = AppState::new(dataset, &cfg);
    tracing::info!(players = state.players.len(), "terminal starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, cfg);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn init_tracing(cfg: &AppConfig) {
    // stderr belongs to the terminal UI, so events go to a file.
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)
    else {
        return;
    };
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
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
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(chunks[1]);

    render_picker(frame, body[0], &app.state);
    match app.state.screen {
        Screen::Career => render_career(frame, body[1], &app.state),
        Screen::HeadToHead => render_head_to_head(frame, body[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state, chunks[2].height))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Career => "CAREER",
        Screen::HeadToHead => "HEAD-TO-HEAD",
    };
    let edge = match state.era_edge {
        EraEdge::Start => "start",
        EraEdge::End => "end",
    };
    let line1 = format!(
        "ATP TERMINAL | {screen} | Era: {} (editing {edge}) | {} matches",
        era_label(state.era),
        state.window.len()
    );
    let line2 = match state.screen {
        Screen::Career => format!(
            "Player: {}",
            state.career_player.as_deref().unwrap_or("-")
        ),
        Screen::HeadToHead => format!(
            "P1: {}{}  vs  P2: {}{}",
            state.player_one.as_deref().unwrap_or("-"),
            slot_marker(state, PickerSlot::PlayerOne),
            state.player_two.as_deref().unwrap_or("-"),
            slot_marker(state, PickerSlot::PlayerTwo),
        ),
    };
    format!("{line1}\n{line2}\nData: {}", state.data_label)
}

fn slot_marker(state: &AppState, slot: PickerSlot) -> &'static str {
    if state.picker_slot == slot { " *" } else { "" }
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Type to filter | Enter Pick | Esc Cancel | ↑/↓ Move".to_string();
    }
    match state.screen {
        Screen::Career => {
            "Tab H2H | j/k Move | Enter Pick | / Search | [ ] Era | e Edge | r Reset | x Export | ? Help | q Quit".to_string()
        }
        Screen::HeadToHead => {
            "Tab Career | j/k Move | Enter Pick | p P1/P2 | s Swap | / Search | [ ] Era | e Edge | x Export | ? Help | q Quit".to_string()
        }
    }
}

fn render_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = if state.search_active || !state.search.is_empty() {
        format!("Players /{}", state.search)
    } else {
        match state.picker_slot {
            PickerSlot::Career => "Players".to_string(),
            PickerSlot::PlayerOne => "Players -> P1".to_string(),
            PickerSlot::PlayerTwo => "Players -> P2".to_string(),
        }
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let players = state.filtered_players();
    if players.is_empty() {
        let empty = Paragraph::new("No players match").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.picker_selected, players.len(), visible);
    let current = state.selected_name(state.picker_slot);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let name = players[idx];
            let mut style = Style::default();
            if Some(name) == current {
                style = style.add_modifier(Modifier::BOLD);
            }
            if idx == state.picker_selected {
                style = style.fg(Color::White).bg(Color::DarkGray);
            }
            Line::styled(name.to_string(), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_career(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    let Some(report) = state.career.as_ref() else {
        let empty = Paragraph::new("Select a player")
            .block(Block::default().title("Summary").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let summary = Paragraph::new(career_lines(report).join("\n"))
        .block(Block::default().title("Summary").borders(Borders::ALL));
    frame.render_widget(summary, rows[0]);

    let block = Block::default()
        .title("Wins by Surface")
        .borders(Borders::ALL);
    let Some(stats) = report.stats.as_ref().filter(|s| !s.wins_by_surface.is_empty()) else {
        let empty = Paragraph::new("No wins recorded in this range.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, rows[1]);
        return;
    };

    let bars: Vec<Bar> = stats
        .wins_by_surface
        .iter()
        .map(|s| {
            Bar::default()
                .label(Line::from(s.surface.clone()))
                .value(u64::from(s.wins))
                .style(Style::default().fg(surface_color(&s.surface)))
        })
        .collect();
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(player_color(&stats.player)));
    frame.render_widget(chart, rows[1]);
}

fn render_head_to_head(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(report) = state.head_to_head.as_ref() else {
        let msg = if state.player_one.is_some() && state.player_one == state.player_two {
            "Please select two different players for head-to-head comparison."
        } else {
            "Select two players to begin the comparison."
        };
        let empty = Paragraph::new(msg)
            .block(Block::default().title("Head-to-Head").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(6)])
        .split(area);
    let summary = Paragraph::new(head_to_head_lines(report).join("\n"))
        .block(Block::default().title("Head-to-Head").borders(Borders::ALL));
    frame.render_widget(summary, rows[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_trend(frame, panels[0], report);
    render_heatmap(frame, panels[1], report);
}

fn render_trend(frame: &mut Frame, area: Rect, report: &atp_terminal::report::HeadToHeadReport) {
    let block = Block::default().title("Cumulative Wins").borders(Borders::ALL);
    let Some(last) = report.trend.last() else {
        let empty = Paragraph::new("No head-to-head history.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let line_one = report.trend.player_one_line();
    let line_two = report.trend.player_two_line();
    let x_max = f64::from(last.match_number.max(2));
    let y_max = f64::from(last.player_one_wins.max(last.player_two_wins).max(1));

    let datasets = vec![
        Dataset::default()
            .name(report.player_one.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(player_color(&report.player_one)))
            .data(&line_one),
        Dataset::default()
            .name(report.player_two.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(opponent_color(&report.player_one, &report.player_two)))
            .data(&line_two),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Match")
                .bounds([1.0, x_max])
                .labels(vec![Span::raw("1"), Span::raw(format!("{x_max:.0}"))]),
        )
        .y_axis(
            Axis::default()
                .title("Wins")
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{y_max:.0}"))]),
        );
    frame.render_widget(chart, area);
}

fn render_heatmap(frame: &mut Frame, area: Rect, report: &atp_terminal::report::HeadToHeadReport) {
    let title = format!(
        "Win Difference ({} - {})",
        short_name(&report.player_one),
        short_name(&report.player_two)
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if let Some(err) = report.matrix_error.as_ref() {
        let warn = Paragraph::new(format!("Heatmap needs surface and round data: {err}"))
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(warn, area);
        return;
    }
    let Some(matrix) = report.matrix.as_ref().filter(|m| !m.is_empty()) else {
        let empty = Paragraph::new("No surface/round data.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let max_abs = matrix.max_abs();
    let header = Row::new(
        std::iter::once(Cell::from("Surface"))
            .chain(matrix.rounds.iter().map(|r| Cell::from(round_abbrev(r)))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = matrix
        .surfaces
        .iter()
        .zip(&matrix.diff)
        .map(|(surface, diffs)| {
            let cells = std::iter::once(
                Cell::from(surface.clone()).style(Style::default().fg(surface_color(surface))),
            )
            .chain(diffs.iter().map(|v| {
                Cell::from(format!("{v:+}")).style(
                    Style::default()
                        .fg(Color::White)
                        .bg(diff_color(*v, max_abs)),
                )
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(8)];
    widths.extend(matrix.rounds.iter().map(|_| Constraint::Length(5)));
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);
    let text = [
        "Tab        switch Career / Head-to-Head",
        "j/k ↑/↓    move in player list",
        "Enter      assign highlighted player",
        "/          search players",
        "p          pick P1 or P2 (head-to-head)",
        "s          swap P1 and P2",
        "[ ] ← →    move era edge by one year",
        "e          toggle era start / end",
        "r          reset era to full range",
        "x          export current view to xlsx",
        "?          toggle help",
        "q          quit",
    ]
    .join("\n");
    let help = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup);
}

fn console_text(state: &AppState, height: u16) -> String {
    let visible = height.saturating_sub(2) as usize;
    let skip = state.logs.len().saturating_sub(visible);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn round_abbrev(round: &str) -> String {
    match round {
        "1st Round" => "R1".to_string(),
        "2nd Round" => "R2".to_string(),
        "3rd Round" => "R3".to_string(),
        "4th Round" => "R4".to_string(),
        "Quarterfinals" => "QF".to_string(),
        "Semifinals" => "SF".to_string(),
        "The Final" => "F".to_string(),
        "Round Robin" => "RR".to_string(),
        other => other.chars().take(5).collect(),
    }
}

fn short_name(name: &str) -> &str {
    name.rsplit(' ').next().unwrap_or(name)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
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
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
