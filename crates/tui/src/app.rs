use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use tavle_core::{
    models::BikeStation,
    settings::{Settings, SettingsStore},
    NearestSource, StationSource,
};
use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::mode_panel::ModePanel;

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug)]
enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone)]
struct Theme {
    accent: Color,
    muted: Color,
    warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            warning: Color::Yellow,
        }
    }
}

/// The departure-board application.
pub struct TavleApp {
    settings_store: SettingsStore,
    settings_rx: watch::Receiver<Settings>,
    stations_rx: watch::Receiver<Option<Vec<BikeStation>>>,
    mode_panel: ModePanel,
    theme: Theme,
    status: String,
    should_quit: bool,
    // Held so the pollers stay alive exactly as long as the app; dropping
    // them cancels the tasks.
    _station_source: StationSource,
    _nearest_source: NearestSource,
}

impl TavleApp {
    /// Wire the app to its settings store and running pollers.
    pub fn new(
        settings_store: SettingsStore,
        station_source: StationSource,
        nearest_source: NearestSource,
    ) -> Self {
        let settings_rx = settings_store.subscribe();
        let stations_rx = station_source.subscribe();
        Self {
            settings_store,
            settings_rx,
            stations_rx,
            mode_panel: ModePanel::new(),
            theme: Theme::default(),
            status: "Henter stasjoner …".to_string(),
            should_quit: false,
            _station_source: station_source,
            _nearest_source: nearest_source,
        }
    }

    /// Run the terminal loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut stations_rx = self.stations_rx.clone();
        let mut settings_rx = self.settings_rx.clone();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    match maybe_event {
                        Some(AppEvent::Input(Event::Key(key))) => self.handle_key(key),
                        Some(_) => {}
                        None => break,
                    }
                }
                changed = stations_rx.changed() => {
                    if changed.is_ok() {
                        self.on_stations_updated();
                    }
                }
                changed = settings_rx.changed() => {
                    // Snapshot is read at draw time; nothing to do beyond
                    // waking the loop.
                    let _ = changed;
                }
            }

            if self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn on_stations_updated(&mut self) {
        let count = self
            .stations_rx
            .borrow_and_update()
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0);
        self.status = format!(
            "{} stasjoner • oppdatert {}",
            count,
            Local::now().format("%H:%M:%S")
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.mode_panel.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.mode_panel.select_previous(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let store = &self.settings_store;
                self.mode_panel.toggle_selected(|mode| {
                    if let Err(err) = store.update(|settings| settings.toggle_mode(mode)) {
                        warn!("failed to persist settings: {err:#}");
                    }
                });
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(" tavle ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                Local::now().format("%H:%M:%S").to_string(),
                Style::default().fg(self.theme.accent),
            ),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, rows[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[1]);

        self.draw_stations(frame, body[0]);
        let settings = self.settings_rx.borrow().clone();
        self.mode_panel.render(frame, body[1], &settings, true);

        let hints = Paragraph::new(Line::from(vec![
            Span::styled(&self.status, Style::default().fg(self.theme.muted)),
            Span::raw("  •  q: avslutt  ↑/↓: velg  mellomrom: vis/skjul"),
        ]));
        frame.render_widget(hints, rows[2]);
    }

    fn draw_stations(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Bysykkel ");
        let stations = self.stations_rx.borrow().clone();

        match stations {
            None => {
                let waiting = Paragraph::new("Henter stasjoner …")
                    .style(Style::default().fg(self.theme.muted))
                    .block(block);
                frame.render_widget(waiting, area);
            }
            Some(stations) if stations.is_empty() => {
                let empty = Paragraph::new("Ingen stasjoner å vise")
                    .style(Style::default().fg(self.theme.warning))
                    .block(block);
                frame.render_widget(empty, area);
            }
            Some(stations) => {
                let items: Vec<ListItem> = stations
                    .iter()
                    .map(|station| ListItem::new(station_line(station, &self.theme)))
                    .collect();
                frame.render_widget(List::new(items).block(block), area);
            }
        }
    }
}

fn station_line<'a>(station: &'a BikeStation, theme: &Theme) -> Line<'a> {
    let bikes = station
        .bikes_available
        .map(|n| n.to_string())
        .unwrap_or_else(|| "–".to_string());
    let docks = station
        .spaces_available
        .map(|n| n.to_string())
        .unwrap_or_else(|| "–".to_string());
    Line::from(vec![
        Span::raw(format!("{:<28}", station.name)),
        Span::styled(
            format!("{bikes:>3} sykler "),
            Style::default().fg(theme.accent),
        ),
        Span::styled(
            format!("{docks:>3} plasser"),
            Style::default().fg(theme.muted),
        ),
    ])
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
