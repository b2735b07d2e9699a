use std::collections::HashMap;
use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::config::Config;
use crate::export::CsvExport;
use crate::roster::{LoadOutcome, RosterStore};
use crate::storage::KeyValueStore;

use super::forms::AddPlayerForm;
use super::helpers::{card_lines, card_title, centered_rect, surface_error, ScoreChange};
use super::notify::{Notifier, StatusKind};
use super::timer::{Scheduler, TimerHandle, UiTimer};

/// Number of player cards shown in each row of the grid.
const GRID_COLUMNS: usize = 4;
/// Rows per card, borders included.
const CARD_HEIGHT: u16 = 6;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space for the application title.
const HEADER_HEIGHT: u16 = 1;

/// Score adjustments bound to the number keys: bottom row subtracts, top row
/// adds.
const SCORE_KEYS: [(char, i64); 6] = [
    ('1', -5),
    ('2', -10),
    ('3', -20),
    ('7', 5),
    ('8', 10),
    ('9', 20),
];

/// Fine-grained modes for key handling and overlays.
enum Mode {
    Normal,
    AddingPlayer(AddPlayerForm),
}

/// Central application state: the roster, its storage, and everything the
/// screen needs between frames.
pub struct App {
    store: Box<dyn KeyValueStore>,
    roster: RosterStore,
    /// Selected player by id, so the cursor follows a player when the ranking
    /// reorders the grid.
    selected: Option<i64>,
    mode: Mode,
    timers: Scheduler<UiTimer>,
    notifier: Notifier,
    reset_confirm: Option<TimerHandle>,
    score_change: Option<(ScoreChange, TimerHandle)>,
    /// Score each player had before their most recent change.
    previous_scores: HashMap<i64, i64>,
    export_dir: PathBuf,
    export_filename: String,
    notification_ttl: Duration,
    reset_confirm_window: Duration,
    score_flash_ttl: Duration,
}

impl App {
    pub fn new(store: Box<dyn KeyValueStore>, roster: RosterStore, config: &Config) -> Self {
        let selected = roster.derived_view().first().map(|row| row.player.id);
        Self {
            store,
            roster,
            selected,
            mode: Mode::Normal,
            timers: Scheduler::new(),
            notifier: Notifier::default(),
            reset_confirm: None,
            score_change: None,
            previous_scores: HashMap::new(),
            export_dir: config.export_dir.clone(),
            export_filename: config.export_filename.clone(),
            notification_ttl: config.notification_ttl,
            reset_confirm_window: config.reset_confirm_window,
            score_flash_ttl: config.score_flash_ttl,
        }
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    /// Restore the previous session on startup. Silent when nothing is stored.
    pub fn restore_last_session(&mut self) {
        let now = Instant::now();
        if let LoadOutcome::Loaded(count) = self.roster.load(self.store.as_ref()) {
            info!(players = count, "restored last session");
            self.select_first();
            self.previous_scores.clear();
            self.notify(now, "Game loaded from last session!", StatusKind::Info);
        }
    }

    /// Fire every timer that has come due.
    pub fn tick(&mut self, now: Instant) {
        for event in self.timers.fire_due(now) {
            match event {
                UiTimer::DismissNotification => self.notifier.expire(),
                UiTimer::ResetConfirmExpired => self.reset_confirm = None,
                UiTimer::ScoreFlashExpired => self.score_change = None,
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        self.handle_key_at(code, Instant::now())
    }

    /// Process a key press at `now`. Returns `true` when the app should exit.
    pub fn handle_key_at(&mut self, code: KeyCode, now: Instant) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, now, &mut exit),
            Mode::AddingPlayer(form) => self.handle_add_player(code, now, form),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, now: Instant, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_selection(GRID_COLUMNS as isize),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                return Mode::AddingPlayer(AddPlayerForm::default());
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => self.delete_selected(now),
            KeyCode::Char('s') | KeyCode::Char('S') => self.save(now),
            KeyCode::Char('l') | KeyCode::Char('L') => self.load(now),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export(now),
            KeyCode::Char('r') | KeyCode::Char('R') => self.press_reset(now),
            KeyCode::Enter => self.open_selected_avatar(now),
            KeyCode::Char(ch) => {
                if let Some((_, delta)) = SCORE_KEYS.iter().find(|(key, _)| *key == ch) {
                    self.adjust_selected(*delta, now);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_player(&mut self, code: KeyCode, now: Instant, mut form: AddPlayerForm) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.roster.add_player(&form.name) {
                Ok(player) => {
                    let (id, name) = (player.id, player.name.clone());
                    self.selected = Some(id);
                    self.notify(now, format!("{name} has joined the game!"), StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.notify(now, message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingPlayer(form)
    }

    fn adjust_selected(&mut self, delta: i64, now: Instant) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(previous) = self.roster.get(id).map(|player| player.score) else {
            return;
        };
        if self.roster.update_score(id, delta).is_none() {
            return;
        }
        self.previous_scores.insert(id, previous);

        if let Some((_, handle)) = self.score_change.take() {
            self.timers.cancel(handle);
        }
        let handle = self
            .timers
            .schedule(now, self.score_flash_ttl, UiTimer::ScoreFlashExpired);
        self.score_change = Some((
            ScoreChange {
                player_id: id,
                delta,
            },
            handle,
        ));
    }

    fn delete_selected(&mut self, now: Instant) {
        let Some(id) = self.selected else {
            self.notify(now, "No player selected.", StatusKind::Error);
            return;
        };

        let neighbour = self.neighbour_of(id);
        if self.roster.delete_player(id).is_some() {
            self.selected = neighbour;
            self.previous_scores.remove(&id);
            if matches!(self.score_change, Some((change, _)) if change.player_id == id) {
                self.clear_score_change();
            }
            self.notify(now, "Player removed.", StatusKind::Info);
        }
    }

    fn save(&mut self, now: Instant) {
        match self.roster.save(self.store.as_ref()) {
            Ok(()) => self.notify(now, "Game state saved successfully!", StatusKind::Info),
            Err(err) => {
                warn!(error = %err, "save failed");
                let message = format!("Failed to save game: {}", surface_error(&err));
                self.notify(now, message, StatusKind::Error);
            }
        }
    }

    fn load(&mut self, now: Instant) {
        match self.roster.load(self.store.as_ref()) {
            LoadOutcome::Loaded(_) => {
                self.select_first();
                self.clear_score_change();
                self.previous_scores.clear();
                self.notify(now, "Game loaded from storage!", StatusKind::Info);
            }
            LoadOutcome::NotFound => self.notify(now, "No saved game found.", StatusKind::Error),
        }
    }

    fn export(&mut self, now: Instant) {
        let export = match CsvExport::from_roster(&self.roster, &self.export_filename) {
            Ok(export) => export,
            Err(err) => {
                self.notify(now, err.to_string(), StatusKind::Error);
                return;
            }
        };

        match export.write_to(&self.export_dir) {
            Ok(path) => self.notify(
                now,
                format!("Scores exported to {}", path.display()),
                StatusKind::Info,
            ),
            Err(err) => {
                warn!(error = %err, "export failed");
                let message = format!("Export failed: {}", surface_error(&err));
                self.notify(now, message, StatusKind::Error);
            }
        }
    }

    /// First press arms the confirmation; a second press inside the window
    /// commits the reset.
    fn press_reset(&mut self, now: Instant) {
        match self.reset_confirm.take() {
            Some(handle) if self.timers.cancel(handle) => {
                for player in self.roster.players() {
                    if player.score != 0 {
                        self.previous_scores.insert(player.id, player.score);
                    }
                }
                self.roster.reset_scores();
                self.clear_score_change();
                self.notify(now, "All scores have been reset!", StatusKind::Info);
            }
            _ => {
                let handle =
                    self.timers
                        .schedule(now, self.reset_confirm_window, UiTimer::ResetConfirmExpired);
                self.reset_confirm = Some(handle);
            }
        }
    }

    fn open_selected_avatar(&mut self, now: Instant) {
        let Some(player) = self.selected.and_then(|id| self.roster.get(id)).cloned() else {
            self.notify(now, "No player selected.", StatusKind::Error);
            return;
        };
        match open_link(&player.avatar_url) {
            Ok(()) => self.notify(now, format!("Opened avatar for {player}."), StatusKind::Info),
            Err(err) => self.notify(
                now,
                format!("Failed to open avatar: {err}"),
                StatusKind::Error,
            ),
        }
    }

    fn notify<S: Into<String>>(&mut self, now: Instant, text: S, kind: StatusKind) {
        self.notifier
            .show(&mut self.timers, now, self.notification_ttl, text.into(), kind);
    }

    fn clear_score_change(&mut self) {
        if let Some((_, handle)) = self.score_change.take() {
            self.timers.cancel(handle);
        }
    }

    fn display_order(&self) -> Vec<i64> {
        self.roster
            .derived_view()
            .iter()
            .map(|row| row.player.id)
            .collect()
    }

    fn selected_index(&self, order: &[i64]) -> Option<usize> {
        self.selected
            .and_then(|id| order.iter().position(|candidate| *candidate == id))
    }

    fn select_first(&mut self) {
        self.selected = self.display_order().first().copied();
    }

    fn move_selection(&mut self, offset: isize) {
        let order = self.display_order();
        if order.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected_index(&order).unwrap_or(0) as isize;
        let target = (current + offset).clamp(0, order.len() as isize - 1);
        self.selected = Some(order[target as usize]);
    }

    /// The player that should take the selection once `id` is gone: the next
    /// card, or the previous one when `id` is last.
    fn neighbour_of(&self, id: i64) -> Option<i64> {
        let order = self.display_order();
        let index = order.iter().position(|candidate| *candidate == id)?;
        order
            .get(index + 1)
            .or_else(|| index.checked_sub(1).and_then(|prev| order.get(prev)))
            .copied()
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_player_grid(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Mode::AddingPlayer(form) = &self.mode {
            self.draw_add_player(frame, area, form);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "Game Score Tracker",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, area);
    }

    fn draw_player_grid(&self, frame: &mut Frame, area: Rect) {
        let view = self.roster.derived_view();
        if view.is_empty() {
            let message = Paragraph::new(vec![
                Line::from("No players yet."),
                Line::from(Span::styled(
                    "Press 'a' to add a player and start the game!",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let row_count = view.len().div_ceil(GRID_COLUMNS);
        let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
        let order: Vec<i64> = view.iter().map(|row| row.player.id).collect();
        let selected_row = self.selected_index(&order).unwrap_or(0) / GRID_COLUMNS;
        let first_row = selected_row.saturating_sub(visible_rows - 1);
        let shown_rows = visible_rows.min(row_count - first_row);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); shown_rows])
            .split(area);
        let change = self.score_change.map(|(change, _)| change);

        for (offset, row_area) in row_areas.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row_area);

            for (col_idx, column_area) in columns.iter().enumerate() {
                let index = (first_row + offset) * GRID_COLUMNS + col_idx;
                let Some(row) = view.get(index) else {
                    break;
                };
                let is_selected = self.selected == Some(row.player.id);

                let mut block = Block::default()
                    .borders(Borders::ALL)
                    .title(card_title(row));
                if is_selected {
                    block = block.border_style(Style::default().fg(Color::Yellow));
                }

                let previous = self.previous_scores.get(&row.player.id).copied();
                let card = Paragraph::new(card_lines(row, change, previous, is_selected))
                    .alignment(Alignment::Center)
                    .block(block);
                frame.render_widget(card, *column_area);
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match self.notifier.current() {
            Some(status) => Line::from(vec![Span::styled(status.text.clone(), status.kind.style())]),
            None => Line::from(""),
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        if let Mode::AddingPlayer(_) = self.mode {
            return Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Add   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]);
        }

        let reset_label = if self.reset_confirm.is_some() {
            Span::styled(
                " Confirm?   ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw(" Reset   ")
        };

        Line::from(vec![
            Span::styled("[a]", key_style),
            Span::raw(" Add   "),
            Span::styled("[d]", key_style),
            Span::raw(" Remove   "),
            Span::styled("[7/8/9]", key_style),
            Span::raw(" +5/+10/+20   "),
            Span::styled("[1/2/3]", key_style),
            Span::raw(" -5/-10/-20   "),
            Span::styled("[s]", key_style),
            Span::raw(" Save   "),
            Span::styled("[l]", key_style),
            Span::raw(" Load   "),
            Span::styled("[x]", key_style),
            Span::raw(" Export   "),
            Span::styled("[r]", key_style),
            reset_label,
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ])
    }

    fn draw_add_player(&self, frame: &mut Frame, area: Rect, form: &AddPlayerForm) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Player").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        frame.set_cursor_position((inner.x + form.cursor_offset(), inner.y));
    }
}
