use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error, info};

use crate::data::{DataSource, LoadError};
use crate::model::ScoreRecord;
use crate::table::{Average, ScoreTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Source,
    First,
    Second,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Source => Focus::First,
            Focus::First => Focus::Second,
            Focus::Second => Focus::Source,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Source => Focus::Second,
            Focus::First => Focus::Source,
            Focus::Second => Focus::First,
        }
    }

    fn input_index(self) -> Option<usize> {
        match self {
            Focus::Source => None,
            Focus::First => Some(0),
            Focus::Second => Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub country: String,
    pub average: Average,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub source: DataSource,
    pub table: ScoreTable,
    pub inputs: [String; 2],
    pub focus: Focus,
    pub pending: usize,
    pub last_loaded: Option<DateTime<Local>>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            should_quit: false,
            source: DataSource::Static,
            table: ScoreTable::default(),
            inputs: [String::new(), String::new()],
            focus: Focus::First,
            pending: 0,
            last_loaded: None,
        }
    }
}

impl App {
    pub fn new(source: DataSource, countries: &[String]) -> Self {
        let mut app = Self {
            source,
            ..Self::default()
        };
        for (slot, name) in app.inputs.iter_mut().zip(countries) {
            slot.clone_from(name);
        }
        app
    }

    /// Returns the source to reload from when the key flipped the toggle.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<DataSource> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(2) => return Some(self.toggle_source()),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Enter | KeyCode::Char(' ') if self.focus == Focus::Source => {
                return Some(self.toggle_source());
            }
            KeyCode::Char(c) => {
                if let Some(i) = self.focus.input_index() {
                    self.inputs[i].push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(i) = self.focus.input_index() {
                    self.inputs[i].pop();
                }
            }
            _ => {}
        }
        None
    }

    pub fn toggle_source(&mut self) -> DataSource {
        self.source = self.source.toggled();
        info!(source = self.source.label(), "data source switched");
        self.source
    }

    pub fn begin_load(&mut self) {
        self.pending += 1;
    }

    /// Replaces the table on success. A failed load is logged and the
    /// previous table stays in place.
    pub fn apply_load(&mut self, source: DataSource, result: Result<Vec<ScoreRecord>, LoadError>) {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(records) => {
                if source != self.source {
                    debug!(loaded = source.label(), selected = self.source.label(), "applying load for a source no longer selected");
                }
                self.table = ScoreTable::from_records(&records);
                self.last_loaded = Some(Local::now());
                info!(source = source.label(), records = records.len(), countries = self.table.len(), "score table rebuilt");
            }
            Err(err) => {
                error!(source = source.label(), error = %err, "error fetching data");
            }
        }
    }

    pub fn rows(&self) -> Vec<Option<ScoreRow>> {
        self.inputs.iter().map(|name| self.row_for(name)).collect()
    }

    fn row_for(&self, name: &str) -> Option<ScoreRow> {
        if !self.table.contains(name) {
            return None;
        }
        Some(ScoreRow {
            country: name.to_string(),
            average: self.table.average_for(name),
        })
    }
}
