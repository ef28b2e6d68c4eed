use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::stats::counters::SystemSnapshot;
use crate::stats::delta::{CycleStats, DeltaEngine};
use crate::stats::kill::{KillResult, send_term};
use crate::stats::reader::ProcReader;
use crate::view::{DISPLAY_ROWS, ProcessRow, SortKey, rank};

pub const REFRESH_MIN_SECS: u64 = 1;
pub const REFRESH_MAX_SECS: u64 = 10;
pub const DEFAULT_REFRESH_SECS: u64 = 2;

/// How long a kill outcome stays visible across redraws.
const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Editing a replacement filter in the prompt buffer.
    Filter,
    /// Entering a target pid in the prompt buffer.
    Kill,
    Help,
}

pub struct App {
    pub running: bool,
    reader: ProcReader,
    engine: DeltaEngine,
    /// The retained previous snapshot every cycle diffs against.
    prev: SystemSnapshot,
    pub stats: CycleStats,
    pub uptime: Duration,
    pub process_count: usize,
    pub input_mode: InputMode,
    /// The applied filter; only replaced wholesale when a prompt is applied.
    pub filter: String,
    /// In-progress prompt text (filter substring or pid digits).
    pub prompt_buffer: String,
    pub sort_key: SortKey,
    pub refresh_secs: u64,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Captures the baseline snapshot and primes the engine history, so the
    /// first timed cycle diffs against real counters instead of zeros.
    pub fn new(reader: ProcReader, refresh_secs: u64) -> Self {
        let baseline = reader.capture();
        let mut engine = DeltaEngine::new();
        let stats = engine.advance(&baseline, &baseline);
        let uptime = baseline.uptime;
        let process_count = baseline.processes.len();

        App {
            running: true,
            reader,
            engine,
            prev: baseline,
            stats,
            uptime,
            process_count,
            input_mode: InputMode::Normal,
            filter: String::new(),
            prompt_buffer: String::new(),
            sort_key: SortKey::default(),
            refresh_secs: refresh_secs.clamp(REFRESH_MIN_SECS, REFRESH_MAX_SECS),
            status_message: None,
        }
    }

    /// One sampling cycle: capture, delta against the retained snapshot,
    /// then the new snapshot becomes the previous for the next cycle.
    pub fn refresh_data(&mut self) {
        let snapshot = self.reader.capture();
        self.stats = self.engine.advance(&self.prev, &snapshot);
        self.uptime = snapshot.uptime;
        self.process_count = snapshot.processes.len();
        self.prev = snapshot;

        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    /// Filtered, ranked, budget-truncated rows for the table.
    pub fn visible_rows(&self) -> Vec<ProcessRow> {
        rank(&self.stats.processes, self.sort_key, &self.filter, DISPLAY_ROWS)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Kill => self.map_key_kill(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('s') => Action::ToggleSort,
            KeyCode::Char('f') | KeyCode::Char('/') => Action::EnterFilterMode,
            KeyCode::Char('k') => Action::EnterKillMode,
            KeyCode::Char('+') | KeyCode::Char('=') => Action::RaiseRefresh,
            KeyCode::Char('-') => Action::LowerRefresh,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('?') => Action::ToggleHelp,
            _ => Action::None,
        }
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelPrompt,
            KeyCode::Enter => Action::ApplyFilter,
            KeyCode::Backspace => {
                let mut text = self.prompt_buffer.clone();
                text.pop();
                Action::UpdateBuffer(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.prompt_buffer.clone();
                text.push(c);
                Action::UpdateBuffer(text)
            }
            _ => Action::None,
        }
    }

    fn map_key_kill(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelPrompt,
            KeyCode::Enter => Action::SubmitKill,
            KeyCode::Backspace => {
                let mut text = self.prompt_buffer.clone();
                text.pop();
                Action::UpdateBuffer(text)
            }
            // A pid is digits only; anything else is ignored.
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let mut text = self.prompt_buffer.clone();
                text.push(c);
                Action::UpdateBuffer(text)
            }
            _ => Action::None,
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        // In help mode only the help key and Esc dismiss, the rest is inert.
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc => Action::ToggleHelp,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleSort => self.sort_key = self.sort_key.toggle(),
            Action::EnterFilterMode => {
                // The prompt replaces the filter entirely, so it starts empty
                // rather than editing the applied value in place.
                self.prompt_buffer.clear();
                self.input_mode = InputMode::Filter;
            }
            Action::ApplyFilter => {
                self.filter = std::mem::take(&mut self.prompt_buffer);
                self.input_mode = InputMode::Normal;
            }
            Action::CancelPrompt => {
                self.prompt_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::UpdateBuffer(text) => self.prompt_buffer = text,
            Action::EnterKillMode => {
                self.prompt_buffer.clear();
                self.input_mode = InputMode::Kill;
            }
            Action::SubmitKill => {
                let entry = std::mem::take(&mut self.prompt_buffer);
                self.input_mode = InputMode::Normal;
                match entry.parse::<u32>() {
                    Ok(pid) => {
                        let result = self.request_kill(pid);
                        self.set_status(result.message());
                    }
                    Err(_) => self.set_status(format!("Not a valid PID: {entry:?}")),
                }
            }
            Action::RaiseRefresh => {
                self.refresh_secs = (self.refresh_secs + 1).min(REFRESH_MAX_SECS);
            }
            Action::LowerRefresh => {
                self.refresh_secs = self.refresh_secs.saturating_sub(1).max(REFRESH_MIN_SECS);
            }
            Action::Refresh => self.refresh_data(),
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn request_kill(&self, pid: u32) -> KillResult {
        send_term(pid)
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Total memory from the latest snapshot, for the header gauge label.
    pub fn mem_total_kb(&self) -> u64 {
        self.prev.memory.total_kb
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries() -> Vec<(&'static str, &'static str)> {
        vec![
            ("q", "Quit"),
            ("s", "Toggle sort (CPU / RSS)"),
            ("f", "Set name filter"),
            ("k", "Kill process by PID (SIGTERM)"),
            ("+", "Refresh interval +1s"),
            ("-", "Refresh interval -1s"),
            ("r", "Resample now"),
            ("?", "Toggle help"),
            ("Ctrl+C", "Quit (always)"),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        tests_support::app_with_empty_root()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_key_mappings() {
        let app = test_app();
        assert_eq!(app.map_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(press(KeyCode::Char('s'))), Action::ToggleSort);
        assert_eq!(
            app.map_key(press(KeyCode::Char('f'))),
            Action::EnterFilterMode
        );
        assert_eq!(app.map_key(press(KeyCode::Char('k'))), Action::EnterKillMode);
        assert_eq!(app.map_key(press(KeyCode::Char('+'))), Action::RaiseRefresh);
        assert_eq!(app.map_key(press(KeyCode::Char('-'))), Action::LowerRefresh);
        assert_eq!(app.map_key(press(KeyCode::Char('?'))), Action::ToggleHelp);
        assert_eq!(app.map_key(press(KeyCode::Char('x'))), Action::None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(ctrl_c), Action::Quit);
    }

    #[test]
    fn sort_toggle_flips_between_keys() {
        let mut app = test_app();
        assert_eq!(app.sort_key, SortKey::Cpu);
        app.dispatch(Action::ToggleSort);
        assert_eq!(app.sort_key, SortKey::Memory);
        app.dispatch(Action::ToggleSort);
        assert_eq!(app.sort_key, SortKey::Cpu);
    }

    #[test]
    fn refresh_interval_clamps_at_both_bounds() {
        let mut app = test_app();
        app.refresh_secs = REFRESH_MIN_SECS;
        app.dispatch(Action::LowerRefresh);
        assert_eq!(app.refresh_secs, REFRESH_MIN_SECS);

        app.refresh_secs = REFRESH_MAX_SECS;
        app.dispatch(Action::RaiseRefresh);
        assert_eq!(app.refresh_secs, REFRESH_MAX_SECS);

        app.refresh_secs = 5;
        app.dispatch(Action::RaiseRefresh);
        assert_eq!(app.refresh_secs, 6);
        app.dispatch(Action::LowerRefresh);
        assert_eq!(app.refresh_secs, 5);
    }

    #[test]
    fn initial_refresh_is_clamped() {
        let dir = std::env::temp_dir().join("proctop_test_app_root");
        let _ = std::fs::create_dir_all(&dir);
        let app = App::new(ProcReader::with_root(&dir), 99);
        assert_eq!(app.refresh_secs, REFRESH_MAX_SECS);
        let app = App::new(ProcReader::with_root(&dir), 0);
        assert_eq!(app.refresh_secs, REFRESH_MIN_SECS);
    }

    #[test]
    fn filter_prompt_replaces_prior_filter_entirely() {
        let mut app = test_app();
        app.filter = "old".to_string();

        app.dispatch(Action::EnterFilterMode);
        assert_eq!(app.input_mode, InputMode::Filter);
        // Prompt starts empty, not seeded with the applied filter.
        assert!(app.prompt_buffer.is_empty());

        app.dispatch(Action::UpdateBuffer("ng".to_string()));
        app.dispatch(Action::ApplyFilter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filter, "ng");

        // Applying an empty prompt clears the filter.
        app.dispatch(Action::EnterFilterMode);
        app.dispatch(Action::ApplyFilter);
        assert!(app.filter.is_empty());
    }

    #[test]
    fn cancelling_the_prompt_keeps_the_applied_filter() {
        let mut app = test_app();
        app.filter = "keep".to_string();
        app.dispatch(Action::EnterFilterMode);
        app.dispatch(Action::UpdateBuffer("discard".to_string()));
        app.dispatch(Action::CancelPrompt);
        assert_eq!(app.filter, "keep");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.prompt_buffer.is_empty());
    }

    #[test]
    fn kill_prompt_accepts_digits_only() {
        let mut app = test_app();
        app.dispatch(Action::EnterKillMode);
        assert_eq!(app.input_mode, InputMode::Kill);

        assert_eq!(
            app.map_key(press(KeyCode::Char('4'))),
            Action::UpdateBuffer("4".to_string())
        );
        assert_eq!(app.map_key(press(KeyCode::Char('a'))), Action::None);
        assert_eq!(app.map_key(press(KeyCode::Esc)), Action::CancelPrompt);
        assert_eq!(app.map_key(press(KeyCode::Enter)), Action::SubmitKill);
    }

    #[test]
    fn submitting_an_empty_kill_prompt_reports_inline() {
        let mut app = test_app();
        app.dispatch(Action::EnterKillMode);
        app.dispatch(Action::SubmitKill);
        assert_eq!(app.input_mode, InputMode::Normal);
        let (msg, _) = app.status_message.as_ref().expect("status message set");
        assert!(msg.contains("Not a valid PID"));
        assert!(app.running);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = test_app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());

        assert_eq!(app.map_key(press(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.map_key(press(KeyCode::Char('s'))), Action::None);
        assert_eq!(app.map_key(press(KeyCode::Char('?'))), Action::ToggleHelp);
        assert_eq!(app.map_key(press(KeyCode::Esc)), Action::ToggleHelp);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(ctrl_c), Action::Quit);

        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn refresh_data_retains_snapshot_for_next_cycle() {
        let mut app = test_app();
        // Against an empty fixture both cycles are zeroed but must not panic,
        // and the loop state keeps advancing.
        app.refresh_data();
        app.refresh_data();
        assert_eq!(app.process_count, 0);
        assert!(app.visible_rows().is_empty());
    }
}
