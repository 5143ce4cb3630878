use crate::chart::{ChartProjector, Projection};
use crate::metrics::registry::{HostStatus, MonitorRegistry};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    AddHost,
    Error(String),
}

pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    pub registry: Arc<MonitorRegistry>,
    pub projector: ChartProjector,
    pub input: String,
    pub selected: usize,
    pub theme: Theme,
    pub ping_available: bool,
}

impl App {
    pub fn new(registry: Arc<MonitorRegistry>, projector: ChartProjector) -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Normal,
            registry,
            projector,
            input: String::new(),
            selected: 0,
            theme: Theme,
            ping_available: true,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn projection(&self) -> Projection {
        self.projector.project(&self.registry.snapshots())
    }

    pub fn hosts(&self) -> Vec<HostStatus> {
        self.registry.hosts()
    }

    /// Adds a host, ignoring blank input. Failures switch to the error popup.
    pub fn add_host(&mut self, host: &str) {
        if host.trim().is_empty() {
            return;
        }
        if let Err(e) = self.registry.add(host) {
            self.show_error(format!("Could not add {}: {}", host.trim(), e));
        }
    }

    pub fn remove_selected(&mut self) {
        let hosts = self.registry.hosts();
        if let Some(status) = hosts.get(self.selected) {
            self.registry.remove(status.host.as_str());
        }
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        let len = self.registry.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.registry.len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.registry.len().saturating_sub(1));
    }

    pub fn start_add_host(&mut self) {
        self.mode = AppMode::AddHost;
        self.input.clear();
    }

    pub fn cancel_input(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
    }

    pub fn submit_input(&mut self) {
        let host = std::mem::take(&mut self.input);
        self.mode = AppMode::Normal;
        self.add_host(&host);
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
    }

    pub fn show_error(&mut self, message: String) {
        tracing::warn!(%message, "showing error");
        self.mode = AppMode::Error(message);
    }

    pub fn clear_error(&mut self) {
        if matches!(self.mode, AppMode::Error(_)) {
            self.mode = AppMode::Normal;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            AppMode::Help => match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => self.toggle_help(),
                _ => {}
            },
            AppMode::Error(_) => self.clear_error(),
            AppMode::AddHost => match key.code {
                KeyCode::Esc => self.cancel_input(),
                KeyCode::Enter => self.submit_input(),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.push(c);
                }
                _ => {}
            },
            AppMode::Normal => match (key.code, key.modifiers) {
                (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                    self.quit()
                }
                (KeyCode::Char('?'), _) => self.toggle_help(),
                (KeyCode::Char('a'), _) | (KeyCode::Char('+'), _) => self.start_add_host(),
                (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => self.remove_selected(),
                (KeyCode::Char('j'), _) | (KeyCode::Down, _) => self.select_next(),
                (KeyCode::Char('k'), _) | (KeyCode::Up, _) => self.select_previous(),
                _ => {}
            },
        }
    }
}
