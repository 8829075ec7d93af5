//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! Filter and page state belong to the [`Session`]; this struct only adds
//! what the terminal front-end needs on top of it.

use chrono::NaiveDate;
use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::session::Session;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Dashboard,
    SettingsMenu,
    ControlsSubmenu,
}

/// Sidebar control that currently receives increase/decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    StartDate,
    EndDate,
    MinSalary,
    Category,
}

impl FilterField {
    pub const ALL: &[FilterField] = &[
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::MinSalary,
        FilterField::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::StartDate => "Start date",
            FilterField::EndDate => "End date",
            FilterField::MinSalary => "Minimum salary",
            FilterField::Category => "Job category",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&f| f == self).unwrap_or(0)
    }

    /// Next field down, saturating at the last one.
    pub fn below(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// Next field up, saturating at the first one.
    pub fn above(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

/// Top-level application state.
pub struct AppState {
    /// Dataset, filters, filtered rows and page of this session.
    pub session: Session,
    /// User-configurable keybindings and dashboard settings.
    pub config: AppConfig,
    /// Date used when resetting filters over a dataset without dates.
    pub today: NaiveDate,
    /// Focused sidebar control.
    pub focus: FilterField,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(session: Session, config: AppConfig, today: NaiveDate) -> Self {
        Self {
            session,
            config,
            today,
            focus: FilterField::default(),
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            terminal_area: Rect::default(),
        }
    }
}
