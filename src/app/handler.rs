//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::ui::layout::{point_in_rect, AppLayout};
use crate::ui::sidebar::field_at;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState, FilterField};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Dashboard => handle_dashboard_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Dashboard (configurable bindings) ───────────────────────────

fn handle_dashboard_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::PreviousPage => state.session.previous_page(),
        Action::NextPage => state.session.next_page(),
        Action::FocusUp => state.focus = state.focus.above(),
        Action::FocusDown => state.focus = state.focus.below(),
        Action::Decrease => adjust_focused(state, false),
        Action::Increase => adjust_focused(state, true),
        Action::ResetFilters => {
            state.session.reset_filters(state.today);
            state.status_message = Some("Filters reset".into());
        }
        Action::MorePreviewRows => change_preview_rows(state, 1),
        Action::FewerPreviewRows => change_preview_rows(state, -1),
        Action::CycleBinSize => {
            state.config.cycle_bin_size();
            let _ = state.config.save();
            state.status_message = Some(format!("Bin size: ${}", state.config.salary_bin_size));
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => state.should_quit = true,
    }
}

/// Step the focused sidebar control up or down by its configured step.
fn adjust_focused(state: &mut AppState, forward: bool) {
    let sign: i64 = if forward { 1 } else { -1 };
    let days = sign * i64::from(state.config.date_step_days);
    let salary = sign as f64 * f64::from(state.config.salary_step);

    match state.focus {
        FilterField::StartDate => state.session.update_filters(|f, _| f.shift_start(days)),
        FilterField::EndDate => state.session.update_filters(|f, _| f.shift_end(days)),
        FilterField::MinSalary => state
            .session
            .update_filters(|f, bounds| f.step_min_salary(salary, bounds)),
        FilterField::Category => state
            .session
            .update_filters(|f, bounds| f.cycle_category(forward, bounds)),
    }
    state.status_message = None;
}

fn change_preview_rows(state: &mut AppState, delta: i32) {
    state.config.adjust_preview_rows(delta);
    let _ = state.config.save();
    state.status_message = Some(format!("Preview rows: {}", state.config.preview_rows));
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Dashboard;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Cycle { cycle, .. } => cycle(state),
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Dashboard;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" item.
                state.config.reset_defaults();
                let _ = state.config.save();
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.bindings.insert(action, Vec::new());
                let _ = state.config.save();
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    // Ctrl+C stays reserved for quitting.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }

    if let Some(&action) = Action::ALL.get(state.controls_selected) {
        state.config.add_binding(action, KeyBind::from_key_event(key));
        let _ = state.config.save();
    }
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event: navigation buttons and sidebar fields.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Dashboard {
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if point_in_rect(layout.prev_button, col, row) {
                state.session.previous_page();
            } else if point_in_rect(layout.next_button, col, row) {
                state.session.next_page();
            } else if point_in_rect(layout.sidebar_area, col, row) {
                if let Some(field) = field_at(layout.sidebar_area, row) {
                    state.focus = field;
                }
            }
        }
        MouseEventKind::ScrollUp if point_in_rect(layout.sidebar_area, col, row) => {
            adjust_focused(state, true);
        }
        MouseEventKind::ScrollDown if point_in_rect(layout.sidebar_area, col, row) => {
            adjust_focused(state, false);
        }
        _ => {}
    }
}
