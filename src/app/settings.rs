//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and the popup renderer consume the same source of truth.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. } | Self::Cycle { label, .. } => label,
        }
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Cycle {
        label: "Histogram Bin Size",
        value: |s| format!("${}", s.config.salary_bin_size),
        cycle: |s| {
            s.config.cycle_bin_size();
            let _ = s.config.save();
            s.status_message = Some(format!("Bin size: ${}", s.config.salary_bin_size));
        },
    },
    SettingsItem::Cycle {
        label: "Salary Step",
        value: |s| format!("${}", s.config.salary_step),
        cycle: |s| {
            s.config.cycle_salary_step();
            let _ = s.config.save();
            s.status_message = Some(format!("Salary step: ${}", s.config.salary_step));
        },
    },
    SettingsItem::Cycle {
        label: "Date Step",
        value: |s| format!("{}d", s.config.date_step_days),
        cycle: |s| {
            s.config.cycle_date_step();
            let _ = s.config.save();
            s.status_message = Some(format!("Date step: {} days", s.config.date_step_days));
        },
    },
    SettingsItem::Cycle {
        label: "Preview Rows",
        value: |s| s.config.preview_rows.to_string(),
        cycle: |s| {
            // 1 → 5 → 10 → 20 → 1
            s.config.preview_rows = match s.config.preview_rows {
                0..=4 => 5,
                5..=9 => 10,
                10..=19 => 20,
                _ => 1,
            };
            let _ = s.config.save();
            s.status_message = Some(format!("Preview rows: {}", s.config.preview_rows));
        },
    },
];
