//! User configuration — keybindings, dashboard settings and persistence.
//!
//! Everything is stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/jobdash/config.toml` (default `~/.config/jobdash/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Histogram bin widths offered on the overview page.
pub const BIN_SIZES: &[u32] = &[5_000, 10_000, 20_000];
/// Steps for the minimum-salary control.
pub const SALARY_STEPS: &[u32] = &[1_000, 5_000, 10_000];
/// Steps (in days) for the date-range controls.
pub const DATE_STEPS: &[u32] = &[1, 7, 30, 365];
pub const PREVIEW_ROWS_MAX: u16 = 20;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PreviousPage,
    NextPage,
    FocusUp,
    FocusDown,
    Decrease,
    Increase,
    ResetFilters,
    MorePreviewRows,
    FewerPreviewRows,
    CycleBinSize,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::PreviousPage,
        Action::NextPage,
        Action::FocusUp,
        Action::FocusDown,
        Action::Decrease,
        Action::Increase,
        Action::ResetFilters,
        Action::MorePreviewRows,
        Action::FewerPreviewRows,
        Action::CycleBinSize,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::PreviousPage => "Previous Page",
            Action::NextPage => "Next Page",
            Action::FocusUp => "Previous Filter",
            Action::FocusDown => "Next Filter",
            Action::Decrease => "Decrease / Back",
            Action::Increase => "Increase / Forward",
            Action::ResetFilters => "Reset Filters",
            Action::MorePreviewRows => "More Preview Rows",
            Action::FewerPreviewRows => "Fewer Preview Rows",
            Action::CycleBinSize => "Cycle Bin Size",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::PreviousPage => "previous_page",
            Action::NextPage => "next_page",
            Action::FocusUp => "focus_up",
            Action::FocusDown => "focus_down",
            Action::Decrease => "decrease",
            Action::Increase => "increase",
            Action::ResetFilters => "reset_filters",
            Action::MorePreviewRows => "more_preview_rows",
            Action::FewerPreviewRows => "fewer_preview_rows",
            Action::CycleBinSize => "cycle_bin_size",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
        .union(KeyModifiers::ALT)
        .union(KeyModifiers::SHIFT);

    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.  SHIFT is ignored for character keys, since terminals
    /// report `?` or `+` with or without it.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = Self::MODIFIER_MASK;
        if matches!(self.code, KeyCode::Char(_)) {
            mask.remove(KeyModifiers::SHIFT);
        }
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & Self::MODIFIER_MASK,
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+←"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => code_name(other),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), code_name(self.code))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        // A lone "+" splits into two empty parts.
        let (mod_parts, key_part) = match parts.as_slice() {
            [.., "", ""] => (&parts[..parts.len() - 2], "+"),
            [init @ .., last] => (init, *last),
            [] => return None,
        };

        for &part in mod_parts {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            // Keep the original case for single characters.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn code_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — keybindings and dashboard settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Histogram bin width on the overview page.
    pub salary_bin_size: u32,
    /// Rows shown in the dataset preview table.
    pub preview_rows: u16,
    /// Increment of the minimum-salary control.
    pub salary_step: u32,
    /// Increment (days) of the date-range controls.
    pub date_step_days: u32,
    /// Where [`AppConfig::save`] writes; `None` keeps the config in memory.
    path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            salary_bin_size: 5_000,
            preview_rows: 5,
            salary_step: 5_000,
            date_step_days: 30,
            path: None,
        }
    }
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(PreviousPage, vec![KeyBind::new(Char('p'), n), KeyBind::new(Char('['), n)]);
        m.insert(NextPage, vec![KeyBind::new(Char('n'), n), KeyBind::new(Char(']'), n)]);
        m.insert(FocusUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(FocusDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Decrease, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(Increase, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(ResetFilters, vec![KeyBind::new(Char('r'), n)]);
        m.insert(MorePreviewRows, vec![KeyBind::new(Char('+'), n), KeyBind::new(Char('='), n)]);
        m.insert(FewerPreviewRows, vec![KeyBind::new(Char('-'), n)]);
        m.insert(CycleBinSize, vec![KeyBind::new(Char('b'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for &action in Action::ALL {
            let Some(binds) = self.bindings.get(&action) else {
                continue;
            };
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: page | {}/{}: filter | {}/{}: adjust | {}: reset | {}: settings | {}: quit",
            self.short_binding(Action::PreviousPage),
            self.short_binding(Action::NextPage),
            self.short_binding(Action::FocusUp),
            self.short_binding(Action::FocusDown),
            self.short_binding(Action::Decrease),
            self.short_binding(Action::Increase),
            self.short_binding(Action::ResetFilters),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    /// Advance `salary_bin_size` to the next offered width.
    pub fn cycle_bin_size(&mut self) {
        self.salary_bin_size = next_in(BIN_SIZES, self.salary_bin_size);
    }

    pub fn cycle_salary_step(&mut self) {
        self.salary_step = next_in(SALARY_STEPS, self.salary_step);
    }

    pub fn cycle_date_step(&mut self) {
        self.date_step_days = next_in(DATE_STEPS, self.date_step_days);
    }

    /// Grow or shrink the preview table within `1..=PREVIEW_ROWS_MAX`.
    pub fn adjust_preview_rows(&mut self, delta: i32) {
        let next = i32::from(self.preview_rows) + delta;
        self.preview_rows = next.clamp(1, i32::from(PREVIEW_ROWS_MAX)) as u16;
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
        };
        config.path = Some(path);
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Dashboard settings.  Unknown values keep the default.
            match key {
                "salary_bin_size" => {
                    if let Some(v) = value.parse::<u32>().ok().filter(|v| BIN_SIZES.contains(v)) {
                        config.salary_bin_size = v;
                    }
                    continue;
                }
                "preview_rows" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.preview_rows = v.clamp(1, PREVIEW_ROWS_MAX);
                    }
                    continue;
                }
                "salary_step" => {
                    if let Some(v) = value.parse::<u32>().ok().filter(|v| SALARY_STEPS.contains(v)) {
                        config.salary_step = v;
                    }
                    continue;
                }
                "date_step_days" => {
                    if let Some(v) = value.parse::<u32>().ok().filter(|v| DATE_STEPS.contains(v)) {
                        config.date_step_days = v;
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# jobdash configuration".to_string(),
            String::new(),
            "# Dashboard settings".to_string(),
            format!("salary_bin_size = {}", self.salary_bin_size),
            format!("preview_rows = {}", self.preview_rows),
            format!("salary_step = {}", self.salary_step),
            format!("date_step_days = {}", self.date_step_days),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// The entry after `current` in `options`, wrapping; the first entry when
/// `current` is not offered.
fn next_in(options: &[u32], current: u32) -> u32 {
    let idx = options.iter().position(|&o| o == current);
    match idx {
        Some(i) => options[(i + 1) % options.len()],
        None => options[0],
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/jobdash/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use rstest::rstest;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig::default();
        config.salary_bin_size = 20_000;
        config.preview_rows = 12;
        config.date_step_days = 7;
        config.add_binding(Action::NextPage, KeyBind::new(KeyCode::Right, KeyModifiers::ALT));
        config.add_binding(Action::MorePreviewRows, KeyBind::new(KeyCode::Char('+'), KeyModifiers::CONTROL));

        assert_eq!(AppConfig::parse(&config.serialise()), config);
    }

    #[test]
    fn saves_to_configured_path_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.preview_rows = 9;
        config.save().unwrap();
        assert!(!target.exists());

        config.path = Some(target.clone());
        config.save().unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(AppConfig::parse(&written).preview_rows, 9);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig::parse(
            "salary_bin_size = 1234\npreview_rows = 99\nquit = Hyper+q\nbogus = 1\n",
        );
        assert_eq!(config.salary_bin_size, 5_000);
        assert_eq!(config.preview_rows, PREVIEW_ROWS_MAX);
        assert_eq!(config.bindings[&Action::Quit], AppConfig::default_bindings()[&Action::Quit]);
    }

    #[rstest]
    #[case("q", KeyCode::Char('q'), KeyModifiers::NONE)]
    #[case("Q", KeyCode::Char('Q'), KeyModifiers::NONE)]
    #[case("+", KeyCode::Char('+'), KeyModifiers::NONE)]
    #[case("Ctrl++", KeyCode::Char('+'), KeyModifiers::CONTROL)]
    #[case("Alt+Left", KeyCode::Left, KeyModifiers::ALT)]
    #[case("f5", KeyCode::F(5), KeyModifiers::NONE)]
    #[case("Space", KeyCode::Char(' '), KeyModifiers::NONE)]
    fn parses_key_strings(#[case] raw: &str, #[case] code: KeyCode, #[case] modifiers: KeyModifiers) {
        assert_eq!(KeyBind::parse(raw), Some(KeyBind::new(code, modifiers)));
    }

    #[test]
    fn shifted_characters_match_unshifted_bindings() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(Action::OpenSettings)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn rebinding_steals_key_from_other_action() {
        let mut config = AppConfig::default();
        config.add_binding(Action::NextPage, KeyBind::new(KeyCode::Char('q'), KeyModifiers::NONE));
        let mut press = key(KeyCode::Char('q'), KeyModifiers::NONE);
        press.kind = KeyEventKind::Press;
        assert_eq!(config.match_key(press), Some(Action::NextPage));
        assert_eq!(config.display_bindings(Action::Quit), "unbound");
    }

    #[test]
    fn settings_cycle_and_clamp() {
        let mut config = AppConfig::default();
        config.cycle_bin_size();
        assert_eq!(config.salary_bin_size, 10_000);
        config.cycle_bin_size();
        config.cycle_bin_size();
        assert_eq!(config.salary_bin_size, 5_000);

        config.adjust_preview_rows(-10);
        assert_eq!(config.preview_rows, 1);
        config.adjust_preview_rows(100);
        assert_eq!(config.preview_rows, PREVIEW_ROWS_MAX);
    }
}
