//! A terminal dashboard over NYC job postings.
//!
//! Run the binary with a CSV export to browse it interactively.
//! Run with `--report` to print a plain-text summary instead.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::{
    filter::CategoryFilter,
    loader,
    nav::{Page, FIRST_PAGE, LAST_PAGE},
    report,
    session::Session,
};
use crate::ui::{layout::AppLayout, pages, popup, sidebar::Sidebar, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal dashboard for NYC job postings")]
struct Cli {
    /// CSV export of the job postings.
    #[arg(default_value = "cleaned_data_nyjobs.csv")]
    path: PathBuf,

    /// First posting date to include (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last posting date to include (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Minimum starting salary (clamped to the salaries in the file).
    #[arg(long = "min-salary", value_parser = parse_min_salary)]
    min_salary: Option<f64>,

    /// Job category to show, exactly as it appears in the file.  Omit for
    /// every category.
    #[arg(long)]
    category: Option<String>,

    /// Page to open on.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    page: Option<u8>,

    /// Print a summary of the filtered postings and exit.
    #[arg(long)]
    report: bool,
}

impl Cli {
    /// Apply the filter and page flags on top of the session defaults.
    fn apply_to(&self, session: &mut Session) -> Result<()> {
        if let Some(c) = self.category.as_deref() {
            if !session.bounds().categories.iter().any(|known| known == c) {
                bail!("--category {c:?} does not appear in the dataset");
            }
        }

        session.update_filters(|f, bounds| {
            if let Some(from) = self.from {
                f.date_range.start = from;
            }
            if let Some(to) = self.to {
                f.date_range.end = to;
            }
            if let Some(min) = self.min_salary {
                f.set_min_salary(min, bounds);
            }
            if let Some(c) = &self.category {
                f.category = CategoryFilter::Specific(c.clone());
            }
        });

        if let Some(n) = self.page {
            let page = Page::try_from(n).with_context(|| format!("--page {n}"))?;
            session.set_page(page);
        }
        Ok(())
    }
}

/// Accept only finite, non-negative salaries.
fn parse_min_salary(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a non-negative amount, got {raw}"))
    }
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());
    let session = &state.session;

    let banner = Paragraph::new(vec![
        Line::raw(""),
        Line::from(Span::styled("NYC Job Postings Dashboard", Theme::banner_style())),
    ])
    .alignment(Alignment::Center)
    .style(Theme::banner_style());
    frame.render_widget(banner, layout.banner_area);

    frame.render_widget(
        Sidebar {
            filters: session.filters(),
            bounds: session.bounds(),
            focus: state.focus,
            matched: session.filtered_len(),
            total: session.dataset().len(),
            has_focus: state.active_view == ActiveView::Dashboard,
        },
        layout.sidebar_area,
    );

    let page_title = match session.page() {
        Ok(page) => format!(" {} · page {} of {} ", page.title(), page.number(), LAST_PAGE),
        Err(_) => " Dashboard ".to_string(),
    };
    let page_block = Block::default()
        .title(page_title)
        .title_style(Theme::title_style())
        .borders(Borders::TOP)
        .border_style(Theme::border_style());
    let page_inner = page_block.inner(layout.page_area);
    frame.render_widget(page_block, layout.page_area);
    pages::render(frame, page_inner, session, &state.config);

    let number = session.page_state().number();
    frame.render_widget(
        Paragraph::new("◀ Previous").style(Theme::button_style(number > FIRST_PAGE)),
        layout.prev_button,
    );
    frame.render_widget(
        Paragraph::new("Next ▶").style(Theme::button_style(number < LAST_PAGE)),
        layout.next_button,
    );

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Dashboard => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(popup::SettingsPopup { state }, frame.area());
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Dashboard => {}
    }
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Silent unless RUST_LOG is set; never writes to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // ── load once, before the terminal is touched ─────────────
    let dataset = loader::load_path(&cli.path)
        .with_context(|| format!("failed to load {}", cli.path.display()))?;
    let today = chrono::Local::now().date_naive();
    let mut session = Session::new(Arc::new(dataset), today);
    cli.apply_to(&mut session)?;

    if cli.report {
        print!("{}", report::render(&session));
        return Ok(());
    }

    let mut state = AppState::new(session, config::AppConfig::load(), today);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;
    state.terminal_area = terminal.size()?.into();

    let mut events = spawn_event_reader(Duration::from_millis(250));

    // ── event loop ────────────────────────────────────────────
    let outcome: Result<()> = async {
        loop {
            terminal.draw(|frame| draw(frame, &state))?;

            // One event at a time, handled to completion before the next draw.
            let Some(event) = events.recv().await else {
                break;
            };
            match event {
                AppEvent::Key(k) => handler::handle_key(&mut state, k),
                AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                AppEvent::Resize(w, h) => {
                    state.terminal_area = ratatui::layout::Rect::new(0, 0, w, h);
                }
                AppEvent::Tick => {}
            }

            if state.should_quit {
                break;
            }
        }
        Ok(())
    }
    .await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    outcome
}
