//! The three dashboard pages.
//!
//! Aggregates are computed from the session's filtered rows on every draw;
//! nothing here is cached.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::config::AppConfig;
use crate::core::aggregate::{self, TOP_N};
use crate::core::nav::Page;
use crate::core::posting::JobPosting;
use crate::core::session::Session;

use super::charts::{
    CountChart, MeanChart, PreviewTable, SalaryHistogram, ShareChart, TimeSeries, Treemap,
    WordCloud,
};
use super::layout::grid;
use super::theme::Theme;

const CLOUD_WORDS: usize = 40;

/// Draw the current page of `session` into `area`.
pub fn render(f: &mut Frame, area: Rect, session: &Session, config: &AppConfig) {
    let page = match session.page() {
        Ok(page) => page,
        Err(err) => {
            render_fault(f, area, &err.to_string());
            return;
        }
    };

    let rows = session.filtered();
    match page {
        Page::Overview => overview(f, area, &rows, config),
        Page::DetailedAnalysis => detailed_analysis(f, area, &rows),
        Page::AdditionalInsights => additional_insights(f, area, &rows),
    }
}

fn render_fault(f: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .title(" Navigation ")
        .title_style(Theme::error_style())
        .borders(Borders::ALL)
        .border_style(Theme::error_style());
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(message, Theme::error_style())))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

// ───────────────────────────────────────── page 1 ────────────

fn overview(f: &mut Frame, area: Rect, rows: &[&JobPosting], config: &AppConfig) {
    let preview_height = config.preview_rows + 4; // borders + header + margin
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(preview_height), Constraint::Min(6)])
        .split(area);

    f.render_widget(
        PreviewTable {
            title: "Dataset Preview",
            rows,
            limit: usize::from(config.preview_rows),
        },
        parts[0],
    );

    let bins = aggregate::salary_histogram(rows, f64::from(config.salary_bin_size));
    let title = format!("Salary Distribution (bin ${})", config.salary_bin_size);
    f.render_widget(
        SalaryHistogram {
            title: &title,
            bins: &bins,
        },
        parts[1],
    );
}

// ───────────────────────────────────────── page 2 ────────────

fn detailed_analysis(f: &mut Frame, area: Rect, rows: &[&JobPosting]) {
    let cells = grid(area, 3, 2);

    let categories = aggregate::top_n(aggregate::category_counts(rows), TOP_N);
    f.render_widget(
        CountChart {
            title: "Top 10 Job Categories",
            counts: &categories,
            horizontal: true,
        },
        cells[0],
    );

    let split = aggregate::employment_split(rows);
    f.render_widget(
        ShareChart {
            title: "Full-Time/Part-Time",
            counts: &split,
        },
        cells[1],
    );

    let levels = aggregate::career_level_counts(rows);
    f.render_widget(
        CountChart {
            title: "Career Level Distribution",
            counts: &levels,
            horizontal: false,
        },
        cells[2],
    );

    let best_paid = aggregate::top_mean_by(rows, |r| Some(r.job_category.as_str()), TOP_N);
    f.render_widget(
        MeanChart {
            title: "Top 10 Categories by Avg Salary",
            means: &best_paid,
            horizontal: true,
        },
        cells[3],
    );

    let per_year = aggregate::postings_per_year(rows)
        .into_iter()
        .map(|(year, n)| (year.to_string(), n))
        .collect();
    f.render_widget(
        TimeSeries {
            title: "Job Postings Over Time",
            x_title: "Year",
            points: per_year,
        },
        cells[4],
    );

    let words = aggregate::word_frequencies(rows, CLOUD_WORDS);
    f.render_widget(
        WordCloud {
            title: "Job Description Words",
            words: &words,
        },
        cells[5],
    );
}

// ───────────────────────────────────────── page 3 ────────────

fn additional_insights(f: &mut Frame, area: Rect, rows: &[&JobPosting]) {
    let cells = grid(area, 3, 2);

    let posting_types = aggregate::posting_type_counts(rows);
    f.render_widget(
        ShareChart {
            title: "Internal vs. External",
            counts: &posting_types,
        },
        cells[0],
    );

    let units = aggregate::top_n(aggregate::work_unit_counts(rows), TOP_N);
    f.render_widget(
        Treemap {
            title: "Top 10 Work Units",
            counts: &units,
        },
        cells[1],
    );

    let by_level = aggregate::mean_by(rows, |r| r.career_level.as_deref());
    f.render_widget(
        MeanChart {
            title: "Avg Salary by Career Level",
            means: &by_level,
            horizontal: false,
        },
        cells[2],
    );

    let positions = aggregate::top_n(aggregate::category_counts(rows), TOP_N);
    f.render_widget(
        CountChart {
            title: "Top 10 Categories by Positions",
            counts: &positions,
            horizontal: false,
        },
        cells[3],
    );

    let locations = aggregate::work_location_counts(rows, TOP_N);
    f.render_widget(
        CountChart {
            title: "Top 10 Work Locations",
            counts: &locations,
            horizontal: true,
        },
        cells[4],
    );

    let per_month = aggregate::postings_per_month(rows)
        .into_iter()
        .map(|((year, month), n)| (format!("{year}-{month:02}"), n))
        .collect();
    f.render_widget(
        TimeSeries {
            title: "Job Postings by Month",
            x_title: "Month",
            points: per_month,
        },
        cells[5],
    );
}
