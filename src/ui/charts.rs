//! Chart widgets — turn aggregates into terminal drawings.
//!
//! Each widget takes already-aggregated data and draws a titled, bordered
//! panel.  Empty inputs render an [`EmptyNotice`] instead of an empty frame.

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType,
        Paragraph, Row, Table, Widget, Wrap,
    },
};

use crate::core::aggregate::{Bin, Count, Mean};
use crate::core::posting::JobPosting;
use crate::core::report::format_money;

use super::theme::Theme;

const LABEL_MAX: usize = 24;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style())
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

// ───────────────────────────────────────── empty ─────────────

/// Placeholder for a chart whose input is empty.
pub struct EmptyNotice<'a> {
    pub title: &'a str,
}

impl Widget for EmptyNotice<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            "No data for the current filters",
            Theme::muted_style(),
        )))
        .block(panel(self.title))
        .render(area, buf);
    }
}

// ───────────────────────────────────────── bars ──────────────

/// One bar: label, value used for the length, and the text drawn on it.
struct BarEntry {
    label: String,
    value: u64,
    text: String,
}

fn render_bars(title: &str, entries: Vec<BarEntry>, horizontal: bool, area: Rect, buf: &mut Buffer) {
    if entries.is_empty() {
        EmptyNotice { title }.render(area, buf);
        return;
    }

    let block = panel(title);
    let inner = block.inner(area);

    let n = u16::try_from(entries.len()).unwrap_or(u16::MAX);
    let (bar_width, bar_gap, label_max) = if horizontal {
        (1, u16::from(inner.height >= n.saturating_mul(2)), LABEL_MAX)
    } else {
        let slot = (inner.width / n.max(1)).max(1);
        let width = slot.saturating_sub(1).max(1);
        (width, u16::from(slot > 1), usize::from(width))
    };

    let bars: Vec<Bar> = entries
        .into_iter()
        .map(|s| {
            Bar::default()
                .value(s.value)
                .text_value(s.text)
                .label(Line::from(truncate_label(&s.label, label_max)))
        })
        .collect();

    BarChart::default()
        .block(block)
        .direction(if horizontal {
            Direction::Horizontal
        } else {
            Direction::Vertical
        })
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .bar_style(Theme::bar_style())
        .value_style(Theme::value_style().bg(Color::Rgb(99, 110, 250)))
        .label_style(Theme::field_label_style())
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

/// Bar chart of labelled counts.
pub struct CountChart<'a> {
    pub title: &'a str,
    pub counts: &'a [Count],
    pub horizontal: bool,
}

impl Widget for CountChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let entries = self
            .counts
            .iter()
            .map(|c| BarEntry {
                label: c.label.clone(),
                value: c.count as u64,
                text: c.count.to_string(),
            })
            .collect();
        render_bars(self.title, entries, self.horizontal, area, buf);
    }
}

/// Bar chart of mean salaries.
pub struct MeanChart<'a> {
    pub title: &'a str,
    pub means: &'a [Mean],
    pub horizontal: bool,
}

impl Widget for MeanChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let entries = self
            .means
            .iter()
            .map(|m| BarEntry {
                label: m.label.clone(),
                value: m.mean.round().max(0.0) as u64,
                text: format_money(m.mean),
            })
            .collect();
        render_bars(self.title, entries, self.horizontal, area, buf);
    }
}

/// Histogram of starting salaries.
pub struct SalaryHistogram<'a> {
    pub title: &'a str,
    pub bins: &'a [Bin],
}

impl Widget for SalaryHistogram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let entries = self
            .bins
            .iter()
            .map(|b| BarEntry {
                label: format!("{}k", (b.lower / 1_000.0).round() as i64),
                value: b.count as u64,
                text: b.count.to_string(),
            })
            .collect();
        render_bars(self.title, entries, false, area, buf);
    }
}

// ───────────────────────────────────────── shares ────────────

/// Split `width` cells among `values` proportionally (largest remainder), so
/// the widths always sum to `width` when any value is positive.
pub fn proportional_widths(values: &[usize], width: u16) -> Vec<u16> {
    let total: usize = values.iter().sum();
    if total == 0 || values.is_empty() {
        return vec![0; values.len()];
    }
    let width = usize::from(width);
    let mut widths: Vec<usize> = values.iter().map(|v| v * width / total).collect();
    let mut remainders: Vec<(usize, usize)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (v * width % total, i))
        .collect();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let assigned: usize = widths.iter().sum();
    for &(_, i) in remainders.iter().take(width - assigned) {
        widths[i] += 1;
    }
    widths.into_iter().map(|w| w as u16).collect()
}

/// Pie-chart stand-in: one stacked bar plus a percentage legend.
pub struct ShareChart<'a> {
    pub title: &'a str,
    pub counts: &'a [Count],
}

impl Widget for ShareChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.counts.is_empty() {
            EmptyNotice { title: self.title }.render(area, buf);
            return;
        }
        let block = panel(self.title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let values: Vec<usize> = self.counts.iter().map(|c| c.count).collect();
        let total: usize = values.iter().sum();
        let widths = proportional_widths(&values, inner.width);

        let bar: Vec<Span> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                Span::styled(
                    " ".repeat(usize::from(w)),
                    Style::default().bg(Theme::series_color(i)),
                )
            })
            .collect();

        let mut lines = vec![Line::from(bar.clone()), Line::from(bar), Line::raw("")];
        for (i, c) in self.counts.iter().enumerate() {
            let pct = c.count as f64 * 100.0 / total as f64;
            lines.push(Line::from(vec![
                Span::styled("■ ", Style::default().fg(Theme::series_color(i))),
                Span::styled(format!("{} ", c.label), Theme::value_style()),
                Span::styled(format!("{pct:.1}% ({})", c.count), Theme::muted_style()),
            ]));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── time series ───────

/// Line chart over ordered `(label, count)` points.
pub struct TimeSeries<'a> {
    pub title: &'a str,
    pub x_title: &'a str,
    pub points: Vec<(String, usize)>,
}

impl Widget for TimeSeries<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.points.is_empty() {
            EmptyNotice { title: self.title }.render(area, buf);
            return;
        }

        let data: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, n))| (i as f64, *n as f64))
            .collect();
        let y_max = data.iter().map(|(_, y)| *y).fold(1.0, f64::max);
        let x_max = (data.len().saturating_sub(1) as f64).max(1.0);

        let first = self.points.first().map(|(l, _)| l.clone()).unwrap_or_default();
        let last = self.points.last().map(|(l, _)| l.clone()).unwrap_or_default();
        let x_labels = if self.points.len() > 2 {
            let mid = self.points[self.points.len() / 2].0.clone();
            vec![first, mid, last]
        } else {
            vec![first, last]
        };

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::line_style())
            .data(&data);

        Chart::new(vec![dataset])
            .block(panel(self.title))
            .x_axis(
                Axis::default()
                    .title(self.x_title)
                    .style(Theme::muted_style())
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Postings")
                    .style(Theme::muted_style())
                    .bounds([0.0, y_max * 1.1])
                    .labels(vec!["0".to_string(), format!("{}", y_max as u64)]),
            )
            .render(area, buf);
    }
}

// ───────────────────────────────────────── treemap ───────────

/// Slice-and-dice layout: each tile takes its share of the remaining space
/// along the longer side.  `weights` should be sorted largest first.
pub fn treemap_layout(weights: &[usize], area: Rect) -> Vec<Rect> {
    let mut out = Vec::with_capacity(weights.len());
    let mut rest = area;
    let mut remaining: usize = weights.iter().sum();

    for (i, &w) in weights.iter().enumerate() {
        if remaining == 0 || rest.width == 0 || rest.height == 0 {
            out.push(Rect::new(rest.x, rest.y, 0, 0));
            continue;
        }
        let last = i + 1 == weights.len();
        // Terminal cells are about twice as tall as wide.
        let horizontal = rest.width >= rest.height * 2;
        let tile = if horizontal {
            let w_cells = if last {
                rest.width
            } else {
                (u32::from(rest.width) * w as u32 / remaining as u32) as u16
            };
            let tile = Rect::new(rest.x, rest.y, w_cells, rest.height);
            rest = Rect::new(rest.x + w_cells, rest.y, rest.width - w_cells, rest.height);
            tile
        } else {
            let h_cells = if last {
                rest.height
            } else {
                (u32::from(rest.height) * w as u32 / remaining as u32) as u16
            };
            let tile = Rect::new(rest.x, rest.y, rest.width, h_cells);
            rest = Rect::new(rest.x, rest.y + h_cells, rest.width, rest.height - h_cells);
            tile
        };
        remaining -= w;
        out.push(tile);
    }
    out
}

pub struct Treemap<'a> {
    pub title: &'a str,
    pub counts: &'a [Count],
}

impl Widget for Treemap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.counts.is_empty() {
            EmptyNotice { title: self.title }.render(area, buf);
            return;
        }
        let block = panel(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let weights: Vec<usize> = self.counts.iter().map(|c| c.count).collect();
        for (i, (tile, count)) in treemap_layout(&weights, inner)
            .into_iter()
            .zip(self.counts)
            .enumerate()
        {
            if tile.width == 0 || tile.height == 0 {
                continue;
            }
            let style = Style::default()
                .bg(Theme::series_color(i))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD);
            let width = usize::from(tile.width);
            Paragraph::new(vec![
                Line::raw(truncate_label(&count.label, width)),
                Line::raw(truncate_label(&count.count.to_string(), width)),
            ])
            .style(style)
            .render(tile, buf);
        }
    }
}

// ───────────────────────────────────────── word cloud ────────

/// Frequent words laid out as wrapped text; the most frequent are emphasised.
pub struct WordCloud<'a> {
    pub title: &'a str,
    pub words: &'a [Count],
}

impl Widget for WordCloud<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.words.is_empty() {
            EmptyNotice { title: self.title }.render(area, buf);
            return;
        }
        let top = self.words.first().map_or(1, |w| w.count.max(1));
        let spans: Vec<Span> = self
            .words
            .iter()
            .enumerate()
            .flat_map(|(i, w)| {
                let weight = w.count as f64 / top as f64;
                let mut style = Style::default().fg(Theme::series_color(i));
                if weight >= 0.5 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let text = if weight >= 0.75 {
                    w.label.to_uppercase()
                } else {
                    w.label.clone()
                };
                [Span::styled(text, style), Span::raw("  ")]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .block(panel(self.title))
            .render(area, buf);
    }
}

// ───────────────────────────────────────── preview ───────────

/// First rows of the filtered dataset.
pub struct PreviewTable<'a> {
    pub title: &'a str,
    pub rows: &'a [&'a JobPosting],
    pub limit: usize,
}

impl Widget for PreviewTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.rows.is_empty() {
            EmptyNotice { title: self.title }.render(area, buf);
            return;
        }

        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

        let body: Vec<Row> = self
            .rows
            .iter()
            .take(self.limit)
            .map(|r| {
                Row::new(vec![
                    Cell::from(text(&r.job_id)),
                    Cell::from(text(&r.business_title)),
                    Cell::from(r.job_category.clone()),
                    Cell::from(salary_range(r)),
                    Cell::from(date(r.posting_date)),
                    Cell::from(r.short_work_location().to_string()),
                ])
            })
            .collect();

        let header = Row::new(vec![
            "Job ID",
            "Business Title",
            "Job Category",
            "Salary Range",
            "Posting Date",
            "Work Location",
        ])
        .style(Theme::title_style());

        Table::new(
            body,
            [
                Constraint::Length(8),
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Length(19),
                Constraint::Length(12),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .column_spacing(1)
        .block(panel(self.title))
        .render(area, buf);
    }
}

fn salary_range(row: &JobPosting) -> String {
    match row.salary_range_to {
        Some(to) if to > row.salary_range_from => {
            format!("{}–{}", format_money(row.salary_range_from), format_money(to))
        }
        _ => format_money(row.salary_range_from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use rstest::rstest;

    fn count(label: &str, n: usize) -> Count {
        Count {
            label: label.into(),
            count: n,
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[rstest]
    #[case("short", 10, "short")]
    #[case("exactly10!", 10, "exactly10!")]
    #[case("much too long", 5, "much…")]
    #[case("abc", 0, "")]
    fn truncates_labels(#[case] input: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_label(input, max), expected);
    }

    #[test]
    fn proportional_widths_fill_the_bar() {
        let widths = proportional_widths(&[2, 1], 10);
        assert_eq!(widths, vec![7, 3]);
        assert_eq!(proportional_widths(&[1, 1, 1], 10).iter().sum::<u16>(), 10);
        assert_eq!(proportional_widths(&[0, 0], 10), vec![0, 0]);
    }

    #[test]
    fn treemap_tiles_partition_the_area() {
        let area = Rect::new(0, 0, 40, 10);
        let tiles = treemap_layout(&[5, 3, 2], area);
        assert_eq!(tiles.len(), 3);
        let covered: u32 = tiles.iter().map(|t| u32::from(t.width) * u32::from(t.height)).sum();
        assert_eq!(covered, 400);
        for pair in tiles.windows(2) {
            assert!(!pair[0].intersects(pair[1]));
        }
    }

    #[test]
    fn empty_counts_render_notice() {
        let mut terminal = Terminal::new(TestBackend::new(50, 5)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    CountChart {
                        title: "Top 10 Job Categories",
                        counts: &[],
                        horizontal: true,
                    },
                    f.area(),
                )
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("No data for the current filters"));
    }

    #[test]
    fn histogram_with_outlier_salary_renders() {
        let rows = [
            JobPosting {
                salary_range_from: 45_000.0,
                ..JobPosting::default()
            },
            JobPosting {
                salary_range_from: 1e20,
                ..JobPosting::default()
            },
        ];
        let refs: Vec<&JobPosting> = rows.iter().collect();
        let bins = crate::core::aggregate::salary_histogram(&refs, 5_000.0);

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    SalaryHistogram {
                        title: "Salary Distribution",
                        bins: &bins,
                    },
                    f.area(),
                )
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("Salary Distribution"));
    }

    #[test]
    fn many_bars_in_a_short_panel_render() {
        let counts: Vec<Count> = (0..300).map(|i| count(&format!("label {i}"), 300 - i)).collect();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    CountChart {
                        title: "Top Work Units",
                        counts: &counts,
                        horizontal: true,
                    },
                    f.area(),
                )
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("label 0"));
    }

    #[test]
    fn share_chart_shows_percentages() {
        let counts = vec![count("Full-Time", 3), count("Part-Time", 1)];
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    ShareChart {
                        title: "Full-Time/Part-Time",
                        counts: &counts,
                    },
                    f.area(),
                )
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
    }
}
