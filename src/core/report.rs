//! Plain-text summary of the filtered dataset, printed by `--report`.

use std::fmt::{self, Write};

use super::aggregate::{self, Count, TOP_N};
use super::session::Session;

/// Render the headline numbers and top-N tables for the current filters.
pub fn render(session: &Session) -> String {
    let mut out = String::new();
    match write_report(&mut out, session) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

/// Write the report into any `fmt::Write` sink, stopping at the first error.
pub fn write_report(out: &mut impl Write, session: &Session) -> fmt::Result {
    let rows = session.filtered();
    let filters = session.filters();

    writeln!(out, "NYC Job Postings Dashboard")?;
    writeln!(
        out,
        "filters: {} .. {} | min salary {} | category {}",
        filters.date_range.start,
        filters.date_range.end,
        format_money(filters.min_salary),
        filters.category.label()
    )?;
    writeln!(
        out,
        "rows: {} of {} ({} skipped at load, {} undated)",
        rows.len(),
        session.dataset().len(),
        session.dataset().skipped,
        session.dataset().undated()
    )?;

    match aggregate::salary_stats(&rows) {
        Some(stats) => writeln!(
            out,
            "salary from: min {} | mean {} | max {}",
            format_money(stats.min),
            format_money(stats.mean),
            format_money(stats.max)
        )?,
        None => writeln!(out, "salary from: no rows")?,
    }

    section(out, "Top job categories", &aggregate::top_n(aggregate::category_counts(&rows), TOP_N))?;
    section(out, "Full-time / part-time", &aggregate::employment_split(&rows))?;
    section(out, "Career levels", &aggregate::career_level_counts(&rows))?;
    section(out, "Posting types", &aggregate::posting_type_counts(&rows))?;
    section(out, "Top work locations", &aggregate::work_location_counts(&rows, TOP_N))?;
    section(
        out,
        "Top agencies",
        &aggregate::top_n(aggregate::value_counts(&rows, |r| r.agency.as_deref()), TOP_N),
    )?;

    writeln!(out, "\nTop job categories by average salary")?;
    let means = aggregate::top_mean_by(&rows, |r| Some(r.job_category.as_str()), TOP_N);
    if means.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for m in means {
        writeln!(out, "  {:<50} {:>12}", m.label, format_money(m.mean))?;
    }

    writeln!(out, "\nPostings per year")?;
    let years = aggregate::postings_per_year(&rows);
    if years.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (year, n) in years {
        writeln!(out, "  {year:<50} {n:>12}")?;
    }
    Ok(())
}

fn section(out: &mut impl Write, title: &str, counts: &[Count]) -> fmt::Result {
    writeln!(out, "\n{title}")?;
    if counts.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for c in counts {
        writeln!(out, "  {:<50} {:>12}", c.label, c.count)?;
    }
    Ok(())
}

/// `52345.6` → `"$52,346"`.
pub fn format_money(value: f64) -> String {
    let whole = value.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::CategoryFilter;
    use crate::core::posting::{Dataset, JobPosting};
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case(0.0, "$0")]
    #[case(999.4, "$999")]
    #[case(1_000.0, "$1,000")]
    #[case(52_345.6, "$52,346")]
    #[case(1_234_567.0, "$1,234,567")]
    fn formats_money(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_money(value), expected);
    }

    #[test]
    fn empty_selection_reports_zero_rows() {
        let rows = vec![JobPosting {
            job_category: "Legal".into(),
            salary_range_from: 50_000.0,
            posting_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Default::default()
        }];
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut session = Session::new(Arc::new(Dataset::new(rows)), today);
        session.update_filters(|f, _| f.category = CategoryFilter::Specific("Nope".into()));

        let text = render(&session);
        assert!(text.contains("rows: 0 of 1"));
        assert!(text.contains("salary from: no rows"));
        assert!(text.contains("category Nope"));
    }

    /// Accepts a fixed number of writes, then refuses.
    struct Budget {
        text: String,
        writes_left: usize,
    }

    impl Write for Budget {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.writes_left == 0 {
                return Err(fmt::Error);
            }
            self.writes_left -= 1;
            self.text.push_str(s);
            Ok(())
        }
    }

    fn one_row_session() -> Session {
        let rows = vec![JobPosting {
            job_category: "Legal".into(),
            salary_range_from: 50_000.0,
            posting_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Default::default()
        }];
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Session::new(Arc::new(Dataset::new(rows)), today)
    }

    #[test]
    fn write_errors_stop_the_report() {
        let mut sink = Budget {
            text: String::new(),
            writes_left: 2,
        };
        assert!(write_report(&mut sink, &one_row_session()).is_err());
        assert!(sink.text.starts_with("NYC Job Postings Dashboard"));
        assert!(!sink.text.contains("rows:"));
    }

    #[test]
    fn report_lists_every_section() {
        let text = render(&one_row_session());
        for title in [
            "Top job categories",
            "Full-time / part-time",
            "Career levels",
            "Posting types",
            "Top work locations",
            "Top agencies",
            "Top job categories by average salary",
            "Postings per year",
        ] {
            assert!(text.contains(title), "{title}");
        }
        assert!(text.contains("rows: 1 of 1"));
        assert!(text.contains("  2020"));
    }
}
