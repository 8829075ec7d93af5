//! Row model for the job-postings dataset.
//!
//! A [`JobPosting`] carries the three attributes the filter pipeline reads
//! (`posting_date`, `salary_range_from`, `job_category`) plus an opaque
//! payload the chart renderers aggregate over.  Derived values (year, month,
//! short location, employment label) are pure functions on the row and are
//! never stored back into it.

use chrono::{Datelike, NaiveDate};

// ───────────────────────────────────────── row ───────────────

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobPosting {
    pub job_id: Option<String>,
    pub agency: Option<String>,
    /// `Internal` / `External`.
    pub posting_type: Option<String>,
    pub business_title: Option<String>,
    pub job_category: String,
    /// Raw `F` / `P` indicator.
    pub full_time_part_time: Option<String>,
    pub career_level: Option<String>,
    pub salary_range_from: f64,
    pub salary_range_to: Option<f64>,
    pub work_location: Option<String>,
    pub division_work_unit: Option<String>,
    pub job_description: Option<String>,
    /// `None` when the source value could not be parsed as a date.
    pub posting_date: Option<NaiveDate>,
}

impl JobPosting {
    /// Calendar year of the posting date.
    pub fn year(&self) -> Option<i32> {
        self.posting_date.map(|d| d.year())
    }

    /// `(year, month)` bucket of the posting date.
    pub fn month(&self) -> Option<(i32, u32)> {
        self.posting_date.map(|d| (d.year(), d.month()))
    }

    /// Human label for the full-time/part-time indicator.
    ///
    /// `F` and `P` are expanded; any other value passes through verbatim.
    pub fn employment_type(&self) -> Option<&str> {
        match self.full_time_part_time.as_deref()? {
            "F" => Some("Full-Time"),
            "P" => Some("Part-Time"),
            other => Some(other),
        }
    }

    /// First comma-separated segment of the work location, or `"Unknown"`.
    pub fn short_work_location(&self) -> &str {
        match self.work_location.as_deref() {
            Some(loc) => loc.split(',').next().unwrap_or(loc),
            None => "Unknown",
        }
    }
}

// ───────────────────────────────────────── dataset ───────────

/// The raw dataset as handed over by the loader.  Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<JobPosting>,
    /// Rows the loader dropped because their salary could not be coerced.
    pub skipped: usize,
}

impl Dataset {
    pub fn new(rows: Vec<JobPosting>) -> Self {
        Self { rows, skipped: 0 }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows whose posting date was unparseable.
    pub fn undated(&self) -> usize {
        self.rows.iter().filter(|r| r.posting_date.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn posting() -> JobPosting {
        JobPosting {
            job_category: "Engineering".into(),
            salary_range_from: 50_000.0,
            posting_date: NaiveDate::from_ymd_opt(2021, 3, 14),
            ..Default::default()
        }
    }

    #[test]
    fn derives_year_and_month_from_posting_date() {
        let p = posting();
        assert_eq!(p.year(), Some(2021));
        assert_eq!(p.month(), Some((2021, 3)));
    }

    #[test]
    fn undated_row_has_no_time_buckets() {
        let p = JobPosting {
            posting_date: None,
            ..posting()
        };
        assert_eq!(p.year(), None);
        assert_eq!(p.month(), None);
    }

    #[rstest]
    #[case(Some("F"), Some("Full-Time"))]
    #[case(Some("P"), Some("Part-Time"))]
    #[case(Some("X"), Some("X"))]
    #[case(None, None)]
    fn expands_employment_indicator(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let p = JobPosting {
            full_time_part_time: raw.map(str::to_string),
            ..posting()
        };
        assert_eq!(p.employment_type(), expected);
    }

    #[rstest]
    #[case(Some("255 Greenwich St, New York Ny"), "255 Greenwich St")]
    #[case(Some("Brooklyn"), "Brooklyn")]
    #[case(None, "Unknown")]
    fn truncates_work_location(#[case] raw: Option<&str>, #[case] expected: &str) {
        let p = JobPosting {
            work_location: raw.map(str::to_string),
            ..posting()
        };
        assert_eq!(p.short_work_location(), expected);
    }
}
