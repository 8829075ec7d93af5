//! CSV loader — coerce the raw export into a [`Dataset`].
//!
//! Columns are looked up by header name so the export may carry extra or
//! reordered columns.  Only `Posting Date`, `Salary Range From` and
//! `Job Category` are required.  Unparseable dates become `None`; a row whose
//! starting salary cannot be coerced is skipped and counted.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use thiserror::Error;

use super::posting::{Dataset, JobPosting};

pub const COL_JOB_ID: &str = "Job ID";
pub const COL_AGENCY: &str = "Agency";
pub const COL_POSTING_TYPE: &str = "Posting Type";
pub const COL_BUSINESS_TITLE: &str = "Business Title";
pub const COL_JOB_CATEGORY: &str = "Job Category";
pub const COL_FT_PT: &str = "Full-Time/Part-Time indicator";
pub const COL_CAREER_LEVEL: &str = "Career Level";
pub const COL_SALARY_FROM: &str = "Salary Range From";
pub const COL_SALARY_TO: &str = "Salary Range To";
pub const COL_WORK_LOCATION: &str = "Work Location";
pub const COL_WORK_UNIT: &str = "Division/Work Unit";
pub const COL_DESCRIPTION: &str = "Job Description";
pub const COL_POSTING_DATE: &str = "Posting Date";

/// Date-only formats tried before the date-time ones.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column `{0}` is missing from the header row")]
    MissingColumn(&'static str),
}

/// Resolved column positions for one header row.
struct Columns {
    job_id: Option<usize>,
    agency: Option<usize>,
    posting_type: Option<usize>,
    business_title: Option<usize>,
    job_category: usize,
    ft_pt: Option<usize>,
    career_level: Option<usize>,
    salary_from: usize,
    salary_to: Option<usize>,
    work_location: Option<usize>,
    work_unit: Option<usize>,
    description: Option<usize>,
    posting_date: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        Ok(Self {
            job_id: find(COL_JOB_ID),
            agency: find(COL_AGENCY),
            posting_type: find(COL_POSTING_TYPE),
            business_title: find(COL_BUSINESS_TITLE),
            job_category: require(COL_JOB_CATEGORY)?,
            ft_pt: find(COL_FT_PT),
            career_level: find(COL_CAREER_LEVEL),
            salary_from: require(COL_SALARY_FROM)?,
            salary_to: find(COL_SALARY_TO),
            work_location: find(COL_WORK_LOCATION),
            work_unit: find(COL_WORK_UNIT),
            description: find(COL_DESCRIPTION),
            posting_date: require(COL_POSTING_DATE)?,
        })
    }

    /// Build a posting from one record, or `None` if the salary is unusable.
    fn parse_row(&self, row: &StringRecord) -> Option<JobPosting> {
        let text = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let salary_range_from = row.get(self.salary_from).and_then(parse_salary)?;

        Some(JobPosting {
            job_id: text(self.job_id),
            agency: text(self.agency),
            posting_type: text(self.posting_type),
            business_title: text(self.business_title),
            job_category: text(Some(self.job_category)).unwrap_or_default(),
            full_time_part_time: text(self.ft_pt),
            career_level: text(self.career_level),
            salary_range_from,
            salary_range_to: self.salary_to.and_then(|i| row.get(i)).and_then(parse_salary),
            work_location: text(self.work_location),
            division_work_unit: text(self.work_unit),
            job_description: text(self.description),
            posting_date: row.get(self.posting_date).and_then(parse_date),
        })
    }
}

/// Load a dataset from a CSV file on disk.
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    read_dataset(reader)
}

/// Load a dataset from any CSV byte source (header row first).
pub fn load_reader<R: Read>(source: R) -> Result<Dataset, LoadError> {
    let reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    read_dataset(reader)
}

fn read_dataset<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, LoadError> {
    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        match columns.parse_row(&record) {
            Some(posting) => rows.push(posting),
            None => {
                skipped += 1;
                tracing::warn!(row = idx + 1, "skipping row with unusable `{COL_SALARY_FROM}`");
            }
        }
    }

    let dataset = Dataset { rows, skipped };
    tracing::info!(
        rows = dataset.len(),
        skipped = dataset.skipped,
        undated = dataset.undated(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse a posting date, keeping only the calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a salary cell, tolerating `$` and thousands separators.
/// Negative or non-finite values are rejected.
pub fn parse_salary(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const HEADER: &str = "Job ID,Posting Type,Job Category,Full-Time/Part-Time indicator,\
Salary Range From,Work Location,Job Description,Posting Date";

    #[rstest]
    #[case("2019-12-20", NaiveDate::from_ymd_opt(2019, 12, 20))]
    #[case("2019-12-20T00:00:00.000", NaiveDate::from_ymd_opt(2019, 12, 20))]
    #[case("2019-12-20 13:45:00", NaiveDate::from_ymd_opt(2019, 12, 20))]
    #[case("12/20/2019", NaiveDate::from_ymd_opt(2019, 12, 20))]
    #[case("not a date", None)]
    #[case("", None)]
    #[case("2019-13-40", None)]
    fn coerces_posting_dates(#[case] raw: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_date(raw), expected);
    }

    #[rstest]
    #[case("52000", Some(52_000.0))]
    #[case("$52,000.50", Some(52_000.5))]
    #[case("-1", None)]
    #[case("n/a", None)]
    #[case("", None)]
    fn coerces_salaries(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_salary(raw), expected);
    }

    #[test]
    fn loads_rows_in_file_order() {
        let csv = format!(
            "{HEADER}\n\
             1,Internal,Engineering,F,60000,\"1 Centre St, NY\",Build things,2020-01-02\n\
             2,External,Legal,P,45000,,,garbage\n"
        );
        let dataset = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped, 0);

        let first = &dataset.rows[0];
        assert_eq!(first.job_id.as_deref(), Some("1"));
        assert_eq!(first.job_category, "Engineering");
        assert_eq!(first.short_work_location(), "1 Centre St");
        assert_eq!(first.posting_date, NaiveDate::from_ymd_opt(2020, 1, 2));

        let second = &dataset.rows[1];
        assert_eq!(second.posting_date, None);
        assert_eq!(second.work_location, None);
        assert_eq!(second.job_description, None);
        assert_eq!(dataset.undated(), 1);
    }

    #[test]
    fn skips_rows_with_unusable_salary() {
        let csv = format!(
            "{HEADER}\n\
             1,Internal,Engineering,F,abc,,,2020-01-02\n\
             2,Internal,Engineering,F,70000,,,2020-01-03\n"
        );
        let dataset = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped, 1);
        assert_eq!(dataset.rows[0].salary_range_from, 70_000.0);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "Job ID,Job Category,Posting Date\n1,Legal,2020-01-01\n";
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(COL_SALARY_FROM)));
    }

    #[test]
    fn header_only_file_yields_empty_dataset() {
        let dataset = load_reader(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "9,External,Health,F,80000,Queens,Care,2022-06-01").unwrap();
        let dataset = load_path(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows[0].job_category, "Health");
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let err = load_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}
