//! Aggregations the dashboard pages draw from.
//!
//! Every function takes the filtered rows and degrades to an empty result on
//! empty input.  Rows missing the field an aggregation needs are skipped for
//! that aggregation only.

use std::collections::{BTreeMap, HashMap};

use super::posting::JobPosting;

/// Number of entries shown by the "top 10" charts.
pub const TOP_N: usize = 10;

/// Upper limit on the number of histogram bins.
pub const MAX_BINS: usize = 200;

/// A labelled count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    pub label: String,
    pub count: usize,
}

/// A labelled mean starting salary.
#[derive(Debug, Clone, PartialEq)]
pub struct Mean {
    pub label: String,
    pub mean: f64,
}

/// One fixed-width histogram bin covering `[lower, upper)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

// ───────────────────────────────────────── counts ────────────

/// Count rows per label, most frequent first.  Ties keep the order in which
/// labels first appear.
pub fn value_counts<F>(rows: &[&JobPosting], key: F) -> Vec<Count>
where
    F: Fn(&JobPosting) -> Option<&str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<Count> = Vec::new();

    for &row in rows {
        let Some(label) = key(row) else {
            continue;
        };
        match index.get(label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(Count {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: equal counts stay in first-appearance order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn top_n(mut counts: Vec<Count>, n: usize) -> Vec<Count> {
    counts.truncate(n);
    counts
}

pub fn category_counts(rows: &[&JobPosting]) -> Vec<Count> {
    value_counts(rows, |r| Some(r.job_category.as_str()))
}

pub fn career_level_counts(rows: &[&JobPosting]) -> Vec<Count> {
    value_counts(rows, |r| r.career_level.as_deref())
}

pub fn posting_type_counts(rows: &[&JobPosting]) -> Vec<Count> {
    value_counts(rows, |r| r.posting_type.as_deref())
}

pub fn work_unit_counts(rows: &[&JobPosting]) -> Vec<Count> {
    value_counts(rows, |r| r.division_work_unit.as_deref())
}

/// Full-time / part-time split with the indicator expanded.
pub fn employment_split(rows: &[&JobPosting]) -> Vec<Count> {
    value_counts(rows, JobPosting::employment_type)
}

/// Top work locations, truncated to their first comma segment.
pub fn work_location_counts(rows: &[&JobPosting], n: usize) -> Vec<Count> {
    top_n(value_counts(rows, |r| Some(r.short_work_location())), n)
}

// ───────────────────────────────────────── salaries ──────────

pub fn salary_stats(rows: &[&JobPosting]) -> Option<SalaryStats> {
    let first = rows.first()?.salary_range_from;
    let mut stats = SalaryStats {
        count: 0,
        min: first,
        max: first,
        mean: 0.0,
    };
    let mut sum = 0.0;
    for row in rows {
        let s = row.salary_range_from;
        stats.count += 1;
        stats.min = stats.min.min(s);
        stats.max = stats.max.max(s);
        sum += s;
    }
    stats.mean = sum / stats.count as f64;
    Some(stats)
}

/// Mean starting salary per label, sorted by label.
pub fn mean_by<F>(rows: &[&JobPosting], key: F) -> Vec<Mean>
where
    F: Fn(&JobPosting) -> Option<&str>,
{
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &row in rows {
        if let Some(label) = key(row) {
            let entry = acc.entry(label).or_insert((0.0, 0));
            entry.0 += row.salary_range_from;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(label, (sum, n))| Mean {
            label: label.to_string(),
            mean: sum / n as f64,
        })
        .collect()
}

/// The `n` labels with the highest mean starting salary, highest first.
pub fn top_mean_by<F>(rows: &[&JobPosting], key: F, n: usize) -> Vec<Mean>
where
    F: Fn(&JobPosting) -> Option<&str>,
{
    let mut means = mean_by(rows, key);
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    means.truncate(n);
    means
}

/// Fixed-width histogram of starting salaries.  Bins start at the multiple of
/// `bin_size` at or below the lowest salary.  When the salary extent would
/// need more than [`MAX_BINS`] bins, the width grows to a multiple of
/// `bin_size` that fits.
pub fn salary_histogram(rows: &[&JobPosting], bin_size: f64) -> Vec<Bin> {
    if !(bin_size.is_finite() && bin_size > 0.0) {
        return Vec::new();
    }
    let Some(stats) = salary_stats(rows) else {
        return Vec::new();
    };

    let span = stats.max - (stats.min / bin_size).floor() * bin_size;
    let per_bin = (span / (bin_size * MAX_BINS as f64)).ceil().max(1.0);
    let bin_size = bin_size * per_bin;

    let origin = (stats.min / bin_size).floor() * bin_size;
    let bin_count = (((stats.max - origin) / bin_size).floor() as usize)
        .saturating_add(1)
        .min(MAX_BINS);
    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| {
            let lower = origin + i as f64 * bin_size;
            Bin {
                lower,
                upper: lower + bin_size,
                count: 0,
            }
        })
        .collect();

    for row in rows {
        let idx = ((row.salary_range_from - origin) / bin_size).floor() as usize;
        bins[idx.min(bin_count - 1)].count += 1;
    }
    bins
}

// ───────────────────────────────────────── time series ───────

/// Postings per calendar year, ascending.  Undated rows are skipped.
pub fn postings_per_year(rows: &[&JobPosting]) -> Vec<(i32, usize)> {
    let mut acc: BTreeMap<i32, usize> = BTreeMap::new();
    for year in rows.iter().filter_map(|r| r.year()) {
        *acc.entry(year).or_default() += 1;
    }
    acc.into_iter().collect()
}

/// Postings per `(year, month)`, ascending.
pub fn postings_per_month(rows: &[&JobPosting]) -> Vec<((i32, u32), usize)> {
    let mut acc: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for month in rows.iter().filter_map(|r| r.month()) {
        *acc.entry(month).or_default() += 1;
    }
    acc.into_iter().collect()
}

// ───────────────────────────────────────── word cloud ────────

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else",
    "ever", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves",
    "out", "over", "own", "same", "shall", "she", "should", "since", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "therefore", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Most frequent alphabetic words of the descriptions, lower-cased, minus
/// stop words.  Digits split words.  Rows without a description are skipped.
pub fn word_frequencies(rows: &[&JobPosting], n: usize) -> Vec<Count> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<Count> = Vec::new();

    for text in rows.iter().filter_map(|r| r.job_description.as_deref()) {
        for raw in text.split(|c: char| !(c.is_alphabetic() || c == '\'')) {
            let word = raw.trim_matches('\'').to_lowercase();
            let word = word.strip_suffix("'s").unwrap_or(&word);
            if word.chars().count() < 2 || STOP_WORDS.contains(&word) {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push(Count {
                        label: word.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}
