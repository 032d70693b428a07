//! Date filtering, ordering and rendering for `gist-sync list`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::ValueEnum;

use super::model::Gist;
use crate::error::GistError;

/// How selected gists are ordered.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Alphabetically by first filename, ignoring case.
    #[default]
    Name,
    /// Most recently updated first.
    Date,
}

/// Inclusive creation-date window in UTC. Missing bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, GistError> {
        Ok(Self {
            start: start.map(parse_date).transpose()?,
            end: end.map(parse_date).transpose()?,
        })
    }

    /// True when `at` falls between `start 00:00:00` and `end 23:59:59`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let after_start = self.start.map_or(true, |d| at >= day_at(d, 0, 0, 0));
        let before_end = self.end.map_or(true, |d| at <= day_at(d, 23, 59, 59));
        after_start && before_end
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, GistError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GistError::InvalidDate(s.to_string()))
}

fn day_at(date: NaiveDate, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, min, sec).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Gists created inside `range`, ordered by `sort`.
pub fn select<'a>(gists: &'a [Gist], range: &DateRange, sort: SortOrder) -> Vec<&'a Gist> {
    let mut selected: Vec<&Gist> = gists.iter().filter(|g| range.contains(g.created_at)).collect();
    match sort {
        SortOrder::Name => {
            selected.sort_by_cached_key(|g| g.first_filename().unwrap_or_default().to_lowercase())
        }
        SortOrder::Date => selected.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
    selected
}

/// How many selected gists contain each filename.
pub fn filename_counts<'a>(gists: &[&'a Gist]) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for gist in gists {
        for name in gist.files.keys() {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

/// One output line per gist: the URL, or the URL with filenames and update time.
///
/// Filenames shared by two or more of `gists` are wrapped in `**`.
pub fn render_lines(gists: &[&Gist], show_filenames: bool) -> Vec<String> {
    let counts = filename_counts(gists);
    gists
        .iter()
        .map(|gist| {
            if !show_filenames {
                return gist.html_url.clone();
            }
            let names: Vec<String> = gist
                .files
                .keys()
                .map(|name| match counts.get(name.as_str()) {
                    Some(&n) if n >= 2 => format!("**{}**", name),
                    _ => name.clone(),
                })
                .collect();
            format!(
                "{} → {} (Updated: {})",
                gist.html_url,
                names.join(", "),
                gist.updated_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect()
}
