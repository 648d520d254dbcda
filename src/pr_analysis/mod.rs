//! Merged pull request activity per collaborator and ISO week.
//!
//! Records come either from a repository walk ([`collect::collect_merged_prs`])
//! or from captured `git log --merges --pretty=format:%H|%an|%ae|%ad|%s
//! --date=iso` output ([`parse_log`]).

pub mod collect;
pub mod report;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;

pub use collect::collect_merged_prs;
pub use report::render_report;

const LOG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

static PR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("valid PR number pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct PrRecord {
    pub pr_number: String,
    pub author_name: String,
    pub author_email: String,
    /// Author wall-clock time as recorded in the commit.
    pub date: NaiveDateTime,
    pub week: String,
    pub commit_msg: String,
}

impl PrRecord {
    /// Builds a record from merge commit fields; `None` when the subject
    /// names no PR.
    pub fn from_commit(
        author_name: &str,
        author_email: &str,
        date: DateTime<FixedOffset>,
        subject: &str,
    ) -> Option<Self> {
        let pr_number = PR_NUMBER.captures(subject)?.get(1)?.as_str().to_string();
        let date = date.naive_local();

        Some(Self {
            pr_number,
            author_name: author_name.to_string(),
            author_email: author_email.to_string(),
            week: week_key(date.date()),
            date,
            commit_msg: subject.to_string(),
        })
    }
}

/// ISO week key such as `2024-W11`.
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Parses one `hash|name|email|date|subject` log line.
pub fn parse_log_line(line: &str) -> Option<PrRecord> {
    let parts: Vec<&str> = line.splitn(5, '|').collect();
    if parts.len() < 5 {
        return None;
    }

    let date = DateTime::parse_from_str(parts[3].trim(), LOG_DATE_FORMAT).ok()?;
    PrRecord::from_commit(parts[1], parts[2], date, parts[4])
}

/// Parses captured log output, skipping blank and non-PR lines.
pub fn parse_log(text: &str) -> Vec<PrRecord> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_log_line)
        .collect()
}

/// PR numbers grouped by week, then by collaborator in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrAggregate {
    pub weeks: BTreeMap<String, Vec<(String, Vec<String>)>>,
    pub totals: Vec<(String, usize)>,
}

impl PrAggregate {
    pub fn total_prs(&self) -> usize {
        self.totals.iter().map(|(_, count)| count).sum()
    }
}

pub fn aggregate(records: impl IntoIterator<Item = PrRecord>) -> PrAggregate {
    let mut agg = PrAggregate::default();

    for record in records {
        let week = agg.weeks.entry(record.week).or_default();
        match week.iter_mut().find(|(name, _)| *name == record.author_name) {
            Some((_, prs)) => prs.push(record.pr_number),
            None => week.push((record.author_name.clone(), vec![record.pr_number])),
        }

        match agg
            .totals
            .iter_mut()
            .find(|(name, _)| *name == record.author_name)
        {
            Some((_, count)) => *count += 1,
            None => agg.totals.push((record.author_name, 1)),
        }
    }

    agg
}

#[cfg(test)]
pub(crate) const SAMPLE_LOG: &str = "\
a1|Alice|alice@example.com|2024-03-15 10:00:00 +0100|Merge pull request #12 from alice/feature
b2|Bob|bob@example.com|2024-03-14 09:00:00 +0100|Merge pull request #11 from bob/fix

c3|Bob|bob@example.com|2024-03-13 09:00:00 +0100|Merge pull request #9 from bob/docs
d4|Alice|alice@example.com|2024-03-05 12:00:00 +0100|Merge pull request #3 from alice/init
e5|Carol|carol@example.com|2024-03-04 12:00:00 +0100|Merge branch 'main' into release
";
