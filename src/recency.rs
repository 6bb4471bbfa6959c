//! Freshness window over posting dates.
//!
//! The filter is strict: a missing, unparseable or future date drops the
//! record. Nothing here is an error.

use crate::consts::DATE_FORMATS;
use crate::record::Record;
use chrono::NaiveDate;
use std::fmt;

/// Allowed record age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Pass everything through untouched
    Disabled,
    /// Age in `0..=n` days; `Days(0)` is same-day only
    Days(u32),
}

impl Window {
    /// Negative values disable filtering
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            Window::Disabled
        } else {
            Window::Days(u32::try_from(days).unwrap_or(u32::MAX))
        }
    }

    pub fn admits(self, age_days: i64) -> bool {
        match self {
            Window::Disabled => true,
            Window::Days(max) => (0..=i64::from(max)).contains(&age_days),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Disabled => write!(f, "no date limit"),
            Window::Days(0) => write!(f, "today only"),
            Window::Days(1) => write!(f, "last 1 day"),
            Window::Days(n) => write!(f, "last {} days", n),
        }
    }
}

/// `YYYY-MM-DD`, then `DD Mon YYYY`
pub fn parse_posted_on(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Whole days between posting and `today`; negative for future dates
pub fn age_in_days(posted_on: &str, today: NaiveDate) -> Option<i64> {
    parse_posted_on(posted_on).map(|date| (today - date).num_days())
}

/// Keep records whose age lies inside the window, preserving order
pub fn filter_recent(records: Vec<Record>, window: Window, today: NaiveDate) -> Vec<Record> {
    if window == Window::Disabled {
        return records;
    }

    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| match age_in_days(&record.posted_on, today) {
            Some(age) if window.admits(age) => true,
            Some(age) => {
                log::debug!("Outside window ({} days old): {}", age, record);
                false
            }
            None => {
                log::debug!("Unusable date {:?}: {}", record.posted_on, record);
                false
            }
        })
        .collect();

    log::info!("Recency ({}, today {}): {} -> {}", window, today, before, kept.len());
    kept
}
