//! One internship listing as it travels through the pipeline.

use std::fmt;

/// Listing record. Empty strings stand for absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub organization: String,
    pub title: String,
    pub location: String,
    /// Source URL, the dedup key
    pub identity_key: String,
    /// `YYYY-MM-DD` or `DD Mon YYYY`
    pub posted_on: String,
}

impl Record {
    pub fn new(title: impl Into<String>, identity_key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identity_key: identity_key.into(),
            ..Self::default()
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_posted_on(mut self, posted_on: impl Into<String>) -> Self {
        self.posted_on = posted_on.into();
        self
    }

    /// Fill `posted_on` when the source left it blank. Content is never touched.
    pub fn inject_default_date(&mut self, today: &str) {
        if self.posted_on.trim().is_empty() {
            self.posted_on = today.to_string();
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.organization, self.title, self.location, self.posted_on, self.identity_key
        )
    }
}
