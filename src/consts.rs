//! Static keyword tables, store schema and delivery limits.
//! All strings are &'static str; the classifier copies them into an owned
//! `RuleTable` only when no rule file overrides them.

/// Terms that place a title in the IT engineering category
pub static CATEGORY_TERMS: &[&str] = &[
    "software",
    "developer",
    "engineering",
    "computer science",
    "web",
    "mobile",
    "fullstack",
    "backend",
    "frontend",
    "cloud",
];

/// Terms that mark the position as an internship or work-study contract
pub static ROLE_TERMS: &[&str] = &["intern", "internship", "alternance", "stage", "trainee"];

/// Any of these rejects the title outright
pub static EXCLUSION_TERMS: &[&str] = &[
    "non-tech",
    "non tech",
    "accounting",
    "finance",
    "sales",
    "marketing",
    "recruiter",
    "hr ",
    "human resources",
    "administrative",
    "business development",
];

/// High-signal phrases: every term of a group must appear
pub static COMPOUND_RULES: &[&[&str]] = &[
    &["data scientist"],
    &["data science"],
    &["software", "engineer"],
    &["software", "developer"],
];

/// Employers whose generic engineering titles count as IT
pub static ORGANIZATIONS: &[&str] = &[
    "google",
    "microsoft",
    "amazon",
    "apple",
    "meta",
    "spacex",
    "ibm",
    "oracle",
    "sap",
    "accenture",
    "cisco",
];

pub static ENGINEERING_TERMS: &[&str] = &["engineer"];

/// Flat store layout
pub mod store {
    pub const DELIMITER: char = '|';
    /// Canonical column order, also the positional schema for headerless files
    pub const FIELDS: [&str; 5] = ["organization", "title", "location", "identity_key", "posted_on"];
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
    pub const DEFAULT_RAW_STORE: &str = "output/it_results.csv";
    pub const DEFAULT_FILTERED_STORE: &str = "output/it_internships.csv";
}

/// Accepted `posted_on` layouts, tried in order
pub static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y"];

/// Placeholders shown in the digest when a field is empty
pub mod placeholders {
    pub const ORGANIZATION: &str = "Unknown Company";
    pub const TITLE: &str = "Unknown Position";
    pub const LOCATION: &str = "Unknown Location";
    pub const LINK: &str = "#";
    pub const DATE: &str = "Unknown Date";
}

/// Limits and thresholds
pub mod limits {
    pub const DEFAULT_WINDOW_DAYS: i64 = 3;
    pub const DEFAULT_MAX_ENTRIES: usize = 20;
    /// Texts longer than this skip the single-shot attempt
    pub const PREEMPTIVE_SPLIT_CHARS: usize = 4000;
    pub const CHUNK_CHARS: usize = 3900;
    pub const CHUNK_DELAY_MS: u64 = 1000;
    pub const CHUNK_RETRIES: u32 = 1;
    pub const RETRY_DELAY_MS: u64 = 500;
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;
}
