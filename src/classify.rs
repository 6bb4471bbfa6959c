//! Title classification against a keyword rule table.

use crate::consts;
use serde::Deserialize;

/// Keyword rules. Matching is case-insensitive substring search with no
/// ordering or proximity requirement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    pub category_terms: Vec<String>,
    pub role_terms: Vec<String>,
    pub exclusion_terms: Vec<String>,
    /// Each group passes when all of its terms appear
    pub compound_rules: Vec<Vec<String>>,
    pub organizations: Vec<String>,
    pub engineering_terms: Vec<String>,
}

/// Why a title was accepted or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    EmptyTitle,
    Excluded,
    Compound,
    Category,
    Organization,
    NoMatch,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Compound | Verdict::Category | Verdict::Organization)
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            category_terms: owned(consts::CATEGORY_TERMS),
            role_terms: owned(consts::ROLE_TERMS),
            exclusion_terms: owned(consts::EXCLUSION_TERMS),
            compound_rules: consts::COMPOUND_RULES.iter().map(|group| owned(group)).collect(),
            organizations: owned(consts::ORGANIZATIONS),
            engineering_terms: owned(consts::ENGINEERING_TERMS),
        }
    }
}

impl RuleTable {
    /// Parse a JSON rule table; absent keys keep the built-in lists
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let table: RuleTable = serde_json::from_str(json)?;
        Ok(table.normalized())
    }

    /// Lower-case every term and drop blanks. Surrounding whitespace is kept,
    /// `"hr "` relies on it.
    pub fn normalized(self) -> Self {
        fn clean(terms: Vec<String>) -> Vec<String> {
            terms
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.to_lowercase())
                .collect()
        }
        Self {
            category_terms: clean(self.category_terms),
            role_terms: clean(self.role_terms),
            exclusion_terms: clean(self.exclusion_terms),
            compound_rules: self
                .compound_rules
                .into_iter()
                .map(clean)
                .filter(|group| !group.is_empty())
                .collect(),
            organizations: clean(self.organizations),
            engineering_terms: clean(self.engineering_terms),
        }
    }

    pub fn verdict(&self, title: &str) -> Verdict {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return Verdict::EmptyTitle;
        }
        let any = |terms: &[String]| terms.iter().any(|t| title.contains(t.as_str()));

        if any(&self.exclusion_terms) {
            return Verdict::Excluded;
        }
        if self
            .compound_rules
            .iter()
            .any(|group| group.iter().all(|t| title.contains(t.as_str())))
        {
            return Verdict::Compound;
        }

        let has_role = any(&self.role_terms);
        if has_role && any(&self.category_terms) {
            Verdict::Category
        } else if has_role && any(&self.organizations) && any(&self.engineering_terms) {
            Verdict::Organization
        } else {
            Verdict::NoMatch
        }
    }

    #[inline]
    pub fn classify(&self, title: &str) -> bool {
        self.verdict(title).is_accepted()
    }
}
