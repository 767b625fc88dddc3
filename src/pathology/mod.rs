//! Cultural pathology classification
//!
//! Every diagnosticator is the same keyword scorer run over a different
//! [`PathologyTable`]. Tables are plain data: the built-in ones are embedded
//! TOML documents, and additional ones can be loaded from disk.
//!
//! Scoring for one table:
//! - lower-case the text once
//! - per entry, count keywords occurring as substrings
//! - confidence is `min(0.95, matches / keywords * 1.2)`
//! - the strictly best entry wins, earlier entries win ties
//! - below 0.2 the table's no-match sentinel is returned with confidence 0

pub mod builtin;
pub mod pathologist;

pub use pathologist::{CulturalPathologist, DiagnosisReport, DiagnosticatorInfo, DiagnosticatorResult};

use crate::error::{GnosisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on any confidence score
pub const CONFIDENCE_CAP: f64 = 0.95;

/// Multiplier applied to the keyword match ratio
pub const CONFIDENCE_SCALE: f64 = 1.2;

/// Below this the table reports no detection
pub const DETECTION_THRESHOLD: f64 = 0.2;

/// Above this a diagnosis is reported as critical
pub const CRITICAL_THRESHOLD: f64 = 0.7;

/// Confidence for `matches` hits out of `total` keywords
pub fn confidence(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = matches as f64 / total as f64;
    (ratio * CONFIDENCE_SCALE).min(CONFIDENCE_CAP)
}

/// Number of keywords contained in already lower-cased text
pub fn count_keyword_matches(text_lower: &str, keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|keyword| text_lower.contains(&keyword.to_lowercase()))
        .count()
}

/// Human-readable name of a diagnosticator group
pub fn group_name(group: u8) -> &'static str {
    match group {
        1 => "Philosophical Materialism",
        2 => "Cultural Diagnosis",
        3 => "Emotional Economy",
        _ => "Custom",
    }
}

/// One category in a pathology table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathologyEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

/// Sentinel returned when nothing in a table scores high enough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoMatch {
    pub label: String,
    pub description: String,
    pub recommendation: String,
}

impl Default for NoMatch {
    fn default() -> Self {
        Self {
            label: "no_pathology_detected".to_string(),
            description: "No pathology detected in description".to_string(),
            recommendation: "Consider analyzing with other diagnosticators".to_string(),
        }
    }
}

/// A diagnosticator: an author's categories plus how to report no match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathologyTable {
    /// Short stable identifier (`rosa`, `han`, ...)
    pub id: String,
    /// Display name, matched by author lookups
    pub name: String,
    pub group: u8,
    pub description: String,
    #[serde(default)]
    pub default_recommendation: Option<String>,
    #[serde(default)]
    pub no_match: NoMatch,
    pub entries: Vec<PathologyEntry>,
}

/// Outcome of running one table over a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub pathology: String,
    pub confidence: f64,
    pub description: String,
    pub symptoms: Vec<String>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_concepts: Vec<String>,
}

impl Diagnosis {
    /// Whether a category (rather than the sentinel) was selected
    pub fn is_detected(&self) -> bool {
        self.confidence > 0.0
    }

    pub fn is_critical(&self) -> bool {
        self.confidence > CRITICAL_THRESHOLD
    }
}

impl PathologyTable {
    /// Parse and validate a table from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: PathologyTable = toml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content).map_err(|e| {
            GnosisError::InvalidTable(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(GnosisError::InvalidTable("id must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(GnosisError::InvalidTable(format!(
                "table '{}' has an empty name",
                self.id
            )));
        }
        if self.entries.is_empty() {
            return Err(GnosisError::InvalidTable(format!(
                "table '{}' has no entries",
                self.id
            )));
        }
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(GnosisError::InvalidTable(format!(
                    "table '{}' has an entry without a name",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Entry names in table order
    pub fn pathologies(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// All keywords of all entries
    pub fn keywords(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().flat_map(|e| e.keywords.iter())
    }

    /// Cheap pre-filter: does any keyword of the table occur in the text
    pub fn can_diagnose(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();
        self.keywords()
            .any(|keyword| text_lower.contains(&keyword.to_lowercase()))
    }

    /// Best-matching entry and its confidence, before thresholding
    pub fn best_match(&self, text: &str) -> Option<(&PathologyEntry, f64)> {
        let text_lower = text.to_lowercase();
        let mut best: Option<(&PathologyEntry, f64)> = None;

        for entry in &self.entries {
            let matches = count_keyword_matches(&text_lower, &entry.keywords);
            let score = confidence(matches, entry.keywords.len());
            match best {
                Some((_, current)) if score <= current => {}
                _ => best = Some((entry, score)),
            }
        }

        best
    }

    /// Score the text against every entry and report the winner
    pub fn diagnose(&self, text: &str) -> Diagnosis {
        match self.best_match(text) {
            Some((entry, score)) if score >= DETECTION_THRESHOLD => Diagnosis {
                pathology: entry.name.clone(),
                confidence: score,
                description: entry.description.clone(),
                symptoms: entry.symptoms.clone(),
                recommendation: self.recommendation_for(entry),
                examples: entry.example.iter().cloned().collect(),
                related_concepts: entry.related_concepts.clone(),
            },
            _ => Diagnosis {
                pathology: self.no_match.label.clone(),
                confidence: 0.0,
                description: self.no_match.description.clone(),
                symptoms: Vec::new(),
                recommendation: self.no_match.recommendation.clone(),
                examples: Vec::new(),
                related_concepts: Vec::new(),
            },
        }
    }

    fn recommendation_for(&self, entry: &PathologyEntry) -> String {
        entry
            .recommendation
            .clone()
            .or_else(|| self.default_recommendation.clone())
            .unwrap_or_else(|| format!("Apply {} analysis", self.name))
    }
}
