//! Orchestrator over the registry of diagnosticators

use super::{builtin, group_name, Diagnosis, PathologyTable};
use crate::config::PathologyConfig;
use crate::error::{GnosisError, Result};
use crate::utils::string::preview;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// One diagnosticator's contribution to a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticatorResult {
    pub diagnosticator: String,
    pub group: u8,
    pub diagnosis: Diagnosis,
}

/// Aggregate of several diagnosticators over one text
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub timestamp: DateTime<Utc>,
    pub total_diagnosticators: usize,
    pub diagnoses: Vec<DiagnosticatorResult>,
    pub critical_pathologies: Vec<DiagnosticatorResult>,
    pub summary: String,
}

/// Catalog entry describing a registered diagnosticator
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticatorInfo {
    pub id: String,
    pub name: String,
    pub group: u8,
    pub group_name: &'static str,
    pub description: String,
    pub pathologies: Vec<String>,
}

/// Fixed single-table analyses exposed as named modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialization {
    Temporality,
    Psychopolitical,
    Technofeudalism,
    EmotionalEconomy,
}

impl Specialization {
    pub const ALL: [Specialization; 4] = [
        Specialization::Temporality,
        Specialization::Psychopolitical,
        Specialization::Technofeudalism,
        Specialization::EmotionalEconomy,
    ];

    pub fn mode(&self) -> &'static str {
        match self {
            Specialization::Temporality => "analyze_temporality",
            Specialization::Psychopolitical => "psychopolitical_scan",
            Specialization::Technofeudalism => "detect_technofeudalism",
            Specialization::EmotionalEconomy => "emotional_economy",
        }
    }

    /// Table the specialization is pinned to
    pub fn table_id(&self) -> &'static str {
        match self {
            Specialization::Temporality => builtin::ROSA,
            Specialization::Psychopolitical => builtin::HAN,
            Specialization::Technofeudalism => builtin::SADIN,
            Specialization::EmotionalEconomy => builtin::ILLOUZ,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Specialization::Temporality => "Temporal Analysis",
            Specialization::Psychopolitical => "Psychopolitical Scan",
            Specialization::Technofeudalism => "Technofeudalism Detection",
            Specialization::EmotionalEconomy => "Emotional Economy Analysis",
        }
    }
}

/// Classification mode selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Full,
    Layer,
    Author,
    Special(Specialization),
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Full => "full_diagnosis",
            AnalysisMode::Layer => "layer_diagnosis",
            AnalysisMode::Author => "author_diagnosis",
            AnalysisMode::Special(s) => s.mode(),
        }
    }

    pub fn names() -> Vec<&'static str> {
        let mut names = vec!["full_diagnosis", "layer_diagnosis", "author_diagnosis"];
        names.extend(Specialization::ALL.iter().map(Specialization::mode));
        names
    }
}

impl FromStr for AnalysisMode {
    type Err = GnosisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full_diagnosis" => Ok(AnalysisMode::Full),
            "layer_diagnosis" => Ok(AnalysisMode::Layer),
            "author_diagnosis" => Ok(AnalysisMode::Author),
            other => Specialization::ALL
                .iter()
                .find(|special| special.mode() == other)
                .map(|special| AnalysisMode::Special(*special))
                .ok_or_else(|| GnosisError::UnknownMode(other.to_string())),
        }
    }
}

/// Result of a single-diagnosticator specialization
#[derive(Debug, Clone, Serialize)]
pub struct SpecializedDiagnosis {
    pub diagnosticator: String,
    pub specialization: &'static str,
    pub diagnosis: Diagnosis,
}

/// Runs registered diagnosticators and aggregates their findings
///
/// The registry is ordered; registration order is also report order.
#[derive(Debug, Clone)]
pub struct CulturalPathologist {
    tables: Vec<PathologyTable>,
}

impl Default for CulturalPathologist {
    fn default() -> Self {
        Self::new()
    }
}

impl CulturalPathologist {
    /// Registry with every built-in table
    pub fn new() -> Self {
        Self::with_tables(builtin::tables().to_vec())
    }

    pub fn with_tables(tables: Vec<PathologyTable>) -> Self {
        Self { tables }
    }

    /// Build the registry described by configuration
    ///
    /// Disabled entries match a table id or display name. Extra tables are
    /// appended after the built-ins in the order given.
    pub fn from_config(config: &PathologyConfig) -> Result<Self> {
        let mut pathologist = Self::new();

        for disabled in &config.disabled {
            if !pathologist.remove(disabled) {
                warn!("Disabled diagnosticator '{}' is not registered", disabled);
            }
        }

        for path in &config.extra_tables {
            let table = PathologyTable::from_file(path)?;
            info!("Loaded pathology table '{}' from {}", table.id, path.display());
            pathologist.add(table)?;
        }

        Ok(pathologist)
    }

    /// Register a diagnosticator; ids must be unique
    pub fn add(&mut self, table: PathologyTable) -> Result<()> {
        table.validate()?;
        if self.tables.iter().any(|t| t.id == table.id) {
            return Err(GnosisError::InvalidTable(format!(
                "diagnosticator '{}' is already registered",
                table.id
            )));
        }
        debug!("Registered diagnosticator {} ({})", table.name, table.id);
        self.tables.push(table);
        Ok(())
    }

    /// Unregister by exact id or display name, returns whether anything was removed
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.tables.len();
        self.tables.retain(|t| t.id != name && t.name != name);
        self.tables.len() < before
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> &[PathologyTable] {
        &self.tables
    }

    pub fn get(&self, id: &str) -> Option<&PathologyTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Catalog of registered diagnosticators
    pub fn diagnosticators(&self) -> Vec<DiagnosticatorInfo> {
        self.tables
            .iter()
            .map(|t| DiagnosticatorInfo {
                id: t.id.clone(),
                name: t.name.clone(),
                group: t.group,
                group_name: group_name(t.group),
                description: t.description.clone(),
                pathologies: t.pathologies().into_iter().map(String::from).collect(),
            })
            .collect()
    }

    /// Distinct groups in ascending order
    pub fn groups(&self) -> Vec<u8> {
        self.tables
            .iter()
            .map(|t| t.group)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every diagnosticator whose keywords occur in the text
    pub fn run_all(&self, text: &str) -> DiagnosisReport {
        debug!("Full diagnosis of: {}", preview(text, 60));
        let results = self.run_filtered(text, |_| true);
        build_report(results)
    }

    /// Diagnosticators of one group whose keywords occur in the text
    ///
    /// Fails when no diagnosticator belongs to the group, so that an unknown
    /// group is distinguishable from a group that found nothing.
    pub fn run_by_group(&self, group: u8, text: &str) -> Result<Vec<DiagnosticatorResult>> {
        if !self.tables.iter().any(|t| t.group == group) {
            return Err(GnosisError::DiagnosticatorNotFound(format!(
                "no diagnosticators in group {} (available: {:?})",
                group,
                self.groups()
            )));
        }
        Ok(self.run_filtered(text, |t| t.group == group))
    }

    /// First diagnosticator whose name contains `name`, ignoring case
    pub fn find_by_name(&self, name: &str) -> Result<&PathologyTable> {
        let needle = name.to_lowercase();
        self.tables
            .iter()
            .find(|t| !needle.is_empty() && t.name.to_lowercase().contains(&needle))
            .ok_or_else(|| {
                GnosisError::DiagnosticatorNotFound(format!(
                    "author '{}' (available: {})",
                    name,
                    self.names().join(", ")
                ))
            })
    }

    pub fn run_by_name(&self, name: &str, text: &str) -> Result<Diagnosis> {
        Ok(self.find_by_name(name)?.diagnose(text))
    }

    /// Like [`run_by_name`](Self::run_by_name), keeping the matched table's name and group
    pub fn run_author(&self, name: &str, text: &str) -> Result<DiagnosticatorResult> {
        let table = self.find_by_name(name)?;
        Ok(DiagnosticatorResult {
            diagnosticator: table.name.clone(),
            group: table.group,
            diagnosis: table.diagnose(text),
        })
    }

    /// Diagnose with the table registered under `id`
    pub fn run_by_id(&self, id: &str, text: &str) -> Result<Diagnosis> {
        self.get(id)
            .map(|t| t.diagnose(text))
            .ok_or_else(|| GnosisError::DiagnosticatorNotFound(id.to_string()))
    }

    /// Run a pinned single-table analysis
    pub fn specialized(&self, special: Specialization, text: &str) -> Result<SpecializedDiagnosis> {
        let table = self
            .get(special.table_id())
            .ok_or_else(|| GnosisError::DiagnosticatorNotFound(special.table_id().to_string()))?;
        Ok(SpecializedDiagnosis {
            diagnosticator: table.name.clone(),
            specialization: special.label(),
            diagnosis: table.diagnose(text),
        })
    }

    pub fn analyze_temporality(&self, text: &str) -> Result<SpecializedDiagnosis> {
        self.specialized(Specialization::Temporality, text)
    }

    pub fn psychopolitical_scan(&self, text: &str) -> Result<SpecializedDiagnosis> {
        self.specialized(Specialization::Psychopolitical, text)
    }

    pub fn detect_technofeudalism(&self, text: &str) -> Result<SpecializedDiagnosis> {
        self.specialized(Specialization::Technofeudalism, text)
    }

    pub fn emotional_economy(&self, text: &str) -> Result<SpecializedDiagnosis> {
        self.specialized(Specialization::EmotionalEconomy, text)
    }

    fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    fn run_filtered<F>(&self, text: &str, keep: F) -> Vec<DiagnosticatorResult>
    where
        F: Fn(&PathologyTable) -> bool,
    {
        self.tables
            .iter()
            .filter(|t| keep(t))
            .filter(|t| t.can_diagnose(text))
            .map(|t| DiagnosticatorResult {
                diagnosticator: t.name.clone(),
                group: t.group,
                diagnosis: t.diagnose(text),
            })
            .collect()
    }
}

fn build_report(results: Vec<DiagnosticatorResult>) -> DiagnosisReport {
    let critical: Vec<DiagnosticatorResult> = results
        .iter()
        .filter(|r| r.diagnosis.is_critical())
        .cloned()
        .collect();

    if !critical.is_empty() {
        info!("{} critical pathologies detected", critical.len());
    }

    DiagnosisReport {
        timestamp: Utc::now(),
        total_diagnosticators: results.len(),
        summary: summarize(&results, &critical),
        critical_pathologies: critical,
        diagnoses: results,
    }
}

/// Plain-text summary of a set of results
pub fn summarize(results: &[DiagnosticatorResult], critical: &[DiagnosticatorResult]) -> String {
    if results.is_empty() {
        return "No pathologies detected. Consider providing more context or using different diagnosticators."
            .to_string();
    }

    let groups: BTreeSet<u8> = results.iter().map(|r| r.group).collect();
    let detected: Vec<&str> = results
        .iter()
        .filter(|r| r.diagnosis.is_detected())
        .map(|r| r.diagnosis.pathology.as_str())
        .collect();

    let mut summary = format!(
        "Analyzed by {} diagnosticators across {} layer(s).\n",
        results.len(),
        groups.len()
    );

    if !critical.is_empty() {
        summary.push_str("\n⚠️ CRITICAL PATHOLOGIES (confidence > 70%):\n");
        for c in critical {
            let _ = writeln!(
                summary,
                "- {} ({}): {:.0}%",
                c.diagnosis.pathology,
                c.diagnosticator,
                c.diagnosis.confidence * 100.0
            );
        }
    }

    if !detected.is_empty() {
        let _ = write!(summary, "\nDetected pathologies: {}", detected.join(", "));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathology::{NoMatch, PathologyEntry};

    fn custom_table(id: &str, group: u8) -> PathologyTable {
        PathologyTable {
            id: id.to_string(),
            name: format!("{} Author", id),
            group,
            description: "custom".to_string(),
            default_recommendation: None,
            no_match: NoMatch::default(),
            entries: vec![PathologyEntry {
                name: format!("{}_pathology", id),
                description: "d".to_string(),
                symptoms: vec![],
                keywords: vec!["zzyzx".to_string()],
                example: None,
                recommendation: None,
                related_concepts: vec![],
            }],
        }
    }

    #[test]
    fn test_default_registry_order() {
        let p = CulturalPathologist::new();
        let ids: Vec<_> = p.diagnosticators().into_iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec!["han", "rosa", "fisher", "sadin", "berardi", "illouz", "dubet", "sandel"]
        );
        assert_eq!(p.groups(), vec![2, 3]);
    }

    #[test]
    fn test_run_all_skips_unrelated_tables() {
        let p = CulturalPathologist::new();
        let report = p.run_all("qwerty uiop");
        assert_eq!(report.total_diagnosticators, 0);
        assert!(report.summary.starts_with("No pathologies detected"));
    }

    #[test]
    fn test_run_all_reports_critical() {
        let mut p = CulturalPathologist::with_tables(vec![]);
        p.add(custom_table("alpha", 4)).unwrap();
        let report = p.run_all("ZZYZX road");
        assert_eq!(report.total_diagnosticators, 1);
        assert_eq!(report.critical_pathologies.len(), 1);
        assert!(report.summary.contains("Analyzed by 1 diagnosticators across 1 layer(s)."));
        assert!(report
            .summary
            .contains("- alpha_pathology (alpha Author): 95%"));
        assert!(report.summary.ends_with("Detected pathologies: alpha_pathology"));
    }

    #[test]
    fn test_run_by_group() {
        let p = CulturalPathologist::new();
        let results = p
            .run_by_group(3, "meritocracy and credentials and resentment")
            .unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.group == 3));

        let err = p.run_by_group(7, "anything").unwrap_err();
        assert!(matches!(err, GnosisError::DiagnosticatorNotFound(_)));
    }

    #[test]
    fn test_run_by_name_substring() {
        let p = CulturalPathologist::new();
        let diagnosis = p.run_by_name("ROSA", "nothing at all here").unwrap();
        assert_eq!(diagnosis.pathology, "no_diagnosis");

        assert!(p.run_by_name("bifo", "panic").is_ok());
        assert!(matches!(
            p.run_by_name("Foucault", "x"),
            Err(GnosisError::DiagnosticatorNotFound(_))
        ));
    }

    #[test]
    fn test_run_author_reports_matched_table() {
        let p = CulturalPathologist::new();
        let result = p.run_author("bifo", "panic").unwrap();
        assert_eq!(result.diagnosticator, "Franco Berardi (Bifo)");
        assert_eq!(result.group, p.get("berardi").unwrap().group);
        assert!(p.run_author("", "x").is_err());
    }

    #[test]
    fn test_add_and_remove() {
        let mut p = CulturalPathologist::new();
        p.add(custom_table("extra", 4)).unwrap();
        assert_eq!(p.len(), 9);
        assert!(p.add(custom_table("extra", 4)).is_err());

        assert!(p.remove("Hartmut Rosa"));
        assert!(p.remove("extra"));
        assert!(!p.remove("extra"));
        assert_eq!(p.len(), 7);

        let err = p.analyze_temporality("time").unwrap_err();
        assert!(matches!(err, GnosisError::DiagnosticatorNotFound(_)));
    }

    #[test]
    fn test_specializations() {
        let p = CulturalPathologist::new();
        let result = p
            .psychopolitical_scan("hustle culture, burnout and productivity")
            .unwrap();
        assert_eq!(result.diagnosticator, "Byung-Chul Han");
        assert_eq!(result.diagnosis.pathology, "self_exploitation");

        assert_eq!(p.detect_technofeudalism("x").unwrap().diagnosticator, "Eric Sadin");
        assert_eq!(p.emotional_economy("x").unwrap().diagnosticator, "Eva Illouz");
    }

    #[test]
    fn test_modes_parse() {
        for name in AnalysisMode::names() {
            assert_eq!(name.parse::<AnalysisMode>().unwrap().as_str(), name);
        }
        assert!(matches!(
            "deep_scan".parse::<AnalysisMode>(),
            Err(GnosisError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_summary_excludes_sentinels() {
        let results = vec![DiagnosticatorResult {
            diagnosticator: "Hartmut Rosa".to_string(),
            group: 2,
            diagnosis: CulturalPathologist::new()
                .run_by_id("rosa", "nothing")
                .unwrap(),
        }];
        let summary = summarize(&results, &[]);
        assert_eq!(summary, "Analyzed by 1 diagnosticators across 1 layer(s).\n");
    }
}
