//! Integration tests for the diagnosticator tables and the pathologist

use gnosis_core::config::PathologyConfig;
use gnosis_core::pathology::{
    confidence, CONFIDENCE_CAP, CRITICAL_THRESHOLD, DETECTION_THRESHOLD,
};
use gnosis_core::{CulturalPathologist, GnosisError, PathologyTable};
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const CUSTOM_TABLE: &str = r#"
id = "bueno"
name = "Gustavo Bueno"
group = 1
description = "Materialist critique of ideological totalities"

[[entries]]
name = "harmonism"
description = "Totalities presented as harmonious wholes"
keywords = ["harmony", "totality", "wholeness"]
recommendation = "Break the totality into its parts"

[[entries]]
name = "fundamentalism"
description = "Doctrine taken as unquestionable ground"
keywords = ["dogma", "fundament"]
"#;

fn write_table(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_critical_pathology_is_reported() {
    let pathologist = CulturalPathologist::new();
    let report = pathologist.run_all("entrepreneur hustle grind productivity burnout");

    let names: Vec<&str> = report
        .diagnoses
        .iter()
        .map(|r| r.diagnosticator.as_str())
        .collect();
    assert_eq!(names, vec!["Byung-Chul Han", "Franco Berardi (Bifo)"]);
    assert_eq!(report.total_diagnosticators, 2);

    assert_eq!(report.critical_pathologies.len(), 1);
    let critical = &report.critical_pathologies[0];
    assert_eq!(critical.diagnosis.pathology, "self_exploitation");
    assert!((critical.diagnosis.confidence - 0.75).abs() < 1e-9);
    assert!(report.summary.contains("CRITICAL PATHOLOGIES"));
    assert!(report.summary.contains("Detected pathologies: self_exploitation"));
}

#[test]
fn test_moderate_detection() {
    let pathologist = CulturalPathologist::new();
    let diagnosis = pathologist
        .run_by_name("han", "hustle culture, burnout and productivity")
        .unwrap();
    assert_eq!(diagnosis.pathology, "self_exploitation");
    assert!((diagnosis.confidence - 0.45).abs() < 1e-9);
    assert!(diagnosis.is_detected());
    assert!(!diagnosis.is_critical());
    assert!(!diagnosis.symptoms.is_empty());
}

#[test]
fn test_unrelated_text() {
    let pathologist = CulturalPathologist::new();
    let report = pathologist.run_all("qwerty uiop");
    assert_eq!(report.total_diagnosticators, 0);
    assert!(report.critical_pathologies.is_empty());
    assert!(report.summary.starts_with("No pathologies detected"));

    let rosa = pathologist.analyze_temporality("qwerty uiop").unwrap();
    assert_eq!(rosa.diagnosis.pathology, "no_diagnosis");
    assert_eq!(rosa.diagnosis.confidence, 0.0);
}

#[test]
fn test_layer_filter() {
    let pathologist = CulturalPathologist::new();
    let results = pathologist
        .run_by_group(3, "meritocracy and credentials and resentment")
        .unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.diagnosticator.as_str()).collect();
    assert_eq!(names, vec!["François Dubet", "Michael Sandel"]);
    assert!(results.iter().all(|r| r.group == 3));

    assert!(matches!(
        pathologist.run_by_group(9, "anything"),
        Err(GnosisError::DiagnosticatorNotFound(_))
    ));
}

#[test]
fn test_author_lookup_is_case_insensitive_substring() {
    let pathologist = CulturalPathologist::new();
    assert!(pathologist.run_by_name("BIFO", "x").is_ok());
    assert!(pathologist.run_by_name("illouz", "x").is_ok());
    assert!(matches!(
        pathologist.run_by_name("Foucault", "x"),
        Err(GnosisError::DiagnosticatorNotFound(_))
    ));
}

#[test]
fn test_specializations_are_pinned() {
    let pathologist = CulturalPathologist::new();
    let text = "an algorithm decides, the platform owns our data";
    assert_eq!(
        pathologist.psychopolitical_scan(text).unwrap().diagnosis.pathology,
        "infocracy"
    );
    assert_eq!(
        pathologist.detect_technofeudalism(text).unwrap().diagnosticator,
        "Eric Sadin"
    );
    assert_eq!(
        pathologist.emotional_economy(text).unwrap().diagnosticator,
        "Eva Illouz"
    );
}

#[test]
fn test_specialization_fails_when_table_removed() {
    let mut pathologist = CulturalPathologist::new();
    assert!(pathologist.remove("rosa"));
    assert!(matches!(
        pathologist.analyze_temporality("acceleration"),
        Err(GnosisError::DiagnosticatorNotFound(_))
    ));
}

#[test]
fn test_extra_table_from_config() {
    let file = write_table(CUSTOM_TABLE);
    let config = PathologyConfig {
        extra_tables: vec![file.path().to_path_buf()],
        disabled: vec!["Mark Fisher".to_string(), "sandel".to_string()],
    };

    let pathologist = CulturalPathologist::from_config(&config).unwrap();
    assert_eq!(pathologist.len(), 7);
    assert!(pathologist.get("fisher").is_none());
    assert_eq!(pathologist.tables().last().unwrap().id, "bueno");
    assert_eq!(pathologist.groups(), vec![1, 2, 3]);

    let results = pathologist
        .run_by_group(1, "harmony of the totality")
        .unwrap();
    assert_eq!(results.len(), 1);
    let diagnosis = &results[0].diagnosis;
    assert_eq!(diagnosis.pathology, "harmonism");
    assert!((diagnosis.confidence - 0.8).abs() < 1e-9);
    assert_eq!(diagnosis.recommendation, "Break the totality into its parts");

    let info = pathologist
        .diagnosticators()
        .into_iter()
        .find(|d| d.id == "bueno")
        .unwrap();
    assert_eq!(info.group_name, "Philosophical Materialism");
}

#[test]
fn test_recommendation_fallback() {
    let table = PathologyTable::from_toml(CUSTOM_TABLE).unwrap();
    let diagnosis = table.diagnose("dogma is the fundament");
    assert_eq!(diagnosis.pathology, "fundamentalism");
    assert_eq!(diagnosis.recommendation, "Apply Gustavo Bueno analysis");
    assert_eq!(table.diagnose("nothing").pathology, "no_pathology_detected");
}

#[test]
fn test_invalid_extra_table() {
    let file = write_table("id = \"broken\"\nname = \"Broken\"\ngroup = 2\ndescription = \"x\"\nentries = []\n");
    let config = PathologyConfig {
        extra_tables: vec![file.path().to_path_buf()],
        disabled: Vec::new(),
    };
    assert!(matches!(
        CulturalPathologist::from_config(&config),
        Err(GnosisError::InvalidTable(_))
    ));
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut pathologist = CulturalPathologist::new();
    let han = pathologist.get("han").unwrap().clone();
    assert!(matches!(
        pathologist.add(han),
        Err(GnosisError::InvalidTable(_))
    ));
    assert_eq!(pathologist.len(), 8);
}

fn keyword_table(n: usize) -> PathologyTable {
    let keywords: Vec<String> = (0..n).map(|i| format!("key{}z", i)).collect();
    let decoys: Vec<String> = (0..n).map(|i| format!("decoy{}q", i)).collect();
    let quote = |words: &[String]| {
        words
            .iter()
            .map(|w| format!("\"{}\"", w))
            .collect::<Vec<_>>()
            .join(", ")
    };
    PathologyTable::from_toml(&format!(
        "id = \"probe\"\nname = \"Probe\"\ngroup = 9\ndescription = \"d\"\n\n\
         [[entries]]\nname = \"decoy\"\ndescription = \"d\"\nkeywords = [{}]\n\n\
         [[entries]]\nname = \"target\"\ndescription = \"d\"\nkeywords = [{}]\n",
        quote(&decoys),
        quote(&keywords)
    ))
    .unwrap()
}

proptest! {
    #[test]
    fn prop_exact_keyword_share_scores(n in 1usize..12, k_seed in 0usize..12) {
        let k = k_seed % (n + 1);
        let table = keyword_table(n);
        let text: Vec<String> = (0..k).map(|i| format!("key{}z", i)).collect();
        let text = text.join(" ");

        let diagnosis = table.diagnose(&text);
        let expected = confidence(k, n);
        if expected >= DETECTION_THRESHOLD {
            prop_assert_eq!(diagnosis.pathology, "target");
            prop_assert!((diagnosis.confidence - expected).abs() < 1e-12);
        } else {
            prop_assert_eq!(diagnosis.confidence, 0.0);
        }
        prop_assert!((expected - (k as f64 / n as f64 * 1.2).min(0.95)).abs() < 1e-12);
    }

    #[test]
    fn prop_confidence_bounds(matches in 0usize..50, extra in 0usize..50) {
        let total = matches + extra;
        let c = confidence(matches, total);
        prop_assert!((0.0..=CONFIDENCE_CAP).contains(&c));
        if total > 0 && matches == total {
            prop_assert_eq!(c, CONFIDENCE_CAP);
        }
    }

    #[test]
    fn prop_diagnosis_respects_thresholds(text in "[a-z ,.]{0,120}") {
        let pathologist = CulturalPathologist::new();
        let report = pathologist.run_all(&text);

        for result in &report.diagnoses {
            let c = result.diagnosis.confidence;
            prop_assert!(c == 0.0 || c >= DETECTION_THRESHOLD);
            prop_assert!(c <= CONFIDENCE_CAP);
        }
        for critical in &report.critical_pathologies {
            prop_assert!(critical.diagnosis.confidence > CRITICAL_THRESHOLD);
        }
        prop_assert_eq!(report.total_diagnosticators, report.diagnoses.len());
    }

    #[test]
    fn prop_case_does_not_matter(text in "[a-zA-Z ]{0,80}") {
        let pathologist = CulturalPathologist::new();
        let lower = pathologist.run_all(&text.to_lowercase());
        let upper = pathologist.run_all(&text.to_uppercase());
        let pick = |r: &gnosis_core::pathology::DiagnosisReport| {
            r.diagnoses
                .iter()
                .map(|d| (d.diagnosticator.clone(), d.diagnosis.pathology.clone()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(pick(&lower), pick(&upper));
    }
}
