//! Step journal: the per-session record of a gnoseological journey
//!
//! A journey is the run of steps since the last step numbered 1. The journal
//! keeps the steps themselves plus three append-only accumulators (terms,
//! relations and challenged fallacies), and answers every step with one of
//! four report shapes depending on the tag:
//!
//! 1. `begin` returns the full framework description
//! 2. `challenge` with a fallacy selector returns the fallacy analysis
//! 3. `transduce` with no further step needed returns the closing summary
//! 4. anything else returns a generic "executed" report with counters
//!
//! Every report embeds the structured-text rendering of the step.

pub mod render;

use crate::error::{GnosisError, Result};
use crate::ontology::{
    self, FallacyEntry, ImmanentFigure, MaterialityEntry, CLOSING_PRINCIPLES,
    DIALECTICAL_INSTRUCTION, FRAMEWORK_VERSION, INSTRUCTIONS, ONTOLOGY_AXIOM, OPERATIONAL_FLOW,
    SYMPLOKE_PRINCIPLE,
};
use crate::types::{Domain, Fallacy, MaterialityGenus, Tag};
use crate::utils::string::preview;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Arrow used when rendering the trajectory of a journey
pub const TRAJECTORY_SEPARATOR: &str = " → ";

fn default_step_number() -> u32 {
    1
}

/// A validated journal step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredStep")]
pub struct Step {
    pub tag: Tag,
    pub content: String,
    pub step_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<u32>,
    pub next_step_needed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallacy: Option<Fallacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materiality: Option<MaterialityGenus>,
}

/// A step as found in an exported journey, either key spelling accepted
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStep {
    tag: Tag,
    #[serde(default)]
    content: String,
    #[serde(default = "default_step_number")]
    step_number: u32,
    #[serde(default)]
    total_steps: Option<u32>,
    #[serde(default)]
    next_step_needed: Option<bool>,
    #[serde(default)]
    continuation_needed: Option<bool>,
    #[serde(default)]
    terms: Vec<String>,
    #[serde(default)]
    relations: Vec<String>,
    #[serde(default)]
    fallacy: Option<Fallacy>,
    #[serde(default)]
    materiality: Option<MaterialityGenus>,
}

impl From<StoredStep> for Step {
    fn from(stored: StoredStep) -> Self {
        Self {
            tag: stored.tag,
            content: stored.content,
            step_number: stored.step_number,
            total_steps: stored.total_steps,
            next_step_needed: stored
                .next_step_needed
                .or(stored.continuation_needed)
                .unwrap_or(true),
            terms: stored.terms,
            relations: stored.relations,
            fallacy: stored.fallacy,
            materiality: stored.materiality,
        }
    }
}

impl Step {
    /// Whether this step opens a new journey
    pub fn starts_journey(&self) -> bool {
        self.step_number == 1
    }
}

/// Raw step arguments as received from a tool call
///
/// Closed-set fields are kept as strings here so that an unknown value can
/// be echoed back to the caller together with the valid alternatives.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub step_number: Option<u32>,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub next_step_needed: Option<bool>,
    /// Older clients send this instead of `nextStepNeeded`
    #[serde(default)]
    pub continuation_needed: Option<bool>,
    #[serde(default)]
    pub terms: Option<Vec<String>>,
    #[serde(default)]
    pub relations: Option<Vec<String>>,
    #[serde(default)]
    pub fallacy: Option<String>,
    #[serde(default)]
    pub materiality: Option<String>,
}

impl StepInput {
    pub fn new(tag: impl Into<String>, content: impl Into<String>, step_number: u32) -> Self {
        Self {
            tag: tag.into(),
            content: Some(content.into()),
            step_number: Some(step_number),
            ..Default::default()
        }
    }

    pub fn with_terms<S: Into<String>>(mut self, terms: impl IntoIterator<Item = S>) -> Self {
        self.terms = Some(terms.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_relations<S: Into<String>>(
        mut self,
        relations: impl IntoIterator<Item = S>,
    ) -> Self {
        self.relations = Some(relations.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_fallacy(mut self, fallacy: impl Into<String>) -> Self {
        self.fallacy = Some(fallacy.into());
        self
    }

    pub fn with_materiality(mut self, genus: impl Into<String>) -> Self {
        self.materiality = Some(genus.into());
        self
    }

    pub fn finished(mut self) -> Self {
        self.next_step_needed = Some(false);
        self
    }

    /// Check closed-set fields and apply defaults
    pub fn validate(self) -> Result<Step> {
        let tag: Tag = self.tag.parse()?;
        let fallacy = self
            .fallacy
            .as_deref()
            .map(str::parse::<Fallacy>)
            .transpose()?;
        let materiality = self
            .materiality
            .as_deref()
            .map(str::parse::<MaterialityGenus>)
            .transpose()?;

        Ok(Step {
            tag,
            content: self.content.unwrap_or_default(),
            step_number: match self.step_number {
                None | Some(0) => 1,
                Some(n) => n,
            },
            total_steps: self.total_steps,
            next_step_needed: self
                .next_step_needed
                .or(self.continuation_needed)
                .unwrap_or(true),
            terms: self.terms.unwrap_or_default(),
            relations: self.relations.unwrap_or_default(),
            fallacy,
            materiality,
        })
    }
}

/// Payload returned by the initiation tag
#[derive(Debug, Clone, Serialize)]
pub struct FrameworkReport {
    pub status: &'static str,
    pub version: &'static str,
    pub guiding_principle: BTreeMap<&'static str, &'static str>,
    pub ontology: OntologyBlock,
    pub fallacies: BTreeMap<&'static str, &'static FallacyEntry>,
    pub immanent_figures: BTreeMap<&'static str, &'static ImmanentFigure>,
    pub operational_flow: [&'static str; 5],
    pub instructions: BTreeMap<usize, &'static str>,
    pub xml_output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OntologyBlock {
    pub axiom: &'static str,
    pub genera: BTreeMap<&'static str, &'static MaterialityEntry>,
}

/// Payload returned when a fallacy is challenged
#[derive(Debug, Clone, Serialize)]
pub struct FallacyReport {
    pub status: &'static str,
    pub fallacy: FallacyAnalysis,
    pub instruction: &'static str,
    pub xml_output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FallacyAnalysis {
    pub kind: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
    pub symptom_detected: &'static str,
    pub correction: &'static str,
}

/// Payload returned when the journey closes
#[derive(Debug, Clone, Serialize)]
pub struct ClosureReport {
    pub status: &'static str,
    pub message: &'static str,
    pub summary: ClosureSummary,
    pub principles_applied: [&'static str; 4],
    pub xml_output: String,
    pub closure_xml: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosureSummary {
    pub terms_identified: Vec<String>,
    pub relations_established: Vec<String>,
    pub fallacies_challenged: Vec<Fallacy>,
    pub total_steps: usize,
    pub trajectory: String,
}

/// Payload returned for every other step
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedReport {
    pub status: &'static str,
    pub domain: Domain,
    pub tag: Tag,
    pub step: u32,
    pub next_step_needed: bool,
    pub current_state: StateCounts,
    pub xml_output: String,
}

/// Accumulator sizes (counts only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub terms: usize,
    pub relations: usize,
    pub fallacies: usize,
    pub steps: usize,
}

/// Result of processing one step
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StepReport {
    Framework(FrameworkReport),
    FallacyChallenged(FallacyReport),
    Closure(ClosureReport),
    Executed(ExecutedReport),
}

impl StepReport {
    pub fn status(&self) -> &'static str {
        match self {
            StepReport::Framework(r) => r.status,
            StepReport::FallacyChallenged(r) => r.status,
            StepReport::Closure(r) => r.status,
            StepReport::Executed(r) => r.status,
        }
    }

    /// Structured-text rendering of the step that produced this report
    pub fn xml_output(&self) -> &str {
        match self {
            StepReport::Framework(r) => &r.xml_output,
            StepReport::FallacyChallenged(r) => &r.xml_output,
            StepReport::Closure(r) => &r.xml_output,
            StepReport::Executed(r) => &r.xml_output,
        }
    }
}

/// Read-only view of the current journey
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneySummary {
    pub steps: usize,
    pub trajectory: Vec<Tag>,
    pub terms: Vec<String>,
    pub relations: Vec<String>,
    pub fallacies: Vec<Fallacy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct JourneyState {
    journey: Vec<Step>,
    #[serde(default)]
    terms: Vec<String>,
    #[serde(default)]
    relations: Vec<String>,
    #[serde(default)]
    fallacies: Vec<Fallacy>,
}

#[derive(Serialize)]
struct JourneyExport<'a> {
    version: &'static str,
    exported_at: DateTime<Utc>,
    #[serde(flatten)]
    state: &'a JourneyState,
}

/// Session-owned journal of steps
#[derive(Debug, Default)]
pub struct StepJournal {
    state: JourneyState,
}

impl StepJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, record and answer one step
    ///
    /// Validation happens before any mutation, so a rejected step leaves the
    /// journey exactly as it was.
    pub fn process_step(&mut self, input: StepInput) -> Result<StepReport> {
        let step = input.validate()?;

        if step.starts_journey() {
            self.reset();
        }

        self.state.terms.extend(step.terms.iter().cloned());
        self.state.relations.extend(step.relations.iter().cloned());
        if let Some(fallacy) = step.fallacy {
            self.state.fallacies.push(fallacy);
        }

        let domain = step.tag.domain();
        debug!(
            "{} [{}:{}] step {}: {}",
            domain.glyph(),
            domain.as_str().to_uppercase(),
            step.tag,
            step.step_number,
            preview(&step.content, 80)
        );

        let xml_output = render::render_step(&step);
        self.state.journey.push(step);
        let step = &self.state.journey[self.state.journey.len() - 1];

        let report = match (step.tag, step.fallacy) {
            (Tag::INITIATION, _) => StepReport::Framework(framework_report(xml_output)),
            (Tag::CHALLENGE, Some(kind)) => {
                StepReport::FallacyChallenged(fallacy_report(kind, xml_output))
            }
            (Tag::TERMINAL, _) if !step.next_step_needed => {
                let trajectory = self.trajectory_text();
                let closure_xml = render::render_closure(
                    step,
                    &trajectory,
                    &self.state.terms,
                    &self.state.fallacies,
                );
                info!(
                    "Journey closed after {} steps ({} terms)",
                    self.state.journey.len(),
                    self.state.terms.len()
                );
                StepReport::Closure(ClosureReport {
                    status: "TRANSDUCTION_COMPLETE",
                    message: "Knowledge constructed through gnoseological operations.",
                    summary: ClosureSummary {
                        terms_identified: self.state.terms.clone(),
                        relations_established: self.state.relations.clone(),
                        fallacies_challenged: self.state.fallacies.clone(),
                        total_steps: self.state.journey.len(),
                        trajectory,
                    },
                    principles_applied: CLOSING_PRINCIPLES,
                    xml_output,
                    closure_xml,
                })
            }
            _ => StepReport::Executed(ExecutedReport {
                status: "OPERATION_EXECUTED",
                domain,
                tag: step.tag,
                step: step.step_number,
                next_step_needed: step.next_step_needed,
                current_state: self.counts(),
                xml_output,
            }),
        };

        Ok(report)
    }

    pub fn summary(&self) -> JourneySummary {
        JourneySummary {
            steps: self.state.journey.len(),
            trajectory: self.state.journey.iter().map(|s| s.tag).collect(),
            terms: self.state.terms.clone(),
            relations: self.state.relations.clone(),
            fallacies: self.state.fallacies.clone(),
        }
    }

    pub fn counts(&self) -> StateCounts {
        StateCounts {
            terms: self.state.terms.len(),
            relations: self.state.relations.len(),
            fallacies: self.state.fallacies.len(),
            steps: self.state.journey.len(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.state.journey
    }

    pub fn is_empty(&self) -> bool {
        self.state.journey.is_empty()
    }

    /// Serialize the whole journey to a JSON blob
    pub fn export_journey(&self) -> Result<String> {
        let export = JourneyExport {
            version: FRAMEWORK_VERSION,
            exported_at: Utc::now(),
            state: &self.state,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Replace the journey with one previously exported
    ///
    /// Returns the number of imported steps. On failure the current journey
    /// is left untouched.
    pub fn import_journey(&mut self, data: &str) -> Result<usize> {
        let value: Value =
            serde_json::from_str(data).map_err(|e| GnosisError::JourneyParse(e.to_string()))?;

        if !value.get("journey").map(Value::is_array).unwrap_or(false) {
            return Err(GnosisError::JourneyFormat(
                "missing 'journey' array".to_string(),
            ));
        }

        let state: JourneyState =
            serde_json::from_value(value).map_err(|e| GnosisError::JourneyFormat(e.to_string()))?;

        let imported = state.journey.len();
        self.state = state;
        info!("Imported journey with {} steps", imported);
        Ok(imported)
    }

    /// Drop all steps and accumulators
    pub fn clear(&mut self) {
        self.reset();
        debug!("Journey cleared");
    }

    fn reset(&mut self) {
        self.state = JourneyState::default();
    }

    fn trajectory_text(&self) -> String {
        self.state
            .journey
            .iter()
            .map(|s| s.tag.as_str())
            .collect::<Vec<_>>()
            .join(TRAJECTORY_SEPARATOR)
    }
}

fn framework_report(xml_output: String) -> FrameworkReport {
    FrameworkReport {
        status: "GNOSIS_FRAMEWORK_ACTIVATED",
        version: FRAMEWORK_VERSION,
        guiding_principle: BTreeMap::from([("symploke", SYMPLOKE_PRINCIPLE)]),
        ontology: OntologyBlock {
            axiom: ONTOLOGY_AXIOM,
            genera: ontology::materiality_genera(),
        },
        fallacies: ontology::fallacy_catalog(),
        immanent_figures: ontology::immanent_figures(),
        operational_flow: OPERATIONAL_FLOW,
        instructions: INSTRUCTIONS
            .iter()
            .enumerate()
            .map(|(i, text)| (i + 1, *text))
            .collect(),
        xml_output,
    }
}

fn fallacy_report(kind: Fallacy, xml_output: String) -> FallacyReport {
    let entry = ontology::fallacy(kind);
    FallacyReport {
        status: "FALLACY_CHALLENGED",
        fallacy: FallacyAnalysis {
            kind: entry.name,
            formula: entry.formula,
            description: entry.description,
            symptom_detected: entry.symptom,
            correction: entry.correction,
        },
        instruction: DIALECTICAL_INSTRUCTION,
        xml_output,
    }
}

/// Error payload for a rejected step
///
/// Echoes the offending value together with every valid alternative so the
/// caller can correct itself.
pub fn rejection_payload(err: &GnosisError) -> Value {
    let mut payload = json!({
        "error": err.to_string(),
        "tags_available": Tag::names(),
        "domains": Domain::names(),
    });

    match err {
        GnosisError::InvalidTag(tag) => {
            payload["attempted_tag"] = json!(tag);
        }
        GnosisError::InvalidSelector { field, value } => {
            payload["attempted"] = json!({ "field": field, "value": value });
            payload["fallacies_available"] = json!(Fallacy::names());
            payload["materiality_available"] = json!(MaterialityGenus::names());
        }
        _ => {}
    }

    payload
}
