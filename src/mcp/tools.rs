//! MCP tool implementations
//!
//! Four tools:
//! - `gnosis`: record one step of the gnoseological journey
//! - `gnosis_journey`: summary, export, import or clear the journey
//! - `gnosis_glossary`: look up framework vocabulary
//! - `cultural_pathology_analysis`: run the diagnosticators over a text

use super::protocol::ToolOutput;
use crate::error::{GnosisError, Result};
use crate::journal::{rejection_payload, StepInput, StepJournal};
use crate::ontology::glossary;
use crate::pathology::pathologist::{AnalysisMode, CulturalPathologist};
use crate::types::{Fallacy, MaterialityGenus, Tag};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const GNOSIS: &str = "gnosis";
pub const GNOSIS_JOURNEY: &str = "gnosis_journey";
pub const GNOSIS_GLOSSARY: &str = "gnosis_glossary";
pub const CULTURAL_PATHOLOGY: &str = "cultural_pathology_analysis";

/// Tool schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

const JOURNEY_ACTIONS: [&str; 4] = ["summary", "export", "import", "clear"];

/// Tool handler that dispatches to the journal and the pathologist
///
/// Each handler owns one journal, so one handler serves exactly one session.
/// The pathologist is shared read-only between sessions.
pub struct ToolHandler {
    journal: Mutex<StepJournal>,
    pathologist: Arc<CulturalPathologist>,
}

impl ToolHandler {
    pub fn new(pathologist: Arc<CulturalPathologist>) -> Self {
        Self {
            journal: Mutex::new(StepJournal::new()),
            pathologist,
        }
    }

    pub fn pathologist(&self) -> &CulturalPathologist {
        &self.pathologist
    }

    /// Get list of all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: GNOSIS.to_string(),
                description: "Record one step of a gnoseological analysis. Each step carries a tag from the framework \
                    (begin opens the categorial field, transduce closes it), free-text content and optional terms, \
                    relations, fallacy and materiality selectors. stepNumber 1 starts a new journey."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "tag": {
                            "type": "string",
                            "enum": Tag::names(),
                            "description": "Gnoseological operation"
                        },
                        "content": {
                            "type": "string",
                            "description": "Content of the step"
                        },
                        "stepNumber": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Step number (1 starts a new journey)"
                        },
                        "totalSteps": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Estimated number of steps"
                        },
                        "nextStepNeeded": {
                            "type": "boolean",
                            "description": "Whether another step follows",
                            "default": true
                        },
                        "terms": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Terms identified in this step"
                        },
                        "relations": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Relations established in this step"
                        },
                        "fallacy": {
                            "type": "string",
                            "enum": Fallacy::names(),
                            "description": "Fallacy challenged (with the challenge tag)"
                        },
                        "materiality": {
                            "type": "string",
                            "enum": MaterialityGenus::names(),
                            "description": "Genus of materiality of the analysed object"
                        }
                    },
                    "required": ["tag", "content", "stepNumber"]
                }),
            },
            Tool {
                name: GNOSIS_JOURNEY.to_string(),
                description: "Inspect or manage the current journey: summary, export to JSON, import from JSON, clear."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "action": {
                            "type": "string",
                            "enum": JOURNEY_ACTIONS,
                            "description": "Operation on the journey"
                        },
                        "data": {
                            "type": "string",
                            "description": "Exported journey JSON (for import)"
                        }
                    },
                    "required": ["action"]
                }),
            },
            Tool {
                name: GNOSIS_GLOSSARY.to_string(),
                description: "Look up a term of the gnoseological framework, or list the whole glossary."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "term": {
                            "type": "string",
                            "description": "Term to look up (case-insensitive)"
                        },
                        "list_all": {
                            "type": "boolean",
                            "description": "List every term grouped by category",
                            "default": false
                        }
                    }
                }),
            },
            Tool {
                name: CULTURAL_PATHOLOGY.to_string(),
                description: "Diagnose cultural and social pathologies in a text using keyword-scored tables \
                    (Han, Rosa, Fisher, Sadin, Berardi, Illouz, Dubet, Sandel)."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "mode": {
                            "type": "string",
                            "enum": AnalysisMode::names(),
                            "description": "Kind of analysis"
                        },
                        "description": {
                            "type": "string",
                            "description": "Phenomenon to analyse"
                        },
                        "layer": {
                            "type": "integer",
                            "description": "Group for layer_diagnosis (2 cultural, 3 emotional)"
                        },
                        "author": {
                            "type": "string",
                            "description": "Author name (or part of it) for author_diagnosis"
                        }
                    },
                    "required": ["mode", "description"]
                }),
            },
        ]
    }

    /// Execute a tool by name
    ///
    /// Caller-correctable problems come back as `Ok` output flagged as an
    /// error. `Err` is reserved for unknown tools and internal failures.
    pub async fn execute(&self, tool_name: &str, params: Value) -> Result<ToolOutput> {
        debug!("Executing tool: {}", tool_name);

        let result = match tool_name {
            GNOSIS => self.gnosis(params).await,
            GNOSIS_JOURNEY => self.journey(params).await,
            GNOSIS_GLOSSARY => self.glossary(params),
            CULTURAL_PATHOLOGY => self.pathology(params),
            _ => {
                warn!("Unknown tool: {}", tool_name);
                return Err(GnosisError::UnknownTool(tool_name.to_string()));
            }
        };

        match result {
            Ok(output) => Ok(output),
            Err(e) if e.is_validation() => {
                info!("Tool {} rejected input: {}", tool_name, e);
                Ok(ToolOutput::error(&validation_payload(tool_name, &e)))
            }
            Err(e) => Err(e),
        }
    }

    async fn gnosis(&self, params: Value) -> Result<ToolOutput> {
        let input: StepInput = parse_params(params)?;
        let report = self.journal.lock().await.process_step(input)?;
        Ok(ToolOutput::json(&serde_json::to_value(&report)?))
    }

    async fn journey(&self, params: Value) -> Result<ToolOutput> {
        #[derive(Deserialize)]
        struct JourneyParams {
            action: String,
            data: Option<String>,
        }

        let params: JourneyParams = parse_params(params)?;
        let mut journal = self.journal.lock().await;

        let payload = match params.action.as_str() {
            "summary" => json!({
                "status": "JOURNEY_SUMMARY",
                "summary": journal.summary(),
            }),
            "export" => json!({
                "status": "JOURNEY_EXPORTED",
                "data": journal.export_journey()?,
            }),
            "import" => {
                let data = params
                    .data
                    .ok_or_else(|| GnosisError::MissingParameter("data".to_string()))?;
                let imported = journal.import_journey(&data)?;
                json!({
                    "status": "JOURNEY_IMPORTED",
                    "success": true,
                    "steps_imported": imported,
                })
            }
            "clear" => {
                journal.clear();
                json!({
                    "status": "JOURNEY_CLEARED",
                    "success": true,
                })
            }
            other => {
                return Err(GnosisError::InvalidInput(format!(
                    "unknown journey action '{}'",
                    other
                )))
            }
        };

        Ok(ToolOutput::json(&payload))
    }

    fn glossary(&self, params: Value) -> Result<ToolOutput> {
        #[derive(Deserialize, Default)]
        struct GlossaryParams {
            term: Option<String>,
            #[serde(default)]
            list_all: bool,
        }

        let params: GlossaryParams = if params.is_null() {
            GlossaryParams::default()
        } else {
            parse_params(params)?
        };

        if params.list_all {
            let categories: serde_json::Map<String, Value> = glossary::CATEGORIES
                .iter()
                .map(|(name, terms)| (name.to_string(), json!(terms)))
                .collect();
            return Ok(ToolOutput::json(&json!({
                "status": "GLOSSARY_LISTED",
                "total_terms": glossary::GLOSSARY.len(),
                "terms": glossary::terms(),
                "categories": categories,
            })));
        }

        let term = params
            .term
            .ok_or_else(|| GnosisError::MissingParameter("term (or list_all: true)".to_string()))?;

        let entry = glossary::lookup(&term)
            .ok_or_else(|| GnosisError::InvalidInput(format!("term not found: {}", term)))?;

        Ok(ToolOutput::json(&json!({
            "status": "TERM_FOUND",
            "term": entry.term,
            "definition": entry.definition,
            "example": entry.example,
            "see_also": entry.see_also,
        })))
    }

    fn pathology(&self, params: Value) -> Result<ToolOutput> {
        #[derive(Deserialize)]
        struct PathologyParams {
            mode: String,
            description: Option<String>,
            layer: Option<u8>,
            author: Option<String>,
        }

        let params: PathologyParams = parse_params(params)?;
        let mode: AnalysisMode = params.mode.parse()?;
        // Blank text is valid and scores as "nothing detected"
        let text = params
            .description
            .ok_or_else(|| GnosisError::MissingParameter("description".to_string()))?;

        info!(
            "Pathology analysis: mode={} length={}",
            mode.as_str(),
            text.chars().count()
        );

        let result = match mode {
            AnalysisMode::Full => serde_json::to_value(self.pathologist.run_all(&text))?,
            AnalysisMode::Layer => {
                let layer = params.layer.ok_or_else(|| {
                    GnosisError::MissingParameter("layer (required for layer_diagnosis)".to_string())
                })?;
                let diagnoses = self.pathologist.run_by_group(layer, &text)?;
                json!({
                    "layer": layer,
                    "total_diagnosticators": diagnoses.len(),
                    "diagnoses": diagnoses,
                })
            }
            AnalysisMode::Author => {
                let author = params.author.ok_or_else(|| {
                    GnosisError::MissingParameter("author (required for author_diagnosis)".to_string())
                })?;
                let result = self.pathologist.run_author(&author, &text)?;
                json!({
                    "author": author,
                    "diagnosticator": result.diagnosticator,
                    "group": result.group,
                    "diagnosis": result.diagnosis,
                })
            }
            AnalysisMode::Special(special) => {
                serde_json::to_value(self.pathologist.specialized(special, &text)?)?
            }
        };

        let mut payload = json!({
            "status": "PATHOLOGY_ANALYSIS_COMPLETE",
            "mode": mode.as_str(),
        });
        if let (Some(target), Value::Object(fields)) = (payload.as_object_mut(), result) {
            target.extend(fields);
        }

        Ok(ToolOutput::json(&payload))
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| GnosisError::InvalidInput(e.to_string()))
}

/// Error payload echoing what the caller may use instead
fn validation_payload(tool_name: &str, err: &GnosisError) -> Value {
    match tool_name {
        GNOSIS => rejection_payload(err),
        GNOSIS_JOURNEY => json!({
            "success": false,
            "error": err.to_string(),
            "actions_available": JOURNEY_ACTIONS,
        }),
        GNOSIS_GLOSSARY => json!({
            "error": err.to_string(),
            "suggestion": "Use list_all: true to see the available terms",
            "terms_available": glossary::terms(),
        }),
        _ => json!({
            "error": err.to_string(),
            "modes_available": AnalysisMode::names(),
        }),
    }
}
