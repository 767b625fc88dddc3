//! Read-only MCP resources

use crate::error::{GnosisError, Result};
use crate::ontology::{self, glossary};
use crate::pathology::{group_name, CulturalPathologist};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const FRAMEWORK_URI: &str = "gnosis://framework";
pub const DIAGNOSTICATORS_URI: &str = "gnosis://diagnosticators";
pub const GLOSSARY_URI: &str = "gnosis://glossary";

/// Resource descriptor returned by `resources/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Body of a resource returned by `resources/read`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

fn resource(uri: &str, name: &str, description: &str, mime_type: &str) -> Resource {
    Resource {
        uri: uri.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        mime_type: mime_type.to_string(),
    }
}

pub fn list() -> Vec<Resource> {
    vec![
        resource(
            FRAMEWORK_URI,
            "GNOSIS framework",
            "Domains, tags, fallacies, genera of materiality and operational flow",
            "text/markdown",
        ),
        resource(
            DIAGNOSTICATORS_URI,
            "Diagnosticators",
            "Registered cultural pathology diagnosticators grouped by layer",
            "application/json",
        ),
        resource(
            GLOSSARY_URI,
            "Glossary",
            "Definitions of the framework vocabulary",
            "application/json",
        ),
    ]
}

pub fn read(uri: &str, pathologist: &CulturalPathologist) -> Result<ResourceContents> {
    let (mime_type, text) = match uri {
        FRAMEWORK_URI => ("text/markdown", ontology::framework_markdown()),
        DIAGNOSTICATORS_URI => {
            let diagnosticators = pathologist.diagnosticators();
            let layers: serde_json::Map<String, serde_json::Value> = pathologist
                .groups()
                .into_iter()
                .map(|group| {
                    let members: Vec<&str> = diagnosticators
                        .iter()
                        .filter(|d| d.group == group)
                        .map(|d| d.name.as_str())
                        .collect();
                    (
                        format!("layer{}", group),
                        json!({ "name": group_name(group), "diagnosticators": members }),
                    )
                })
                .collect();
            let body = json!({
                "version": env!("CARGO_PKG_VERSION"),
                "total_diagnosticators": diagnosticators.len(),
                "diagnosticators": diagnosticators,
                "layers": layers,
            });
            ("application/json", serde_json::to_string_pretty(&body)?)
        }
        GLOSSARY_URI => (
            "application/json",
            serde_json::to_string_pretty(&json!({
                "categories": glossary::CATEGORIES.iter().map(|(c, t)| json!({"category": c, "terms": t})).collect::<Vec<_>>(),
                "entries": glossary::as_map(),
            }))?,
        ),
        _ => return Err(GnosisError::ResourceNotFound(uri.to_string())),
    };

    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: mime_type.to_string(),
        text,
    })
}
