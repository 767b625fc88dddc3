//! GNOSIS - Gnoseological Analysis Server
//!
//! An MCP server that guides structured philosophical analysis:
//! - A step journal recording a tagged gnoseological journey
//! - A framework of domains, fallacies and genera of materiality
//! - Keyword-scored diagnosis of cultural pathologies
//! - stdio and HTTP/SSE transports
//!
//! # Architecture
//!
//! - **Types**: Tags, domains, fallacies and materiality genera
//! - **Ontology**: Static framework data and glossary
//! - **Journal**: Per-session step journal with XML rendering
//! - **Pathology**: Diagnosticator tables and the orchestrator over them
//! - **MCP**: JSON-RPC protocol, tools, resources and stdio server
//! - **API**: HTTP/SSE transport with one session per stream
//!
//! # Example
//!
//! ```
//! use gnosis_core::{CulturalPathologist, StepInput, StepJournal};
//!
//! let mut journal = StepJournal::new();
//! let report = journal
//!     .process_step(StepInput::new("begin", "Analysing remote work", 1))
//!     .unwrap();
//! assert_eq!(report.status(), "GNOSIS_FRAMEWORK_ACTIVATED");
//!
//! let pathologist = CulturalPathologist::new();
//! let report = pathologist.run_all("hustle culture, burnout and productivity");
//! assert_eq!(report.diagnoses[0].diagnosis.pathology, "self_exploitation");
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod journal;
pub mod mcp;
pub mod ontology;
pub mod pathology;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::GnosisConfig;
pub use error::{GnosisError, Result};
pub use journal::{StepInput, StepJournal, StepReport};
pub use mcp::{McpServer, ToolHandler};
pub use pathology::{CulturalPathologist, Diagnosis, PathologyTable};
pub use types::{Domain, Fallacy, MaterialityGenus, Tag};
