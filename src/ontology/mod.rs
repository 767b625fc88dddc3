//! Static reference data for the gnoseological framework
//!
//! Fallacy catalog, materiality genera, immanent figures and the canned
//! texts that the journal embeds in its responses. Nothing here is mutated
//! at runtime.

pub mod glossary;

use crate::types::{Domain, Fallacy, MaterialityGenus, Tag};
use serde::Serialize;
use std::collections::BTreeMap;

/// Framework version reported by `begin` and journey exports
pub const FRAMEWORK_VERSION: &str = "2.0.0";

pub const ONTOLOGY_AXIOM: &str = "Being is either material or it is not.";

pub const SYMPLOKE_PRINCIPLE: &str =
    "Some terms relate to others, but NOT to all. Rejects both holism and atomism.";

pub const DIALECTICAL_INSTRUCTION: &str =
    "Apply CIRCULARISM: dialectical conjugation of matter (α) and form (β)";

/// A gnoseological fallacy and its correction
#[derive(Debug, Clone, Serialize)]
pub struct FallacyEntry {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
    pub symptom: &'static str,
    pub correction: &'static str,
}

/// A genus of materiality
#[derive(Debug, Clone, Serialize)]
pub struct MaterialityEntry {
    pub name: &'static str,
    pub examples: &'static str,
}

/// A figure of scientific construction (terms T, relations R)
#[derive(Debug, Clone, Serialize)]
pub struct ImmanentFigure {
    pub notation: &'static str,
    pub description: &'static str,
}

const DESCRIPTIVISM: FallacyEntry = FallacyEntry {
    name: "DESCRIPTIVISM",
    formula: "α without β",
    description: "Reducing science to the description of facts without theory",
    symptom: "The data speak for themselves",
    correction: "Conjugate with the formal component (β)",
};

const THEORETICISM: FallacyEntry = FallacyEntry {
    name: "THEORETICISM",
    formula: "β without α",
    description: "Reducing science to formal theories without facts",
    symptom: "The theory predicts that... (without verification)",
    correction: "Conjugate with the material component (α)",
};

const ADEQUATIONISM: FallacyEntry = FallacyEntry {
    name: "ADEQUATIONISM",
    formula: "α + β",
    description: "Juxtaposing facts and theories without conjugating them",
    symptom: "On the one hand... on the other hand...",
    correction: "Apply CIRCULARISM: dialectical conjugation",
};

const M1: MaterialityEntry = MaterialityEntry {
    name: "Physical-corporeal",
    examples: "bodies, devices, infrastructure",
};

const M2: MaterialityEntry = MaterialityEntry {
    name: "Psychological-subjective",
    examples: "mental processes, emotions, attention",
};

const M3: MaterialityEntry = MaterialityEntry {
    name: "Logical-abstract",
    examples: "ideas, structures, institutions, relations",
};

/// The four immanent figures, keyed by the tag that performs them
pub const IMMANENT_FIGURES: [(Tag, ImmanentFigure); 4] = [
    (
        Tag::Define,
        ImmanentFigure {
            notation: "T < T",
            description: "Term constructed from terms",
        },
    ),
    (
        Tag::Classify,
        ImmanentFigure {
            notation: "T < R",
            description: "Term constructed from relations",
        },
    ),
    (
        Tag::Demonstrate,
        ImmanentFigure {
            notation: "R < R",
            description: "Relation constructed from relations",
        },
    ),
    (
        Tag::Model,
        ImmanentFigure {
            notation: "R < T",
            description: "Relation constructed from terms",
        },
    ),
];

/// Suggested order of operations
pub const OPERATIONAL_FLOW: [&str; 5] = [
    "begin → terminate → relate",
    "→ phenomenize → reference → essentialize",
    "→ define/classify/demonstrate/model",
    "→ challenge → conjugate → dialectize",
    "→ verify → close → transduce",
];

pub const INSTRUCTIONS: [&str; 6] = [
    "Identify terms with \"terminate\" (T1, T2, T3...)",
    "Establish relations with \"relate\" (R1, R2...)",
    "Capture phenomena with \"phenomenize\"",
    "Detect fallacies with \"challenge\"",
    "Conjugate matter↔form with \"conjugate\"",
    "Close with \"transduce\"",
];

pub const CLOSING_PRINCIPLES: [&str; 4] = [
    "Knowledge is CONSTRUCTED, it does not emerge",
    "Relations are SELECTIVE (symploke)",
    "Fallacies are CHALLENGED, not integrated",
    "Transduction TRANSFORMS what is transmitted",
];

pub fn fallacy(kind: Fallacy) -> &'static FallacyEntry {
    match kind {
        Fallacy::Descriptivism => &DESCRIPTIVISM,
        Fallacy::Theoreticism => &THEORETICISM,
        Fallacy::Adequationism => &ADEQUATIONISM,
    }
}

pub fn materiality(genus: MaterialityGenus) -> &'static MaterialityEntry {
    match genus {
        MaterialityGenus::M1 => &M1,
        MaterialityGenus::M2 => &M2,
        MaterialityGenus::M3 => &M3,
    }
}

/// Fallacy catalog keyed by selector name
pub fn fallacy_catalog() -> BTreeMap<&'static str, &'static FallacyEntry> {
    Fallacy::ALL
        .iter()
        .map(|f| (f.as_str(), fallacy(*f)))
        .collect()
}

/// Materiality genera keyed by genus label
pub fn materiality_genera() -> BTreeMap<&'static str, &'static MaterialityEntry> {
    MaterialityGenus::ALL
        .iter()
        .map(|m| (m.as_str(), materiality(*m)))
        .collect()
}

/// Immanent figures keyed by tag name
pub fn immanent_figures() -> BTreeMap<&'static str, &'static ImmanentFigure> {
    IMMANENT_FIGURES
        .iter()
        .map(|(tag, figure)| (tag.as_str(), figure))
        .collect()
}

/// Markdown description of the whole framework, served as an MCP resource
pub fn framework_markdown() -> String {
    let mut md = String::from("# GNOSIS Framework\n\n");
    md.push_str(&format!("> {}\n\n", ONTOLOGY_AXIOM));
    md.push_str(&format!("**Symploke**: {}\n\n", SYMPLOKE_PRINCIPLE));

    md.push_str("## Domains\n\n");
    for domain in Domain::ALL {
        let tags: Vec<&str> = domain.tags().iter().map(Tag::as_str).collect();
        md.push_str(&format!(
            "- {} **{}**: {}\n",
            domain.glyph(),
            domain,
            tags.join(", ")
        ));
    }

    md.push_str("\n## Fallacies to challenge\n\n");
    for kind in Fallacy::ALL {
        let entry = fallacy(kind);
        md.push_str(&format!(
            "- **{}** (`{}`): {}. Correction: {}\n",
            entry.name, entry.formula, entry.description, entry.correction
        ));
    }

    md.push_str("\n## Genera of materiality\n\n");
    for genus in MaterialityGenus::ALL {
        let entry = materiality(genus);
        md.push_str(&format!("- **{}** {}: {}\n", genus, entry.name, entry.examples));
    }

    md.push_str("\n## Immanent figures\n\n");
    for (tag, figure) in IMMANENT_FIGURES.iter() {
        md.push_str(&format!(
            "- `{}` {}: {}\n",
            figure.notation, tag, figure.description
        ));
    }

    md.push_str("\n## Operational flow\n\n");
    for line in OPERATIONAL_FLOW {
        md.push_str(&format!("    {}\n", line));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(fallacy_catalog().len(), 3);
        assert_eq!(materiality_genera().len(), 3);
        assert_eq!(immanent_figures().len(), 4);
        assert_eq!(CLOSING_PRINCIPLES.len(), 4);
    }

    #[test]
    fn test_fallacy_formulas() {
        assert_eq!(fallacy(Fallacy::Descriptivism).formula, "α without β");
        assert_eq!(fallacy(Fallacy::Theoreticism).formula, "β without α");
        assert_eq!(fallacy(Fallacy::Adequationism).formula, "α + β");
    }

    #[test]
    fn test_figures_belong_to_immanent_domain() {
        for (tag, _) in IMMANENT_FIGURES.iter() {
            assert_eq!(tag.domain(), Domain::Immanent);
        }
    }

    #[test]
    fn test_framework_markdown_mentions_every_tag() {
        let md = framework_markdown();
        for tag in Tag::ALL {
            assert!(md.contains(tag.as_str()), "missing {}", tag);
        }
        assert!(md.contains("ADEQUATIONISM"));
    }
}
