//! Philosophical glossary

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct GlossaryEntry {
    #[serde(skip)]
    pub term: &'static str,
    pub definition: &'static str,
    pub example: &'static str,
    pub see_also: &'static [&'static str],
}

/// Grouping used when listing the glossary
pub const CATEGORIES: [(&str, &[&str]); 5] = [
    (
        "fundamental",
        &["symploke", "categorial_closure", "categorial_field", "transduction"],
    ),
    ("materiality", &["M1", "M2", "M3", "materiality"]),
    (
        "fallacies",
        &["descriptivism", "theoreticism", "adequationism", "circularism"],
    ),
    ("figures", &["define", "classify", "demonstrate", "model"]),
    (
        "other",
        &["operating_subject", "term", "relation", "holism", "atomism"],
    ),
];

pub const GLOSSARY: [GlossaryEntry; 21] = [
    GlossaryEntry {
        term: "symploke",
        definition: "Principle stating that some terms relate to others, but NOT to all. Rejects both holism (\"everything is connected to everything\") and atomism (\"nothing is connected\").",
        example: "Philosophy relates to science, but not to cooking in the same way.",
        see_also: &["holism", "atomism"],
    },
    GlossaryEntry {
        term: "categorial_closure",
        definition: "Process by which a scientific field reaches gnoseological autonomy when its operations produce terms of the same field. The field \"closes\" upon itself.",
        example: "Geometry closes when the proof of a theorem yields another geometric object.",
        see_also: &["categorial_field", "term"],
    },
    GlossaryEntry {
        term: "categorial_field",
        definition: "Set of terms, relations and operations that make up the domain of a science or discipline.",
        example: "The categorial field of physics includes mass, energy, force and their relations.",
        see_also: &["categorial_closure"],
    },
    GlossaryEntry {
        term: "transduction",
        definition: "Transformation by which transmitted knowledge changes as it passes through the operating subject. It is not passive transmission.",
        example: "The student does not \"receive\" the Pythagorean theorem, they reconstruct it operationally.",
        see_also: &["operating_subject"],
    },
    GlossaryEntry {
        term: "M1",
        definition: "First genus of materiality: the physical-corporeal. Entities with extension, mass, energy.",
        example: "Human bodies, electronic devices, physical infrastructure.",
        see_also: &["M2", "M3", "materiality"],
    },
    GlossaryEntry {
        term: "M2",
        definition: "Second genus of materiality: the psychological-subjective. Mental processes, emotions, lived experience.",
        example: "Attention, pain, memories, intentions.",
        see_also: &["M1", "M3", "materiality"],
    },
    GlossaryEntry {
        term: "M3",
        definition: "Third genus of materiality: the logical-abstract. Ideas, structures, institutions, objective relations.",
        example: "The Pythagorean theorem, the institution of marriage, physical laws.",
        see_also: &["M1", "M2", "materiality"],
    },
    GlossaryEntry {
        term: "materiality",
        definition: "Ontological condition of everything that exists. Being is either material or it is not. There is no immaterial \"spirit\".",
        example: "Ideas (M3) are material even though they are not corporeal (M1).",
        see_also: &["M1", "M2", "M3"],
    },
    GlossaryEntry {
        term: "descriptivism",
        definition: "Fallacy that reduces science to the mere description of facts (α) without a theoretical component (β). Formula: α without β.",
        example: "\"The data speak for themselves\", \"I only present the facts\".",
        see_also: &["theoreticism", "adequationism", "circularism"],
    },
    GlossaryEntry {
        term: "theoreticism",
        definition: "Fallacy that reduces science to formal theories (β) with no connection to material facts (α). Formula: β without α.",
        example: "\"The theory predicts that...\", \"It is mathematically proven...\".",
        see_also: &["descriptivism", "adequationism", "circularism"],
    },
    GlossaryEntry {
        term: "adequationism",
        definition: "Fallacy that juxtaposes facts (α) and theory (β) without conjugating them dialectically. Formula: α + β.",
        example: "\"On the one hand... on the other hand...\", \"There is a tension between theory and practice\".",
        see_also: &["descriptivism", "theoreticism", "circularism"],
    },
    GlossaryEntry {
        term: "circularism",
        definition: "The correct position: dialectical conjugation of matter (α) and form (β). Theory is built from facts and facts are interpreted through theory.",
        example: "The experiment refines the theory, the theory guides new experiments.",
        see_also: &["descriptivism", "theoreticism", "adequationism"],
    },
    GlossaryEntry {
        term: "define",
        definition: "Immanent figure that constructs a term from other terms. Notation: T < T.",
        example: "Defining \"square\" as \"rectangle with equal sides\".",
        see_also: &["classify", "demonstrate", "model"],
    },
    GlossaryEntry {
        term: "classify",
        definition: "Immanent figure that constructs a term from relations. Notation: T < R.",
        example: "Classifying whales as mammals through their relation to lactation.",
        see_also: &["define", "demonstrate", "model"],
    },
    GlossaryEntry {
        term: "demonstrate",
        definition: "Immanent figure that constructs a relation from other relations. Notation: R < R.",
        example: "Proving a theorem from axioms and previous theorems.",
        see_also: &["define", "classify", "model"],
    },
    GlossaryEntry {
        term: "model",
        definition: "Immanent figure that constructs a relation from terms. Notation: R < T.",
        example: "Modelling F=ma from measurements of force, mass and acceleration.",
        see_also: &["define", "classify", "demonstrate"],
    },
    GlossaryEntry {
        term: "operating_subject",
        definition: "The agent who carries out gnoseological operations. Not a passive subject who \"receives\" knowledge but an active one who builds it.",
        example: "The scientist designing experiments, the philosopher analysing categories.",
        see_also: &["transduction"],
    },
    GlossaryEntry {
        term: "term",
        definition: "Basic element of the categorial field. An identifiable unit that enters into relations with other terms.",
        example: "In geometry: point, line, plane. In physics: mass, energy.",
        see_also: &["relation", "categorial_field"],
    },
    GlossaryEntry {
        term: "relation",
        definition: "Connection established between terms of the categorial field. Relations are selective (symploke).",
        example: "The relation \"perpendicular to\" between lines. Cause and effect in physics.",
        see_also: &["term", "symploke"],
    },
    GlossaryEntry {
        term: "holism",
        definition: "Rejected position asserting that \"everything is connected to everything\". Eliminated by the principle of symploke.",
        example: "\"All is one\", \"Each part mirrors the whole\".",
        see_also: &["symploke", "atomism"],
    },
    GlossaryEntry {
        term: "atomism",
        definition: "Rejected position asserting that nothing is essentially connected. Eliminated by the principle of symploke.",
        example: "\"Every discipline is fully autonomous\", \"There are no necessary relations\".",
        see_also: &["symploke", "holism"],
    },
];

/// Look up a term, ignoring case
pub fn lookup(term: &str) -> Option<&'static GlossaryEntry> {
    GLOSSARY
        .iter()
        .find(|entry| entry.term.eq_ignore_ascii_case(term.trim()))
}

/// All glossary terms in definition order
pub fn terms() -> Vec<&'static str> {
    GLOSSARY.iter().map(|entry| entry.term).collect()
}

/// The whole glossary keyed by term
pub fn as_map() -> BTreeMap<&'static str, &'static GlossaryEntry> {
    GLOSSARY.iter().map(|entry| (entry.term, entry)).collect()
}
