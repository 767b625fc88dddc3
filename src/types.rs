//! Core closed vocabularies for the gnoseological journal
//!
//! Tags, domains, fallacies and materiality genera are all closed sets. They
//! are modelled as enums so that the tag-to-domain partition is a total
//! function and every table lookup keyed by them is infallible.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Operation tag carried by each journal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    // threshold
    Begin,
    // syntactic
    Terminate,
    Relate,
    Operate,
    // semantic
    Phenomenize,
    Reference,
    Essentialize,
    // pragmatic
    Autologize,
    Dialogize,
    Normalize,
    // immanent
    Define,
    Classify,
    Demonstrate,
    Model,
    // critical
    Challenge,
    Symploke,
    Conjugate,
    Dialectize,
    Criticize,
    Exemplify,
    // ontological
    Materialize,
    Phenomenologize,
    Logicize,
    // closure
    Verify,
    Close,
    Transduce,
}

impl Tag {
    /// Every tag, grouped by domain in canonical order
    pub const ALL: [Tag; 26] = [
        Tag::Begin,
        Tag::Terminate,
        Tag::Relate,
        Tag::Operate,
        Tag::Phenomenize,
        Tag::Reference,
        Tag::Essentialize,
        Tag::Autologize,
        Tag::Dialogize,
        Tag::Normalize,
        Tag::Define,
        Tag::Classify,
        Tag::Demonstrate,
        Tag::Model,
        Tag::Challenge,
        Tag::Symploke,
        Tag::Conjugate,
        Tag::Dialectize,
        Tag::Criticize,
        Tag::Exemplify,
        Tag::Materialize,
        Tag::Phenomenologize,
        Tag::Logicize,
        Tag::Verify,
        Tag::Close,
        Tag::Transduce,
    ];

    /// Opens the categorial field and returns the framework
    pub const INITIATION: Tag = Tag::Begin;

    /// Challenges a fallacy when a selector is present
    pub const CHALLENGE: Tag = Tag::Challenge;

    /// Closes the journey when no further step is needed
    pub const TERMINAL: Tag = Tag::Transduce;

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Begin => "begin",
            Tag::Terminate => "terminate",
            Tag::Relate => "relate",
            Tag::Operate => "operate",
            Tag::Phenomenize => "phenomenize",
            Tag::Reference => "reference",
            Tag::Essentialize => "essentialize",
            Tag::Autologize => "autologize",
            Tag::Dialogize => "dialogize",
            Tag::Normalize => "normalize",
            Tag::Define => "define",
            Tag::Classify => "classify",
            Tag::Demonstrate => "demonstrate",
            Tag::Model => "model",
            Tag::Challenge => "challenge",
            Tag::Symploke => "symploke",
            Tag::Conjugate => "conjugate",
            Tag::Dialectize => "dialectize",
            Tag::Criticize => "criticize",
            Tag::Exemplify => "exemplify",
            Tag::Materialize => "materialize",
            Tag::Phenomenologize => "phenomenologize",
            Tag::Logicize => "logicize",
            Tag::Verify => "verify",
            Tag::Close => "close",
            Tag::Transduce => "transduce",
        }
    }

    /// Domain this tag belongs to (each tag belongs to exactly one)
    pub fn domain(&self) -> Domain {
        match self {
            Tag::Begin => Domain::Threshold,
            Tag::Terminate | Tag::Relate | Tag::Operate => Domain::Syntactic,
            Tag::Phenomenize | Tag::Reference | Tag::Essentialize => Domain::Semantic,
            Tag::Autologize | Tag::Dialogize | Tag::Normalize => Domain::Pragmatic,
            Tag::Define | Tag::Classify | Tag::Demonstrate | Tag::Model => Domain::Immanent,
            Tag::Challenge
            | Tag::Symploke
            | Tag::Conjugate
            | Tag::Dialectize
            | Tag::Criticize
            | Tag::Exemplify => Domain::Critical,
            Tag::Materialize | Tag::Phenomenologize | Tag::Logicize => Domain::Ontological,
            Tag::Verify | Tag::Close | Tag::Transduce => Domain::Closure,
        }
    }

    /// Wire names of every tag
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Tag::as_str).collect()
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = crate::error::GnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| crate::error::GnosisError::InvalidTag(s.to_string()))
    }
}

/// One of the eight phases of the gnoseological space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Threshold,
    Syntactic,
    Semantic,
    Pragmatic,
    Immanent,
    Critical,
    Ontological,
    Closure,
}

impl Domain {
    pub const ALL: [Domain; 8] = [
        Domain::Threshold,
        Domain::Syntactic,
        Domain::Semantic,
        Domain::Pragmatic,
        Domain::Immanent,
        Domain::Critical,
        Domain::Ontological,
        Domain::Closure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Threshold => "threshold",
            Domain::Syntactic => "syntactic",
            Domain::Semantic => "semantic",
            Domain::Pragmatic => "pragmatic",
            Domain::Immanent => "immanent",
            Domain::Critical => "critical",
            Domain::Ontological => "ontological",
            Domain::Closure => "closure",
        }
    }

    /// Tags belonging to this domain, in canonical order
    pub fn tags(&self) -> Vec<Tag> {
        Tag::ALL
            .iter()
            .copied()
            .filter(|tag| tag.domain() == *self)
            .collect()
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Domain::Threshold => "🚪",
            Domain::Syntactic => "📐",
            Domain::Semantic => "💎",
            Domain::Pragmatic => "👥",
            Domain::Immanent => "🔷",
            Domain::Critical => "⚔️",
            Domain::Ontological => "🧬",
            Domain::Closure => "🔒",
        }
    }

    /// Display color used by terminal front-ends
    pub fn color(&self) -> &'static str {
        match self {
            Domain::Threshold => "magenta",
            Domain::Syntactic => "cyan",
            Domain::Semantic => "blue",
            Domain::Pragmatic => "green",
            Domain::Immanent => "blue_bright",
            Domain::Critical => "red",
            Domain::Ontological => "yellow",
            Domain::Closure => "white",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Domain::as_str).collect()
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gnoseological fallacy that a `challenge` step may impugn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallacy {
    /// Facts without theory (α without β)
    Descriptivism,
    /// Theory without facts (β without α)
    Theoreticism,
    /// Juxtaposition without conjugation (α + β)
    Adequationism,
}

impl Fallacy {
    pub const ALL: [Fallacy; 3] = [
        Fallacy::Descriptivism,
        Fallacy::Theoreticism,
        Fallacy::Adequationism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fallacy::Descriptivism => "descriptivism",
            Fallacy::Theoreticism => "theoreticism",
            Fallacy::Adequationism => "adequationism",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Fallacy::as_str).collect()
    }
}

impl std::fmt::Display for Fallacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fallacy {
    type Err = crate::error::GnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fallacy::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| crate::error::GnosisError::InvalidSelector {
                field: "fallacy",
                value: s.to_string(),
            })
    }
}

/// Genus of materiality (M1 physical, M2 psychological, M3 logical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialityGenus {
    M1,
    M2,
    M3,
}

impl MaterialityGenus {
    pub const ALL: [MaterialityGenus; 3] =
        [MaterialityGenus::M1, MaterialityGenus::M2, MaterialityGenus::M3];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialityGenus::M1 => "M1",
            MaterialityGenus::M2 => "M2",
            MaterialityGenus::M3 => "M3",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(MaterialityGenus::as_str).collect()
    }
}

impl std::fmt::Display for MaterialityGenus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialityGenus {
    type Err = crate::error::GnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialityGenus::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| crate::error::GnosisError::InvalidSelector {
                field: "materiality",
                value: s.to_string(),
            })
    }
}
