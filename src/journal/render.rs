//! Structured-text (XML-like) rendering of journal steps
//!
//! Rendering is a pure template over a validated [`Step`]; every lookup it
//! performs is keyed by a closed enum and cannot fail.

use super::Step;
use crate::ontology;
use crate::types::Fallacy;
use std::fmt::Write as _;

/// Escape the characters that would break the surrounding markup
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a single step as a `<gnosis_step>` block
pub fn render_step(step: &Step) -> String {
    let domain = step.tag.domain();
    let mut xml = String::new();

    // Writing into a String is infallible
    let _ = writeln!(
        xml,
        "<gnosis_step domain=\"{}\" tag=\"{}\" step=\"{}\">",
        domain, step.tag, step.step_number
    );
    let _ = writeln!(xml, "  <icon>{}</icon>", domain.glyph());
    let _ = writeln!(xml, "  <content>{}</content>", escape(&step.content));

    if !step.terms.is_empty() {
        xml.push_str("  <terms>\n");
        for (i, term) in step.terms.iter().enumerate() {
            let _ = writeln!(xml, "    <T{n}>{}</T{n}>", escape(term), n = i + 1);
        }
        xml.push_str("  </terms>\n");
    }

    if !step.relations.is_empty() {
        xml.push_str("  <relations>\n");
        for (i, relation) in step.relations.iter().enumerate() {
            let _ = writeln!(xml, "    <R{n}>{}</R{n}>", escape(relation), n = i + 1);
        }
        xml.push_str("  </relations>\n");
    }

    if let Some(kind) = step.fallacy {
        let entry = ontology::fallacy(kind);
        xml.push_str("  <fallacy_detected>\n");
        let _ = writeln!(xml, "    <name>{}</name>", entry.name);
        let _ = writeln!(xml, "    <formula>{}</formula>", entry.formula);
        let _ = writeln!(xml, "    <correction>{}</correction>", entry.correction);
        xml.push_str("  </fallacy_detected>\n");
    }

    if let Some(genus) = step.materiality {
        let entry = ontology::materiality(genus);
        let _ = writeln!(xml, "  <materiality genus=\"{}\">", genus);
        let _ = writeln!(xml, "    <name>{}</name>", entry.name);
        let _ = writeln!(xml, "    <examples>{}</examples>", entry.examples);
        xml.push_str("  </materiality>\n");
    }

    let _ = writeln!(
        xml,
        "  <next_step_needed>{}</next_step_needed>",
        step.next_step_needed
    );
    xml.push_str("</gnosis_step>");

    xml
}

/// Render the closing `<transduction>` block for a finished journey
pub fn render_closure(
    step: &Step,
    trajectory: &str,
    terms: &[String],
    fallacies: &[Fallacy],
) -> String {
    let challenged = if fallacies.is_empty() {
        "none".to_string()
    } else {
        fallacies
            .iter()
            .map(Fallacy::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "<transduction status=\"complete\">\n  \
         <knowledge_constructed>{}</knowledge_constructed>\n  \
         <trajectory>{}</trajectory>\n  \
         <terms count=\"{}\">{}</terms>\n  \
         <fallacies_challenged>{}</fallacies_challenged>\n\
         </transduction>",
        escape(&step.content),
        escape(trajectory),
        terms.len(),
        escape(&terms.join(", ")),
        challenged
    )
}
