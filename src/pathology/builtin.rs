//! Built-in pathology tables, embedded at compile time

use super::PathologyTable;
use once_cell::sync::Lazy;

/// Table sources in registry order
const SOURCES: [(&str, &str); 8] = [
    ("han", include_str!("tables/han.toml")),
    ("rosa", include_str!("tables/rosa.toml")),
    ("fisher", include_str!("tables/fisher.toml")),
    ("sadin", include_str!("tables/sadin.toml")),
    ("berardi", include_str!("tables/berardi.toml")),
    ("illouz", include_str!("tables/illouz.toml")),
    ("dubet", include_str!("tables/dubet.toml")),
    ("sandel", include_str!("tables/sandel.toml")),
];

static TABLES: Lazy<Vec<PathologyTable>> = Lazy::new(|| {
    SOURCES
        .iter()
        .map(|(id, source)| {
            PathologyTable::from_toml(source)
                .unwrap_or_else(|e| panic!("Valid built-in pathology table '{}': {}", id, e))
        })
        .collect()
});

pub const ROSA: &str = "rosa";
pub const HAN: &str = "han";
pub const SADIN: &str = "sadin";
pub const ILLOUZ: &str = "illouz";

/// Every built-in table, in registry order
pub fn tables() -> &'static [PathologyTable] {
    &TABLES
}

/// Identifiers of the built-in tables
pub fn ids() -> Vec<&'static str> {
    SOURCES.iter().map(|(id, _)| *id).collect()
}
