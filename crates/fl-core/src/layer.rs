//! Data layer classification for dbt nodes
//!
//! Nodes are bucketed into warehouse layers by matching naming
//! conventions against the node's unique id and fully qualified name.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A node's position in the warehouse layering convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Raw data declared as a dbt source
    Source,
    /// Staging models (`stg_` prefix or `staging` directory)
    Staging,
    /// Intermediate models (`int_` prefix or `intermediate` directory)
    Intermediate,
    /// Mart models (`fct_`/`dim_` prefixes or `mart`/`marts` directories)
    Mart,
    /// Seed files
    Seed,
    /// Anything that matches no convention
    Other,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Source => "source",
            Layer::Staging => "staging",
            Layer::Intermediate => "intermediate",
            Layer::Mart => "mart",
            Layer::Seed => "seed",
            Layer::Other => "other",
        };
        write!(f, "{}", name)
    }
}

fn layer_patterns() -> &'static [(Layer, Vec<Regex>)] {
    static PATTERNS: OnceLock<Vec<(Layer, Vec<Regex>)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .filter_map(|p| Regex::new(&format!("(?i){}", p)).ok())
                .collect::<Vec<_>>()
        };
        vec![
            (Layer::Source, compile(&[r"^source\."])),
            (Layer::Staging, compile(&[r"\.stg_", r"^staging"])),
            (Layer::Intermediate, compile(&[r"\.int_", r"^intermediate"])),
            (
                Layer::Mart,
                compile(&[r"\.mart", r"\.fct_", r"\.dim_", r"^marts"]),
            ),
            (Layer::Seed, compile(&[r"^seed\."])),
        ]
    })
}

/// Classify a node into a [`Layer`].
///
/// The unique id and the dot-joined fqn are matched together, so both
/// `model.proj.stg_orders` and fqn directory segments like `staging`
/// can trigger a layer. First matching layer wins, checked in the order
/// source, staging, intermediate, mart, seed.
pub fn classify_layer(unique_id: &str, fqn: &[String]) -> Layer {
    let mut search = unique_id.to_string();
    if !fqn.is_empty() {
        search.push(' ');
        search.push_str(&fqn.join("."));
    }

    for (layer, patterns) in layer_patterns() {
        if patterns.iter().any(|p| p.is_match(&search)) {
            return *layer;
        }
    }
    Layer::Other
}

/// Directory grouping for a node, from the segments of its fqn between
/// the project name and the node name. Empty when the node sits at the
/// project root.
pub fn directory_from_fqn(fqn: &[String]) -> String {
    if fqn.len() < 3 {
        return String::new();
    }
    fqn[1..fqn.len() - 1].join("/")
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod tests;
