mod parser;

pub use parser::{normalize, IngredientLine, FALLBACK_DELIMITERS};

/// Join ingredient lines into the newline-separated list that recipe
/// analysis endpoints expect.
pub fn format_for_analysis(lines: &[IngredientLine]) -> String {
    lines
        .iter()
        .map(IngredientLine::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
