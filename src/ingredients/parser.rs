use log::info;
use serde::Serialize;
use std::fmt;

/// Delimiters tried, in order, when a recipe did not come through one
/// ingredient per line.
pub const FALLBACK_DELIMITERS: [char; 6] = [',', ';', '|', '\n', '•', '-'];

/// Raw segments shorter than this, measured before any cleanup, are OCR
/// noise (page numbers, stray glyphs).
const MIN_RAW_LEN: usize = 5;
/// Cleaned lines shorter than this are not ingredients.
const MIN_CLEAN_LEN: usize = 3;

const BULLETS: [char; 3] = ['•', '*', '-'];

/// A single cleaned ingredient line, at least three characters long
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IngredientLine(String);

impl IngredientLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for IngredientLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize raw recipe text into ordered ingredient lines.
///
/// Empty or whitespace-only input yields an empty vector. When the text has
/// fewer than two usable lines (OCR often returns a recipe as a single
/// paragraph) it is re-split on [`FALLBACK_DELIMITERS`], taking the first
/// delimiter that produces more than one line. If none does, the whole text
/// becomes a single line, or nothing if it is too short.
pub fn normalize(raw_text: &str) -> Vec<IngredientLine> {
    if raw_text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<IngredientLine> = raw_text.split('\n').filter_map(normalize_line).collect();

    if lines.len() < 2 {
        lines = split_by_delimiters(raw_text);
    }

    info!("Normalized {} ingredient lines from text", lines.len());
    lines
}

fn split_by_delimiters(text: &str) -> Vec<IngredientLine> {
    for delimiter in FALLBACK_DELIMITERS {
        if !text.contains(delimiter) {
            continue;
        }
        let parts: Vec<IngredientLine> = text.split(delimiter).filter_map(normalize_line).collect();
        if parts.len() > 1 {
            return parts;
        }
    }

    normalize_line(text).into_iter().collect()
}

fn normalize_line(line: &str) -> Option<IngredientLine> {
    if line.chars().count() < MIN_RAW_LEN {
        return None;
    }

    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");

    let cleaned = strip_leading_markers(&collapsed).trim();

    if cleaned.chars().count() < MIN_CLEAN_LEN {
        return None;
    }

    Some(IngredientLine(cleaned.to_string()))
}

/// Strip bullets and list enumerations ("1.", "2)", "- ", "• ") from the
/// start of a line, repeatedly, so "1. - Flour" becomes "Flour".
fn strip_leading_markers(line: &str) -> &str {
    let mut rest = line.trim_start();
    loop {
        let stripped = strip_enumeration(rest)
            .or_else(|| rest.strip_prefix(BULLETS))
            .map(str::trim_start);
        match stripped {
            Some(next) if next.len() < rest.len() => rest = next,
            _ => return rest,
        }
    }
}

/// "12. Eggs" -> "Eggs", "3) Milk" -> "Milk". A bare quantity such as
/// "2 cups flour" or "1.5 kg beef" is not an enumeration and is kept.
fn strip_enumeration(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let after = line[digits..].strip_prefix(['.', ')'])?;
    if after.is_empty() || after.starts_with(char::is_whitespace) {
        Some(after)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[IngredientLine]) -> Vec<&str> {
        lines.iter().map(IngredientLine::as_str).collect()
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("\n\t \n").is_empty());
    }

    #[test]
    fn test_numbered_list() {
        let lines = normalize("1. Flour\n2. Sugar\n3. Eggs");
        assert_eq!(texts(&lines), vec!["Flour", "Sugar", "Eggs"]);
    }

    #[test]
    fn test_comma_fallback() {
        let lines = normalize("Flour, Sugar, Eggs");
        assert_eq!(texts(&lines), vec!["Flour", "Sugar", "Eggs"]);
    }

    #[test]
    fn test_semicolon_fallback() {
        let lines = normalize("200g butter; 3 large eggs; 1 cup milk");
        assert_eq!(texts(&lines), vec!["200g butter", "3 large eggs", "1 cup milk"]);
    }

    #[test]
    fn test_bullets_and_whitespace() {
        let text = "•  2 cups   flour\n* 1 tsp salt\n-   3 eggs, beaten\n";
        let lines = normalize(text);
        assert_eq!(texts(&lines), vec!["2 cups flour", "1 tsp salt", "3 eggs, beaten"]);
    }

    #[test]
    fn test_quantities_are_not_enumerations() {
        let lines = normalize("2 cups flour\n1.5 kg beef\n10) Onions");
        assert_eq!(texts(&lines), vec!["2 cups flour", "1.5 kg beef", "Onions"]);
    }

    #[test]
    fn test_noise_lines_dropped() {
        let text = "Ingredients\n12\na\n1. 250g pasta\n2. 100g pancetta\n--\n3";
        let lines = normalize(text);
        assert_eq!(texts(&lines), vec!["Ingredients", "250g pasta", "100g pancetta"]);
    }

    #[test]
    fn test_single_line_without_delimiters() {
        let lines = normalize("One whole roast chicken");
        assert_eq!(texts(&lines), vec!["One whole roast chicken"]);
    }

    #[test]
    fn test_single_short_line_is_empty() {
        assert!(normalize("egg").is_empty());
        assert!(normalize("1. ab").is_empty());
    }

    #[test]
    fn test_hyphenated_single_line_kept_whole() {
        let lines = normalize("all-purpose flour");
        assert_eq!(texts(&lines), vec!["all-purpose flour"]);
    }

    #[test]
    fn test_inline_bullets_fallback() {
        let lines = normalize("Flour • Sugar • Butter");
        assert_eq!(texts(&lines), vec!["Flour", "Sugar", "Butter"]);
    }

    #[test]
    fn test_order_preserved_and_restartable() {
        let text = "3. Tomatoes\n1. Basil leaves\n2. Olive oil";
        let first = normalize(text);
        let second = normalize(text);
        assert_eq!(first, second);
        assert_eq!(texts(&first), vec!["Tomatoes", "Basil leaves", "Olive oil"]);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let text = "1. 2 cups flour\n- 1 cup sugar\n• three large eggs\n4) 100 ml milk";
        let once = normalize(text);
        let joined = crate::ingredients::format_for_analysis(&once);
        let twice = normalize(&joined);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_short_lines_need_their_markers() {
        // "1. Egg" passes the raw length filter, the bare "Egg" it becomes does not
        let once = normalize("1. Egg\n2. Flour\n3. Sugar");
        assert_eq!(texts(&once), vec!["Egg", "Flour", "Sugar"]);

        let joined = crate::ingredients::format_for_analysis(&once);
        let twice = normalize(&joined);
        assert_eq!(texts(&twice), vec!["Flour", "Sugar"]);
        assert_eq!(normalize("Egg"), Vec::new());
    }

    #[test]
    fn test_stacked_markers() {
        assert_eq!(strip_leading_markers("1. - Flour"), "Flour");
        assert_eq!(strip_leading_markers("•• Sugar"), "Sugar");
        assert_eq!(strip_leading_markers("2 cups rice"), "2 cups rice");
        assert_eq!(strip_leading_markers("3.5 oz cheese"), "3.5 oz cheese");
    }
}
