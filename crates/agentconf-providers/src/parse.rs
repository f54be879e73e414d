//! Tolerant parsing of analysis responses
//!
//! The analysis service is asked for a bare JSON array but is not guaranteed
//! to honor that. Parsing runs in three tiers: strict parse of the whole
//! response, re-parse of the outermost bracketed substring, and finally
//! "no declarations found". A hard parse error never escapes this module.

use tracing::{debug, trace};

use agentconf_domain::VariableDeclaration;

/// Parse an analysis response into validated declarations
///
/// Array elements that are not well-formed declaration objects are dropped
/// individually; a response with no recognizable array yields an empty list.
pub fn parse_declarations(response: &str) -> Vec<VariableDeclaration> {
    let trimmed = response.trim();

    if let Some(declarations) = parse_array(trimmed) {
        return declarations;
    }

    if let Some(slice) = bracketed_slice(trimmed) {
        if let Some(declarations) = parse_array(slice) {
            trace!("Recovered declaration array from surrounding prose");
            return declarations;
        }
    }

    debug!(
        response_len = response.len(),
        "No declaration array found in analysis response"
    );
    Vec::new()
}

/// Strictly parse `text` as a JSON array, then leniently per element
fn parse_array(text: &str) -> Option<Vec<VariableDeclaration>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text).ok()?;
    let declarations = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<VariableDeclaration>(value).ok())
        .filter(VariableDeclaration::is_valid)
        .collect();
    Some(declarations)
}

/// Outermost `[...]` substring of `text`, if any
fn bracketed_slice(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
