//! Keyword predicate construction. The configured keyword list is normalized
//! once at the boundary and compiled into escaped `LIKE` terms before the
//! query layer ever sees it.

use std::collections::HashSet;

/// Splits a comma-separated keyword list into trimmed, lowercased,
/// deduplicated terms, preserving first-occurrence order.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Validated content predicate: keyword terms with `LIKE` metacharacters
/// escaped, ready to be joined into an OR-alternation.
#[derive(Debug, Clone, Default)]
pub struct KeywordPattern {
    terms: Vec<String>,
}

impl KeywordPattern {
    pub fn build(keywords: &[String]) -> Self {
        Self {
            terms: keywords.iter().map(|term| escape_like(term)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Bind values for the alternation, one `%term%` per keyword.
    pub fn like_patterns(&self) -> impl Iterator<Item = String> + '_ {
        self.terms.iter().map(|term| format!("%{term}%"))
    }
}

/// Escapes `LIKE` wildcards so keywords match literally. Assumes the query
/// uses `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
