//! Rule-target resolution within one template.
//!
//! A rule's `page` target may be a numeric page id, a page code, or a
//! numeric-looking string; resolution always lands on a canonical page
//! code, or nothing when the target is unknown. Resolution failure is
//! recovered locally by the caller (the rule is treated as non-matching),
//! never surfaced as an error.

use intake_types::{PageTarget, TemplatePage};
use std::collections::{HashMap, HashSet};

/// Precomputed per-template page lookup.
///
/// Holds the ordered code list (template order is the fallback traversal
/// order), a membership set, and the id-to-code map that rule targets
/// referencing page ids resolve through. The same structure backs the
/// server navigator (built from full pages) and the client navigator
/// (rebuilt from the read path's payload).
#[derive(Debug, Clone)]
pub struct PageLookup {
    codes: Vec<String>,
    code_set: HashSet<String>,
    id_to_code: HashMap<String, String>,
}

impl PageLookup {
    /// Builds a lookup from a template's ordered pages.
    pub fn new(pages: &[TemplatePage]) -> Self {
        let codes: Vec<String> = pages.iter().map(|p| p.code.clone()).collect();
        let id_to_code = pages
            .iter()
            .filter_map(|p| p.id.map(|id| (id.to_string(), p.code.clone())))
            .collect();
        Self::from_parts(codes, id_to_code)
    }

    /// Rebuilds a lookup from the pieces a client caches: the ordered step
    /// codes and the id-to-code map served by the read path.
    pub fn from_parts(codes: Vec<String>, id_to_code: HashMap<String, String>) -> Self {
        let code_set = codes.iter().cloned().collect();
        Self {
            codes,
            code_set,
            id_to_code,
        }
    }

    /// Ordered page codes, in template order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.code_set.contains(code)
    }

    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }

    pub fn first(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }

    pub fn id_to_code(&self) -> &HashMap<String, String> {
        &self.id_to_code
    }

    /// Resolves a rule target to a known page code.
    ///
    /// Numeric ids go through the id map. Numeric-looking strings are tried
    /// as an id first and fall back to a literal code; plain strings are
    /// literal codes. Either way the result is confirmed against the known
    /// code set, so an unknown target resolves to `None`.
    pub fn resolve(&self, target: &PageTarget) -> Option<&str> {
        match target {
            PageTarget::Id(id) => self.id_to_code.get(&id.to_string()).map(String::as_str),
            PageTarget::Code(code) => {
                if let Some(key) = numeric_id_key(code) {
                    if let Some(resolved) = self.id_to_code.get(&key) {
                        return Some(resolved);
                    }
                }
                self.code_set.get(code).map(String::as_str)
            }
        }
    }
}

/// Canonical id-map key for a numeric-looking string, if it is one.
fn numeric_id_key(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id.to_string());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|_| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::TemplatePage;

    fn page(id: Option<i64>, code: &str) -> TemplatePage {
        TemplatePage {
            id,
            code: code.to_string(),
            ..Default::default()
        }
    }

    fn lookup() -> PageLookup {
        PageLookup::new(&[
            page(Some(7), "review"),
            page(None, "goal"),
            page(Some(12), "plan-a"),
        ])
    }

    #[test]
    fn test_numeric_id_resolves_via_map() {
        let lk = lookup();
        assert_eq!(lk.resolve(&PageTarget::Id(7)), Some("review"));
        assert_eq!(lk.resolve(&PageTarget::Id(99)), None);
    }

    #[test]
    fn test_code_resolves_directly() {
        let lk = lookup();
        assert_eq!(lk.resolve(&PageTarget::Code("goal".into())), Some("goal"));
        assert_eq!(lk.resolve(&PageTarget::Code("missing".into())), None);
    }

    #[test]
    fn test_numeric_looking_string_tries_id_first() {
        let lk = lookup();
        assert_eq!(lk.resolve(&PageTarget::Code("7".into())), Some("review"));
        // Not an id, and not a code either.
        assert_eq!(lk.resolve(&PageTarget::Code("99".into())), None);
    }

    #[test]
    fn test_numeric_looking_string_falls_back_to_literal_code() {
        // A template whose page codes happen to be digits.
        let lk = PageLookup::new(&[page(None, "1"), page(None, "2")]);
        assert_eq!(lk.resolve(&PageTarget::Code("2".into())), Some("2"));
    }

    #[test]
    fn test_client_side_lookup_from_parts_matches() {
        let server = lookup();
        let client = PageLookup::from_parts(
            server.codes().to_vec(),
            server.id_to_code().clone(),
        );
        assert_eq!(client.resolve(&PageTarget::Id(12)), Some("plan-a"));
        assert_eq!(client.resolve(&PageTarget::Code("goal".into())), Some("goal"));
        assert_eq!(client.index_of("plan-a"), Some(2));
    }
}
