//! The tiered next-step algorithm.
//!
//! One shared implementation serves both the I/O-bound server navigator and
//! the cache-only client navigator. The server and client historically
//! carried separate copies of this logic; keeping a single pure function is
//! what guarantees the two can never disagree about where "Continue" goes.

use crate::resolve::PageLookup;
use crate::rules;
use intake_types::{AnswerSet, NextPageEntry};

/// Computes the next page code for `current_code`, or `None` at the end of
/// the form.
///
/// `next_page` is the current page's declaration list and `answers` the
/// answers submitted for it (`None` on a bare page load). Tiers, in strict
/// order, first match wins:
///
/// 1. **Rules** — only when answers are present: evaluate rule entries in
///    declaration order; the first rule whose condition holds and whose
///    target resolves wins. A true rule with an unresolvable target is
///    skipped, not fatal.
/// 2. **Literal fallback** — the first string entry naming an existing
///    page, whether or not any rules ran.
/// 3. **Skip targets** — with no usable literal, rule targets are presumed
///    to be branch-only pages; walk the template order past the current
///    page and take the first page that is not a rule target.
/// 4. **Sequential** — the page following the current one, or `None` when
///    the current page is last (or unknown).
pub fn next_step(
    lookup: &PageLookup,
    current_code: &str,
    next_page: &[NextPageEntry],
    answers: Option<&AnswerSet>,
) -> Option<String> {
    if let Some(answers) = answers {
        for entry in next_page {
            let NextPageEntry::Rule(rule) = entry else {
                continue;
            };
            let lhs = rules::field_value(&rule.field, current_code, answers);
            if !rules::evaluate(lhs, rule.operator.as_deref(), rule.value.as_ref()) {
                continue;
            }
            match lookup.resolve(&rule.page) {
                Some(code) => {
                    tracing::debug!(step = current_code, next = code, "branch rule matched");
                    return Some(code.to_string());
                }
                None => {
                    // Target does not resolve to a known page; treat the
                    // rule as non-matching and keep scanning.
                    tracing::warn!(
                        step = current_code,
                        field = %rule.field,
                        "branch rule target did not resolve; skipping rule"
                    );
                }
            }
        }
    }

    for entry in next_page {
        if let NextPageEntry::Code(code) = entry {
            if lookup.contains(code) {
                return Some(code.clone());
            }
        }
    }

    if !next_page.is_empty() {
        let targets: Vec<&str> = next_page
            .iter()
            .filter_map(|entry| match entry {
                NextPageEntry::Rule(rule) => lookup.resolve(&rule.page),
                NextPageEntry::Code(_) => None,
            })
            .collect();
        if !targets.is_empty() {
            if let Some(index) = lookup.index_of(current_code) {
                for code in lookup.codes().iter().skip(index + 1) {
                    if !targets.contains(&code.as_str()) {
                        return Some(code.clone());
                    }
                }
            }
        }
    }

    let index = lookup.index_of(current_code)?;
    lookup.codes().get(index + 1).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::{AnswerValue, NextPageRule, PageTarget, TemplatePage};
    use std::collections::BTreeMap;

    fn page(id: Option<i64>, code: &str, next: Vec<NextPageEntry>) -> TemplatePage {
        TemplatePage {
            id,
            code: code.to_string(),
            next_page: next,
            ..Default::default()
        }
    }

    fn rule(field: &str, operator: &str, value: &str, target: PageTarget) -> NextPageEntry {
        NextPageEntry::Rule(NextPageRule {
            field: field.to_string(),
            operator: Some(operator.to_string()),
            value: Some(AnswerValue::Text(value.to_string())),
            page: target,
        })
    }

    fn answers(entries: &[(&str, &str)]) -> AnswerSet {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), AnswerValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn test_matching_rule_beats_literal_fallback() {
        let pages = vec![
            page(
                None,
                "goal",
                vec![
                    rule("goal.type", "==", "weight-loss", PageTarget::Code("plan-a".into())),
                    NextPageEntry::Code("plan-b".into()),
                ],
            ),
            page(None, "plan-a", vec![]),
            page(None, "plan-b", vec![]),
        ];
        let lookup = PageLookup::new(&pages);

        let matched = answers(&[("type", "weight-loss")]);
        assert_eq!(
            next_step(&lookup, "goal", &pages[0].next_page, Some(&matched)),
            Some("plan-a".into())
        );

        let unmatched = answers(&[("type", "other")]);
        assert_eq!(
            next_step(&lookup, "goal", &pages[0].next_page, Some(&unmatched)),
            Some("plan-b".into())
        );
    }

    #[test]
    fn test_first_true_rule_wins_not_most_specific() {
        let pages = vec![
            page(
                None,
                "q",
                vec![
                    rule("q.x", "==", "y", PageTarget::Code("first".into())),
                    rule("q.x", "==", "y", PageTarget::Code("second".into())),
                ],
            ),
            page(None, "first", vec![]),
            page(None, "second", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        assert_eq!(
            next_step(&lookup, "q", &pages[0].next_page, Some(&answers(&[("x", "y")]))),
            Some("first".into())
        );
    }

    #[test]
    fn test_rules_never_fire_without_answers() {
        let pages = vec![
            page(
                None,
                "goal",
                vec![
                    rule("goal.type", "==", "weight-loss", PageTarget::Code("plan-a".into())),
                    NextPageEntry::Code("plan-b".into()),
                ],
            ),
            page(None, "plan-a", vec![]),
            page(None, "plan-b", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        // Bare page load: literal tier is the first reachable one.
        assert_eq!(
            next_step(&lookup, "goal", &pages[0].next_page, None),
            Some("plan-b".into())
        );
    }

    #[test]
    fn test_skip_targets_tier() {
        let pages = vec![
            page(
                None,
                "q1",
                vec![rule("q1.x", "==", "y", PageTarget::Code("special".into()))],
            ),
            page(None, "special", vec![]),
            page(None, "q2", vec![]),
            page(None, "q3", vec![]),
        ];
        let lookup = PageLookup::new(&pages);

        // Rule false: sequential flow must skip the branch-only target.
        let unmatched = answers(&[("x", "no")]);
        assert_eq!(
            next_step(&lookup, "q1", &pages[0].next_page, Some(&unmatched)),
            Some("q2".into())
        );
        // Same with no answers at all.
        assert_eq!(
            next_step(&lookup, "q1", &pages[0].next_page, None),
            Some("q2".into())
        );
        // Rule true still goes to the target.
        let matched = answers(&[("x", "y")]);
        assert_eq!(
            next_step(&lookup, "q1", &pages[0].next_page, Some(&matched)),
            Some("special".into())
        );
    }

    #[test]
    fn test_skip_targets_exhausted_falls_back_to_sequential() {
        // Every later page is a rule target; tier 3 finds nothing and the
        // sequential tier still produces a terminal decision.
        let pages = vec![
            page(
                None,
                "q1",
                vec![rule("q1.x", "==", "y", PageTarget::Code("only".into()))],
            ),
            page(None, "only", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        assert_eq!(
            next_step(&lookup, "q1", &pages[0].next_page, None),
            Some("only".into())
        );
    }

    #[test]
    fn test_sequential_fallback_and_end_of_form() {
        let pages = vec![
            page(None, "a", vec![]),
            page(None, "b", vec![]),
            page(None, "c", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        assert_eq!(next_step(&lookup, "a", &[], None), Some("b".into()));
        assert_eq!(next_step(&lookup, "b", &[], None), Some("c".into()));
        assert_eq!(next_step(&lookup, "c", &[], None), None);
        // Unknown current page has no sequential successor.
        assert_eq!(next_step(&lookup, "zz", &[], None), None);
    }

    #[test]
    fn test_rule_target_by_id_and_numeric_string() {
        let pages = vec![
            page(None, "q", vec![]),
            page(Some(7), "review", vec![]),
            page(None, "done", vec![]),
        ];
        let lookup = PageLookup::new(&pages);

        let by_id = vec![rule("q.x", "==", "y", PageTarget::Id(7))];
        let by_str = vec![rule("q.x", "==", "y", PageTarget::Code("7".into()))];
        let matched = answers(&[("x", "y")]);
        assert_eq!(
            next_step(&lookup, "q", &by_id, Some(&matched)),
            Some("review".into())
        );
        assert_eq!(
            next_step(&lookup, "q", &by_str, Some(&matched)),
            Some("review".into())
        );
    }

    #[test]
    fn test_unresolvable_target_falls_through_to_literal() {
        // A true rule whose target is unknown must not block the literal
        // fallback. Easy to mis-simplify into the skip tier; it is not.
        let pages = vec![
            page(
                None,
                "q",
                vec![
                    rule("q.x", "==", "y", PageTarget::Code("ghost".into())),
                    NextPageEntry::Code("safe".into()),
                ],
            ),
            page(None, "safe", vec![]),
            page(None, "other", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        assert_eq!(
            next_step(&lookup, "q", &pages[0].next_page, Some(&answers(&[("x", "y")]))),
            Some("safe".into())
        );
    }

    #[test]
    fn test_scoping_guard_blocks_other_step_fields() {
        let pages = vec![
            page(
                None,
                "thisStep",
                vec![rule("otherStep.q", "==", "y", PageTarget::Code("branch".into()))],
            ),
            page(None, "branch", vec![]),
            page(None, "after", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        // Even with a matching value present, a foreign prefix never fires;
        // the skip tier routes past the branch page.
        assert_eq!(
            next_step(&lookup, "thisStep", &pages[0].next_page, Some(&answers(&[("q", "y")]))),
            Some("after".into())
        );
    }

    #[test]
    fn test_literal_entry_naming_unknown_page_is_ignored() {
        let pages = vec![
            page(None, "a", vec![NextPageEntry::Code("nope".into())]),
            page(None, "b", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        assert_eq!(
            next_step(&lookup, "a", &pages[0].next_page, None),
            Some("b".into())
        );
    }

    #[test]
    fn test_determinism() {
        let pages = vec![
            page(
                None,
                "goal",
                vec![rule("goal.type", "==", "weight-loss", PageTarget::Code("plan-a".into()))],
            ),
            page(None, "plan-a", vec![]),
            page(None, "plan-b", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        let a = answers(&[("type", "weight-loss")]);
        let first = next_step(&lookup, "goal", &pages[0].next_page, Some(&a));
        let second = next_step(&lookup, "goal", &pages[0].next_page, Some(&a));
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_rules_never_panic() {
        let pages = vec![
            page(
                None,
                "q",
                vec![
                    NextPageEntry::Rule(NextPageRule {
                        field: "nodotatall".into(),
                        operator: Some("~bogus~".into()),
                        value: None,
                        page: PageTarget::Id(-1),
                    }),
                    rule("q.x", "in", "irrelevant", PageTarget::Code("b".into())),
                ],
            ),
            page(None, "b", vec![]),
        ];
        let lookup = PageLookup::new(&pages);
        // Both rules degrade; the skip tier then the sequential tier decide.
        assert_eq!(
            next_step(&lookup, "q", &pages[0].next_page, Some(&answers(&[("x", "y")]))),
            Some("b".into())
        );
    }
}
