//! Rule evaluation.
//!
//! Rules are applied one after another; for each style rule every
//! declaration of the rule's kind is tested. A declaration failing several
//! rules is reported once per rule, and a rule whose pattern never matches
//! flags every declaration of its kind.

use tracing::warn;

use crate::rules::{Rule, RuleSet};
use crate::types::{DeclKind, Declaration};

/// A declaration paired with the rule it was tested against.
#[derive(Debug, Clone, Copy)]
pub struct Verdict<'a> {
    /// The tested declaration.
    pub declaration: &'a Declaration,
    /// The applied rule.
    pub rule: &'a Rule,
}

/// Result of evaluating a rule set.
#[derive(Debug, Default)]
pub struct Evaluation<'a> {
    /// Declarations that satisfied a rule.
    pub matching: Vec<Verdict<'a>>,
    /// Declarations that violated a rule, in rule order then declaration order.
    pub non_matching: Vec<Verdict<'a>>,
}

impl<'a> Evaluation<'a> {
    /// Non-matching verdicts for one declaration kind.
    pub fn violations_of(&self, kind: DeclKind) -> impl Iterator<Item = &Verdict<'a>> {
        self.non_matching
            .iter()
            .filter(move |v| v.declaration.kind == kind)
    }
}

/// Evaluates declarations against style rules.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    /// Creates an engine for `rules`.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The engine's rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Splits declarations into matching and non-matching verdicts.
    #[must_use]
    pub fn evaluate<'a>(&'a self, declarations: &'a [Declaration]) -> Evaluation<'a> {
        let mut evaluation = Evaluation::default();

        for kind in [DeclKind::Class, DeclKind::Variable, DeclKind::Method] {
            for rule in self.rules.style_rules(kind) {
                let mut any_match = false;
                let mut tested = 0;

                for declaration in declarations.iter().filter(|d| d.kind == kind) {
                    tested += 1;
                    let verdict = Verdict { declaration, rule };
                    if rule.matches(&declaration.name) {
                        any_match = true;
                        evaluation.matching.push(verdict);
                    } else {
                        evaluation.non_matching.push(verdict);
                    }
                }

                if tested > 0 && !any_match {
                    warn!(
                        "{kind} rule `{}` matched none of {tested} declaration(s); every one is reported",
                        rule.pattern_str()
                    );
                }
            }
        }

        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn style(kind: DeclKind, pattern: &str, message: &str) -> Rule {
        Rule::style(kind, pattern, message, Severity::Error).unwrap()
    }

    fn names<'a, 'b: 'a>(verdicts: impl Iterator<Item = &'a Verdict<'b>>) -> Vec<&'a str> {
        verdicts.map(|v| v.declaration.name.as_str()).collect()
    }

    #[test]
    fn splits_by_pattern() {
        let engine = RuleEngine::new(RuleSet::new(vec![style(
            DeclKind::Variable,
            "^[a-z]+$",
            "lowercase",
        )]));
        let decls = vec![
            Declaration::variable("total", None),
            Declaration::variable("Total", None),
        ];
        let eval = engine.evaluate(&decls);
        assert_eq!(names(eval.matching.iter()), vec!["total"]);
        assert_eq!(names(eval.non_matching.iter()), vec!["Total"]);
    }

    #[test]
    fn vacuous_pattern_flags_everything() {
        let engine = RuleEngine::new(RuleSet::new(vec![style(
            DeclKind::Class,
            "^$NOMATCH$",
            "never",
        )]));
        let decls = vec![Declaration::class("Foo", None), Declaration::class("Bar", None)];
        let eval = engine.evaluate(&decls);
        assert_eq!(names(eval.violations_of(DeclKind::Class)), vec!["Foo", "Bar"]);
    }

    #[test]
    fn failures_accumulate_across_rules() {
        let engine = RuleEngine::new(RuleSet::new(vec![
            style(DeclKind::Variable, "^[A-Z]", "first"),
            style(DeclKind::Variable, "_", "second"),
        ]));
        let decls = vec![Declaration::variable("count", None)];
        let eval = engine.evaluate(&decls);
        let messages: Vec<&str> = eval
            .non_matching
            .iter()
            .map(|v| v.rule.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(names(eval.non_matching.iter()), vec!["count", "count"]);
    }

    #[test]
    fn rules_only_see_their_kind() {
        let engine = RuleEngine::new(RuleSet::new(vec![style(DeclKind::Class, "^X", "x")]));
        let decls = vec![
            Declaration::variable("value", None),
            Declaration::method("run", None),
        ];
        let eval = engine.evaluate(&decls);
        assert!(eval.matching.is_empty());
        assert!(eval.non_matching.is_empty());
    }

    #[test]
    fn duplicate_declarations_are_kept() {
        let engine = RuleEngine::new(RuleSet::new(vec![style(DeclKind::Class, "^Z", "z")]));
        let decls = vec![Declaration::class("Foo", None), Declaration::class("Foo", None)];
        let eval = engine.evaluate(&decls);
        assert_eq!(eval.non_matching.len(), 2);
    }
}
