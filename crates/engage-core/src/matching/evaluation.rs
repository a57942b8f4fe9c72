//! Rule-set evaluation for one inbound message

use std::collections::HashSet;

use super::keyword::match_keywords;
use crate::entities::{by_precedence, Rule};
use crate::value_objects::TagId;

/// A rule together with the keywords it matched
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'r> {
    pub rule: &'r Rule,
    pub keywords: Vec<String>,
}

impl<'r> RuleMatch<'r> {
    fn of(rule: &'r Rule, text: &str) -> Option<Self> {
        let keywords = match_keywords(rule.match_type, text, &rule.keywords);
        if keywords.is_empty() {
            return None;
        }
        Some(Self {
            rule,
            keywords: keywords.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Outcome of evaluating a rule set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation<'r> {
    /// The single rule whose response is sent, if any
    pub response: Option<RuleMatch<'r>>,
    /// Matched label rules, each rule at most once
    pub labels: Vec<RuleMatch<'r>>,
}

impl<'r> Evaluation<'r> {
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.response.is_some()
    }

    /// Tag ids to apply: response rule first, then label rules.
    ///
    /// Case-sensitive dedup keeping first-seen order; blank ids are skipped.
    pub fn tag_ids(&self) -> Vec<TagId> {
        let mut seen = HashSet::new();
        self.response
            .iter()
            .chain(self.labels.iter())
            .flat_map(|m| m.rule.tag_ids.iter())
            .filter(|t| !t.is_blank())
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }
}

/// Evaluate channel rules and global label rules against `text`.
///
/// Channel rules are walked newest first. The first non-label rule that
/// matches becomes the response; label rules are collected along the way and
/// never stop the walk. Global rules only contribute label matches.
pub fn evaluate<'r>(channel_rules: &'r [Rule], global_rules: &'r [Rule], text: &str) -> Evaluation<'r> {
    let mut evaluation = Evaluation::default();
    let mut seen_labels = HashSet::new();

    for rule in ordered(channel_rules.iter().filter(|r| r.is_active())) {
        if rule.is_label_rule() {
            if let Some(m) = RuleMatch::of(rule, text) {
                if seen_labels.insert(rule.id) {
                    evaluation.labels.push(m);
                }
            }
            continue;
        }

        if evaluation.response.is_none() {
            evaluation.response = RuleMatch::of(rule, text);
        }
    }

    let globals = global_rules
        .iter()
        .filter(|r| r.is_active() && r.is_label_rule());
    for rule in ordered(globals) {
        if let Some(m) = RuleMatch::of(rule, text) {
            if seen_labels.insert(rule.id) {
                evaluation.labels.push(m);
            }
        }
    }

    evaluation
}

fn ordered<'r>(rules: impl Iterator<Item = &'r Rule>) -> Vec<&'r Rule> {
    let mut rules: Vec<&Rule> = rules.collect();
    rules.sort_by(|a, b| by_precedence(a, b));
    rules
}
