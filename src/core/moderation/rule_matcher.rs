// Rule lookup with representation-tolerant matching.

use super::moderation_models::{ModerationRule, RuleNumber};

/// Helper for resolving a decision's rule reference against a rule set.
pub struct RuleMatcher;

impl RuleMatcher {
    /// Find the rule identified by `rule_number`, coercing between integer
    /// and string representations when the direct match fails.
    ///
    /// Rule identifiers arrive as either type depending on the source (YAML
    /// rule files vs. LLM JSON output), so `1` must match `"1"` and vice
    /// versa. Returns `None` when no coercion succeeds; the caller decides
    /// the consequence.
    pub fn find_matching_rule<'a>(
        rule_number: &RuleNumber,
        rules: &'a [ModerationRule],
    ) -> Option<&'a ModerationRule> {
        // Direct match first
        if let Some(rule) = rules.iter().find(|r| r.number == *rule_number) {
            return Some(rule);
        }

        match rule_number {
            RuleNumber::Int(n) => {
                let as_text = n.to_string();
                rules
                    .iter()
                    .find(|r| matches!(&r.number, RuleNumber::Text(t) if *t == as_text))
            }
            RuleNumber::Text(s) => {
                let as_int = s.parse::<i64>().ok()?;
                rules.iter().find(|r| r.number == RuleNumber::Int(as_int))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(number: RuleNumber, title: &str) -> ModerationRule {
        ModerationRule {
            number,
            title: title.to_string(),
            explanation: String::new(),
            response: String::new(),
        }
    }

    #[test]
    fn test_direct_int_match() {
        let rules = vec![rule(RuleNumber::Int(1), "No spam"), rule(RuleNumber::Int(2), "Be civil")];

        let found = RuleMatcher::find_matching_rule(&RuleNumber::Int(2), &rules);
        assert_eq!(found.map(|r| r.title.as_str()), Some("Be civil"));
    }

    #[test]
    fn test_int_decision_matches_string_rule() {
        let rules = vec![rule(RuleNumber::Text("1".to_string()), "No spam")];

        let found = RuleMatcher::find_matching_rule(&RuleNumber::Int(1), &rules);
        assert_eq!(found.map(|r| r.title.as_str()), Some("No spam"));
    }

    #[test]
    fn test_string_decision_matches_int_rule() {
        let rules = vec![rule(RuleNumber::Int(2), "Be civil")];

        let found = RuleMatcher::find_matching_rule(&RuleNumber::Text("2".to_string()), &rules);
        assert_eq!(found.map(|r| r.title.as_str()), Some("Be civil"));
    }

    #[test]
    fn test_non_numeric_string_fails_cleanly() {
        let rules = vec![rule(RuleNumber::Int(1), "No spam"), rule(RuleNumber::Int(2), "Be civil")];

        let found =
            RuleMatcher::find_matching_rule(&RuleNumber::Text("banana".to_string()), &rules);
        assert!(found.is_none());
    }

    #[test]
    fn test_unknown_number_not_found() {
        let rules = vec![rule(RuleNumber::Int(1), "No spam"), rule(RuleNumber::Int(2), "Be civil")];

        let found = RuleMatcher::find_matching_rule(&RuleNumber::Int(999), &rules);
        assert!(found.is_none());
    }

    #[test]
    fn test_empty_rule_set() {
        let found = RuleMatcher::find_matching_rule(&RuleNumber::Int(1), &[]);
        assert!(found.is_none());
    }
}
