//! Rule-based source checks.
//!
//! A [`RuleSet`] is an ordered, declared list of regex rules. Each rule has a
//! fixed polarity: it either requires its pattern to appear in the source or
//! requires it to be absent. Evaluating a rule set yields one [`CheckResult`]
//! per rule plus a percentage score.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Passes when the pattern matches.
    Present,
    /// Passes when the pattern does not match.
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    pattern: Regex,
    polarity: Polarity,
    importance: Importance,
}

impl Rule {
    pub fn new(
        name: &str,
        pattern: &str,
        polarity: Polarity,
        importance: Importance,
        description: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            pattern: Regex::new(pattern)?,
            polarity,
            importance,
        })
    }

    pub fn present(
        name: &str,
        pattern: &str,
        importance: Importance,
        description: &str,
    ) -> Result<Self, regex::Error> {
        Self::new(name, pattern, Polarity::Present, importance, description)
    }

    pub fn absent(
        name: &str,
        pattern: &str,
        importance: Importance,
        description: &str,
    ) -> Result<Self, regex::Error> {
        Self::new(name, pattern, Polarity::Absent, importance, description)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    pub fn check(&self, code: &str) -> CheckResult {
        let matched = self.pattern.is_match(code);
        let passed = match self.polarity {
            Polarity::Present => matched,
            Polarity::Absent => !matched,
        };

        CheckResult {
            name: self.name.clone(),
            passed,
            description: self.description.clone(),
            importance: Some(self.importance),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub results: Vec<CheckResult>,
    pub score: u32,
}

impl Analysis {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: &str, rules: Vec<Rule>) -> Self {
        Self {
            name: name.to_string(),
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to `code` in declaration order.
    pub fn evaluate(&self, code: &str) -> Analysis {
        let results: Vec<CheckResult> = self.rules.iter().map(|rule| rule.check(code)).collect();
        let passed = results.iter().filter(|r| r.passed).count();

        Analysis {
            score: score(passed, results.len()),
            results,
        }
    }
}

/// `round(100 * passed / total)` with halves rounded up; `0` when `total` is 0.
pub fn score(passed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let passed = passed.min(total) as u64;
    let total = total as u64;
    ((200 * passed + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_rounding() {
        assert_eq!(score(0, 5), 0);
        assert_eq!(score(1, 5), 20);
        assert_eq!(score(1, 3), 33);
        assert_eq!(score(2, 3), 67);
        assert_eq!(score(1, 8), 13);
        assert_eq!(score(5, 5), 100);
    }

    #[test]
    fn test_score_empty_rule_set() {
        assert_eq!(score(0, 0), 0);
        let rules = RuleSet::new("empty", vec![]);
        let analysis = rules.evaluate("anything");
        assert_eq!(analysis.score, 0);
        assert!(analysis.results.is_empty());
    }

    #[test]
    fn test_polarity() {
        let present = Rule::present("Has foo", "foo", Importance::High, "needs foo").unwrap();
        let absent = Rule::absent("No bar", "bar", Importance::Low, "avoid bar").unwrap();

        assert!(present.check("foo").passed);
        assert!(!present.check("baz").passed);
        assert!(absent.check("baz").passed);
        assert!(!absent.check("bar").passed);
    }

    #[test]
    fn test_results_keep_declaration_order() {
        let rules = RuleSet::new(
            "order",
            vec![
                Rule::present("b", "b", Importance::Medium, "").unwrap(),
                Rule::present("a", "a", Importance::Medium, "").unwrap(),
            ],
        );
        let analysis = rules.evaluate("a");
        let names: Vec<&str> = analysis.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(analysis.score, 50);
        assert_eq!(analysis.passed_count(), 1);
        assert_eq!(analysis.failed().count(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Rule::present("bad", "(", Importance::Low, "").is_err());
    }
}
