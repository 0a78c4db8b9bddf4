//! Rule ingestion - lines of the form `1 <unit> = <scale> <unit>`

use std::sync::OnceLock;
use regex::Regex;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};
use crate::error::{Result, UnitError};
use crate::ConversionRegistry;

/// One conversion rule: `1 source == factor target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub source: String,
    pub target: String,
    pub factor: f64,
}

fn rule_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^1\s*(\w+)\s*=\s*(\d*\.?\d+)\s*(\w+)\s*$").unwrap()
    })
}

/// Parse a single rule line
///
/// Blank lines and `#` comments yield `Ok(None)`. The line number is only
/// used for error reporting.
pub fn parse_rule(line: &str, line_no: usize) -> Result<Option<Rule>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = || UnitError::MalformedRule { line: line_no, text: trimmed.to_string() };

    let caps = rule_regex().captures(trimmed).ok_or_else(malformed)?;
    let factor: f64 = caps[2].parse().map_err(|_| malformed())?;
    // A zero scale has no inverse
    if factor == 0.0 || !factor.is_finite() {
        return Err(malformed());
    }

    Ok(Some(Rule {
        source: caps[1].to_string(),
        target: caps[3].to_string(),
        factor,
    }))
}

impl ConversionRegistry {
    /// Build a registry from rule text
    pub fn from_rules(text: &str) -> Result<Self> {
        let mut registry = ConversionRegistry::new();
        registry.load_rules(text)?;
        Ok(registry)
    }

    /// Apply every rule in `text`, returning how many were applied
    ///
    /// Stops at the first malformed line. Rules before it stay applied.
    pub fn load_rules(&mut self, text: &str) -> Result<usize> {
        let mut applied = 0;
        for (idx, line) in text.lines().enumerate() {
            let rule = match parse_rule(line, idx + 1) {
                Ok(Some(rule)) => rule,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, applied, "rule ingestion aborted");
                    return Err(e);
                }
            };
            self.add_rule(&rule.source, &rule.target, rule.factor);
            applied += 1;
        }
        debug!(applied, units = self.len(), "rules loaded");
        Ok(applied)
    }

    /// Apply already-structured rules
    pub fn extend_rules<I: IntoIterator<Item = Rule>>(&mut self, rules: I) {
        for rule in rules {
            self.add_rule(&rule.source, &rule.target, rule.factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
1 km = 1000 m
1 m = 100 cm
1 kg = 1000 g
1 ton = 1000 kg
1 hour = 60 min
1 min = 60 sec
1 day = 24 hour
1 month = 30 day
1 year = 12 month
";

    #[test]
    fn test_parse_rule() {
        let rule = parse_rule("1 km = 1000 m", 1).unwrap().unwrap();
        assert_eq!(rule, Rule { source: "km".to_string(), target: "m".to_string(), factor: 1000.0 });

        let rule = parse_rule("1usd=3.33ils", 1).unwrap().unwrap();
        assert_eq!(rule.source, "usd");
        assert_eq!(rule.target, "ils");
        assert_eq!(rule.factor, 3.33);
    }

    #[test]
    fn test_parse_rule_skips_blank_and_comments() {
        assert_eq!(parse_rule("", 1).unwrap(), None);
        assert_eq!(parse_rule("   ", 2).unwrap(), None);
        assert_eq!(parse_rule("# currencies", 3).unwrap(), None);
    }

    #[test]
    fn test_parse_rule_malformed() {
        for line in ["2 km = 2000 m", "1 km = m", "1 km 1000 m", "1 km = -5 m", "one km = 1000 m"] {
            let err = parse_rule(line, 4).unwrap_err();
            assert_eq!(err, UnitError::MalformedRule { line: 4, text: line.to_string() });
        }
    }

    #[test]
    fn test_parse_rule_zero_scale() {
        assert!(parse_rule("1 a = 0 b", 1).unwrap_err().is_malformed());
    }

    #[test]
    fn test_load_rules() {
        let registry = ConversionRegistry::from_rules(RULES).unwrap();
        assert_eq!(registry.len(), 12);
        assert_eq!(registry.direct_factor("year", "month"), Some(12.0));
        assert_eq!(registry.direct_factor("cm", "m"), Some(0.01));
    }

    #[test]
    fn test_load_rules_stops_at_first_bad_line() {
        let mut registry = ConversionRegistry::new();
        let err = registry.load_rules("1 km = 1000 m\n\n1 kg == 1000 g\n1 hour = 60 min").unwrap_err();

        assert_eq!(err, UnitError::MalformedRule { line: 3, text: "1 kg == 1000 g".to_string() });
        assert!(registry.has_unit("km"));
        assert!(!registry.has_unit("hour"));
    }

    #[test]
    fn test_load_rules_count() {
        let mut registry = ConversionRegistry::new();
        let applied = registry.load_rules("# lengths\n1 km = 1000 m\n\n1 m = 100 cm\n").unwrap();
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_extend_rules() {
        let mut registry = ConversionRegistry::new();
        registry.extend_rules(vec![
            Rule { source: "ft".to_string(), target: "inch".to_string(), factor: 12.0 },
        ]);
        assert_eq!(registry.direct_factor("inch", "ft"), Some(1.0 / 12.0));
    }
}
