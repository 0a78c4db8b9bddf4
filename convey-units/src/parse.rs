//! Quantity text parsing - entries like "5[kg]", "-2.5 [hour]" or "3 m"

use std::sync::OnceLock;
use regex::Regex;
use crate::error::{Result, UnitError};
use crate::{ConversionRegistry, Quantity};

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([-+]?\d*\.?\d+)\s*(?:\[\s*(\w+)\s*\]|(\w+)\s*\]?)\s*$").unwrap()
    })
}

/// Parse a single quantity entry
///
/// The unit may be bracketed (`5[kg]`), bare (`5 kg`), or bare with only
/// the closing bracket (`5 kg]`). Surrounding whitespace is ignored.
pub fn parse_quantity(text: &str, registry: &ConversionRegistry) -> Result<Quantity> {
    let caps = quantity_regex()
        .captures(text)
        .ok_or_else(|| UnitError::malformed(text.trim()))?;

    let value: f64 = caps[1]
        .parse()
        .map_err(|_| UnitError::malformed(text.trim()))?;
    let unit = caps.get(2).or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .ok_or_else(|| UnitError::malformed(text.trim()))?;

    Quantity::new(value, unit, registry)
}

/// Parse a stream of entries, each terminated by `]`
///
/// A trailing entry without brackets is accepted. Stops at the first
/// entry that fails.
pub fn parse_quantities(text: &str, registry: &ConversionRegistry) -> Result<Vec<Quantity>> {
    let mut quantities = Vec::new();
    let mut rest = text;

    while let Some(end) = rest.find(']') {
        let (entry, tail) = rest.split_at(end + 1);
        quantities.push(parse_quantity(entry, registry)?);
        rest = tail;
    }
    if !rest.trim().is_empty() {
        quantities.push(parse_quantity(rest, registry)?);
    }

    Ok(quantities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ConversionRegistry {
        let mut registry = ConversionRegistry::new();
        registry.add_rule("kg", "g", 1000.0);
        registry.add_rule("hour", "min", 60.0);
        registry
    }

    #[test]
    fn test_parse_bracketed() {
        let q = parse_quantity("5[kg]", &registry()).unwrap();
        assert_eq!(q.value(), 5.0);
        assert_eq!(q.unit(), "kg");
    }

    #[test]
    fn test_parse_with_whitespace() {
        let reg = registry();
        let q = parse_quantity("  -2.5 [ hour ]  ", &reg).unwrap();
        assert_eq!(q.value(), -2.5);
        assert_eq!(q.unit(), "hour");

        let q = parse_quantity("+.5[g]", &reg).unwrap();
        assert_eq!(q.value(), 0.5);
    }

    #[test]
    fn test_parse_bare_unit() {
        let reg = registry();
        let q = parse_quantity("30 min", &reg).unwrap();
        assert_eq!(q.value(), 30.0);
        assert_eq!(q.unit(), "min");

        let q = parse_quantity("100g", &reg).unwrap();
        assert_eq!(q.unit(), "g");
    }

    #[test]
    fn test_parse_closing_bracket_only() {
        let reg = registry();
        let q = parse_quantity("5 kg]", &reg).unwrap();
        assert_eq!(q.value(), 5.0);
        assert_eq!(q.unit(), "kg");

        let all = parse_quantities("3 kg] 2 g] -4[min]", &reg).unwrap();
        let text: Vec<String> = all.iter().map(|q| q.to_string()).collect();
        assert_eq!(text, vec!["3[kg]", "2[g]", "-4[min]"]);
    }

    #[test]
    fn test_parse_malformed() {
        let reg = registry();
        assert_eq!(parse_quantity("abc", &reg).unwrap_err(), UnitError::malformed("abc"));
        assert!(parse_quantity("5", &reg).unwrap_err().is_malformed());
        assert!(parse_quantity("5[kg", &reg).unwrap_err().is_malformed());
        assert!(parse_quantity("[kg]", &reg).unwrap_err().is_malformed());
        assert!(parse_quantity("", &reg).unwrap_err().is_malformed());
    }

    #[test]
    fn test_parse_unknown_unit() {
        let err = parse_quantity("5[lb]", &registry()).unwrap_err();
        assert_eq!(err, UnitError::unknown_unit("lb"));
    }

    #[test]
    fn test_parse_stream() {
        let reg = registry();
        let all = parse_quantities("3[hour] 20 [min]\n-1.5[kg] 7 g", &reg).unwrap();
        let text: Vec<String> = all.iter().map(|q| q.to_string()).collect();
        assert_eq!(text, vec!["3[hour]", "20[min]", "-1.5[kg]", "7[g]"]);
    }

    #[test]
    fn test_parse_stream_empty() {
        assert!(parse_quantities("   ", &registry()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_stream_fails_fast() {
        let err = parse_quantities("1[kg] x[g] 2[g]", &registry()).unwrap_err();
        assert_eq!(err, UnitError::malformed("x[g]"));
    }
}
