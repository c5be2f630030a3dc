use std::collections::HashMap;

use crate::error::{Result, SolarError};
use crate::model::record::{Record, Weather};

/// Keys accepted in `key:value` entry arguments.
pub const ENTRY_KEYS: [&str; 3] = ["energy", "weather", "month"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(SolarError::Validation(format!("unknown key: '{}'", key))),
        _ => Err(SolarError::Validation(format!(
            "ambiguous key: '{}' matches {:?}",
            key, matches
        ))),
    }
}

/// Accepts finite values that are non-negative and at least `min_energy`.
pub fn validate_energy(value: f64, min_energy: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SolarError::Validation(format!("energy must be a number, got {}", value)));
    }
    if value < 0.0 || value < min_energy {
        return Err(SolarError::Validation(format!(
            "energy must be at least {}, got {}",
            min_energy.max(0.0),
            value
        )));
    }
    Ok(value)
}

pub fn parse_energy(input: &str, min_energy: f64) -> Result<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| SolarError::Validation(format!("'{}' is not a valid number", input.trim())))?;
    validate_energy(value, min_energy)
}

pub fn parse_weather(input: &str) -> Result<Weather> {
    input.parse()
}

pub fn parse_month(input: &str) -> Result<u32> {
    let month: u32 = input
        .trim()
        .parse()
        .map_err(|_| SolarError::Validation(format!("'{}' is not a valid month", input.trim())))?;
    if !(1..=12).contains(&month) {
        return Err(SolarError::Validation(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(month)
}

/// Builds a validated record from `Week 4 energy:120 weather:clear [month:4]`
/// style arguments. Keys may be abbreviated to any unique prefix.
///
/// Without an explicit `month`, the number in the week label is used when it
/// is a valid month.
pub fn parse_entry(args: &[String], min_energy: f64) -> Result<Record> {
    let parsed = parse_args(args);
    if parsed.name.trim().is_empty() {
        return Err(SolarError::Validation("week label is required".to_string()));
    }

    let mut fields = HashMap::new();
    for (key, value) in parsed.metadata {
        fields.insert(expand_key(&key, &ENTRY_KEYS)?, value);
    }

    let energy = fields
        .get("energy")
        .ok_or_else(|| SolarError::Validation("energy is required (energy:<kWh>)".to_string()))?;
    let weather = fields
        .get("weather")
        .ok_or_else(|| SolarError::Validation("weather is required (weather:<Clear|Rainy|Cloudy>)".to_string()))?;

    let record = Record::with_min_energy(
        parsed.name,
        parse_energy(energy, min_energy)?,
        parse_weather(weather)?,
        min_energy,
    )?;

    match fields.get("month") {
        Some(month) => record.with_month(parse_month(month)?),
        None => infer_month(record),
    }
}

/// Fills the month from the week label when it holds a valid month number.
pub fn infer_month(record: Record) -> Result<Record> {
    match record.label_number() {
        Some(n) if (1..=12).contains(&n) => record.with_month(n as u32),
        _ => Ok(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["Week", "4", "energy:120", "weather:clear"]));
        assert_eq!(parsed.name, "Week 4");
        assert_eq!(parsed.metadata.get("energy"), Some(&"120".to_string()));
        assert_eq!(parsed.metadata.get("weather"), Some(&"clear".to_string()));
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("e", &ENTRY_KEYS).unwrap(), "energy");
        assert_eq!(expand_key("wea", &ENTRY_KEYS).unwrap(), "weather");
        assert_eq!(expand_key("month", &ENTRY_KEYS).unwrap(), "month");
        assert!(expand_key("x", &ENTRY_KEYS).is_err());

        let candidates = ["min", "month"];
        assert!(expand_key("m", &candidates).is_err());
    }

    #[test]
    fn test_parse_energy() {
        assert_eq!(parse_energy(" 42.5 ", 0.0).unwrap(), 42.5);
        assert!(matches!(parse_energy("-1", 0.0), Err(SolarError::Validation(_))));
        assert!(parse_energy("abc", 0.0).is_err());
        assert!(parse_energy("NaN", 0.0).is_err());
        assert!(parse_energy("3", 5.0).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("12").unwrap(), 12);
        assert!(parse_month("0").is_err());
        assert!(parse_month("13").is_err());
        assert!(parse_month("june").is_err());
    }

    #[test]
    fn test_parse_entry_fills_month_from_label() {
        let record = parse_entry(&args(&["Week", "4", "e:120", "w:RAINY"]), 0.0).unwrap();
        assert_eq!(record.week(), "Week 4");
        assert_eq!(record.total_energy(), 120.0);
        assert_eq!(record.weather(), Weather::Rainy);
        assert_eq!(record.month(), Some(4));

        let record = parse_entry(&args(&["Week", "30", "e:10", "w:clear"]), 0.0).unwrap();
        assert_eq!(record.month(), None);
    }

    #[test]
    fn test_parse_entry_explicit_month_wins() {
        let record = parse_entry(&args(&["Week", "30", "e:10", "w:clear", "m:7"]), 0.0).unwrap();
        assert_eq!(record.month(), Some(7));
    }

    #[test]
    fn test_parse_entry_errors() {
        assert!(parse_entry(&args(&["e:10", "w:clear"]), 0.0).is_err());
        assert!(parse_entry(&args(&["Week", "1", "w:clear"]), 0.0).is_err());
        assert!(parse_entry(&args(&["Week", "1", "e:10"]), 0.0).is_err());
        assert!(parse_entry(&args(&["Week", "1", "e:-10", "w:clear"]), 0.0).is_err());
        assert!(parse_entry(&args(&["Week", "1", "e:10", "w:foggy"]), 0.0).is_err());
        assert!(parse_entry(&args(&["Week", "1", "e:10", "w:clear", "m:13"]), 0.0).is_err());
        assert!(parse_entry(&args(&["Week", "1", "e:10", "w:clear", "z:1"]), 0.0).is_err());
    }
}
