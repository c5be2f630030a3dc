use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolarError};
use crate::input::validate_energy;

/// Minimum weekly energy accepted when no other minimum is configured.
pub const DEFAULT_MIN_ENERGY: f64 = 0.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    Clear,
    Rainy,
    Cloudy,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rainy, Weather::Cloudy];

    pub fn label(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Rainy => "Rainy",
            Weather::Cloudy => "Cloudy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weather {
    type Err = SolarError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Weather::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                SolarError::Validation(format!(
                    "unknown weather '{}', expected Clear, Rainy or Cloudy",
                    trimmed
                ))
            })
    }
}

/// One week's solar production entry.
///
/// Fields are private so that every record built in code has passed
/// validation. Records read back from disk are trusted as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Record {
    week: String,
    total_energy: f64,
    weather: Weather,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month: Option<u32>,
}

impl Record {
    pub fn new(week: impl Into<String>, total_energy: f64, weather: Weather) -> Result<Self> {
        Self::with_min_energy(week, total_energy, weather, DEFAULT_MIN_ENERGY)
    }

    /// Like [`Record::new`] but also rejects energy below `min_energy`.
    pub fn with_min_energy(
        week: impl Into<String>,
        total_energy: f64,
        weather: Weather,
        min_energy: f64,
    ) -> Result<Self> {
        let week = week.into();
        if week.trim().is_empty() {
            return Err(SolarError::Validation("week label must not be empty".to_string()));
        }
        let total_energy = validate_energy(total_energy, min_energy)?;

        Ok(Self {
            week,
            total_energy,
            weather,
            month: None,
        })
    }

    pub fn with_month(mut self, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SolarError::Validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        self.month = Some(month);
        Ok(self)
    }

    pub fn week(&self) -> &str {
        &self.week
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    /// Integer carried by the second whitespace token of the week label,
    /// e.g. `4` for `"Week 4"`.
    pub fn label_number(&self) -> Option<i64> {
        self.week.split_whitespace().nth(1)?.parse().ok()
    }
}
