//! Read-only computations over a slice of records.
//!
//! Every function treats an empty input as "no data" and returns a neutral
//! value instead of an error, so callers can print one uniform message.

use std::collections::HashMap;

use crate::error::{Result, SolarError};
use crate::model::record::{Record, Weather};
use crate::model::stats::{EnergyStats, Season, SeasonalAverages};

pub const DAYS_PER_WEEK: f64 = 7.0;
pub const EFFICIENCY_SCALE: f64 = 100.0;

/// Average daily energy keyed by week label.
///
/// Records sharing a label collapse to a single entry: the later record
/// overwrites the earlier one. Use [`daily_average_rows`] for one row per
/// record.
pub fn daily_averages(records: &[Record]) -> HashMap<String, f64> {
    records
        .iter()
        .map(|r| (r.week().to_string(), r.total_energy() / DAYS_PER_WEEK))
        .collect()
}

/// One `(week, daily average)` pair per record, in store order.
pub fn daily_average_rows(records: &[Record]) -> Vec<(String, f64)> {
    records
        .iter()
        .map(|r| (r.week().to_string(), r.total_energy() / DAYS_PER_WEEK))
        .collect()
}

pub fn suggest_for(weather: Weather) -> &'static str {
    match weather {
        Weather::Rainy | Weather::Cloudy => {
            "Consider using higher efficiency panels or adding more panels to compensate."
        }
        Weather::Clear => "Optimal conditions. Ensure maintenance is up to date for maximum efficiency.",
    }
}

/// Suggestion for a raw weather label. Labels outside the known set get a
/// generic answer rather than an error.
pub fn suggest_improvement(weather: &str) -> &'static str {
    match Weather::ALL.into_iter().find(|w| w.label() == weather) {
        Some(w) => suggest_for(w),
        None => "No specific improvements suggested.",
    }
}

pub fn aggregate_statistics(records: &[Record]) -> Option<EnergyStats> {
    let first = records.first()?.total_energy();

    let (total, max, min) = records.iter().map(Record::total_energy).fold(
        (0.0, first, first),
        |(total, max, min), e| (total + e, max.max(e), min.min(e)),
    );

    Some(EnergyStats {
        total,
        max,
        min,
        mean: total / records.len() as f64,
    })
}

/// Fixed linear rating of `total_energy / 100` per record, in store order.
pub fn efficiency_ratings(records: &[Record]) -> Vec<(String, f64)> {
    records
        .iter()
        .map(|r| (r.week().to_string(), r.total_energy() / EFFICIENCY_SCALE))
        .collect()
}

/// Month used for seasonal bucketing: the explicit month when present,
/// otherwise the number in the week label.
pub fn record_month(record: &Record) -> Result<i64> {
    if let Some(month) = record.month() {
        return Ok(i64::from(month));
    }
    record.label_number().ok_or_else(|| {
        SolarError::Format(format!(
            "'{}' has no month number (expected e.g. 'Week 4')",
            record.week()
        ))
    })
}

/// Average weekly energy per season. A single record without a usable
/// month fails the whole computation.
pub fn seasonal_averages(records: &[Record]) -> Result<SeasonalAverages> {
    let mut buckets: HashMap<Season, Vec<f64>> = HashMap::new();

    for record in records {
        let season = Season::from_month(record_month(record)?);
        buckets.entry(season).or_default().push(record.total_energy());
    }

    let mut averages = SeasonalAverages::default();
    for (season, energies) in buckets {
        let sum: f64 = energies.iter().sum();
        averages.set(season, Some(sum / energies.len() as f64));
    }
    Ok(averages)
}

pub fn filter_by_weather(records: &[Record], weather: Weather) -> Vec<Record> {
    records.iter().filter(|r| r.weather() == weather).cloned().collect()
}

pub fn filter_by_energy_threshold(records: &[Record], min_energy: f64) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.total_energy() >= min_energy)
        .cloned()
        .collect()
}
