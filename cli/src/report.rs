use solarlog_core::service::metrics::{daily_average_rows, suggest_for};
use solarlog_core::{EnergyStats, Record, SeasonalAverages};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

pub const NO_DATA: &str = "No data available.";

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Energy (kWh)")]
    energy: String,
    #[tabled(rename = "Weather")]
    weather: String,
}

#[derive(Tabled)]
struct AverageRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "kWh/day")]
    average: String,
    #[tabled(rename = "Weather")]
    weather: String,
    #[tabled(rename = "Suggestion")]
    suggestion: String,
}

#[derive(Tabled)]
struct RatingRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

fn styled<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

/// Entries with their 1-based positions, as used by `edit`.
pub fn records_table(records: &[Record]) -> String {
    if records.is_empty() {
        return NO_DATA.to_string();
    }
    let rows = records
        .iter()
        .enumerate()
        .map(|(i, r)| RecordRow {
            index: i + 1,
            week: r.week().to_string(),
            energy: r.total_energy().to_string(),
            weather: r.weather().to_string(),
        })
        .collect();
    styled::<RecordRow>(rows)
}

pub fn averages_table(records: &[Record]) -> String {
    if records.is_empty() {
        return NO_DATA.to_string();
    }
    let rows = daily_average_rows(records)
        .into_iter()
        .zip(records)
        .map(|((week, average), r)| AverageRow {
            week,
            average: format!("{:.2}", average),
            weather: r.weather().to_string(),
            suggestion: suggest_for(r.weather()).to_string(),
        })
        .collect();
    styled::<AverageRow>(rows)
}

pub fn ratings_table(ratings: &[(String, f64)]) -> String {
    if ratings.is_empty() {
        return NO_DATA.to_string();
    }
    let rows = ratings
        .iter()
        .map(|(week, rating)| RatingRow {
            week: week.clone(),
            rating: format!("{:.2}", rating),
        })
        .collect();
    styled::<RatingRow>(rows)
}

pub fn statistics_text(stats: Option<EnergyStats>) -> String {
    match stats {
        None => NO_DATA.to_string(),
        Some(s) => format!(
            "Total energy produced: {} kWh\n\
             Maximum energy in a week: {} kWh\n\
             Minimum energy in a week: {} kWh\n\
             Average energy per week: {:.2} kWh",
            s.total, s.max, s.min, s.mean
        ),
    }
}

pub fn seasonal_text(averages: &SeasonalAverages) -> String {
    averages
        .iter()
        .map(|(season, average)| match average {
            Some(avg) => format!("{} average energy: {:.2} kWh", season.label(), avg),
            None => format!("No data for {}", season.label()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `*` per whole `unit_kwh`, truncated.
pub fn bar(energy: f64, unit_kwh: f64) -> String {
    if unit_kwh <= 0.0 || !energy.is_finite() || energy <= 0.0 {
        return String::new();
    }
    "*".repeat((energy / unit_kwh) as usize)
}

pub fn chart(records: &[Record], unit_kwh: f64) -> String {
    if records.is_empty() {
        return NO_DATA.to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{}: {} ({} kWh)",
                r.week(),
                bar(r.total_energy(), unit_kwh),
                r.total_energy()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub const GUIDE: &str = "\
1. Enter data for each week including energy and weather.
2. Use the edit feature to correct any entry mistakes.
3. Save your data regularly to avoid loss.
4. Load previously saved data to continue your work.
5. View statistics to understand trends.
6. Visualize data to get a graphical representation of energy production.
7. Conduct efficiency analysis to rate the energy output.
8. Perform seasonal analysis to understand energy trends over seasons.
9. Name weeks 'Week <month>' (or pass month:<n>) so seasonal analysis can bucket them.";
