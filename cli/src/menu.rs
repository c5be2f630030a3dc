use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use solarlog_core::service::metrics;
use solarlog_core::{
    infer_month, parse_energy, parse_weather, FileRecordRepository, Record, RecordRepository,
    RecordService, Weather,
};
use tracing::{info, warn};

use crate::config::Settings;
use crate::report;

const MENU: [&str; 14] = [
    "Enter new data",
    "Show all data",
    "Edit data entry",
    "Calculate averages and suggest improvements",
    "Save data to file",
    "Load data from file",
    "Show statistics",
    "Data Visualization",
    "Efficiency Analysis",
    "Seasonal Analysis",
    "Settings",
    "Help",
    "Advanced Filter View",
    "Exit",
];

/// Interactive loop over a session. Invalid answers are re-prompted; end of
/// input behaves like choosing Exit. The session is saved on exit when it
/// changed.
pub struct Menu<'a, R: RecordRepository, I: BufRead, O: Write> {
    service: &'a mut RecordService<R>,
    settings: &'a Settings,
    input: I,
    out: O,
    dirty: bool,
}

impl<'a, R: RecordRepository, I: BufRead, O: Write> Menu<'a, R, I, O> {
    pub fn new(service: &'a mut RecordService<R>, settings: &'a Settings, input: I, out: O) -> Self {
        Self {
            service,
            settings,
            input,
            out,
            dirty: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt_int("Choose an option: ")? else {
                break;
            };
            let keep_going = match choice {
                1 => self.enter_data()?,
                2 => self.show(report::records_table(self.service.records()))?,
                3 => self.edit_entry()?,
                4 => self.show(report::averages_table(self.service.records()))?,
                5 => self.save_to_file()?,
                6 => self.load_from_file()?,
                7 => self.show(report::statistics_text(metrics::aggregate_statistics(
                    self.service.records(),
                )))?,
                8 => self.show(report::chart(self.service.records(), self.settings.chart_unit_kwh))?,
                9 => {
                    let ratings = metrics::efficiency_ratings(self.service.records());
                    self.show(report::ratings_table(&ratings))?
                }
                10 => self.seasonal()?,
                11 => self.show(format!(
                    "Settings are managed with `solarlog settings`.\n{}",
                    toml::to_string_pretty(self.settings)?
                ))?,
                12 => self.show(report::GUIDE.to_string())?,
                13 => self.filter_view()?,
                14 => false,
                _ => self.show("Invalid option. Please choose again.".to_string())?,
            };
            if !keep_going {
                break;
            }
        }

        if self.dirty {
            self.service.save()?;
        }
        writeln!(self.out, "Exiting program.")?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\n|       Solar Energy Data Management       |")?;
        writeln!(self.out, "--------------------------------------------")?;
        for (i, label) in MENU.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, label)?;
        }
        writeln!(self.out, "--------------------------------------------")?;
        Ok(())
    }

    fn show(&mut self, text: String) -> Result<bool> {
        writeln!(self.out, "{}", text)?;
        Ok(true)
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_int(&mut self, prompt: &str) -> Result<Option<i64>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "Invalid input. Please enter a valid number.")?,
            }
        }
    }

    fn prompt_energy(&mut self, prompt: &str, min_energy: f64) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match parse_energy(&line, min_energy) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }
    }

    fn prompt_float(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(Some(value)),
                _ => writeln!(self.out, "Invalid input. Please enter a valid number.")?,
            }
        }
    }

    fn prompt_weather(&mut self) -> Result<Option<Weather>> {
        loop {
            let Some(line) =
                self.prompt_line("Enter the predominant weather condition (Clear, Rainy, Cloudy): ")?
            else {
                return Ok(None);
            };
            match parse_weather(&line) {
                Ok(weather) => return Ok(Some(weather)),
                Err(_) => writeln!(
                    self.out,
                    "Invalid weather condition. Please enter 'Clear', 'Rainy', or 'Cloudy'."
                )?,
            }
        }
    }

    fn prompt_week(&mut self) -> Result<Option<String>> {
        loop {
            let Some(line) = self.prompt_line("Enter the week identifier (e.g., 'Week 1'): ")? else {
                return Ok(None);
            };
            if !line.is_empty() {
                return Ok(Some(line));
            }
            writeln!(self.out, "Week identifier must not be empty.")?;
        }
    }

    fn prompt_record(&mut self) -> Result<Option<Record>> {
        let Some(week) = self.prompt_week()? else {
            return Ok(None);
        };
        let min_energy = self.settings.min_energy;
        let prompt = format!("Enter total solar energy produced in {} (in kWh): ", week);
        let Some(energy) = self.prompt_energy(&prompt, min_energy)? else {
            return Ok(None);
        };
        let Some(weather) = self.prompt_weather()? else {
            return Ok(None);
        };
        let record = Record::with_min_energy(week, energy, weather, min_energy)?;
        Ok(Some(infer_month(record)?))
    }

    fn enter_data(&mut self) -> Result<bool> {
        let Some(count) = self.prompt_int("Enter the number of weeks of data you will input: ")? else {
            return Ok(false);
        };
        let mut entered = Vec::new();
        for _ in 0..count.max(0) {
            match self.prompt_record()? {
                Some(record) => entered.push(record),
                None => break,
            }
        }
        if !entered.is_empty() {
            self.service.add_records(entered);
            self.dirty = true;
        }
        Ok(true)
    }

    fn edit_entry(&mut self) -> Result<bool> {
        if self.service.store().is_empty() {
            return self.show("No data to edit.".to_string());
        }
        let table = report::records_table(self.service.records());
        self.show(table)?;
        let Some(position) = self.prompt_int("Enter the number of the entry to edit: ")? else {
            return Ok(false);
        };
        let in_range = position >= 1 && (position as usize) <= self.service.store().len();
        if !in_range {
            warn!(position, "attempted to edit non-existent entry");
            return self.show("Invalid entry number.".to_string());
        }
        writeln!(self.out, "Enter new data:")?;
        let Some(record) = self.prompt_record()? else {
            return Ok(false);
        };
        self.service.edit_record(position as usize, record)?;
        self.dirty = true;
        Ok(true)
    }

    fn save_to_file(&mut self) -> Result<bool> {
        if self.service.store().is_empty() {
            return self.show("No data to save.".to_string());
        }
        let Some(name) = self.prompt_line("Enter filename to save data (e.g., 'solar_data.json'): ")? else {
            return Ok(false);
        };
        let target = FileRecordRepository::new(PathBuf::from(name));
        match self.service.export_to(&target) {
            Ok(()) => self.show("Data saved successfully.".to_string()),
            Err(e) => self.show(format!("Could not save data: {}", e)),
        }
    }

    fn load_from_file(&mut self) -> Result<bool> {
        let Some(name) =
            self.prompt_line("Enter filename to load data from (e.g., 'solar_data.json'): ")?
        else {
            return Ok(false);
        };
        let source = FileRecordRepository::new(PathBuf::from(name));
        // A missing file keeps the current entries instead of clearing them.
        if !source.exists() {
            warn!(path = %source.path().display(), "attempt to load non-existent file");
            return self.show("File does not exist.".to_string());
        }
        match self.service.import_from(&source) {
            Ok(count) => {
                self.dirty = true;
                info!(count, "menu load completed");
                self.show("Data loaded successfully.".to_string())
            }
            Err(e) => self.show(format!("Could not load data: {}", e)),
        }
    }

    fn seasonal(&mut self) -> Result<bool> {
        if self.service.store().is_empty() {
            return self.show(report::NO_DATA.to_string());
        }
        match metrics::seasonal_averages(self.service.records()) {
            Ok(averages) => self.show(report::seasonal_text(&averages)),
            Err(e) => self.show(format!("Seasonal analysis failed: {}", e)),
        }
    }

    fn filter_view(&mut self) -> Result<bool> {
        if self.service.store().is_empty() {
            return self.show("No data available to filter.".to_string());
        }
        writeln!(self.out, "Advanced Filter Options:")?;
        writeln!(self.out, "1. Filter by Weather Condition")?;
        writeln!(self.out, "2. Filter by Energy Threshold")?;
        let Some(choice) = self.prompt_int("Select a filter option: ")? else {
            return Ok(false);
        };
        let filtered = match choice {
            1 => {
                let Some(weather) = self.prompt_weather()? else {
                    return Ok(false);
                };
                metrics::filter_by_weather(self.service.records(), weather)
            }
            2 => {
                let Some(threshold) = self.prompt_float("Enter energy threshold (kWh): ")? else {
                    return Ok(false);
                };
                metrics::filter_by_energy_threshold(self.service.records(), threshold)
            }
            _ => return self.show("Invalid option.".to_string()),
        };
        self.show(report::records_table(&filtered))
    }
}
