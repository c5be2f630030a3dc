mod config;
mod logging;
mod menu;
mod report;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solarlog_core::service::metrics;
use solarlog_core::{parse_entry, parse_weather, FileRecordRepository, RecordService};
use tracing::info;

use config::{config_path, log_dir, LogLevel, Settings};
use logging::LogMode;
use menu::Menu;

#[derive(Parser)]
#[command(name = "solarlog")]
#[command(about = "Record weekly solar energy production and analyse it", long_about = None)]
struct Cli {
    /// Data file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a week (usage: add Week 4 energy:120 weather:clear [month:4])
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List all entries with their positions
    #[command(alias = "ls")]
    List,
    /// Replace the entry at a 1-based position (same arguments as add)
    Edit {
        position: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Daily averages with improvement suggestions
    Averages,
    /// Total, maximum, minimum and mean weekly energy
    Stats,
    /// Text bar chart of weekly energy
    Chart,
    /// Efficiency rating per week
    Efficiency,
    /// Average weekly energy per season
    Seasonal,
    /// Show a subset of entries
    Filter {
        #[command(subcommand)]
        by: FilterBy,
    },
    /// Write all entries to another file
    Export { path: PathBuf },
    /// Replace all entries with the contents of another file
    Import { path: PathBuf },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommands>,
    },
    /// Usage tips
    Guide,
    /// Interactive menu (default)
    Menu,
}

#[derive(Subcommand)]
enum FilterBy {
    /// Entries with the given weather
    Weather { weather: String },
    /// Entries producing at least `min` kWh
    Energy {
        #[arg(allow_negative_numbers = true)]
        min: f64,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show,
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load();
    if let Some(file) = &cli.file {
        settings.data_file = Some(file.clone());
    }

    let level = cli.log_level.unwrap_or(settings.log_level);
    let mode = if cli.log_stderr { LogMode::Stderr } else { LogMode::File };
    let _log_guard = logging::init(level, mode, &log_dir());

    // Guide and settings never touch the data file, so a broken file can
    // still be pointed elsewhere with `settings set data_file`.
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Guide => println!("{}", report::GUIDE),
        Commands::Settings { action } => {
            let action = action.unwrap_or(SettingsCommands::Show);
            print!("{}", settings_command(action, &settings, level, &config_path())?);
        }
        command => {
            let mut service = open_session(&settings.data_file())?;
            run_session(command, &mut service, &settings)?;
        }
    }

    Ok(())
}

fn open_session(data_file: &Path) -> Result<RecordService<FileRecordRepository>> {
    let service = RecordService::open(FileRecordRepository::new(data_file))
        .with_context(|| format!("loading {}", data_file.display()))?;
    info!(path = %data_file.display(), count = service.records().len(), "session opened");
    Ok(service)
}

fn settings_command(
    action: SettingsCommands,
    settings: &Settings,
    level: LogLevel,
    config: &Path,
) -> Result<String> {
    match action {
        SettingsCommands::Show => Ok(format!(
            "# {}\n{}# data file in use: {}\n# log level in use: {}\n",
            config.display(),
            toml::to_string_pretty(settings)?,
            settings.data_file().display(),
            level.label()
        )),
        SettingsCommands::Set { key, value } => {
            let mut stored = Settings::try_load_from(config)?;
            stored.set(&key, &value)?;
            stored.save_to(config)?;
            Ok(format!("{} updated\n", key))
        }
    }
}

fn run_session(
    command: Commands,
    service: &mut RecordService<FileRecordRepository>,
    settings: &Settings,
) -> Result<()> {
    match command {
        Commands::Add { args } => {
            let record = parse_entry(&args, settings.min_energy)?;
            println!("Added {} ({} kWh, {})", record.week(), record.total_energy(), record.weather());
            service.add_records([record]);
            service.save()?;
        }
        Commands::List => {
            println!("{}", report::records_table(service.records()));
        }
        Commands::Edit { position, args } => {
            let record = parse_entry(&args, settings.min_energy)?;
            let previous = service.edit_record(position, record)?;
            println!("Replaced entry {} (was {})", position, previous.week());
            service.save()?;
        }
        Commands::Averages => {
            println!("{}", report::averages_table(service.records()));
        }
        Commands::Stats => {
            let stats = metrics::aggregate_statistics(service.records());
            println!("{}", report::statistics_text(stats));
        }
        Commands::Chart => {
            println!("{}", report::chart(service.records(), settings.chart_unit_kwh));
        }
        Commands::Efficiency => {
            let ratings = metrics::efficiency_ratings(service.records());
            println!("{}", report::ratings_table(&ratings));
        }
        Commands::Seasonal => {
            if service.store().is_empty() {
                println!("{}", report::NO_DATA);
            } else {
                let averages = metrics::seasonal_averages(service.records())
                    .context("seasonal analysis needs 'Week <month>' labels or month:<n>")?;
                println!("{}", report::seasonal_text(&averages));
            }
        }
        Commands::Filter { by } => {
            let filtered = match by {
                FilterBy::Weather { weather } => {
                    metrics::filter_by_weather(service.records(), parse_weather(&weather)?)
                }
                FilterBy::Energy { min } => metrics::filter_by_energy_threshold(service.records(), min),
            };
            println!("{}", report::records_table(&filtered));
        }
        Commands::Export { path } => {
            if service.store().is_empty() {
                println!("No data to save.");
            } else {
                service.export_to(&FileRecordRepository::new(path.clone()))?;
                println!("Data saved to {}", path.display());
            }
        }
        Commands::Import { path } => {
            let source = FileRecordRepository::new(path.clone());
            // Same as the menu: a missing file leaves the session untouched.
            if !source.exists() {
                println!("File does not exist.");
            } else {
                let count = service.import_from(&source)?;
                service.save()?;
                println!("Loaded {} entries from {}", count, path.display());
            }
        }
        Commands::Menu => {
            let stdin = io::stdin();
            Menu::new(service, settings, stdin.lock(), io::stdout()).run()?;
        }
        // Answered in main without opening a session.
        Commands::Guide | Commands::Settings { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn corrupt_data_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ broken").unwrap();
        path
    }

    #[test]
    fn test_corrupt_data_file_fails_session() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_session(&corrupt_data_file(&dir)).is_err());
    }

    #[test]
    fn test_settings_work_with_corrupt_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        let settings = Settings {
            data_file: Some(corrupt_data_file(&dir)),
            ..Settings::default()
        };

        let shown =
            settings_command(SettingsCommands::Show, &settings, LogLevel::Warn, &config).unwrap();
        assert!(shown.contains("bad.json"));
        assert!(shown.contains("# log level in use: warn"));

        let good = dir.path().join("good.json");
        let set = SettingsCommands::Set {
            key: "data_file".to_string(),
            value: good.display().to_string(),
        };
        settings_command(set, &settings, LogLevel::Info, &config).unwrap();
        assert_eq!(Settings::load_from(&config).data_file, Some(good));
    }

    #[test]
    fn test_settings_set_refuses_to_overwrite_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "min_energy = = 1\n").unwrap();

        let set = SettingsCommands::Set {
            key: "chart_unit_kwh".to_string(),
            value: "5".to_string(),
        };
        assert!(settings_command(set, &Settings::default(), LogLevel::Info, &config).is_err());
        assert_eq!(fs::read_to_string(&config).unwrap(), "min_energy = = 1\n");
    }

    #[test]
    fn test_filter_energy_accepts_negative_threshold() {
        let cli = Cli::try_parse_from(["solarlog", "filter", "energy", "-5"]).unwrap();
        match cli.command {
            Some(Commands::Filter {
                by: FilterBy::Energy { min },
            }) => assert_eq!(min, -5.0),
            _ => panic!("expected filter energy"),
        }
    }

    #[test]
    fn test_guide_parses_with_file_flag() {
        let cli = Cli::try_parse_from(["solarlog", "--file", "bad.json", "guide"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Guide)));
        assert_eq!(cli.file, Some(PathBuf::from("bad.json")));
    }
}
