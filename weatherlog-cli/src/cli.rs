use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};

use weatherlog_core::{
    Config, DateRange, Exporter, LocationKind, LocationSpec, Units, WeatherProvider, WeatherRecord,
    WeatherStore, create_records, parse_date, provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlog", version, about = "Weather forecast journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current conditions for a location.
    Current {
        /// City name, postal code or "lat,lon" depending on --kind.
        location: String,

        /// Location type: city, zip or latlon.
        #[arg(long, default_value = "city")]
        kind: String,

        /// Unit system: metric or imperial.
        #[arg(long)]
        units: Option<String>,
    },

    /// Fetch the forecast for a date range and save one record per day.
    Create {
        /// Base label for the new records, e.g. "NYC Trip".
        label: String,

        /// City name, postal code or "lat,lon" depending on --kind.
        location: String,

        /// Location type: city, zip or latlon.
        #[arg(long, default_value = "city")]
        kind: String,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD; defaults to the start day.
        #[arg(long)]
        end: Option<String>,

        /// Unit system: metric or imperial.
        #[arg(long)]
        units: Option<String>,
    },

    /// List all saved records, most recent first.
    List,

    /// Show one record in full.
    Show { id: i64 },

    /// Change a record's label.
    Relabel { id: i64, label: String },

    /// Delete a record.
    Delete {
        id: i64,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Export all records to a file.
    Export {
        /// Output format: json, csv or both.
        #[arg(long, default_value = "json")]
        format: String,

        /// Filename; auto-generated and timestamped when omitted.
        #[arg(long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Current { location, kind, units } => {
                let spec = parse_location(&kind, &location)?;
                let units = resolve_units(&config, units)?;
                show_current(&config, &spec, units).await
            }
            Command::Create { label, location, kind, start, end, units } => {
                let spec = parse_location(&kind, &location)?;
                let units = resolve_units(&config, units)?;
                let start = parse_date(&start)?;
                let end = match end {
                    Some(end) => parse_date(&end)?,
                    None => start,
                };
                let range = DateRange::new(start, end)?;
                create(&config, &label, &spec, &range, units).await
            }
            Command::List => list(&config),
            Command::Show { id } => show(&config, id),
            Command::Relabel { id, label } => relabel(&config, id, &label),
            Command::Delete { id, yes } => delete(&config, id, yes),
            Command::Export { format, output } => export(&config, &format, output.as_deref()),
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    let key = Text::new("OpenWeather API key:")
        .prompt()
        .context("Configuration cancelled")?;
    if key.trim().is_empty() {
        bail!("API key cannot be empty");
    }

    config.set_api_key(key.trim().to_string());
    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show_current(config: &Config, spec: &LocationSpec, units: Units) -> Result<()> {
    let provider = provider_from_config(config)?;
    let current = provider.current(spec, units).await?;
    let (deg, speed) = unit_suffixes(units);

    println!("\nWeather in {}", current.location_name);
    println!("{}", "-".repeat(40));
    println!("Temperature : {}{deg} (feels like {}{deg})", current.temp, current.feels_like);
    println!("Min / Max   : {}{deg} / {}{deg}", current.temp_min, current.temp_max);
    println!("Description : {}", current.description);
    println!("Wind Speed  : {} {speed}", current.wind_speed);
    println!("Pressure    : {} hPa", current.pressure);
    println!("Humidity    : {}%", current.humidity);
    match current.visibility {
        Some(meters) => println!("Visibility  : {meters} m"),
        None => println!("Visibility  : N/A"),
    }
    println!("Cloud Cover : {}%", current.clouds_pct);
    println!("Sunrise     : {}", current.sunrise);
    println!("Sunset      : {}", current.sunset);
    println!("Local Time  : {}", current.local_time);
    println!("Icon Code   : {}", current.icon);
    Ok(())
}

async fn create(
    config: &Config,
    label: &str,
    spec: &LocationSpec,
    range: &DateRange,
    units: Units,
) -> Result<()> {
    let provider = provider_from_config(config)?;
    let store = WeatherStore::open(config.database_path()?)?;

    let outcome = create_records(&provider, &store, units, label, spec, range).await?;
    let (deg, _) = unit_suffixes(units);

    println!("Location: {}", outcome.location_name);
    println!("Created {} record(s):", outcome.created.len());
    for created in &outcome.created {
        let day = &created.day;
        println!(
            "  ID {}: {} - {}{deg} ({}-{}{deg}), {}",
            created.id, day.date, day.temp, day.temp_min, day.temp_max, day.description
        );
    }
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let store = WeatherStore::open(config.database_path()?)?;
    let records = store.read_all()?;
    if records.is_empty() {
        println!("No weather records found.");
        return Ok(());
    }

    println!(
        "{:<5} {:<25} {:<18} {:<12} {:<8} {}",
        "ID", "Label", "Location", "Date", "Temp", "Description"
    );
    println!("{}", "-".repeat(80));
    for r in &records {
        println!(
            "{:<5} {:<25} {:<18} {:<12} {:<8} {}",
            r.id,
            clip(&r.label, 24),
            clip(&r.location, 17),
            r.start_date,
            r.temp,
            clip(&r.description, 20),
        );
    }
    println!("\nTotal records: {}", records.len());
    Ok(())
}

fn show(config: &Config, id: i64) -> Result<()> {
    let store = WeatherStore::open(config.database_path()?)?;
    match store.read_by_id(id)? {
        Some(r) => print_record(&r),
        None => println!("Record {id} not found."),
    }
    Ok(())
}

fn print_record(r: &WeatherRecord) {
    println!("ID           : {}", r.id);
    println!("Label        : {}", r.label);
    println!("Location     : {} ({})", r.location, r.location_type);
    println!("Date         : {}", r.start_date);
    println!("Temperature  : {} ({}-{})", r.temp, r.temp_min, r.temp_max);
    println!("Feels Like   : {}", r.feels_like);
    println!("Description  : {}", r.description);
    println!("Wind Speed   : {}", r.wind_speed);
    println!("Precip. Prob.: {}%", r.pop);
    println!("Local Time   : {}", r.local_time);
    println!("Icon Code    : {}", r.icon);
    println!("Created At   : {}", r.created_at);
    println!("Updated At   : {}", r.updated_at);
}

fn relabel(config: &Config, id: i64, label: &str) -> Result<()> {
    let store = WeatherStore::open(config.database_path()?)?;
    if store.update_label(id, label)? {
        println!("Record {id} relabeled to '{label}'.");
    } else {
        println!("Record {id} not found.");
    }
    Ok(())
}

fn delete(config: &Config, id: i64, yes: bool) -> Result<()> {
    let store = WeatherStore::open(config.database_path()?)?;
    let Some(record) = store.read_by_id(id)? else {
        println!("Record {id} not found.");
        return Ok(());
    };

    if !yes {
        println!("About to delete '{}' ({}, {})", record.label, record.location, record.start_date);
        let confirmed = Confirm::new("Are you sure?")
            .with_default(false)
            .prompt()
            .context("Deletion cancelled")?;
        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    store.delete(id)?;
    println!("Record {id} deleted.");
    Ok(())
}

fn export(config: &Config, format: &str, output: Option<&str>) -> Result<()> {
    let store = WeatherStore::open(config.database_path()?)?;
    let records = store.read_all()?;
    let exporter = Exporter::new(config.export_dir());

    match format.to_lowercase().as_str() {
        "json" => {
            let path = exporter.export_json(&records, output)?;
            println!("Exported {} record(s) to {}", records.len(), path.display());
        }
        "csv" => {
            let path = exporter.export_csv(&records, output)?;
            println!("Exported {} record(s) to {}", records.len(), path.display());
        }
        "both" => {
            let json = exporter.export_json(&records, output)?;
            let csv = exporter.export_csv(&records, output)?;
            println!(
                "Exported {} record(s) to {} and {}",
                records.len(),
                json.display(),
                csv.display()
            );
        }
        other => bail!("Unknown export format '{other}'. Supported: json, csv, both."),
    }
    Ok(())
}

fn parse_location(kind: &str, raw: &str) -> Result<LocationSpec> {
    let kind = LocationKind::try_from(kind)?;
    Ok(LocationSpec::parse(kind, raw)?)
}

fn resolve_units(config: &Config, arg: Option<String>) -> Result<Units> {
    match arg {
        Some(s) => Ok(Units::try_from(s.as_str())?),
        None => Ok(config.units()?),
    }
}

fn unit_suffixes(units: Units) -> (&'static str, &'static str) {
    match units {
        Units::Metric => ("°C", "m/s"),
        Units::Imperial => ("°F", "mph"),
    }
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let clipped: String = s.chars().take(max).collect();
        format!("{clipped}…")
    } else {
        s.to_string()
    }
}
