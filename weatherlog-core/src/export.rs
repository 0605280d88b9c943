//! Writes stored records out as JSON or CSV interchange files.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    error::{Error, Result},
    model::WeatherRecord,
};

/// Column order of the CSV export. Fixed; consumers rely on it.
pub const CSV_COLUMNS: [&str; 13] = [
    "id",
    "label",
    "location_type",
    "location",
    "date",
    "temp",
    "temp_min",
    "temp_max",
    "feels_like",
    "description",
    "icon",
    "local_time",
    "created_at",
];

/// Metadata block leading every JSON export.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportInfo {
    pub exported_at: String,
    pub total_records: usize,
    pub format: String,
}

/// The JSON export document: metadata plus the full record list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub export_info: ExportInfo,
    pub weather_records: Vec<WeatherRecord>,
}

pub struct Exporter {
    out_dir: PathBuf,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    /// Write `records` as a pretty-printed UTF-8 JSON document. Refuses an
    /// empty record set. Returns the path written to.
    pub fn export_json(
        &self,
        records: &[WeatherRecord],
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let path = self.prepare_path(records, filename, "json")?;

        let document = ExportDocument {
            export_info: ExportInfo {
                exported_at: Utc::now().to_rfc3339(),
                total_records: records.len(),
                format: "JSON".to_string(),
            },
            weather_records: records.to_vec(),
        };

        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        info!(path = %path.display(), count = records.len(), "exported JSON");
        Ok(path)
    }

    /// Write `records` as UTF-8 CSV with the fixed [`CSV_COLUMNS`] header.
    pub fn export_csv(&self, records: &[WeatherRecord], filename: Option<&str>) -> Result<PathBuf> {
        let path = self.prepare_path(records, filename, "csv")?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(CSV_COLUMNS)?;
        for record in records {
            writer.write_record([
                record.id.to_string(),
                record.label.clone(),
                record.location_type.to_string(),
                record.location.clone(),
                record.start_date.to_string(),
                record.temp.to_string(),
                record.temp_min.to_string(),
                record.temp_max.to_string(),
                record.feels_like.to_string(),
                record.description.clone(),
                record.icon.clone(),
                record.local_time.clone(),
                record.created_at.to_rfc3339(),
            ])?;
        }
        writer.flush()?;

        info!(path = %path.display(), count = records.len(), "exported CSV");
        Ok(path)
    }

    fn prepare_path(
        &self,
        records: &[WeatherRecord],
        filename: Option<&str>,
        extension: &str,
    ) -> Result<PathBuf> {
        if records.is_empty() {
            return Err(Error::InvalidInput("No records to export".to_string()));
        }
        fs::create_dir_all(&self.out_dir)?;
        Ok(self.out_dir.join(resolve_filename(filename, extension)))
    }
}

/// Auto-generate a timestamped name when none is given; always enforce the
/// format's extension.
fn resolve_filename(filename: Option<&str>, extension: &str) -> String {
    let mut name = match filename {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!(
            "weather_export_{}",
            Local::now().format("%Y%m%d_%H%M%S")
        ),
    };
    if Path::new(&name).extension().and_then(|e| e.to_str()) != Some(extension) {
        name.push('.');
        name.push_str(extension);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationKind;

    fn record(id: i64, label: &str) -> WeatherRecord {
        WeatherRecord {
            id,
            label: label.to_string(),
            location_type: LocationKind::City,
            location: "New York".to_string(),
            start_date: "2024-01-02".parse().unwrap(),
            end_date: "2024-01-02".parse().unwrap(),
            temp: 15.0,
            temp_min: 9.0,
            temp_max: 15.0,
            feels_like: 13.2,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            wind_speed: 3.4,
            pop: 25,
            local_time: "Tue, Jan 02 03:00 PM".to_string(),
            created_at: "2024-01-01T12:00:00Z".parse().unwrap(),
            updated_at: "2024-01-01T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn json_export_reparses_to_the_same_records() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let records = vec![record(1, "one"), record(2, "two")];

        let path = exporter.export_json(&records, Some("trip.json")).unwrap();
        let document: ExportDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(document.export_info.total_records, 2);
        assert_eq!(document.export_info.format, "JSON");
        assert_eq!(document.weather_records, records);
    }

    #[test]
    fn empty_record_set_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        assert!(exporter.export_json(&[], None).is_err());
        assert!(exporter.export_csv(&[], None).is_err());
        // Nothing written, not even the directory listing.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn csv_export_has_fixed_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let records = vec![record(1, "one"), record(2, "two")];

        let path = exporter.export_csv(&records, Some("trip")).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_COLUMNS.join(","));
        assert!(lines[1].starts_with("1,one,city,New York,2024-01-02,15,"));
    }

    #[test]
    fn extension_is_enforced_on_custom_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let records = vec![record(1, "one")];

        let path = exporter.export_json(&records, Some("notes.txt")).unwrap();
        assert_eq!(path.file_name().unwrap(), "notes.txt.json");

        let path = exporter.export_csv(&records, Some("plain")).unwrap();
        assert_eq!(path.file_name().unwrap(), "plain.csv");
    }

    #[test]
    fn missing_filename_is_auto_generated() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let records = vec![record(1, "one")];

        let path = exporter.export_json(&records, None).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("weather_export_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn export_directory_is_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports");
        let exporter = Exporter::new(&nested);

        exporter.export_csv(&[record(1, "one")], None).unwrap();
        assert!(nested.is_dir());
    }
}
