//! Athletes CSV reader.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::data_handling::{MedalCount, Record};

/// Parsed athletes ready for classification.
#[derive(Debug)]
pub struct AthleteData {
    pub records: Vec<Record>,
    /// Rows discarded for a blank or non-numeric age, height or weight.
    pub dropped_rows: usize,
}

/// Header names of the athletes file. Matching ignores case and surrounding spaces.
#[derive(Debug, Clone)]
pub struct AthleteReaderConfig {
    pub delimiter: u8,
    pub name_column: String,
    pub country_column: String,
    pub age_column: String,
    pub height_column: String,
    pub weight_column: String,
    pub gender_column: String,
    pub date_of_birth_column: String,
    pub place_of_birth_column: String,
    pub gold_column: String,
    pub silver_column: String,
    pub bronze_column: String,
    pub total_column: String,
    pub sport_column: String,
    /// First event column. Every cell from here to the end of the row is an event.
    pub event_column: String,
}

impl Default for AthleteReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            name_column: "Name".to_string(),
            country_column: "Country".to_string(),
            age_column: "Age".to_string(),
            height_column: "Height".to_string(),
            weight_column: "Weight".to_string(),
            gender_column: "Sex".to_string(),
            date_of_birth_column: "DOB".to_string(),
            place_of_birth_column: "Place of birth".to_string(),
            gold_column: "Gold".to_string(),
            silver_column: "Silver".to_string(),
            bronze_column: "Bronze".to_string(),
            total_column: "Total".to_string(),
            sport_column: "Sport".to_string(),
            event_column: "Event".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    name: Option<usize>,
    country: Option<usize>,
    age: usize,
    height: usize,
    weight: usize,
    gender: Option<usize>,
    date_of_birth: Option<usize>,
    place_of_birth: Option<usize>,
    gold: Option<usize>,
    silver: Option<usize>,
    bronze: Option<usize>,
    total: Option<usize>,
    sport: usize,
    event: usize,
}

/// Column positions of the standard athletes file, used when the header row
/// does not name a required column.
const STANDARD_LAYOUT: ColumnIndices = ColumnIndices {
    name: Some(0),
    country: Some(1),
    age: 2,
    height: 3,
    weight: 4,
    gender: Some(5),
    date_of_birth: Some(6),
    place_of_birth: Some(7),
    gold: Some(8),
    silver: Some(9),
    bronze: Some(10),
    total: Some(11),
    sport: 12,
    event: 13,
};

/// Read an athletes CSV file.
pub fn read_athletes_csv<P: AsRef<Path>>(path: P) -> Result<AthleteData> {
    read_athletes_csv_with_config(path, &AthleteReaderConfig::default())
}

/// Read an athletes CSV file using a custom configuration.
pub fn read_athletes_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &AthleteReaderConfig,
) -> Result<AthleteData> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open athletes file: {}", path.as_ref().display()))?;
    let data = read_athletes(file, config)
        .with_context(|| format!("Failed to load athletes from {}", path.as_ref().display()))?;
    log::info!(
        "Loaded {} athletes from {} ({} rows dropped)",
        data.records.len(),
        path.as_ref().display(),
        data.dropped_rows
    );
    Ok(data)
}

/// Read athletes from any reader. The first row must be the header.
///
/// Columns are found by header name. If a required header is missing but the
/// row is as wide as the standard layout (sport in column 12, events from
/// column 13), columns are read by position instead.
///
/// Rows with a blank or non-numeric age, height or weight are dropped and
/// counted; loading the same input twice gives the same records.
pub fn read_athletes<R: Read>(input: R, config: &AthleteReaderConfig) -> Result<AthleteData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read athletes header row")?
        .clone();
    let columns = resolve_columns(&headers, config)?;

    let mut records = Vec::new();
    let mut dropped_rows = 0;

    for (row_idx, result) in reader.records().enumerate() {
        // header is line 1
        let line = row_idx + 2;
        let row = result.with_context(|| format!("Failed to read line {}", line))?;

        let features = (
            parse_feature(&row, columns.age),
            parse_feature(&row, columns.height),
            parse_feature(&row, columns.weight),
        );
        let (age, height, weight) = match features {
            (Some(age), Some(height), Some(weight)) => (age, height, weight),
            _ => {
                log::debug!("Dropping line {}: missing age, height or weight", line);
                dropped_rows += 1;
                continue;
            }
        };

        let medals = MedalCount {
            gold: parse_count(&row, columns.gold, &config.gold_column, line),
            silver: parse_count(&row, columns.silver, &config.silver_column, line),
            bronze: parse_count(&row, columns.bronze, &config.bronze_column, line),
            total: parse_count(&row, columns.total, &config.total_column, line),
        };

        let events = row
            .iter()
            .skip(columns.event)
            .map(str::trim)
            .filter(|event| !event.is_empty())
            .map(str::to_string)
            .collect();

        records.push(Record {
            name: text(&row, columns.name),
            country: text(&row, columns.country),
            age,
            height,
            weight,
            gender: text(&row, columns.gender),
            date_of_birth: text(&row, columns.date_of_birth),
            place_of_birth: text(&row, columns.place_of_birth),
            medals,
            sport: text(&row, Some(columns.sport)),
            events,
        });
    }

    if dropped_rows > 0 {
        log::info!(
            "Dropped {} rows with a missing age, height or weight",
            dropped_rows
        );
    }

    Ok(AthleteData {
        records,
        dropped_rows,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name.trim()))
}

fn require_column<'a>(
    headers: &StringRecord,
    name: &'a str,
) -> std::result::Result<usize, &'a str> {
    find_column(headers, name).ok_or(name)
}

fn resolve_columns(headers: &StringRecord, config: &AthleteReaderConfig) -> Result<ColumnIndices> {
    match resolve_named_columns(headers, config) {
        Ok(columns) => Ok(columns),
        Err(missing) if headers.len() > STANDARD_LAYOUT.event => {
            log::warn!(
                "Column '{}' not found in header; reading columns by standard position",
                missing
            );
            Ok(STANDARD_LAYOUT)
        }
        Err(missing) => Err(anyhow!("Missing column '{}'", missing)),
    }
}

/// Column indices by header name, or the name of the first missing required column.
fn resolve_named_columns<'a>(
    headers: &StringRecord,
    config: &'a AthleteReaderConfig,
) -> std::result::Result<ColumnIndices, &'a str> {
    Ok(ColumnIndices {
        name: find_column(headers, &config.name_column),
        country: find_column(headers, &config.country_column),
        age: require_column(headers, &config.age_column)?,
        height: require_column(headers, &config.height_column)?,
        weight: require_column(headers, &config.weight_column)?,
        gender: find_column(headers, &config.gender_column),
        date_of_birth: find_column(headers, &config.date_of_birth_column),
        place_of_birth: find_column(headers, &config.place_of_birth_column),
        gold: find_column(headers, &config.gold_column),
        silver: find_column(headers, &config.silver_column),
        bronze: find_column(headers, &config.bronze_column),
        total: find_column(headers, &config.total_column),
        sport: require_column(headers, &config.sport_column)?,
        event: require_column(headers, &config.event_column)?,
    })
}

fn text(row: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn parse_feature(row: &StringRecord, idx: usize) -> Option<f64> {
    let value = row.get(idx)?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Medal count of one cell; blank or unreadable cells count as zero.
fn parse_count(row: &StringRecord, idx: Option<usize>, column: &str, line: usize) -> u32 {
    let value = idx.and_then(|i| row.get(i)).unwrap_or_default().trim();
    if value.is_empty() {
        return 0;
    }
    match value.parse::<u32>() {
        Ok(count) => count,
        Err(e) => {
            log::warn!(
                "Invalid {} count '{}' at line {} ({}); using 0",
                column,
                value,
                line,
                e
            );
            0
        }
    }
}
