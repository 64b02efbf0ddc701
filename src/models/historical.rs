use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One observed (year, crop, season) row of the historical dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub year: i32,
    pub crop: String,
    pub season: String,
    /// kg/hectare
    pub crop_yield: f64,
    /// lakh tonnes
    pub production: f64,
    pub area: Option<f64>,
}

impl HistoricalRecord {
    pub fn new(year: i32, crop: &str, season: &str, crop_yield: f64, production: f64) -> Self {
        Self {
            year,
            crop: crop.to_string(),
            season: season.to_string(),
            crop_yield,
            production,
            area: None,
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Yield => Some(self.crop_yield),
            Metric::Production => Some(self.production),
            Metric::Area => self.area,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Yield,
    Production,
    Area,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Yield => "Yield",
            Metric::Production => "Production",
            Metric::Area => "Area",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "yield" => Some(Metric::Yield),
            "production" => Some(Metric::Production),
            "area" => Some(Metric::Area),
            _ => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw CSV row; numeric cells that are blank or malformed come through as `None`
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Year", default, deserialize_with = "csv::invalid_option")]
    year: Option<i32>,
    #[serde(rename = "Crop", default)]
    crop: Option<String>,
    #[serde(rename = "Season", default)]
    season: Option<String>,
    #[serde(rename = "Yield", default, deserialize_with = "csv::invalid_option")]
    crop_yield: Option<f64>,
    #[serde(rename = "Production", default, deserialize_with = "csv::invalid_option")]
    production: Option<f64>,
    #[serde(rename = "Area", default, deserialize_with = "csv::invalid_option")]
    area: Option<f64>,
}

impl CsvRow {
    fn into_record(self) -> Option<HistoricalRecord> {
        let crop = self.crop.filter(|c| !c.is_empty())?;
        let season = self.season.filter(|s| !s.is_empty())?;

        Some(HistoricalRecord {
            year: self.year?,
            crop,
            season,
            // Missing measurements count as zero output
            crop_yield: self.crop_yield.filter(|v| v.is_finite()).unwrap_or(0.0),
            production: self.production.filter(|v| v.is_finite()).unwrap_or(0.0),
            area: self.area.filter(|v| v.is_finite()),
        })
    }
}

/// Immutable historical dataset, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct HistoricalData {
    records: Vec<HistoricalRecord>,
}

impl HistoricalData {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a CSV file. A missing file yields an empty dataset.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "No historical data found");
            return Ok(Self::empty());
        }

        let file = std::fs::File::open(path)?;
        let data = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = data.len(),
            "Historical data loaded"
        );
        Ok(data)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // Fail early on an unreadable header row
        reader.headers()?;

        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            match row {
                Ok(row) => match row.into_record() {
                    Some(record) => records.push(record),
                    None => warn!(row = line + 1, "Skipping row without year/crop/season"),
                },
                Err(e) => warn!(row = line + 1, error = %e, "Skipping malformed row"),
            }
        }

        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn for_crop_season<'a>(
        &'a self,
        crop: &'a str,
        season: &'a str,
    ) -> impl Iterator<Item = &'a HistoricalRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.crop == crop && r.season == season)
    }

    pub fn for_crop<'a>(&'a self, crop: &'a str) -> impl Iterator<Item = &'a HistoricalRecord> + 'a {
        self.records.iter().filter(move |r| r.crop == crop)
    }

    pub fn for_season<'a>(
        &'a self,
        season: &'a str,
    ) -> impl Iterator<Item = &'a HistoricalRecord> + 'a {
        self.records.iter().filter(move |r| r.season == season)
    }
}
