//! Offline batch scoring
//!
//! Reads the two tabular inputs the training pipeline consumes, joins them on
//! the store identifier, runs the identical feature/inference pipeline, and
//! writes one (Id, Sales) row per input row with closed stores at zero.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use storecast_core::{PredictionService, StoreDayRecord};
use tracing::info;

/// Static per-store attributes from the store table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreAttributes {
    pub store: i64,
    pub store_type: String,
    pub assortment: String,
    pub competition_distance: Option<f64>,
    pub competition_open_since_month: Option<f64>,
    pub competition_open_since_year: Option<f64>,
    pub promo2: u8,
    pub promo2_since_week: Option<f64>,
    pub promo2_since_year: Option<f64>,
    pub promo_interval: Option<String>,
}

/// One row of the day-level table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DayRow {
    pub id: i64,
    pub store: i64,
    pub day_of_week: u8,
    pub date: NaiveDate,
    /// Blank for a handful of upstream rows; blank means open.
    pub open: Option<f64>,
    pub promo: u8,
    pub state_holiday: String,
    pub school_holiday: u8,
}

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    /// Rows written to the output file
    pub rows: usize,
    /// Rows that were open and therefore model-scored
    pub scored: usize,
}

/// Load the store table keyed by store identifier.
pub fn load_store_attributes(path: &Path) -> Result<HashMap<i64, StoreAttributes>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open store table {}", path.display()))?;

    let mut stores = HashMap::new();
    for (idx, row) in reader.deserialize().enumerate() {
        let attrs: StoreAttributes =
            row.with_context(|| format!("malformed store row {}", idx + 1))?;
        stores.insert(attrs.store, attrs);
    }

    if stores.is_empty() {
        bail!("store table {} is empty", path.display());
    }
    Ok(stores)
}

/// Load the day-level table in file order.
pub fn load_day_rows(path: &Path) -> Result<Vec<DayRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open day table {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize().enumerate() {
        let day: DayRow = row.with_context(|| format!("malformed day row {}", idx + 1))?;
        rows.push(day);
    }

    if rows.is_empty() {
        bail!("day table {} is empty", path.display());
    }
    Ok(rows)
}

/// Join a day row with its store's attributes into a scoring record.
///
/// Applies the same defaults as the API boundary: since-fields to 0, promo
/// interval to empty, a blank open flag to open.
pub fn join_record(day: &DayRow, attrs: &StoreAttributes) -> StoreDayRecord {
    StoreDayRecord {
        store: day.store,
        day_of_week: day.day_of_week,
        date: day.date,
        promo: day.promo,
        state_holiday: day.state_holiday.clone(),
        school_holiday: day.school_holiday,
        store_type: attrs.store_type.clone(),
        assortment: attrs.assortment.clone(),
        competition_distance: attrs.competition_distance,
        competition_open_since_month: attrs.competition_open_since_month.map_or(0, |v| v as u32),
        competition_open_since_year: attrs.competition_open_since_year.map_or(0, |v| v as i32),
        promo2: attrs.promo2,
        promo2_since_week: attrs.promo2_since_week.map_or(0, |v| v as u32),
        promo2_since_year: attrs.promo2_since_year.map_or(0, |v| v as i32),
        promo_interval: attrs.promo_interval.clone().unwrap_or_default(),
        open: day.open.map_or(1, |v| v as u8),
    }
}

/// Score the joined tables and write (Id, Sales) rows, closed stores at zero.
pub fn run(
    day_path: &Path,
    store_path: &Path,
    model_path: &Path,
    output_path: &Path,
) -> Result<BatchSummary> {
    let service =
        PredictionService::new(model_path).context("failed to load model artifact")?;
    let stores = load_store_attributes(store_path)?;
    let days = load_day_rows(day_path)?;

    let mut records = Vec::with_capacity(days.len());
    for day in &days {
        let Some(attrs) = stores.get(&day.store) else {
            bail!("day row {}: unknown store {}", day.id, day.store);
        };
        records.push(join_record(day, attrs));
    }

    let predictions = service
        .predict(&records)
        .context("batch prediction failed")?;

    // Re-merge the open-subset predictions with the full row sequence;
    // closed stores sell nothing.
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("failed to create output file {}", output_path.display()))?;
    writer.write_record(["Id", "Sales"])?;

    let mut remaining = predictions.into_iter();
    let mut scored = 0usize;
    for (day, record) in days.iter().zip(&records) {
        let sales = if record.is_open() {
            scored += 1;
            remaining
                .next()
                .context("prediction count does not cover the open rows")?
        } else {
            0.0
        };
        writer.write_record([day.id.to_string(), sales.to_string()])?;
    }
    writer.flush()?;

    info!(
        rows = days.len(),
        scored,
        output = %output_path.display(),
        "batch scoring complete"
    );

    Ok(BatchSummary {
        rows: days.len(),
        scored,
    })
}
