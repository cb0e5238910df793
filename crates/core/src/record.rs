//! Per-store, per-day input records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};

fn default_open() -> u8 {
    1
}

/// One store-day observation, as supplied by the API or the batch tables.
///
/// Wire field names are PascalCase, matching the column names of the training
/// data. Nullable upstream columns default the same way the training pipeline
/// fills them: numeric since-fields to 0, the promo interval to empty, the
/// open flag to 1. Competition distance stays `None` when absent so the
/// persisted training median can be substituted at assembly time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreDayRecord {
    pub store: i64,

    /// Day of week as supplied upstream. Carried for wire compatibility only;
    /// the feature pipeline recomputes it from `date` and never trusts it.
    pub day_of_week: u8,

    pub date: NaiveDate,
    pub promo: u8,
    pub state_holiday: String,
    pub school_holiday: u8,
    pub store_type: String,
    pub assortment: String,

    #[serde(default)]
    pub competition_distance: Option<f64>,
    #[serde(default)]
    pub competition_open_since_month: u32,
    #[serde(default)]
    pub competition_open_since_year: i32,

    pub promo2: u8,
    #[serde(default)]
    pub promo2_since_week: u32,
    #[serde(default)]
    pub promo2_since_year: i32,
    #[serde(default)]
    pub promo_interval: String,

    #[serde(default = "default_open")]
    pub open: u8,
}

impl StoreDayRecord {
    /// Whether this record passes the open-store filter.
    pub fn is_open(&self) -> bool {
        self.open == 1
    }

    /// Reject records whose numeric fields cannot feed the model.
    pub fn validate(&self) -> Result<()> {
        if let Some(distance) = self.competition_distance {
            if !distance.is_finite() {
                return Err(ForecastError::MalformedRecord(format!(
                    "store {}: competition distance is not a finite number",
                    self.store
                )));
            }
            if distance < 0.0 {
                return Err(ForecastError::MalformedRecord(format!(
                    "store {}: competition distance {} is negative",
                    self.store, distance
                )));
            }
        }

        for (name, flag) in [
            ("Promo", self.promo),
            ("SchoolHoliday", self.school_holiday),
            ("Promo2", self.promo2),
        ] {
            if flag > 1 {
                return Err(ForecastError::MalformedRecord(format!(
                    "store {}: {} flag must be 0 or 1, got {}",
                    self.store, name, flag
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StoreDayRecord {
        StoreDayRecord {
            store: 1,
            day_of_week: 1,
            date: NaiveDate::from_ymd_opt(2014, 3, 10).unwrap(),
            promo: 1,
            state_holiday: "0".to_string(),
            school_holiday: 0,
            store_type: "a".to_string(),
            assortment: "c".to_string(),
            competition_distance: Some(1270.0),
            competition_open_since_month: 9,
            competition_open_since_year: 2008,
            promo2: 0,
            promo2_since_week: 0,
            promo2_since_year: 0,
            promo_interval: String::new(),
            open: 1,
        }
    }

    #[test]
    fn deserializes_wire_format_with_defaults() {
        let json = r#"{
            "Store": 1,
            "DayOfWeek": 1,
            "Date": "2014-03-10",
            "Promo": 1,
            "StateHoliday": "0",
            "SchoolHoliday": 0,
            "StoreType": "a",
            "Assortment": "c",
            "Promo2": 0
        }"#;

        let record: StoreDayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.store, 1);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2014, 3, 10).unwrap());
        assert_eq!(record.competition_distance, None);
        assert_eq!(record.competition_open_since_year, 0);
        assert_eq!(record.promo2_since_week, 0);
        assert_eq!(record.promo_interval, "");
        assert_eq!(record.open, 1);
        assert!(record.is_open());
    }

    #[test]
    fn rejects_invalid_date() {
        let json = r#"{
            "Store": 1,
            "DayOfWeek": 1,
            "Date": "2014-02-30",
            "Promo": 1,
            "StateHoliday": "0",
            "SchoolHoliday": 0,
            "StoreType": "a",
            "Assortment": "c",
            "Promo2": 0
        }"#;

        assert!(serde_json::from_str::<StoreDayRecord>(json).is_err());
    }

    #[test]
    fn validate_accepts_well_formed_record() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_distance() {
        let mut bad = record();
        bad.competition_distance = Some(f64::NAN);
        assert!(matches!(
            bad.validate(),
            Err(ForecastError::MalformedRecord(_))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_flag() {
        let mut bad = record();
        bad.promo = 7;
        assert!(matches!(
            bad.validate(),
            Err(ForecastError::MalformedRecord(_))
        ));
    }

    #[test]
    fn closed_record_fails_open_filter() {
        let mut closed = record();
        closed.open = 0;
        assert!(!closed.is_open());
    }
}
