//! Calendar-derived feature fields

use chrono::{Datelike, NaiveDate};

/// Calendar fields derived from a record's date.
///
/// `day_of_week` follows the Monday=0 .. Sunday=6 convention the model was
/// trained with; the ISO week number pairs with it for the promotion
/// activity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_week: u32,
    pub week_of_year: u32,
    pub is_weekend: bool,
}

/// Derive calendar features from a date. Pure and total for valid dates.
pub fn derive(date: NaiveDate) -> TemporalFeatures {
    let day_of_week = date.weekday().num_days_from_monday();
    TemporalFeatures {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        day_of_week,
        week_of_year: date.iso_week().week(),
        is_weekend: day_of_week >= 5,
    }
}
