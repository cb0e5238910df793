//! Feature assembly: the training-time transformation, reproduced at inference
//!
//! Composes the calendar, promotion and competition derivers with the one-hot
//! encoder, in the fixed column order the persisted schema dictates. For a
//! fixed schema the assembly is deterministic: identical records always yield
//! identical vectors.

pub mod competition;
pub mod encoder;
pub mod promo;
pub mod temporal;

use crate::errors::Result;
use crate::record::StoreDayRecord;
use crate::schema::{FeatureSchema, NumericColumn};

/// Row-major feature matrix in schema column order.
pub type FeatureMatrix = Vec<Vec<f64>>;

/// Assembles model-ready feature vectors against a fixed persisted schema.
pub struct FeatureAssembler<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    /// Assemble the ordered feature vector for a single record.
    ///
    /// Day-of-week, week-of-year and the weekend flag come from the record's
    /// date, never from the upstream day-of-week column. Fails with
    /// `MalformedRecord` when a numeric input cannot feed the model.
    pub fn assemble(&self, record: &StoreDayRecord) -> Result<Vec<f64>> {
        record.validate()?;

        let temporal = temporal::derive(record.date);
        let promo2_active = promo::is_active(
            record.promo2 == 1,
            record.promo2_since_year,
            record.promo2_since_week,
            temporal.year,
            temporal.week_of_year,
        );
        let competition_months = competition::open_months(
            record.competition_open_since_year,
            record.competition_open_since_month,
            temporal.year,
            temporal.month,
        );
        let competition_distance = record
            .competition_distance
            .unwrap_or(self.schema.competition_distance_median);

        let mut row = Vec::with_capacity(self.schema.width());
        for column in &self.schema.numeric_columns {
            let value = match column {
                NumericColumn::Store => record.store as f64,
                NumericColumn::DayOfWeek => f64::from(temporal.day_of_week),
                NumericColumn::Year => f64::from(temporal.year),
                NumericColumn::Month => f64::from(temporal.month),
                NumericColumn::Day => f64::from(temporal.day),
                NumericColumn::WeekOfYear => f64::from(temporal.week_of_year),
                NumericColumn::IsWeekend => f64::from(u8::from(temporal.is_weekend)),
                NumericColumn::Promo => f64::from(record.promo),
                NumericColumn::SchoolHoliday => f64::from(record.school_holiday),
                NumericColumn::CompetitionDistance => competition_distance,
                NumericColumn::CompetitionOpenMonths => competition_months as f64,
                NumericColumn::Promo2 => f64::from(record.promo2),
                NumericColumn::Promo2Active => f64::from(u8::from(promo2_active)),
            };
            row.push(value);
        }

        for block in &self.schema.categorical {
            row.extend(encoder::one_hot(block, block.field.value(record)));
        }

        Ok(row)
    }

    /// Assemble a batch, preserving input order.
    pub fn assemble_batch(&self, records: &[&StoreDayRecord]) -> Result<FeatureMatrix> {
        records.iter().map(|record| self.assemble(record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schema() -> FeatureSchema {
        FeatureSchema::training_default(2330.0)
    }

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
            promo2: 1,
            promo2_since_week: 10,
            promo2_since_year: 2013,
            promo_interval: "Jan,Apr,Jul,Oct".to_string(),
            open: 1,
        }
    }

    #[test]
    fn assembles_training_scenario() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let row = assembler.assemble(&record()).unwrap();

        assert_eq!(row.len(), schema.width());
        // Store, DayOfWeek, Year, Month, Day, WeekOfYear, IsWeekend
        assert_eq!(&row[..7], &[1.0, 0.0, 2014.0, 3.0, 10.0, 11.0, 0.0]);
        // Promo, SchoolHoliday, CompetitionDistance, CompetitionOpenMonths
        assert_eq!(&row[7..11], &[1.0, 0.0, 1270.0, 66.0]);
        // Promo2 participates and week 11 of 2014 is past week 10 of 2013
        assert_eq!(&row[11..13], &[1.0, 1.0]);
        // StoreType_a .. StoreType_d
        assert_eq!(&row[13..17], &[1.0, 0.0, 0.0, 0.0]);
        // Assortment_a .. Assortment_c
        assert_eq!(&row[17..20], &[0.0, 0.0, 1.0]);
        // StateHoliday_0 .. StateHoliday_c
        assert_eq!(&row[20..24], &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn assembly_is_idempotent() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let record = record();
        assert_eq!(
            assembler.assemble(&record).unwrap(),
            assembler.assemble(&record).unwrap()
        );
    }

    #[test]
    fn input_day_of_week_is_ignored() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let mut lying = record();
        lying.day_of_week = 7;
        let row = assembler.assemble(&lying).unwrap();
        // 2014-03-10 is a Monday regardless of what the input claims.
        assert_eq!(row[1], 0.0);
    }

    #[test]
    fn missing_distance_uses_persisted_median() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let mut no_distance = record();
        no_distance.competition_distance = None;
        let row = assembler.assemble(&no_distance).unwrap();
        assert_eq!(row[9], 2330.0);
    }

    #[test]
    fn unseen_category_encodes_all_zero() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let mut unseen = record();
        unseen.store_type = "e".to_string();
        let row = assembler.assemble(&unseen).unwrap();
        assert_eq!(row.len(), schema.width());
        assert_eq!(&row[13..17], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn malformed_record_is_rejected() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let mut bad = record();
        bad.competition_distance = Some(f64::INFINITY);
        assert!(assembler.assemble(&bad).is_err());
    }

    #[test]
    fn batch_preserves_order() {
        let schema = schema();
        let assembler = FeatureAssembler::new(&schema);
        let first = record();
        let mut second = record();
        second.store = 2;

        let matrix = assembler.assemble_batch(&[&first, &second]).unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0][0], 1.0);
        assert_eq!(matrix[1][0], 2.0);
    }
}
