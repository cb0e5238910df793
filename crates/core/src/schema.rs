//! Persisted feature schema: the training-time column contract
//!
//! The schema travels inside the model artifact and fixes the column set and
//! order the regressor was trained on. Inference never discovers columns from
//! the records at hand; it always encodes against this contract.

use serde::{Deserialize, Serialize};

use crate::record::StoreDayRecord;

/// Numeric (non-one-hot) model columns, named after the training data columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericColumn {
    Store,
    DayOfWeek,
    Year,
    Month,
    Day,
    WeekOfYear,
    IsWeekend,
    Promo,
    SchoolHoliday,
    CompetitionDistance,
    CompetitionOpenMonths,
    Promo2,
    Promo2Active,
}

/// Categorical record fields that expand into one-hot blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoricalField {
    StoreType,
    Assortment,
    StateHoliday,
}

impl CategoricalField {
    /// The record value this field encodes.
    pub fn value<'a>(&self, record: &'a StoreDayRecord) -> &'a str {
        match self {
            CategoricalField::StoreType => &record.store_type,
            CategoricalField::Assortment => &record.assortment,
            CategoricalField::StateHoliday => &record.state_holiday,
        }
    }

    /// Column-name prefix, matching the training pipeline's dummy columns.
    pub fn prefix(&self) -> &'static str {
        match self {
            CategoricalField::StoreType => "StoreType",
            CategoricalField::Assortment => "Assortment",
            CategoricalField::StateHoliday => "StateHoliday",
        }
    }
}

/// One categorical field and its fixed, ordered training vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalBlock {
    pub field: CategoricalField,
    pub values: Vec<String>,
}

/// The column contract carried by every model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Numeric columns in model order
    pub numeric_columns: Vec<NumericColumn>,
    /// One-hot blocks in model order, each with its closed vocabulary
    pub categorical: Vec<CategoricalBlock>,
    /// Training-dataset median substituted when a record omits its
    /// competition distance. Persisted once at training time, never
    /// recomputed per batch.
    pub competition_distance_median: f64,
}

impl FeatureSchema {
    /// Total width of the assembled feature vector.
    pub fn width(&self) -> usize {
        let one_hot: usize = self.categorical.iter().map(|b| b.values.len()).sum();
        self.numeric_columns.len() + one_hot
    }

    /// Full ordered column names, `Field_value` for one-hot columns.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .numeric_columns
            .iter()
            .map(|c| format!("{c:?}"))
            .collect();
        for block in &self.categorical {
            for value in &block.values {
                names.push(format!("{}_{}", block.field.prefix(), value));
            }
        }
        names
    }

    /// The column layout the reference training pipeline emits for the
    /// store-sales dataset. Exporters producing artifacts for that dataset
    /// start from this layout; serving always trusts the artifact's own copy.
    pub fn training_default(competition_distance_median: f64) -> Self {
        Self {
            numeric_columns: vec![
                NumericColumn::Store,
                NumericColumn::DayOfWeek,
                NumericColumn::Year,
                NumericColumn::Month,
                NumericColumn::Day,
                NumericColumn::WeekOfYear,
                NumericColumn::IsWeekend,
                NumericColumn::Promo,
                NumericColumn::SchoolHoliday,
                NumericColumn::CompetitionDistance,
                NumericColumn::CompetitionOpenMonths,
                NumericColumn::Promo2,
                NumericColumn::Promo2Active,
            ],
            categorical: vec![
                CategoricalBlock {
                    field: CategoricalField::StoreType,
                    values: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                },
                CategoricalBlock {
                    field: CategoricalField::Assortment,
                    values: vec!["a".into(), "b".into(), "c".into()],
                },
                CategoricalBlock {
                    field: CategoricalField::StateHoliday,
                    values: vec!["0".into(), "a".into(), "b".into(), "c".into()],
                },
            ],
            competition_distance_median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_default_width() {
        let schema = FeatureSchema::training_default(2330.0);
        // 13 numeric + 4 store types + 3 assortments + 4 holiday codes
        assert_eq!(schema.width(), 24);
    }

    #[test]
    fn column_names_follow_schema_order() {
        let schema = FeatureSchema::training_default(2330.0);
        let names = schema.column_names();
        assert_eq!(names.len(), schema.width());
        assert_eq!(names[0], "Store");
        assert_eq!(names[12], "Promo2Active");
        assert_eq!(names[13], "StoreType_a");
        assert_eq!(names[23], "StateHoliday_c");
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = FeatureSchema::training_default(2330.0);
        let json = serde_json::to_string(&schema).unwrap();
        let restored: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, restored);
    }

    #[test]
    fn numeric_columns_serialize_as_training_names() {
        let json = serde_json::to_string(&NumericColumn::WeekOfYear).unwrap();
        assert_eq!(json, "\"WeekOfYear\"");
    }
}
