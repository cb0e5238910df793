//! Closed-world one-hot encoding against a persisted vocabulary

use crate::schema::CategoricalBlock;

/// Encode one categorical value against its block's fixed vocabulary.
///
/// The output always has exactly `block.values.len()` entries in vocabulary
/// order. A value missing from the vocabulary yields an all-zero block; the
/// schema is closed, unseen categories never add or reorder columns.
pub fn one_hot(block: &CategoricalBlock, value: &str) -> Vec<f64> {
    block
        .values
        .iter()
        .map(|candidate| if candidate == value { 1.0 } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CategoricalField;

    fn block() -> CategoricalBlock {
        CategoricalBlock {
            field: CategoricalField::StoreType,
            values: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        }
    }

    #[test]
    fn known_value_sets_single_column() {
        assert_eq!(one_hot(&block(), "c"), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn unknown_value_is_all_zero_at_fixed_width() {
        let encoded = one_hot(&block(), "z");
        assert_eq!(encoded, vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(encoded.len(), block().values.len());
    }

    #[test]
    fn empty_value_is_all_zero() {
        assert_eq!(one_hot(&block(), ""), vec![0.0, 0.0, 0.0, 0.0]);
    }
}
