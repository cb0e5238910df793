//! Competitor age in months

/// Months elapsed since the nearby competitor opened, clipped at zero.
///
/// A raw negative value (opening recorded after this record's month) clips to
/// 0, so an upcoming competitor reads the same to the model as one open for 0
/// months. Since-fields left at their 0 default fall through the same formula
/// and read as a very old competitor. Both are accepted approximations
/// inherited from the training pipeline, not cases to special-case here.
pub fn open_months(since_year: i32, since_month: u32, year: i32, month: u32) -> i64 {
    let months =
        (i64::from(year) - i64::from(since_year)) * 12 + (i64::from(month) - i64::from(since_month));
    months.max(0)
}
