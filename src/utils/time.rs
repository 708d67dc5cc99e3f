use chrono::NaiveDate;

/// This is the standard way of converting a date to a date-key in the planner.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Month and day only, used for compact chart labels.
pub fn short_date_key(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_key, short_date_key};

    #[test]
    fn test_date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(date_key(date), "2025-03-07");
        assert_eq!(short_date_key(date), "03-07");
    }
}
