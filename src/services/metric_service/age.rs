use chrono::{Datelike, NaiveDate};

/// Completed years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years - 1
    } else {
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birthday_not_yet_reached_subtracts_a_year() {
        assert_eq!(age_on(date(1990, 5, 15), date(2024, 5, 14)), 33);
        assert_eq!(age_on(date(1990, 5, 15), date(2024, 5, 15)), 34);
        assert_eq!(age_on(date(1990, 5, 15), date(2024, 12, 1)), 34);
    }

    #[test]
    fn newborn_is_zero() {
        assert_eq!(age_on(date(2024, 3, 1), date(2024, 3, 1)), 0);
    }
}
