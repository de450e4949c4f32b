use chrono::{Datelike, NaiveDate, Weekday};

/// last calendar day of the month containing `date`
///
/// advances to day 1 of the next month and steps back one day, which handles
/// month lengths and leap years without a lookup table
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// whole months elapsed between two dates, floored at zero
///
/// billing policy: an end date landing exactly on the 1st of a month does not
/// count that month as entered, so the end is first rewound to the last day of
/// the previous month. after the rewind, one further month is subtracted when
/// the end day-of-month is earlier than the start day-of-month.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let end = first_of_month_rewind(end);

    let mut diff =
        (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    if end.day() < start.day() {
        diff -= 1;
    }
    diff.max(0) as u32
}

/// rewind a first-of-month date to the last day of the previous month
fn first_of_month_rewind(date: NaiveDate) -> NaiveDate {
    if date.day() == 1 {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

/// count occurrences of `weekday` from `start` to `end` inclusive
///
/// O(days in range); ranges here are course windows of at most a few hundred days
pub fn count_weekday_occurrences(weekday: Weekday, start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| day.weekday() == weekday)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_of_month_all_lengths() {
        assert_eq!(end_of_month(date(2024, 1, 15)), date(2024, 1, 31));
        assert_eq!(end_of_month(date(2024, 4, 1)), date(2024, 4, 30));
        assert_eq!(end_of_month(date(2024, 2, 10)), date(2024, 2, 29)); // leap year
        assert_eq!(end_of_month(date(2023, 2, 10)), date(2023, 2, 28));
        assert_eq!(end_of_month(date(2023, 12, 31)), date(2023, 12, 31));
    }

    #[test]
    fn test_end_of_month_plus_one_is_first_of_next() {
        for month in 1..=12 {
            let eom = end_of_month(date(2024, month, 5));
            let next = eom + Duration::days(1);
            assert_eq!(next.day(), 1);
        }
    }

    #[test]
    fn test_months_between_same_date() {
        assert_eq!(months_between(date(2024, 3, 15), date(2024, 3, 15)), 0);
    }

    #[test]
    fn test_months_between_within_month() {
        assert_eq!(months_between(date(2024, 3, 1), date(2024, 3, 31)), 0);
        assert_eq!(months_between(date(2024, 3, 1), end_of_month(date(2024, 3, 1))), 0);
    }

    #[test]
    fn test_months_between_crossing_boundary() {
        // the day after end-of-month is the 1st, which the rewind policy
        // hands back to the previous month; one day further enters april
        let eom = end_of_month(date(2024, 3, 1));
        assert_eq!(months_between(date(2024, 3, 1), eom + Duration::days(1)), 0);
        assert_eq!(months_between(date(2024, 3, 1), eom + Duration::days(2)), 1);
        assert_eq!(months_between(date(2024, 3, 1), date(2024, 6, 30)), 3);
    }

    #[test]
    fn test_first_of_month_rewind_policy() {
        // ending exactly on the 1st does not enter that month
        assert_eq!(months_between(date(2024, 3, 1), date(2024, 4, 1)), 0);
        assert_eq!(months_between(date(2024, 3, 1), date(2024, 4, 2)), 1);
        // january 1st rewinds across the year boundary
        assert_eq!(months_between(date(2023, 12, 1), date(2024, 1, 1)), 0);
        assert_eq!(months_between(date(2023, 11, 15), date(2024, 1, 1)), 1);
        // march 1st rewinds to february 29th on a leap year
        assert_eq!(months_between(date(2024, 1, 29), date(2024, 3, 1)), 1);
    }

    #[test]
    fn test_months_between_partial_month_subtraction() {
        // end day before start day means the last month is not complete
        assert_eq!(months_between(date(2024, 1, 20), date(2024, 3, 10)), 1);
        assert_eq!(months_between(date(2024, 1, 20), date(2024, 3, 20)), 2);
    }

    #[test]
    fn test_months_between_never_negative() {
        assert_eq!(months_between(date(2024, 5, 10), date(2024, 5, 12)), 0);
        assert_eq!(months_between(date(2024, 5, 10), date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_weekday_count_march_2024() {
        // march 2024 mondays: 4, 11, 18, 25
        assert_eq!(
            count_weekday_occurrences(Weekday::Mon, date(2024, 3, 1), date(2024, 3, 31)),
            4
        );
        assert_eq!(
            count_weekday_occurrences(Weekday::Mon, date(2024, 3, 1), date(2024, 3, 15)),
            2
        );
        // march 2024 fridays: 1, 8, 15, 22, 29
        assert_eq!(
            count_weekday_occurrences(Weekday::Fri, date(2024, 3, 1), date(2024, 3, 31)),
            5
        );
    }

    #[test]
    fn test_weekday_count_full_month_is_four_or_five() {
        for month in 1..=12 {
            let start = date(2024, month, 1);
            let end = end_of_month(start);
            for weekday in [
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
            ] {
                let count = count_weekday_occurrences(weekday, start, end);
                assert!((4..=5).contains(&count), "{month} {weekday}: {count}");
            }
        }
    }

    #[test]
    fn test_weekday_count_inverted_range() {
        assert_eq!(
            count_weekday_occurrences(Weekday::Mon, date(2024, 3, 15), date(2024, 3, 1)),
            0
        );
    }
}
