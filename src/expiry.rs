use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Target expiration: third Friday of the month two months after `reference`'s month
pub fn target_expiration(reference: NaiveDate) -> NaiveDate {
    let first_of_month = reference
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(2)))
        .unwrap_or(reference);

    let mut fridays = 0;
    let mut day = first_of_month;

    while day.month() == first_of_month.month() {
        if day.weekday() == Weekday::Fri {
            fridays += 1;
            if fridays == 3 {
                return day;
            }
        }
        day = day + Duration::days(1);
    }

    // Unreachable for real calendars
    first_of_month
}

/// Absolute distance in whole days
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}
