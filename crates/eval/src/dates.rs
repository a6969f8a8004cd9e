//! Calendar-date parsing and the `age` formula.

use time::macros::format_description;
use time::Date;

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// A trailing time part (`2000-06-15T08:30:00Z` or `2000-06-15 08:30`) is
/// ignored; only the date is read.
pub fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    let date_part = match s.get(10..11) {
        None => s,
        Some("T") | Some(" ") => &s[..10],
        Some(_) => return None,
    };
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

/// Whole years completed between `birth` and `today`.
///
/// A year counts once its anniversary is reached, so a person born on
/// 2000-06-15 is 23 on 2024-06-14 and 24 on 2024-06-15. An anniversary
/// that falls past the end of its month is clamped to the month's last
/// day, so a 29 February birthday is reached on 28 February in non-leap
/// years. Birth dates in the future give a non-positive count, truncated
/// toward zero.
pub fn age_in_years(birth: Date, today: Date) -> i32 {
    if birth <= today {
        completed_years(birth, today)
    } else {
        -completed_years(today, birth)
    }
}

fn completed_years(from: Date, to: Date) -> i32 {
    let mut years = to.year() - from.year();
    let anniversary_day = from.day().min(from.month().length(to.year()));
    if (u8::from(to.month()), to.day()) < (u8::from(from.month()), anniversary_day) {
        years -= 1;
    }
    years
}
