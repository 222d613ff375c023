// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lenient `YYYY-MM-DD` date handling for display.
use chrono::{Datelike, Local, NaiveDate};

/// Parses `YYYY-MM-DD`, reading the leading digits of each component.
///
/// Returns `None` for partial dates, zero components, or calendar-invalid
/// dates.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    let y = leading_int(y)?;
    let m = leading_int(m)?;
    let d = leading_int(d)?;
    if y == 0 || m == 0 || d == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(y).ok()?, m, d)
}

fn leading_int(raw: &str) -> Option<u32> {
    let raw = raw.trim_start();
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(i, _)| i);
    raw[..end].parse().ok()
}

/// Renders `YYYY-MM-DD` as `DD/MM/YYYY`.
///
/// Values of ten or more characters that do not split into three parts are
/// returned unchanged; shorter values are not displayable.
#[must_use]
pub fn format_date(value: Option<&str>) -> Option<String> {
    let value = value?;
    if value.len() < 10 {
        return None;
    }
    let parts: Vec<&str> = value.split('-').collect();
    if let [y, m, d] = parts.as_slice() {
        return Some(format!("{d}/{m}/{y}"));
    }
    Some(value.to_owned())
}

/// Leading four characters of a date, when present.
#[must_use]
pub fn format_year(value: Option<&str>) -> Option<&str> {
    let value = value?;
    value.get(..4)
}

/// Completed years between `birth` and `death`, or `as_of` for the living.
///
/// Returns `None` when the birth date is unparseable or the result would be
/// negative.
#[must_use]
pub fn age_on(birth: Option<&str>, death: Option<&str>, as_of: NaiveDate) -> Option<u32> {
    let birth = parse_date(birth?)?;
    let end = death.and_then(parse_date).unwrap_or(as_of);
    let mut age = end.year() - birth.year();
    if (end.month(), end.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// [`age_on`] against the local calendar date.
#[must_use]
pub fn age_today(birth: Option<&str>, death: Option<&str>) -> Option<u32> {
    age_on(birth, death, Local::now().date_naive())
}
