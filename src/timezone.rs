use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date in `canonical_timezone`, falling back to UTC if the
/// timezone is unknown.
pub fn get_local_date(canonical_timezone: &str) -> Date {
    let offset = get_local_offset(canonical_timezone).unwrap_or_else(|| {
        tracing::warn!("Unknown timezone \"{canonical_timezone}\", using UTC for today's date");
        UtcOffset::UTC
    });

    OffsetDateTime::now_utc().to_offset(offset).date()
}
