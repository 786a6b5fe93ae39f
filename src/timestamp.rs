//! Render-time timestamp shown at the top of the letter.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// IANA name of the zone the local timestamp is shown in.
pub const LOCAL_ZONE_NAME: &str = "Asia/Shanghai";

/// Abbreviation printed after the local time.
pub const LOCAL_ZONE_ABBREVIATION: &str = "CST";

// Asia/Shanghai has no daylight saving time.
const LOCAL_OFFSET_SECONDS: i32 = 8 * 3600;

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single instant, captured once per render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    utc: DateTime<Utc>,
}

impl Timestamp {
    /// Captures the current instant.
    pub fn now() -> Self {
        Self { utc: Utc::now() }
    }

    /// Wraps a fixed instant.
    pub fn at(utc: DateTime<Utc>) -> Self {
        Self { utc }
    }

    /// Returns the instant in the fixed local zone.
    pub fn local(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(LOCAL_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix());
        self.utc.with_timezone(&offset)
    }

    /// Formats the UTC line, e.g. `协调世界时: 2024-05-01 12:00:00 UTC`.
    pub fn utc_line(&self, caption: &str) -> String {
        format!("{}: {} UTC", caption, self.utc.format(FORMAT))
    }

    /// Formats the local line, e.g. `当地时间: 2024-05-01 20:00:00 CST (时区: Asia/Shanghai)`.
    pub fn local_line(&self, caption: &str, zone_caption: &str) -> String {
        format!(
            "{}: {} {} ({}: {})",
            caption,
            self.local().format(FORMAT),
            LOCAL_ZONE_ABBREVIATION,
            zone_caption,
            LOCAL_ZONE_NAME
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> Timestamp {
        Timestamp::at(Utc.with_ymd_and_hms(2024, 12, 31, 20, 30, 5).unwrap())
    }

    #[test]
    fn utc_line_uses_caption_and_suffix() {
        assert_eq!(fixed().utc_line("UTC time"), "UTC time: 2024-12-31 20:30:05 UTC");
    }

    #[test]
    fn local_line_rolls_over_the_date() {
        assert_eq!(
            fixed().local_line("Local", "zone"),
            "Local: 2025-01-01 04:30:05 CST (zone: Asia/Shanghai)"
        );
    }
}
