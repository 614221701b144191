//! US/Eastern session clock used for record stamps and file names

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;

/// Current time in US/Eastern.
pub fn now_eastern() -> DateTime<Tz> {
    Utc::now().with_timezone(&Eastern)
}

/// `YYYY/MM/DD HH:MM:SS`, as written on `Downloaded:` record lines.
pub fn record_stamp(dt: &DateTime<Tz>) -> String {
    dt.format("%Y/%m/%d %H:%M:%S").to_string()
}

/// `YYYYMMDD_HHMMSS`, used in the record file name.
pub fn file_stamp(dt: &DateTime<Tz>) -> String {
    dt.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_eastern_time() {
        // 2024-01-15 17:04:05 UTC is 12:04:05 EST
        let dt = Utc
            .with_ymd_and_hms(2024, 1, 15, 17, 4, 5)
            .unwrap()
            .with_timezone(&Eastern);

        assert_eq!(record_stamp(&dt), "2024/01/15 12:04:05");
        assert_eq!(file_stamp(&dt), "20240115_120405");
    }

    #[test]
    fn follows_daylight_saving() {
        // July is EDT (UTC-4)
        let dt = Utc
            .with_ymd_and_hms(2024, 7, 1, 4, 0, 0)
            .unwrap()
            .with_timezone(&Eastern);

        assert_eq!(record_stamp(&dt), "2024/07/01 00:00:00");
    }
}
