//! 时间展示模块
//!
//! 远端返回 RFC 3339 格式的 `createdAt`，界面按印尼语长日期展示。
//! 解析失败时原样返回输入，避免整条列表因单个字段渲染失败。

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// 解析时间并转换到给定的 UTC 偏移（分钟，东区为正）
pub fn parse_created_at(raw: &str, utc_offset_minutes: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&offset))
}

/// 例如 `8 Januari 2022`
pub fn format_long_date(raw: &str, utc_offset_minutes: i32) -> String {
    match parse_created_at(raw, utc_offset_minutes) {
        Some(dt) => format!("{} {} {}", dt.day(), MONTHS[dt.month0() as usize], dt.year()),
        None => raw.to_string(),
    }
}

/// 例如 `Sabtu, 8 Januari 2022 pukul 13.34`
pub fn format_long_datetime(raw: &str, utc_offset_minutes: i32) -> String {
    match parse_created_at(raw, utc_offset_minutes) {
        Some(dt) => format!(
            "{}, {} {} {} pukul {:02}.{:02}",
            weekday_name(dt.weekday()),
            dt.day(),
            MONTHS[dt.month0() as usize],
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED_AT: &str = "2022-01-08T06:34:18.598Z";

    #[test]
    fn long_date_uses_indonesian_month_names() {
        assert_eq!(format_long_date(CREATED_AT, 0), "8 Januari 2022");
    }

    #[test]
    fn datetime_is_shifted_to_local_offset() {
        // WIB = UTC+7
        assert_eq!(
            format_long_datetime(CREATED_AT, 7 * 60),
            "Sabtu, 8 Januari 2022 pukul 13.34"
        );
    }

    #[test]
    fn offset_can_cross_midnight() {
        assert_eq!(format_long_date("2022-01-08T20:00:00Z", 9 * 60), "9 Januari 2022");
    }

    #[test]
    fn unparsable_input_is_returned_verbatim() {
        assert_eq!(format_long_date("yesterday", 0), "yesterday");
        assert_eq!(format_long_datetime("", 0), "");
    }
}
