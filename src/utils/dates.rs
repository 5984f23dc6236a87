//! 月份与日期辅助函数
//!
//! 账单月份统一使用 `YYYY-MM` 字符串表示。

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::errors::{Result, TutorHubError};

/// 解析 `YYYY-MM`，返回该月第一天和最后一天
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate)> {
    if month.len() != 7 || month.as_bytes().get(4) != Some(&b'-') {
        return Err(TutorHubError::validation(format!(
            "Invalid month '{month}', expected YYYY-MM"
        )));
    }
    let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| TutorHubError::validation(format!("Invalid month '{month}'")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| TutorHubError::validation(format!("Month '{month}' out of range")))?;
    Ok((first, last))
}

/// 计算某月的截止日，超过当月天数时取月末
pub fn due_date(month: &str, due_day: u32) -> Result<NaiveDate> {
    let (first, last) = month_bounds(month)?;
    let day = due_day.clamp(1, last.day());
    first
        .with_day(day)
        .ok_or_else(|| TutorHubError::validation(format!("Invalid due day {due_day}")))
}

/// 月份对应的 unix 时间戳区间 `[start, end)`
pub fn month_timestamp_range(month: &str) -> Result<(i64, i64)> {
    let (first, last) = month_bounds(month)?;
    let start = NaiveDateTime::new(first, NaiveTime::MIN).and_utc().timestamp();
    let end = NaiveDateTime::new(last, NaiveTime::MIN).and_utc().timestamp() + 86_400;
    Ok((start, end))
}

pub fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 半开区间重叠判定：`a_start < b_end && a_end > b_start`
///
/// 首尾相接（一个的结束等于另一个的开始）不算重叠。
pub fn time_ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds("2024-02").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, last) = month_bounds("2025-12").unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds_rejects_garbage() {
        assert!(month_bounds("2025-13").is_err());
        assert!(month_bounds("2025-1").is_err());
        assert!(month_bounds("202501").is_err());
        assert!(month_bounds("2025/01").is_err());
    }

    #[test]
    fn test_due_date_clamps() {
        assert_eq!(
            due_date("2025-02", 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            due_date("2025-03", 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
        assert_eq!(
            due_date("2025-03", 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_month_timestamp_range() {
        let (start, end) = month_timestamp_range("2025-01").unwrap();
        assert_eq!(end - start, 31 * 86_400);
    }

    #[test]
    fn test_overlap() {
        // 包含
        assert!(time_ranges_overlap(t(9, 0), t(11, 0), t(9, 30), t(10, 0)));
        // 部分重叠
        assert!(time_ranges_overlap(t(9, 0), t(10, 0), t(9, 30), t(10, 30)));
        // 首尾相接
        assert!(!time_ranges_overlap(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(!time_ranges_overlap(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
        // 完全分离
        assert!(!time_ranges_overlap(t(8, 0), t(9, 0), t(13, 0), t(14, 0)));
    }
}
