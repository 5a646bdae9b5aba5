use chrono::{Duration, NaiveDate};

/// 民国纪年偏移量：民国年 + 1911 = 西元年
const ROC_YEAR_OFFSET: i32 = 1911;

/// 民国年日期转西元日期，例如 "114.05.12" -> 2025-05-12
/// 交易所公告的日期字段可能带 BOM 或空白，先清理再解析
pub fn roc_to_date(roc_date: &str) -> Option<NaiveDate> {
    let cleaned = roc_date.trim().replace('\u{feff}', "");
    let mut parts = cleaned.split('.');
    let year = parts.next()?.trim().parse::<i32>().ok()? + ROC_YEAR_OFFSET;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 解析 "YYYY-MM-DD" 格式日期
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// 日期格式化为 "YYYY-MM-DD"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 日期格式化为 "YYYYMMDD"，证交所接口使用该格式
pub fn format_date_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// 计算自然日回溯区间 [end - days, end]
pub fn date_range(end: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (end - Duration::days(days), end)
}

/// 区间内的全部自然日（含首尾）
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current = current + Duration::days(1);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_to_date() {
        assert_eq!(
            roc_to_date("114.05.12"),
            NaiveDate::from_ymd_opt(2025, 5, 12)
        );
        // 带 BOM 与空白
        assert_eq!(
            roc_to_date("\u{feff} 113.01.02 "),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_roc_to_date_invalid() {
        assert_eq!(roc_to_date(""), None);
        assert_eq!(roc_to_date("2025-05-12"), None);
        assert_eq!(roc_to_date("114.13.01"), None);
    }

    #[test]
    fn test_days_between() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(days_between(start, end).len(), 3);
    }
}
