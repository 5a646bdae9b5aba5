use crate::market::model::PriceBar;

/// N个交易日涨跌幅（%）：最新收盘对 N 日前收盘
/// bars 按日期降序；历史不足 N+1 根或基期收盘为零时返回 None
pub fn n_session_return(bars: &[PriceBar], sessions: usize) -> Option<f64> {
    if bars.len() < sessions + 1 {
        return None;
    }
    let latest_close = bars[0].close;
    let past_close = bars[sessions].close;
    if past_close == 0.0 {
        return None;
    }
    Some((latest_close - past_close) / past_close * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                instrument_id: "2330".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
                    - chrono::Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_return_over_one_session() {
        let bars = bars(&[110.0, 100.0]);
        assert_relative_eq!(n_session_return(&bars, 1).unwrap(), 10.0);
    }

    #[test]
    fn test_return_requires_n_plus_one_bars() {
        let bars = bars(&[110.0, 105.0, 100.0]);
        assert!(n_session_return(&bars, 2).is_some());
        assert_eq!(n_session_return(&bars, 3), None);
    }

    #[test]
    fn test_return_zero_base_is_none() {
        let bars = bars(&[110.0, 0.0]);
        assert_eq!(n_session_return(&bars, 1), None);
    }
}
