use chrono::NaiveDate;
use serde::Serialize;

use crate::market::model::PriceBar;

/// 振幅触发门槛（%）：当日最高价-最低价超过昨收的 9%
/// 官方条件还要求与大盘差幅达标，此处取简化常数近似
const AMPLITUDE_TRIGGER_PCT: f64 = 9.0;
/// 涨跌幅触发门槛（%）
const CHANGE_TRIGGER_PCT: f64 = 6.0;
/// 周转率触发门槛（%），仅供参考：无发行股数数据无法精确计算
const TURNOVER_TRIGGER_PCT: f64 = 10.0;

/// 明日触发注意股的各档门槛，基于最近两根日K推算，算出后不再变更
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSet {
    pub instrument_id: String,
    pub latest_date: NaiveDate,
    pub latest_close: f64,
    pub prev_close: f64,
    pub amplitude_pct: f64,
    pub amplitude_upper: f64,
    pub amplitude_lower: f64,
    pub change_pct: f64,
    pub change_up_price: f64,
    pub change_down_price: f64,
    pub turnover_pct: f64,
    /// 窗口内平均成交量（股），周转率估算的唯一参考值
    pub avg_volume: f64,
}

/// 推算明日注意股门槛
///
/// bars 按日期降序，通常取最近 10 根。无任何K线返回 None；
/// 仅一根时以最新收盘价充当昨收的降级处理。
pub fn calculate_thresholds(instrument_id: &str, bars: &[PriceBar]) -> Option<ThresholdSet> {
    let latest = bars.first()?;
    let prev_close = if bars.len() >= 2 {
        bars[1].close
    } else {
        latest.close
    };
    let avg_volume = bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64;

    Some(ThresholdSet {
        instrument_id: instrument_id.to_string(),
        latest_date: latest.date,
        latest_close: latest.close,
        prev_close,
        amplitude_pct: AMPLITUDE_TRIGGER_PCT,
        amplitude_upper: prev_close * (1.0 + AMPLITUDE_TRIGGER_PCT / 100.0),
        amplitude_lower: prev_close * (1.0 - AMPLITUDE_TRIGGER_PCT / 100.0),
        change_pct: CHANGE_TRIGGER_PCT,
        change_up_price: prev_close * (1.0 + CHANGE_TRIGGER_PCT / 100.0),
        change_down_price: prev_close * (1.0 - CHANGE_TRIGGER_PCT / 100.0),
        turnover_pct: TURNOVER_TRIGGER_PCT,
        avg_volume,
    })
}
