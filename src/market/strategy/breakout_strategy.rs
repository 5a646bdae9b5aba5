use std::collections::BTreeMap;

use crate::market::indicator::ma::volume_ma;
use crate::market::model::{InstitutionalFlow, PriceBar};
use crate::market::strategy::{ScreenResult, Screener, StrategyType};

/// 盘整突破：近几个交易日内出现爆量K线
/// 量能基准取候选日之前 20 个交易日的均量，不含候选日本身
pub struct BreakoutStrategy {
    /// 回看的交易日数（含锚定日）
    pub lookback_sessions: usize,
    /// 量能基准窗口长度
    pub baseline_sessions: usize,
    /// 候选日成交量对基准均量的倍数下限
    pub min_volume_ratio: f64,
    /// 候选日成交量下限（张）
    pub min_volume_lots: f64,
}

impl Default for BreakoutStrategy {
    fn default() -> Self {
        Self {
            lookback_sessions: 3,
            baseline_sessions: 20,
            min_volume_ratio: 5.0,
            min_volume_lots: 5000.0,
        }
    }
}

impl Screener for BreakoutStrategy {
    fn strategy(&self) -> StrategyType {
        StrategyType::ConsolidationBreakout
    }

    fn screen(
        &self,
        instrument_id: &str,
        bars: &[PriceBar],
        _flows: &[InstitutionalFlow],
    ) -> Vec<ScreenResult> {
        if bars.len() < self.baseline_sessions + self.lookback_sessions {
            return vec![];
        }
        let anchor_close = bars[0].close;

        // 一支股票可在回看窗口内命中多笔突破，按突破日降序逐一报告
        let mut results = Vec::new();
        for pos in 0..self.lookback_sessions {
            let session = &bars[pos];
            let baseline = &bars[pos + 1..];
            let baseline_avg = match volume_ma_window(baseline, self.baseline_sessions) {
                Some(avg) if avg > 0.0 => avg,
                _ => continue,
            };
            let baseline_lots = baseline_avg / 1000.0;
            let session_lots = session.volume_lots();
            let volume_ratio = session_lots / baseline_lots;
            if volume_ratio <= self.min_volume_ratio || session_lots <= self.min_volume_lots {
                continue;
            }

            let price_change_pct = if session.open > 0.0 {
                (anchor_close - session.open) / session.open * 100.0
            } else {
                0.0
            };

            let mut metrics = BTreeMap::new();
            metrics.insert("breakout_price".to_string(), session.open);
            metrics.insert("breakout_volume_lots".to_string(), session_lots.trunc());
            metrics.insert("baseline_volume_lots".to_string(), baseline_lots.trunc());
            metrics.insert("volume_ratio".to_string(), volume_ratio);
            metrics.insert("price_change_pct".to_string(), price_change_pct);
            metrics.insert("anchor_close".to_string(), anchor_close);

            results.push(ScreenResult {
                instrument_id: instrument_id.to_string(),
                strategy: self.strategy(),
                date: session.date,
                metrics,
                rank_key: volume_ratio,
            });
        }
        results
    }
}

fn volume_ma_window(bars: &[PriceBar], period: usize) -> Option<f64> {
    if bars.len() < period {
        return None;
    }
    volume_ma(&bars[..period], period)
}
