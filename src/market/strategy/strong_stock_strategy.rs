use std::collections::BTreeMap;

use crate::market::indicator::ma::{close_ma, volume_ma};
use crate::market::indicator::returns::n_session_return;
use crate::market::model::{InstitutionalFlow, PriceBar};
use crate::market::strategy::{ScreenResult, Screener, StrategyType};

/// 多头排列所需的最长均线周期，历史不足 60 根直接淘汰
const LONGEST_MA_SESSIONS: usize = 60;

/// 强势股：创10日新高 + 多头排列 + 站上20MA + 跑赢基准 + 放量
/// 六个条件全部满足才命中，逐条短路求值
pub struct StrongStockStrategy {
    /// 基准股票（0050）的10日涨幅（%）
    pub benchmark_return_10d: f64,
    /// 当日成交量下限（张）
    pub min_volume_lots: f64,
    /// 量能比（5日均量/60日均量）下限
    pub min_volume_ratio: f64,
}

impl StrongStockStrategy {
    pub fn new(benchmark_return_10d: f64) -> Self {
        Self {
            benchmark_return_10d,
            min_volume_lots: 10_000.0,
            min_volume_ratio: 1.5,
        }
    }
}

impl Screener for StrongStockStrategy {
    fn strategy(&self) -> StrategyType {
        StrategyType::StrongStock
    }

    fn screen(
        &self,
        instrument_id: &str,
        bars: &[PriceBar],
        _flows: &[InstitutionalFlow],
    ) -> Vec<ScreenResult> {
        if bars.len() < LONGEST_MA_SESSIONS {
            return vec![];
        }
        let today = &bars[0];
        let today_close = today.close;
        let today_volume_lots = today.volume_lots();

        // 条件1: 收盘为近10日最高
        let max_close_10d = bars[..10].iter().map(|b| b.close).fold(f64::MIN, f64::max);
        if today_close < max_close_10d {
            return vec![];
        }

        let (ma_10, ma_20, ma_60) = match (
            close_ma(bars, 10),
            close_ma(bars, 20),
            close_ma(bars, LONGEST_MA_SESSIONS),
        ) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => return vec![],
        };

        // 条件2: 多头排列
        if !(ma_10 > ma_20 && ma_20 > ma_60) {
            return vec![];
        }

        // 条件3: 收盘价站上20MA
        if today_close <= ma_20 {
            return vec![];
        }

        // 条件4: 10日涨幅严格跑赢基准
        let return_10d = match n_session_return(bars, 10) {
            Some(r) => r,
            None => return vec![],
        };
        if return_10d <= self.benchmark_return_10d {
            return vec![];
        }

        // 条件5: 当日成交量
        if today_volume_lots <= self.min_volume_lots {
            return vec![];
        }

        // 条件6: 量能比
        let (vol_ma_5, vol_ma_60) =
            match (volume_ma(bars, 5), volume_ma(bars, LONGEST_MA_SESSIONS)) {
                (Some(a), Some(b)) if b > 0.0 => (a, b),
                _ => return vec![],
            };
        let volume_ratio = vol_ma_5 / vol_ma_60;
        if volume_ratio < self.min_volume_ratio {
            return vec![];
        }

        let mut metrics = BTreeMap::new();
        metrics.insert("close".to_string(), today_close);
        metrics.insert("ma_10".to_string(), ma_10);
        metrics.insert("ma_20".to_string(), ma_20);
        metrics.insert("ma_60".to_string(), ma_60);
        metrics.insert("return_10d".to_string(), return_10d);
        metrics.insert("benchmark_return_10d".to_string(), self.benchmark_return_10d);
        metrics.insert("volume_lots".to_string(), today_volume_lots.trunc());
        metrics.insert("volume_ratio".to_string(), volume_ratio);

        vec![ScreenResult {
            instrument_id: instrument_id.to_string(),
            strategy: self.strategy(),
            date: today.date,
            metrics,
            rank_key: return_10d,
        }]
    }
}
